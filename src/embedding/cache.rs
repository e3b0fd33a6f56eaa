use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use super::{EmbeddingError, EmbeddingProvider};
use crate::constants::DEFAULT_EMBED_CACHE_CAPACITY;
use crate::hashing::hash_text;

/// Memoising wrapper keyed by the BLAKE3 hash of each input text.
///
/// Anchor rotation embeds every run's claims once per anchor; the cache turns the
/// repeats into lookups and pins each text to the first vector computed for it.
pub struct CachedEmbedder<P> {
    inner: P,
    entries: Cache<[u8; 32], Arc<Vec<f32>>>,
}

impl<P: EmbeddingProvider> CachedEmbedder<P> {
    pub fn new(inner: P) -> Self {
        Self::with_capacity(inner, DEFAULT_EMBED_CACHE_CAPACITY)
    }

    /// Creates a cache with a max entry capacity.
    pub fn with_capacity(inner: P, capacity: u64) -> Self {
        Self {
            inner,
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of memoised vectors.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(&hash_text(text))
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<P> {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let keys: Vec<[u8; 32]> = texts.iter().map(|text| hash_text(text)).collect();
        let mut vectors: Vec<Option<Arc<Vec<f32>>>> =
            keys.iter().map(|key| self.entries.get(key)).collect();

        let missing: Vec<usize> = vectors
            .iter()
            .enumerate()
            .filter(|(_, vector)| vector.is_none())
            .map(|(idx, _)| idx)
            .collect();

        if !missing.is_empty() {
            debug!(
                requested = texts.len(),
                misses = missing.len(),
                "Embedding cache misses"
            );

            let batch: Vec<&str> = missing.iter().map(|&idx| texts[idx]).collect();
            let computed = self.inner.embed(&batch)?;
            if computed.len() != batch.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: batch.len(),
                    actual: computed.len(),
                });
            }

            for (idx, vector) in missing.into_iter().zip(computed) {
                let vector = Arc::new(vector);
                self.entries.insert(keys[idx], Arc::clone(&vector));
                vectors[idx] = Some(vector);
            }
        }

        Ok(vectors
            .into_iter()
            .map(|vector| vector.map(|v| v.as_ref().clone()).unwrap_or_default())
            .collect())
    }

    fn embedding_dim(&self) -> usize {
        self.inner.embedding_dim()
    }

    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        self.inner.similarity(a, b)
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for CachedEmbedder<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("inner", &self.inner)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
