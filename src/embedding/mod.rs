//! Embedding capability.
//!
//! - [`EmbeddingProvider`] is the seam the scorer depends on: strings in, vectors out,
//!   plus a similarity between two vectors.
//! - [`sentence`] provides the concrete BERT sentence encoder (and a stub backend).
//! - [`CachedEmbedder`] memoises vectors so identical text always maps to identical
//!   vectors within one process.
//!
//! The provider is built once by the caller and passed by reference into the
//! scorer and analyzers; nothing here is global.

mod cache;
mod error;
/// BERT sentence embedder.
pub mod sentence;
/// Tokenizer loading helpers.
pub mod utils;


pub use cache::CachedEmbedder;
pub use error::EmbeddingError;
pub use sentence::{SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig, SentenceEmbedder};

use tracing::{info, warn};

use crate::config::{Config, EmbedderMode};

/// Maps strings to fixed-dimension vectors.
///
/// Implementations must be order preserving (one vector per input) and repeatable:
/// the same string yields the same vector for the lifetime of the provider.
pub trait EmbeddingProvider {
    /// Embeds a batch of strings. An empty batch yields an empty result.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Dimension of every returned vector.
    fn embedding_dim(&self) -> usize;

    /// Similarity of two vectors; cosine similarity unless overridden.
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine_similarity(a, b)
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for &P {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed(texts)
    }

    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }

    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        (**self).similarity(a, b)
    }
}

/// Cosine similarity in `[-1, 1]`; `0.0` for mismatched lengths or zero vectors.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
            (dot + av * bv, na + av * av, nb + bv * bv)
        });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

/// Builds the embedding provider described by `config`.
///
/// - `auto`: the sentence encoder at `model_path` (an error if unset or unloadable)
/// - `stub`: the hashed bag-of-words backend
/// - `lexical`: always an error; embeddings are disabled
pub fn load_provider(config: &Config) -> Result<CachedEmbedder<SentenceEmbedder>, EmbeddingError> {
    let sentence_config = match config.embedder {
        EmbedderMode::Lexical => {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embeddings disabled (SELFCHECK_EMBEDDER=lexical)".to_string(),
            });
        }
        EmbedderMode::Stub => SentenceConfig::stub(),
        EmbedderMode::Auto => match &config.model_path {
            Some(path) => SentenceConfig::new(path.clone()),
            None => {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "no sentence encoder configured (SELFCHECK_MODEL_PATH unset)"
                        .to_string(),
                });
            }
        },
    };

    let embedder = SentenceEmbedder::load(sentence_config)?;
    Ok(CachedEmbedder::with_capacity(embedder, config.cache_capacity))
}

/// Queries embedding availability once, up front.
///
/// Returns `None` (after logging why) when embeddings cannot be used; callers then
/// score lexically for the whole invocation.
pub fn available_provider(config: &Config) -> Option<CachedEmbedder<SentenceEmbedder>> {
    match load_provider(config) {
        Ok(provider) => {
            info!(
                embedder = %config.embedder,
                embedding_dim = provider.embedding_dim(),
                "Embedding provider ready, using semantic scoring"
            );
            Some(provider)
        }
        Err(e) => {
            warn!(
                embedder = %config.embedder,
                error = %e,
                "Embeddings unavailable, falling back to lexical scoring (lower confidence)"
            );
            None
        }
    }
}
