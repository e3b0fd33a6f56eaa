use tracing::debug;

use super::types::ScoringMethod;
use crate::embedding::EmbeddingProvider;

/// How claims are scored for a whole invocation.
#[derive(Clone, Copy)]
pub enum ScoringStrategy<'a> {
    /// Embedding similarity through the injected provider.
    Semantic(&'a dyn EmbeddingProvider),
    /// Token-overlap fallback (no embeddings).
    Lexical,
}

impl<'a> ScoringStrategy<'a> {
    /// Semantic when a provider is available, lexical otherwise.
    pub fn select(provider: Option<&'a dyn EmbeddingProvider>) -> Self {
        let strategy = match provider {
            Some(provider) => ScoringStrategy::Semantic(provider),
            None => ScoringStrategy::Lexical,
        };
        debug!(method = %strategy.method(), "Scoring strategy selected");
        strategy
    }

    pub fn method(&self) -> ScoringMethod {
        match self {
            ScoringStrategy::Semantic(_) => ScoringMethod::Semantic,
            ScoringStrategy::Lexical => ScoringMethod::Lexical,
        }
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, ScoringStrategy::Semantic(_))
    }
}

impl std::fmt::Debug for ScoringStrategy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringStrategy::Semantic(provider) => f
                .debug_struct("Semantic")
                .field("embedding_dim", &provider.embedding_dim())
                .finish(),
            ScoringStrategy::Lexical => f.write_str("Lexical"),
        }
    }
}
