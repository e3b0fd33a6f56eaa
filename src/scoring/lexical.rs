//! Content-word overlap used when embeddings are unavailable.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static CONTENT_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b[a-z]{{{},}}\b",
        crate::constants::LEXICAL_MIN_TOKEN_LEN
    ))
    .expect("Invalid content word regex pattern")
});

/// Distinct lowercase ASCII words of at least four letters.
pub fn content_words(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    CONTENT_WORD
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Fraction of the claim's words present in the reference; `0.0` for a claim with no words.
pub fn overlap_ratio(claim: &HashSet<String>, reference: &HashSet<String>) -> f32 {
    if claim.is_empty() {
        return 0.0;
    }
    claim.intersection(reference).count() as f32 / claim.len() as f32
}
