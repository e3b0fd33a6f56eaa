//! Claim extraction.
//!
//! A response is reduced to an ordered list of atomic, sentence-like claims:
//!
//! 1. markdown heading lines (`# ...`) are blanked out,
//! 2. the rest is split after `.`, `!` or `?` followed by whitespace,
//! 3. candidates are trimmed and kept only if longer than [`MIN_CLAIM_CHARS`] and not
//!    a table row (`|`) or list bullet (`-`).
//!
//! Extraction is pure: the same text always yields the same claims in the same order.
//! An empty result is valid and means "nothing to score".


use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::MIN_CLAIM_CHARS;
use crate::runs::Run;

static HEADING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#+\s+.*$").expect("Invalid heading regex pattern"));

// The terminal punctuation stays with the sentence; the whitespace run is dropped.
static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("Invalid sentence regex pattern"));

const TABLE_ROW_MARKER: char = '|';
const LIST_BULLET_MARKER: char = '-';

/// One claim extracted from a run's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Trimmed claim text.
    pub text: String,
    /// `run_id` of the run the claim came from.
    pub run_id: String,
    /// Position among the run's claims (0-based).
    pub index: usize,
}

impl Claim {
    pub fn new(text: impl Into<String>, run_id: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            run_id: run_id.into(),
            index,
        }
    }
}

/// Sentence-level claim extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimExtractor {
    min_chars: usize,
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self {
            min_chars: MIN_CLAIM_CHARS,
        }
    }
}

impl ClaimExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the minimum claim length (claims must be strictly longer).
    pub fn with_min_chars(min_chars: usize) -> Self {
        Self { min_chars }
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Extracts claim strings from a response text.
    pub fn extract(&self, response: &str) -> Vec<String> {
        if response.trim().is_empty() {
            return Vec::new();
        }

        let text = HEADING_LINE.replace_all(response, "");

        split_sentences(&text)
            .into_iter()
            .map(str::trim)
            .filter(|candidate| self.is_claim(candidate))
            .map(str::to_string)
            .collect()
    }

    /// Extracts claims from a run, tagging each with its source and position.
    pub fn extract_claims(&self, run: &Run) -> Vec<Claim> {
        self.extract(&run.response_text)
            .into_iter()
            .enumerate()
            .map(|(index, text)| Claim::new(text, run.run_id.as_str(), index))
            .collect()
    }

    fn is_claim(&self, candidate: &str) -> bool {
        candidate.chars().count() > self.min_chars
            && !candidate.starts_with(TABLE_ROW_MARKER)
            && !candidate.starts_with(LIST_BULLET_MARKER)
    }
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // `[.!?]` is a single ASCII byte, so `+ 1` stays on a char boundary.
        sentences.push(&text[start..boundary.start() + 1]);
        start = boundary.end();
    }
    sentences.push(&text[start..]);

    sentences
}
