//! Content quality gate
//!
//! Decides whether a strategy's output is worth returning. The gate is a pure
//! length predicate on trimmed text; strategies pick their own threshold
//! (pruned crawl output is expected to be denser than raw locator text).

use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::utils::text::char_len;

/// True when `text` is non-empty after trimming and longer than `min_len` chars
#[must_use]
pub fn accept(text: &str, min_len: usize) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && char_len(trimmed) > min_len
}

/// A quality gate bound to one threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityGate {
    min_len: usize,
}

impl QualityGate {
    #[must_use]
    pub const fn new(min_len: usize) -> Self {
        Self { min_len }
    }

    #[must_use]
    pub const fn min_len(&self) -> usize {
        self.min_len
    }

    /// Same decision as [`accept`], as a `Result` for use with `?`
    ///
    /// # Errors
    /// `ExtractError::ContentTooThin` carrying the trimmed length.
    pub fn check(&self, text: &str) -> ExtractResult<()> {
        if accept(text, self.min_len) {
            return Ok(());
        }

        let length = char_len(text.trim());
        debug!(length, min = self.min_len, "Quality gate rejected content");
        Err(ExtractError::ContentTooThin {
            length,
            min: self.min_len,
        })
    }
}
