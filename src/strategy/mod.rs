//! Extraction strategies
//!
//! A strategy is one self-contained way of getting page text. Every strategy
//! turns its own errors into [`ExtractionResult::Failure`]; the pipeline only
//! ever sees results, never errors.

pub mod crawl;
pub mod render;

pub use crawl::{BrowserCrawler, CrawlBackend, CrawlOutput, CrawlRunConfig, CrawlStrategy};
pub use render::DirectRenderStrategy;

use futures::future::BoxFuture;
use std::fmt;

use crate::error::ExtractError;
use crate::request::ExtractionRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Managed crawl with pruning and markdown rendering
    Crawl,
    /// Stealth browser render plus content region locator
    Render,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crawl => write!(f, "crawl"),
            Self::Render => write!(f, "render"),
        }
    }
}

/// Outcome of one strategy, or of a whole pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Success { text: String, strategy: StrategyKind },
    Failure { strategy: StrategyKind, reason: ExtractError },
}

impl ExtractionResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        match self {
            Self::Success { strategy, .. } | Self::Failure { strategy, .. } => *strategy,
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text, .. } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<&ExtractError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }

    /// Wrap a strategy's internal result
    #[must_use]
    pub fn from_outcome(strategy: StrategyKind, outcome: Result<String, ExtractError>) -> Self {
        match outcome {
            Ok(text) => Self::Success { text, strategy },
            Err(reason) => Self::Failure { strategy, reason },
        }
    }
}

/// One tier of the extraction pipeline
///
/// `run` must always complete within the strategy's time budget and must
/// report every error as `Failure`.
pub trait ExtractionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn run<'a>(&'a self, request: &'a ExtractionRequest) -> BoxFuture<'a, ExtractionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_outcome() {
        let ok = ExtractionResult::from_outcome(StrategyKind::Crawl, Ok("text".to_string()));
        assert!(ok.is_success());
        assert_eq!(ok.text(), Some("text"));
        assert_eq!(ok.strategy(), StrategyKind::Crawl);

        let failed = ExtractionResult::from_outcome(StrategyKind::Render, Err(ExtractError::NoRegionFound));
        assert!(!failed.is_success());
        assert_eq!(failed.reason(), Some(&ExtractError::NoRegionFound));
        assert_eq!(failed.strategy().to_string(), "render");
    }
}
