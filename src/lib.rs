//! Main-content extraction for arbitrary web pages
//!
//! A page goes through an ordered list of strategies, cheapest first:
//!
//! 1. **crawl**: a plain browser load, overlay and boilerplate removal, a
//!    pruning filter, and markdown rendering;
//! 2. **render**: a stealth browser session waiting for network idle, then a
//!    content region locator.
//!
//! Each strategy's output goes through a length-based quality gate. The first
//! strategy that passes wins; nothing is merged.

pub mod browser;
pub mod config;
pub mod dom;
pub mod error;
pub mod locator;
pub mod markdown;
pub mod pipeline;
pub mod pruning;
pub mod quality;
pub mod request;
pub mod stealth;
pub mod strategy;
pub mod utils;

use std::sync::Arc;

pub use browser::{ChromiumLauncher, PageSession, SessionLauncher, WaitUntil};
pub use config::{CacheMode, ExtractConfig, ExtractConfigBuilder, load_config};
pub use error::{ExtractError, ExtractResult};
pub use locator::{ContentCandidate, ContentLocator, RegionRule};
pub use pipeline::{Pipeline, PipelineState};
pub use pruning::{PruningFilter, PruningOptions, ThresholdMode};
pub use quality::{QualityGate, accept};
pub use request::ExtractionRequest;
pub use stealth::{StealthPolicy, StealthProfile};
pub use strategy::{ExtractionResult, ExtractionStrategy, StrategyKind};

/// Extract the main content of `request` with a real Chrome
///
/// Never returns an error: a run that could not produce text is an
/// `ExtractionResult::Failure` carrying the last strategy's reason.
pub async fn extract(request: &ExtractionRequest, config: &ExtractConfig) -> ExtractionResult {
    let launcher: Arc<dyn SessionLauncher> =
        Arc::new(ChromiumLauncher::new(config.browser().clone()));
    extract_with(request, config, launcher).await
}

/// Same as [`extract`] with a caller-supplied browser launcher
pub async fn extract_with(
    request: &ExtractionRequest,
    config: &ExtractConfig,
    launcher: Arc<dyn SessionLauncher>,
) -> ExtractionResult {
    match Pipeline::standard(config, launcher) {
        Ok(pipeline) => pipeline.run(request).await,
        Err(reason) => ExtractionResult::Failure {
            strategy: StrategyKind::Crawl,
            reason,
        },
    }
}
