//! Tiered extraction pipeline
//!
//! Runs strategies in order, cheapest first. The first `Success` ends the run;
//! a `Failure` (or a panic, caught here) moves on to the next strategy. When
//! every strategy has failed, the last failure is the pipeline's result.

use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::browser::SessionLauncher;
use crate::config::ExtractConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::request::ExtractionRequest;
use crate::strategy::{
    BrowserCrawler, CrawlStrategy, DirectRenderStrategy, ExtractionResult, ExtractionStrategy,
    StrategyKind,
};
use crate::utils::text::safe_truncate_chars;

/// Where a pipeline run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Pending,
    TryingStrategy(usize),
    Succeeded,
    AllFailed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::TryingStrategy(i) => write!(f, "trying strategy {i}"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::AllFailed => write!(f, "all failed"),
        }
    }
}

pub struct Pipeline {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Pipeline {
    /// # Errors
    /// `ExtractError::InvalidRequest` if `strategies` is empty.
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> ExtractResult<Self> {
        if strategies.is_empty() {
            return Err(ExtractError::InvalidRequest(
                "no extraction strategies enabled".to_string(),
            ));
        }
        Ok(Self { strategies })
    }

    /// Crawl then render, skipping whichever the config disables
    ///
    /// # Errors
    /// `ExtractError::InvalidRequest` if the config disables both.
    pub fn standard(
        config: &ExtractConfig,
        launcher: Arc<dyn SessionLauncher>,
    ) -> ExtractResult<Self> {
        let mut strategies: Vec<Box<dyn ExtractionStrategy>> = Vec::with_capacity(2);
        if config.crawl().enabled {
            let backend = Arc::new(BrowserCrawler::new(
                Arc::clone(&launcher),
                config.crawl().cache_capacity,
            ));
            strategies.push(Box::new(CrawlStrategy::new(backend, config)));
        }
        if config.render().enabled {
            strategies.push(Box::new(DirectRenderStrategy::new(launcher, config)));
        }
        Self::new(strategies)
    }

    pub fn strategies(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        self.strategies.iter().map(|s| s.kind())
    }

    /// Run the strategies in order until one succeeds
    pub async fn run(&self, request: &ExtractionRequest) -> ExtractionResult {
        self.run_traced(request).await.0
    }

    /// Same as [`Pipeline::run`], also returning every state the run passed through
    ///
    /// The trace always starts with `Pending` and ends with `Succeeded` or
    /// `AllFailed`.
    pub async fn run_traced(
        &self,
        request: &ExtractionRequest,
    ) -> (ExtractionResult, Vec<PipelineState>) {
        let mut trace = vec![PipelineState::Pending];
        debug!(url = request.url_str(), state = %PipelineState::Pending, "Starting extraction");

        let mut last_failure = None;
        for (index, strategy) in self.strategies.iter().enumerate() {
            let state = PipelineState::TryingStrategy(index);
            trace.push(state);
            debug!(%state, strategy = %strategy.kind(), "Running strategy");

            let result = match AssertUnwindSafe(strategy.run(request)).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(strategy = %strategy.kind(), "Strategy panicked: {message}");
                    ExtractionResult::Failure {
                        strategy: strategy.kind(),
                        reason: ExtractError::UnknownFault(format!("strategy panicked: {message}")),
                    }
                }
            };

            if result.is_success() {
                let state = PipelineState::Succeeded;
                trace.push(state);
                info!(
                    %state,
                    strategy = %result.strategy(),
                    preview = safe_truncate_chars(result.text().unwrap_or_default(), 80),
                    "Extraction finished"
                );
                return (result, trace);
            }
            last_failure = Some(result);
        }

        let state = PipelineState::AllFailed;
        trace.push(state);
        warn!(%state, url = request.url_str(), "Every strategy failed");
        let result = last_failure.unwrap_or_else(|| ExtractionResult::Failure {
            strategy: StrategyKind::Render,
            reason: ExtractError::UnknownFault("pipeline ran no strategies".to_string()),
        });
        (result, trace)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
