//! Direct-render strategy
//!
//! Stealth browser session, network idle plus a settle delay, then the
//! content region locator and the quality gate.

use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ExtractionResult, ExtractionStrategy, StrategyKind};
use crate::browser::{PageSession, RenderedPage, SessionLauncher, WaitUntil};
use crate::config::ExtractConfig;
use crate::error::ExtractResult;
use crate::locator::ContentLocator;
use crate::quality::QualityGate;
use crate::request::ExtractionRequest;
use crate::stealth::{StealthPolicy, StealthProfile};

pub struct DirectRenderStrategy {
    launcher: Arc<dyn SessionLauncher>,
    policy: StealthPolicy,
    timeout: Duration,
    settle_delay: Duration,
    locator: ContentLocator,
    gate: QualityGate,
}

impl DirectRenderStrategy {
    #[must_use]
    pub fn new(launcher: Arc<dyn SessionLauncher>, config: &ExtractConfig) -> Self {
        Self {
            launcher,
            policy: config.stealth().clone(),
            timeout: config.navigation_timeout(),
            settle_delay: config.settle_delay(),
            locator: ContentLocator::new(config.render().region_min_chars),
            gate: QualityGate::new(config.render().min_chars),
        }
    }

    /// Stealth profile for this request; a request locale beats the configured one
    fn profile_for(&self, request: &ExtractionRequest) -> StealthProfile {
        match request.locale() {
            Some(locale) => StealthProfile::build(&StealthPolicy {
                locale: locale.to_string(),
                ..self.policy.clone()
            }),
            None => StealthProfile::build(&self.policy),
        }
    }

    async fn attempt(&self, request: &ExtractionRequest) -> ExtractResult<String> {
        let profile = self.profile_for(request);
        let mut session = self.launcher.launch(Some(&profile)).await?;
        let outcome = self.render_and_locate(session.as_mut(), request).await;
        session.close().await;
        outcome
    }

    async fn render_and_locate(
        &self,
        session: &mut dyn PageSession,
        request: &ExtractionRequest,
    ) -> ExtractResult<String> {
        let url = request.url_str();
        let response = session
            .navigate(url, WaitUntil::NetworkIdle, request.timeout_or(self.timeout))
            .await?;
        if let Some(status) = response.status.filter(|s| *s >= 400) {
            warn!(status, url, "Render got an error status");
        }

        // Late client-side rendering after the network went quiet
        tokio::time::sleep(self.settle_delay).await;

        let page = RenderedPage {
            html: session.content().await?,
            status: response.status,
        };
        debug!(html_len = page.html.len(), status = ?page.status, "Page rendered");

        let candidate = self.locator.locate(&page.html)?;
        debug!(rule = %candidate.rule, tag = %candidate.tag, length = candidate.length, "Located content");

        self.gate.check(&candidate.text)?;
        Ok(candidate.text)
    }
}

impl ExtractionStrategy for DirectRenderStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Render
    }

    fn run<'a>(&'a self, request: &'a ExtractionRequest) -> BoxFuture<'a, ExtractionResult> {
        Box::pin(async move {
            let outcome = self.attempt(request).await;
            match &outcome {
                Ok(text) => info!(chars = text.chars().count(), "Render strategy succeeded"),
                Err(e) => warn!(kind = e.kind(), "Render strategy failed: {e}"),
            }
            ExtractionResult::from_outcome(StrategyKind::Render, outcome)
        })
    }
}
