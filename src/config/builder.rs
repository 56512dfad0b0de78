//! Fluent builder for `ExtractConfig`
//!
//! Starts from defaults (or an already loaded config) and validates on
//! `build()`, so a config reaching the pipeline is always usable.

use anyhow::{Result, bail};
use std::path::PathBuf;

use super::types::{CacheMode, ExtractConfig};
use crate::pruning::PruningOptions;

#[derive(Debug, Clone, Default)]
pub struct ExtractConfigBuilder {
    config: ExtractConfig,
}

impl ExtractConfig {
    #[must_use]
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::default()
    }

    /// Builder seeded with this config, for layering overrides
    #[must_use]
    pub fn into_builder(self) -> ExtractConfigBuilder {
        ExtractConfigBuilder { config: self }
    }

    /// Reject values no run could succeed with
    ///
    /// # Errors
    /// Names the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.navigation_timeout_secs == 0 {
            bail!("navigation_timeout_secs must be greater than 0");
        }
        if self.browser.request_timeout_secs == 0 {
            bail!("browser.request_timeout_secs must be greater than 0");
        }
        if self.stealth.locale.trim().is_empty() {
            bail!("stealth.locale must not be empty");
        }
        if self.stealth.timezone.trim().is_empty() {
            bail!("stealth.timezone must not be empty");
        }
        if self.stealth.user_agent.trim().is_empty() {
            bail!("stealth.user_agent must not be empty");
        }
        if self.crawl.cache_mode == CacheMode::Enabled && self.crawl.cache_capacity == 0 {
            bail!("crawl.cache_capacity must be greater than 0 when caching is enabled");
        }
        let threshold = self.crawl.pruning.threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            bail!("crawl.pruning.threshold must be a non-negative number, got {threshold}");
        }
        if !self.crawl.enabled && !self.render.enabled {
            bail!("at least one of crawl and render must be enabled");
        }
        Ok(())
    }
}

impl ExtractConfigBuilder {
    #[must_use]
    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.config.navigation_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.config.render.settle_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.config.stealth.locale = locale.into();
        self
    }

    #[must_use]
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.config.stealth.timezone = timezone.into();
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.stealth.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.browser.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.browser.executable = Some(path.into());
        self
    }

    #[must_use]
    pub fn crawl_enabled(mut self, enabled: bool) -> Self {
        self.config.crawl.enabled = enabled;
        self
    }

    #[must_use]
    pub fn render_enabled(mut self, enabled: bool) -> Self {
        self.config.render.enabled = enabled;
        self
    }

    #[must_use]
    pub fn crawl_min_chars(mut self, min_chars: usize) -> Self {
        self.config.crawl.min_chars = min_chars;
        self
    }

    #[must_use]
    pub fn render_min_chars(mut self, min_chars: usize) -> Self {
        self.config.render.min_chars = min_chars;
        self
    }

    #[must_use]
    pub fn region_min_chars(mut self, min_chars: usize) -> Self {
        self.config.render.region_min_chars = min_chars;
        self
    }

    #[must_use]
    pub fn cache_mode(mut self, mode: CacheMode) -> Self {
        self.config.crawl.cache_mode = mode;
        self
    }

    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.crawl.cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn remove_overlays(mut self, remove: bool) -> Self {
        self.config.crawl.remove_overlays = remove;
        self
    }

    #[must_use]
    pub fn excluded_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.crawl.excluded_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn pruning(mut self, options: PruningOptions) -> Self {
        self.config.crawl.pruning = options;
        self
    }

    /// # Errors
    /// See [`ExtractConfig::validate`].
    pub fn build(self) -> Result<ExtractConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
