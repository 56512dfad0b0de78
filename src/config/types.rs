//! Core configuration types for page extraction
//!
//! `ExtractConfig` is built once per invocation (defaults, then an optional
//! TOML file, then CLI flags) and handed to every strategy by reference.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::pruning::PruningOptions;
use crate::stealth::StealthPolicy;
use crate::utils::constants::{
    DEFAULT_CRAWL_CACHE_CAPACITY, DEFAULT_CRAWL_MIN_CHARS, DEFAULT_EXCLUDED_TAGS,
    DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_REGION_MIN_CHARS, DEFAULT_RENDER_MIN_CHARS,
    DEFAULT_SETTLE_DELAY_MS,
};

/// Whether the crawl backend may answer from its page cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    #[default]
    Enabled,
    Bypass,
}

/// How Chrome is found and started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub headless: bool,
    /// Explicit Chrome binary; discovery and download are skipped when set
    pub executable: Option<PathBuf>,
    /// Appended after the built-in launch flags
    pub extra_args: Vec<String>,
    /// CDP request timeout, also bounds content retrieval
    pub request_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            extra_args: Vec::new(),
            request_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    pub enabled: bool,
    /// Quality gate threshold in chars
    pub min_chars: usize,
    pub cache_mode: CacheMode,
    pub cache_capacity: usize,
    pub remove_overlays: bool,
    pub excluded_tags: Vec<String>,
    pub pruning: PruningOptions,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_chars: DEFAULT_CRAWL_MIN_CHARS,
            cache_mode: CacheMode::Enabled,
            cache_capacity: DEFAULT_CRAWL_CACHE_CAPACITY,
            remove_overlays: true,
            excluded_tags: DEFAULT_EXCLUDED_TAGS.iter().map(|t| (*t).to_string()).collect(),
            pruning: PruningOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub enabled: bool,
    /// Quality gate threshold in chars
    pub min_chars: usize,
    /// Text a locator rule's match needs before it is accepted
    pub region_min_chars: usize,
    /// Fixed wait after network idle
    pub settle_delay_ms: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_chars: DEFAULT_RENDER_MIN_CHARS,
            region_min_chars: DEFAULT_REGION_MIN_CHARS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

/// Main configuration struct for extraction runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub(crate) navigation_timeout_secs: u64,
    pub(crate) browser: BrowserSettings,
    pub(crate) stealth: StealthPolicy,
    pub(crate) crawl: CrawlSettings,
    pub(crate) render: RenderSettings,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            browser: BrowserSettings::default(),
            stealth: StealthPolicy::default(),
            crawl: CrawlSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

impl ExtractConfig {
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.render.settle_delay_ms)
    }

    #[must_use]
    pub fn browser(&self) -> &BrowserSettings {
        &self.browser
    }

    #[must_use]
    pub fn stealth(&self) -> &StealthPolicy {
        &self.stealth
    }

    #[must_use]
    pub fn crawl(&self) -> &CrawlSettings {
        &self.crawl
    }

    #[must_use]
    pub fn render(&self) -> &RenderSettings {
        &self.render
    }
}
