//! Automated-crawl strategy and its browser-backed crawl backend

use futures::future::BoxFuture;
use lru::LruCache;
use parking_lot::Mutex;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ExtractionResult, ExtractionStrategy, StrategyKind};
use crate::browser::js_scripts::OVERLAY_REMOVAL_SCRIPT;
use crate::browser::{PageSession, SessionLauncher, WaitUntil};
use crate::config::{CacheMode, ExtractConfig};
use crate::dom::{content_root, ids_matching, serialize_children_excluding};
use crate::error::ExtractResult;
use crate::markdown::html_to_markdown;
use crate::pruning::{PruningFilter, PruningOptions};
use crate::quality::QualityGate;
use crate::request::ExtractionRequest;

static OVERLAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)cookie|consent|popup|modal|overlay")
        .expect("BUG: hardcoded overlay pattern is invalid")
});

/// Everything a backend needs for one crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlRunConfig {
    pub cache_mode: CacheMode,
    pub remove_overlays: bool,
    pub excluded_tags: Vec<String>,
    pub pruning: PruningOptions,
    pub timeout: Duration,
}

impl CrawlRunConfig {
    #[must_use]
    pub fn from_config(config: &ExtractConfig) -> Self {
        let crawl = config.crawl();
        Self {
            cache_mode: crawl.cache_mode,
            remove_overlays: crawl.remove_overlays,
            excluded_tags: crawl.excluded_tags.clone(),
            pruning: crawl.pruning.clone(),
            timeout: config.navigation_timeout(),
        }
    }
}

/// Result of a managed crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutput {
    /// Markdown of the cleaned page
    pub raw_markdown: String,
    /// Markdown of the pruned page, may be empty
    pub fit_markdown: String,
    pub status: Option<u16>,
}

/// The managed crawl capability
pub trait CrawlBackend: Send + Sync {
    fn crawl<'a>(
        &'a self,
        url: &'a str,
        config: &'a CrawlRunConfig,
    ) -> BoxFuture<'a, ExtractResult<CrawlOutput>>;
}

/// Crawl backend over a plain (non-stealth) browser session
///
/// Successful crawls are cached in memory per URL for the lifetime of the
/// backend.
pub struct BrowserCrawler {
    launcher: Arc<dyn SessionLauncher>,
    cache: Mutex<LruCache<String, CrawlOutput>>,
}

impl BrowserCrawler {
    #[must_use]
    pub fn new(launcher: Arc<dyn SessionLauncher>, cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            launcher,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    async fn fetch(&self, url: &str, config: &CrawlRunConfig) -> ExtractResult<CrawlOutput> {
        let mut session = self.launcher.launch(None).await?;
        let outcome = Self::crawl_in_session(session.as_mut(), url, config).await;
        session.close().await;
        outcome
    }

    async fn crawl_in_session(
        session: &mut dyn PageSession,
        url: &str,
        config: &CrawlRunConfig,
    ) -> ExtractResult<CrawlOutput> {
        let response = session.navigate(url, WaitUntil::Load, config.timeout).await?;

        if config.remove_overlays {
            match session.evaluate(OVERLAY_REMOVAL_SCRIPT).await {
                Ok(removed) => debug!(%removed, "Removed overlay elements"),
                Err(e) => warn!("Overlay removal failed: {e}"),
            }
        }

        let html = session.content().await?;
        convert_page(&html, config, response.status)
    }
}

impl CrawlBackend for BrowserCrawler {
    fn crawl<'a>(
        &'a self,
        url: &'a str,
        config: &'a CrawlRunConfig,
    ) -> BoxFuture<'a, ExtractResult<CrawlOutput>> {
        Box::pin(async move {
            if config.cache_mode == CacheMode::Enabled {
                let cached = self.cache.lock().get(url).cloned();
                if let Some(cached) = cached {
                    debug!(url, "Crawl cache hit");
                    return Ok(cached);
                }
            }

            let output = self.fetch(url, config).await?;
            if config.cache_mode == CacheMode::Enabled {
                self.cache.lock().put(url.to_string(), output.clone());
            }
            Ok(output)
        })
    }
}

/// Clean, prune and render a fetched page
///
/// # Errors
/// Only if markdown conversion fails.
pub fn convert_page(
    html: &str,
    config: &CrawlRunConfig,
    status: Option<u16>,
) -> ExtractResult<CrawlOutput> {
    let cleaned = clean_html(html, &config.excluded_tags, config.remove_overlays);
    let raw_markdown = html_to_markdown(&cleaned)?;

    let pruned = PruningFilter::new(config.pruning.clone()).prune(&cleaned);
    let fit_markdown = if pruned.is_empty() {
        String::new()
    } else {
        html_to_markdown(&pruned)?
    };

    debug!(
        raw_len = raw_markdown.len(),
        fit_len = fit_markdown.len(),
        "Rendered crawl markdown"
    );
    Ok(CrawlOutput {
        raw_markdown,
        fit_markdown,
        status,
    })
}

/// Body HTML without excluded tags and, optionally, overlay-looking elements
fn clean_html(html: &str, excluded_tags: &[String], remove_overlays: bool) -> String {
    let document = Html::parse_document(html);
    let root = content_root(&document);

    let mut to_remove = HashSet::new();
    for tag in excluded_tags {
        match Selector::parse(tag) {
            Ok(selector) => to_remove.extend(ids_matching(&root, &selector)),
            Err(e) => warn!("Ignoring invalid excluded tag {tag:?}: {e:?}"),
        }
    }

    if remove_overlays {
        to_remove.extend(root.descendants().filter_map(ElementRef::wrap).filter_map(|el| {
            let value = el.value();
            let marked = value.attr("class").is_some_and(|c| OVERLAY_PATTERN.is_match(c))
                || value.id().is_some_and(|id| OVERLAY_PATTERN.is_match(id));
            (marked && el.id() != root.id()).then(|| el.id())
        }));
    }

    serialize_children_excluding(&root, &to_remove)
}

/// First tier: managed crawl, fit markdown preferred over raw
pub struct CrawlStrategy {
    backend: Arc<dyn CrawlBackend>,
    run_config: CrawlRunConfig,
    gate: QualityGate,
}

impl CrawlStrategy {
    #[must_use]
    pub fn new(backend: Arc<dyn CrawlBackend>, config: &ExtractConfig) -> Self {
        Self {
            backend,
            run_config: CrawlRunConfig::from_config(config),
            gate: QualityGate::new(config.crawl().min_chars),
        }
    }

    async fn attempt(&self, request: &ExtractionRequest) -> ExtractResult<String> {
        let config = CrawlRunConfig {
            timeout: request.timeout_or(self.run_config.timeout),
            ..self.run_config.clone()
        };

        let output = self.backend.crawl(request.url_str(), &config).await?;
        if let Some(status) = output.status.filter(|s| *s >= 400) {
            warn!(status, url = request.url_str(), "Crawl got an error status");
        }

        let text = if output.fit_markdown.trim().is_empty() {
            debug!("Fit markdown empty, using raw markdown");
            output.raw_markdown
        } else {
            output.fit_markdown
        };

        self.gate.check(&text)?;
        Ok(text.trim().to_string())
    }
}

impl ExtractionStrategy for CrawlStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Crawl
    }

    fn run<'a>(&'a self, request: &'a ExtractionRequest) -> BoxFuture<'a, ExtractionResult> {
        Box::pin(async move {
            let outcome = self.attempt(request).await;
            match &outcome {
                Ok(text) => info!(chars = text.chars().count(), "Crawl strategy succeeded"),
                Err(e) => warn!(kind = e.kind(), "Crawl strategy failed: {e}"),
            }
            ExtractionResult::from_outcome(StrategyKind::Crawl, outcome)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_config() -> CrawlRunConfig {
        CrawlRunConfig::from_config(&ExtractConfig::default())
    }

    #[test]
    fn test_clean_html_drops_excluded_and_overlays() {
        let html = r#"
            <html><body class="modal-open">
              <header>Site header</header>
              <div id="cookie-banner">We use cookies</div>
              <p>Body text</p>
              <form><input name="q"></form>
            </body></html>
        "#;
        let tags = vec!["header".to_string(), "form".to_string()];
        let cleaned = clean_html(html, &tags, true);
        assert!(cleaned.contains("Body text"));
        assert!(!cleaned.contains("Site header"));
        assert!(!cleaned.contains("cookies"));
        assert!(!cleaned.contains("<input"));

        let kept = clean_html(html, &tags, false);
        assert!(kept.contains("cookies"));
    }

    #[test]
    fn test_invalid_excluded_tag_is_ignored() {
        let cleaned = clean_html("<body><p>text</p></body>", &["[[".to_string()], false);
        assert_eq!(cleaned, "<p>text</p>");
    }

    #[test]
    fn test_convert_page_produces_both_renderings() {
        let html = r#"<html><body>
            <nav><a href="/">Home</a></nav>
            <article><h1>Headline</h1><p>A paragraph with enough words to survive pruning easily.</p></article>
            <ul><li><a href="/1">one</a></li><li><a href="/2">two</a></li></ul>
        </body></html>"#;
        let output = convert_page(html, &run_config(), Some(200)).expect("conversion");
        assert!(output.raw_markdown.contains("# Headline"));
        assert!(!output.raw_markdown.contains("Home"));
        assert!(output.fit_markdown.contains("survive pruning"));
        assert!(!output.fit_markdown.contains("[one]"));
        assert_eq!(output.status, Some(200));
    }

    #[test]
    fn test_crawl_markdown_carries_no_link_targets() {
        let html = r#"<html><body><article>
            <h1>Headline</h1>
            <p>A paragraph with enough words to survive pruning, and a
               <a href="https://example.com/story?utm_source=feed">source link</a> inside it.</p>
        </article></body></html>"#;
        let output = convert_page(html, &run_config(), None).expect("conversion");
        assert!(output.fit_markdown.contains("source link"));
        for markdown in [&output.raw_markdown, &output.fit_markdown] {
            assert!(!markdown.contains("https://"), "{markdown}");
            assert!(!markdown.contains("]("), "{markdown}");
        }
    }
}
