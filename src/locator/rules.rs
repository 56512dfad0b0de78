//! Fixed selector tables for the content region locator.
//!
//! Parsed once at first access and cached forever. Hardcoded selectors
//! should NEVER fail to parse - if they do, it's a compile-time bug.

use scraper::Selector;
use std::sync::LazyLock;

/// Elements detached from the document before any rule is evaluated
pub const NOISE_SELECTORS: &str = "script, style, noscript, template, nav, footer, aside, header";

/// Region rules in priority order
///
/// Named content classes first, then the `class*=` / `id*=` substring rules,
/// then semantic landmarks, then generic layout containers.
pub const REGION_RULES: &[&str] = &[
    ".content",
    ".main-content",
    ".article-content",
    ".post-content",
    ".entry-content",
    "article",
    ".text-content",
    ".detail-content",
    ".news-content",
    "[class*='content']",
    "[id*='content']",
    ".article-body",
    "[itemprop='articleBody']",
    "main",
    "[role='main']",
    ".main",
    ".container",
    ".wrapper",
];

/// One entry of the compiled rule table
pub struct CompiledRule {
    pub source: &'static str,
    pub selector: Selector,
}

pub(super) static NOISE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(NOISE_SELECTORS).expect("BUG: hardcoded noise selector list is invalid")
});

pub(super) static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid")
});

pub(super) static COMPILED_RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    REGION_RULES
        .iter()
        .map(|&source| CompiledRule {
            source,
            selector: Selector::parse(source)
                .unwrap_or_else(|e| panic!("BUG: hardcoded region rule '{source}' is invalid: {e}")),
        })
        .collect()
});
