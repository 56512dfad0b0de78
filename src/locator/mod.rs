//! Main content region location on raw HTML.
//!
//! The locator finds the element most likely to hold the page's readable text:
//! 1. Parse the document and detach noise (`script`, `style`, `nav`, `footer`,
//!    `aside`, `header`, ...)
//! 2. Walk the fixed rule list in priority order, taking the first match of
//!    each rule in document order
//! 3. Accept the first rule whose text exceeds the minimum length; later
//!    rules are never evaluated
//! 4. Fall back to `<body>`, then to the whole document
//!
//! The function is pure: no I/O, same output for the same HTML.

mod rules;

pub use rules::{NOISE_SELECTORS, REGION_RULES};

use scraper::{ElementRef, Html};
use std::fmt;
use tracing::{debug, trace};

use crate::error::{ExtractError, ExtractResult};
use crate::utils::constants::DEFAULT_REGION_MIN_CHARS;
use crate::utils::text::{join_trimmed_lines, stripped_len};
use rules::{BODY_SELECTOR, COMPILED_RULES, NOISE_SELECTOR};

/// Which rule produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRule {
    /// One of `REGION_RULES`
    Selector(&'static str),
    /// No rule passed the threshold; `<body>` was used
    Body,
    /// No `<body>` either; the whole document was used
    Document,
}

impl fmt::Display for RegionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(s) => write!(f, "{s}"),
            Self::Body => write!(f, "body (fallback)"),
            Self::Document => write!(f, "document (fallback)"),
        }
    }
}

/// The accepted content region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCandidate {
    pub rule: RegionRule,
    /// Tag name of the matched element
    pub tag: String,
    pub text: String,
    /// Characters of the trimmed text fragments, separators not counted
    pub length: usize,
}

impl ContentCandidate {
    fn from_element(rule: RegionRule, element: ElementRef<'_>) -> Self {
        Self {
            rule,
            tag: element.value().name().to_string(),
            text: join_trimmed_lines(element.text()),
            length: stripped_len(element.text()),
        }
    }
}

/// Content region locator with a configurable acceptance threshold
#[derive(Debug, Clone, Copy)]
pub struct ContentLocator {
    min_chars: usize,
}

impl Default for ContentLocator {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_MIN_CHARS)
    }
}

impl ContentLocator {
    /// A rule is accepted when its text is strictly longer than `min_chars`
    #[must_use]
    pub const fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    #[must_use]
    pub const fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Locate the main content region of `html`
    ///
    /// # Errors
    /// `ExtractError::NoRegionFound` when even the fallback element has no text.
    pub fn locate(&self, html: &str) -> ExtractResult<ContentCandidate> {
        let mut document = Html::parse_document(html);
        strip_noise(&mut document);
        self.locate_in(&document)
    }

    fn locate_in(&self, document: &Html) -> ExtractResult<ContentCandidate> {
        // `Html::select` walks the whole arena, detached noise included
        let root = document.root_element();

        for rule in COMPILED_RULES.iter() {
            let Some(element) = root.select(&rule.selector).next() else {
                continue;
            };

            let candidate = ContentCandidate::from_element(RegionRule::Selector(rule.source), element);
            if candidate.length > self.min_chars {
                debug!(
                    rule = rule.source,
                    tag = %candidate.tag,
                    length = candidate.length,
                    "Content region accepted"
                );
                return Ok(candidate);
            }
            trace!(
                rule = rule.source,
                length = candidate.length,
                min = self.min_chars,
                "Region rule matched but text too short"
            );
        }

        let candidate = match root.select(&BODY_SELECTOR).next() {
            Some(body) => ContentCandidate::from_element(RegionRule::Body, body),
            None => ContentCandidate::from_element(RegionRule::Document, root),
        };

        if candidate.text.is_empty() {
            debug!("No content region found, fallback element is empty");
            return Err(ExtractError::NoRegionFound);
        }

        debug!(
            rule = %candidate.rule,
            length = candidate.length,
            "No region rule passed, using fallback"
        );
        Ok(candidate)
    }
}

/// Locate the content region with the default threshold
///
/// # Errors
/// See [`ContentLocator::locate`].
pub fn locate(html: &str) -> ExtractResult<ContentCandidate> {
    ContentLocator::default().locate(html)
}

/// Detach every noise element from the tree
///
/// Detached subtrees stay in the arena; only traversal from the root element
/// skips them.
fn strip_noise(document: &mut Html) {
    let noise: Vec<_> = document.select(&NOISE_SELECTOR).map(|e| e.id()).collect();
    trace!(count = noise.len(), "Detaching noise elements");

    for id in noise {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::text::char_len;

    #[test]
    fn test_content_div_wins_and_noise_is_stripped() -> ExtractResult<()> {
        let html = r#"<body><nav>X</nav><div class="content">Hello World, this is the real article body text exceeding fifty chars.</div><footer>Y</footer></body>"#;
        let candidate = locate(html)?;
        assert_eq!(candidate.rule, RegionRule::Selector(".content"));
        assert_eq!(
            candidate.text,
            "Hello World, this is the real article body text exceeding fifty chars."
        );
        Ok(())
    }

    #[test]
    fn test_short_body_falls_back_to_body() -> ExtractResult<()> {
        let candidate = locate("<body>Short</body>")?;
        assert_eq!(candidate.rule, RegionRule::Body);
        assert_eq!(candidate.text, "Short");
        assert_eq!(candidate.length, 5);
        Ok(())
    }

    #[test]
    fn test_short_match_is_skipped_for_later_rule() -> ExtractResult<()> {
        let long = "An article paragraph that is comfortably longer than fifty characters.";
        let html = format!(
            r#"<body><div class="content">tiny</div><article><p>{long}</p></article></body>"#
        );
        let candidate = locate(&html)?;
        assert_eq!(candidate.rule, RegionRule::Selector("article"));
        assert_eq!(candidate.text, long);
        Ok(())
    }

    #[test]
    fn test_earliest_rule_wins_over_longer_text() -> ExtractResult<()> {
        let html = r#"<body>
            <article>This article element holds a much much longer body of text than the other one, by far.</article>
            <div class="post-content">Post content that is just over the fifty character bar.</div>
        </body>"#;
        let candidate = locate(html)?;
        assert_eq!(candidate.rule, RegionRule::Selector(".post-content"));
        Ok(())
    }

    #[test]
    fn test_lines_are_trimmed_and_blank_lines_removed() -> ExtractResult<()> {
        let html = r#"<div class="content">
                <h1>  Title of the piece  </h1>

                <p>First paragraph of the piece with enough words.</p>
                <p>   </p>
                <p>Second paragraph.</p>
            </div>"#;
        let candidate = locate(html)?;
        assert_eq!(
            candidate.text,
            "Title of the piece\nFirst paragraph of the piece with enough words.\nSecond paragraph."
        );
        Ok(())
    }

    #[test]
    fn test_noise_inside_region_is_excluded() -> ExtractResult<()> {
        let html = r#"<main>
                <header>Site banner</header>
                <p>Readable text of the page that goes on for long enough to count.</p>
                <script>var tracking = 1;</script>
                <aside>Related links</aside>
            </main>"#;
        let candidate = locate(html)?;
        assert_eq!(candidate.rule, RegionRule::Selector("main"));
        assert!(!candidate.text.contains("Site banner"));
        assert!(!candidate.text.contains("tracking"));
        assert!(!candidate.text.contains("Related links"));
        Ok(())
    }

    #[test]
    fn test_region_inside_noise_is_never_matched() -> ExtractResult<()> {
        let html = r#"<body>
                <header><div class="content">A header block pretending to be the main content, long enough.</div></header>
                <p>Body text.</p>
            </body>"#;
        let candidate = locate(html)?;
        assert_eq!(candidate.rule, RegionRule::Body);
        assert_eq!(candidate.text, "Body text.");
        Ok(())
    }

    #[test]
    fn test_substring_rule_matches_id() -> ExtractResult<()> {
        let html = r#"<body><div id="page-content-area">Text inside an element whose id merely contains the word we look for.</div></body>"#;
        let candidate = locate(html)?;
        assert_eq!(candidate.rule, RegionRule::Selector("[id*='content']"));
        Ok(())
    }

    #[test]
    fn test_region_in_detached_nav_is_ignored() -> ExtractResult<()> {
        let html = r#"<body>
                <nav><div class="content">Home News Sport Weather Business Technology Science Health</div></nav>
                <article>The real article body, long enough to pass the region threshold on its own.</article>
            </body>"#;
        let candidate = locate(html)?;
        assert_eq!(candidate.rule, RegionRule::Selector("article"));
        assert!(!candidate.text.contains("Sport"));
        Ok(())
    }

    #[test]
    fn test_named_news_class_beats_landmark_container() -> ExtractResult<()> {
        let html = r#"<body><main>
                <div class="menu">Menu entry one, menu entry two, menu entry three</div>
                <div class="news-content">The actual story, told in more than fifty characters of prose.</div>
            </main></body>"#;
        let candidate = locate(html)?;
        assert_eq!(candidate.rule, RegionRule::Selector(".news-content"));
        assert!(!candidate.text.contains("Menu entry"));
        Ok(())
    }

    #[test]
    fn test_threshold_ignores_line_separators() -> ExtractResult<()> {
        let long = "An article paragraph that is comfortably longer than fifty characters.";
        let html = format!(
            r#"<body><div class="content"><p>{}</p><p>{}</p></div><article>{long}</article></body>"#,
            "a".repeat(25),
            "b".repeat(25),
        );
        let candidate = locate(&html)?;
        assert_eq!(candidate.rule, RegionRule::Selector("article"));
        assert_eq!(candidate.length, char_len(long));
        Ok(())
    }

    #[test]
    fn test_frameset_document_falls_back_to_whole_document() -> ExtractResult<()> {
        let html = "<html><head><title>Frames only page</title></head><frameset></frameset></html>";
        let candidate = locate(html)?;
        assert_eq!(candidate.rule, RegionRule::Document);
        assert_eq!(candidate.text, "Frames only page");
        Ok(())
    }

    #[test]
    fn test_empty_document_has_no_region() {
        let result = locate("<html><body><nav>only navigation</nav></body></html>");
        assert_eq!(result, Err(ExtractError::NoRegionFound));
    }

    #[test]
    fn test_custom_threshold() -> ExtractResult<()> {
        let locator = ContentLocator::new(3);
        let candidate = locator.locate(r#"<div class="content">four</div>"#)?;
        assert_eq!(candidate.rule, RegionRule::Selector(".content"));
        Ok(())
    }
}
