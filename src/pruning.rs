//! Pruning content filter
//!
//! Scores every block element under `<body>` on how much it looks like
//! readable content and drops the ones under the threshold. The surviving
//! HTML feeds the "fit" markdown of a crawl.
//!
//! Score components (weights sum to 1.0):
//!
//! | metric          | weight | measures                                   |
//! |-----------------|--------|--------------------------------------------|
//! | text density    | 0.4    | text chars / serialized chars              |
//! | link density    | 0.2    | 1 - link text / text                       |
//! | tag weight      | 0.2    | prior for the element name                 |
//! | class/id weight | 0.1    | -0.5 each for chrome-like class and id     |
//! | text length     | 0.1    | ln(text chars + 1)                         |

use std::collections::HashSet;
use std::sync::LazyLock;

use ego_tree::NodeId;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::dom::{MAX_HTML_NESTING_DEPTH, content_root, is_void_element, serialize_children_excluding};
use crate::utils::constants::DEFAULT_PRUNE_THRESHOLD;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("BUG: hardcoded 'a' selector is invalid"));

static NEGATIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)nav|footer|header|sidebar|ads|comment|promo|advert|social|share")
        .expect("BUG: hardcoded negative class pattern is invalid")
});

/// Inline tags are never scored on their own; they live or die with their block
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "i", "kbd", "mark", "q",
    "s", "samp", "small", "strong", "sub", "sup", "time", "u", "var",
];

/// How the threshold is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Same threshold for every element
    #[default]
    Fixed,
    /// Threshold nudged per element by tag importance, text ratio and link ratio
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruningOptions {
    pub threshold: f64,
    pub mode: ThresholdMode,
    /// Blocks with fewer words are dropped regardless of score
    pub min_word_threshold: Option<usize>,
}

impl Default for PruningOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PRUNE_THRESHOLD,
            mode: ThresholdMode::Fixed,
            min_word_threshold: None,
        }
    }
}

/// Per-element measurements the score is computed from
#[derive(Debug, Clone, Copy, PartialEq)]
struct BlockMetrics {
    text_len: usize,
    tag_len: usize,
    link_text_len: usize,
    word_count: usize,
}

impl BlockMetrics {
    fn measure(element: &ElementRef<'_>) -> Self {
        let (text_len, word_count) = normalized_len(element);
        let link_text_len = element
            .select(&LINK_SELECTOR)
            .map(|a| normalized_len(&a).0)
            .sum::<usize>();
        Self {
            text_len,
            tag_len: element.html().chars().count().max(1),
            link_text_len: link_text_len.min(text_len),
            word_count,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn text_ratio(&self) -> f64 {
        self.text_len as f64 / self.tag_len as f64
    }

    #[allow(clippy::cast_precision_loss)]
    fn link_ratio(&self) -> f64 {
        if self.text_len == 0 {
            0.0
        } else {
            self.link_text_len as f64 / self.text_len as f64
        }
    }
}

/// Text length with whitespace runs collapsed to one space, plus word count
fn normalized_len(element: &ElementRef<'_>) -> (usize, usize) {
    let text: String = element.text().collect();
    let (chars, words) = text
        .split_whitespace()
        .fold((0usize, 0usize), |(chars, words), word| (chars + word.chars().count(), words + 1));
    (chars + words.saturating_sub(1), words)
}

fn tag_weight(tag: &str) -> f64 {
    match tag {
        "article" => 1.5,
        "main" => 1.4,
        "h1" | "h2" | "h3" => 1.2,
        "section" | "p" | "pre" | "blockquote" | "h4" | "h5" | "h6" => 1.0,
        "table" | "figure" => 0.8,
        "li" | "ul" | "ol" | "dl" => 0.5,
        "div" => 0.5,
        "span" => 0.3,
        "nav" | "footer" | "header" | "aside" | "form" => 0.2,
        _ => 0.4,
    }
}

fn class_id_weight(element: &ElementRef<'_>) -> f64 {
    let mut weight: f64 = 1.0;
    if element
        .value()
        .attr("class")
        .is_some_and(|class| NEGATIVE_PATTERN.is_match(class))
    {
        weight -= 0.5;
    }
    if element
        .value()
        .id()
        .is_some_and(|id| NEGATIVE_PATTERN.is_match(id))
    {
        weight -= 0.5;
    }
    weight.max(0.0)
}

/// Drops low-value blocks from an HTML document
#[derive(Debug, Clone, Default)]
pub struct PruningFilter {
    options: PruningOptions,
}

impl PruningFilter {
    #[must_use]
    pub fn new(options: PruningOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &PruningOptions {
        &self.options
    }

    /// Body HTML with every block scoring under the threshold removed
    ///
    /// Returns an empty string if nothing survives.
    #[must_use]
    pub fn prune(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        let root = content_root(&document);

        let mut to_remove = HashSet::new();
        for child in root.children().filter_map(ElementRef::wrap) {
            self.visit(&child, &mut to_remove, 0);
        }

        tracing::debug!(removed = to_remove.len(), "Pruned low-value blocks");
        serialize_children_excluding(&root, &to_remove)
            .trim()
            .to_string()
    }

    fn visit(&self, element: &ElementRef<'_>, to_remove: &mut HashSet<NodeId>, depth: usize) {
        if depth > MAX_HTML_NESTING_DEPTH {
            return;
        }

        let tag = element.value().name();
        if is_void_element(tag) || INLINE_TAGS.contains(&tag) {
            return;
        }

        let metrics = BlockMetrics::measure(element);
        if !self.keeps(element, tag, &metrics) {
            to_remove.insert(element.id());
            return;
        }

        for child in element.children().filter_map(ElementRef::wrap) {
            self.visit(&child, to_remove, depth + 1);
        }
    }

    fn keeps(&self, element: &ElementRef<'_>, tag: &str, metrics: &BlockMetrics) -> bool {
        if metrics.text_len == 0 {
            return false;
        }
        if let Some(min_words) = self.options.min_word_threshold
            && metrics.word_count < min_words
        {
            return false;
        }
        score(element, tag, metrics) >= self.threshold_for(tag, metrics)
    }

    fn threshold_for(&self, tag: &str, metrics: &BlockMetrics) -> f64 {
        let base = self.options.threshold;
        match self.options.mode {
            ThresholdMode::Fixed => base,
            ThresholdMode::Dynamic => {
                let mut threshold = base;
                if tag_weight(tag) > 1.0 {
                    threshold *= 0.8;
                }
                if metrics.text_ratio() > 0.4 {
                    threshold *= 0.9;
                }
                if metrics.link_ratio() > 0.6 {
                    threshold *= 1.2;
                }
                threshold
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn score(element: &ElementRef<'_>, tag: &str, metrics: &BlockMetrics) -> f64 {
    0.4 * metrics.text_ratio()
        + 0.2 * (1.0 - metrics.link_ratio())
        + 0.2 * tag_weight(tag)
        + 0.1 * class_id_weight(element)
        + 0.1 * ((metrics.text_len + 1) as f64).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r##"
        <html><body>
          <div class="site-nav">
            <ul>
              <li><a href="/">Home</a></li>
              <li><a href="/news">News</a></li>
              <li><a href="/about">About</a></li>
            </ul>
          </div>
          <article>
            <h1>Reading long pages</h1>
            <p>Most of a news page is navigation, share buttons and related links.
               The story itself sits in a handful of paragraphs that carry almost
               all of the text and very few links.</p>
            <p>A pruning pass keeps those paragraphs and drops the rest.</p>
          </article>
          <div class="social-share" id="share-bar"><a href="#">Share</a> <a href="#">Tweet</a></div>
        </body></html>
    "##;

    #[test]
    fn test_keeps_article_drops_link_lists() {
        let pruned = PruningFilter::default().prune(ARTICLE);
        assert!(pruned.contains("Reading long pages"));
        assert!(pruned.contains("handful of paragraphs"));
        assert!(!pruned.contains("Tweet"));
        assert!(!pruned.contains("About"));
    }

    #[test]
    fn test_empty_blocks_removed() {
        let pruned = PruningFilter::default().prune("<body><div></div><p>Some real text here.</p></body>");
        assert_eq!(pruned, "<p>Some real text here.</p>");
    }

    #[test]
    fn test_min_word_threshold() {
        let filter = PruningFilter::new(PruningOptions {
            min_word_threshold: Some(5),
            ..PruningOptions::default()
        });
        let pruned = filter.prune("<body><p>Too short.</p><p>This one has enough words to stay.</p></body>");
        assert!(!pruned.contains("Too short"));
        assert!(pruned.contains("enough words"));
    }

    #[test]
    fn test_dynamic_threshold_is_gentler_on_headings() {
        let filter = PruningFilter::new(PruningOptions {
            mode: ThresholdMode::Dynamic,
            ..PruningOptions::default()
        });
        let metrics = BlockMetrics {
            text_len: 10,
            tag_len: 100,
            link_text_len: 0,
            word_count: 2,
        };
        assert!(filter.threshold_for("h1", &metrics) < DEFAULT_PRUNE_THRESHOLD);
        assert!((filter.threshold_for("div", &metrics) - DEFAULT_PRUNE_THRESHOLD).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_class_lowers_score() {
        let doc = Html::parse_fragment(r#"<div class="sidebar">text</div><div class="story">text</div>"#);
        let divs: Vec<_> = doc
            .select(&Selector::parse("div").expect("test selector"))
            .collect();
        assert!(class_id_weight(&divs[0]) < class_id_weight(&divs[1]));
    }

    #[test]
    fn test_normalized_len_collapses_whitespace() {
        let doc = Html::parse_fragment("<p>  two\n\n   words </p><p></p>");
        let paragraphs: Vec<_> = doc
            .select(&Selector::parse("p").expect("test selector"))
            .collect();
        assert_eq!(normalized_len(&paragraphs[0]), (9, 2));
        assert_eq!(normalized_len(&paragraphs[1]), (0, 0));
    }

    #[test]
    fn test_everything_pruned_gives_empty_string() {
        let pruned = PruningFilter::default().prune(
            "<body><ul><li><a href='/a'>a</a></li><li><a href='/b'>b</a></li></ul></body>",
        );
        assert!(pruned.is_empty());
    }
}
