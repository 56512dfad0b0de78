//! HTML to Markdown conversion for crawl output

use std::sync::LazyLock;

use htmd::element_handler::{HandlerResult, Handlers};
use htmd::{Element, HtmlToMarkdown};
use regex::Regex;

use crate::error::{ExtractError, ExtractResult};

static BLANK_LINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("BUG: hardcoded blank-line regex is invalid"));

/// Tags whose content never belongs in the markdown
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg", "canvas"];

/// htmd converter that renders links as plain text
fn create_converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_TAGS.to_vec())
        .add_handler(vec!["a"], link_handler)
        .build()
}

/// Convert an HTML fragment or document to normalized Markdown
///
/// # Errors
/// `ExtractError::UnknownFault` if htmd fails to serialize the tree.
pub fn html_to_markdown(html: &str) -> ExtractResult<String> {
    let raw = create_converter()
        .convert(html)
        .map_err(|e| ExtractError::UnknownFault(format!("markdown conversion failed: {e}")))?;
    Ok(normalize(&raw))
}

/// Strip trailing spaces, collapse blank-line runs, trim the ends
#[must_use]
pub fn normalize(markdown: &str) -> String {
    let trimmed_lines = markdown
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_LINE_RUNS
        .replace_all(&trimmed_lines, "\n\n")
        .trim()
        .to_string()
}

/// Links render as their text only; targets never reach the output
fn link_handler(handlers: &dyn Handlers, element: Element) -> Option<HandlerResult> {
    let text = handlers.walk_children(element.node).content;
    let text = text.trim();

    let link_text = if text.is_empty() {
        get_attr(element.attrs, "aria-label")
            .or_else(|| get_attr(element.attrs, "title"))
            .unwrap_or_default()
    } else {
        text.to_string()
    };
    Some(HandlerResult::from(link_text))
}

fn get_attr(attrs: &[html5ever::Attribute], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| a.value.to_string())
        .filter(|v| !v.trim().is_empty())
}
