//! HTML tree helpers shared by the crawl cleaner and the pruning filter
//!
//! Both work the same way: collect the `NodeId`s to drop from a parsed
//! document, then re-serialize the kept tree without them.

use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Maximum element nesting the serializer descends into
///
/// Pathological markup (thousands of unclosed `<div>`s) would otherwise blow
/// the stack. Anything deeper is dropped with a warning.
pub const MAX_HTML_NESTING_DEPTH: usize = 256;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

#[must_use]
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// `<body>` if the parser produced one, otherwise the root element
#[must_use]
pub fn content_root(document: &Html) -> ElementRef<'_> {
    static BODY: std::sync::LazyLock<Selector> = std::sync::LazyLock::new(|| {
        Selector::parse("body").expect("BUG: hardcoded 'body' selector is invalid")
    });
    document
        .select(&BODY)
        .next()
        .unwrap_or_else(|| document.root_element())
}

/// Ids of every element under `root` matching `selector`
#[must_use]
pub fn ids_matching(root: &ElementRef<'_>, selector: &Selector) -> HashSet<NodeId> {
    root.select(selector).map(|el| el.id()).collect()
}

/// Serialize the children of `element`, skipping any subtree in `to_remove`
#[must_use]
pub fn serialize_children_excluding(element: &ElementRef<'_>, to_remove: &HashSet<NodeId>) -> String {
    let mut output = String::new();
    serialize_children_depth(element, to_remove, &mut output, 0);
    output
}

fn serialize_children_depth(
    element: &ElementRef<'_>,
    to_remove: &HashSet<NodeId>,
    output: &mut String,
    depth: usize,
) {
    if depth > MAX_HTML_NESTING_DEPTH {
        tracing::warn!(
            element = element.value().name(),
            depth,
            limit = MAX_HTML_NESTING_DEPTH,
            "Maximum HTML nesting depth exceeded - truncating output"
        );
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                html_escape::encode_text_to_string(&**text, output);
            }
            Node::Element(_) => {
                let Some(child_elem) = ElementRef::wrap(child) else {
                    continue;
                };
                if to_remove.contains(&child_elem.id()) {
                    continue;
                }

                let name = child_elem.value().name();
                output.push('<');
                output.push_str(name);
                for (attr, value) in child_elem.value().attrs() {
                    output.push(' ');
                    output.push_str(attr);
                    output.push_str("=\"");
                    html_escape::encode_double_quoted_attribute_to_string(value, output);
                    output.push('"');
                }
                output.push('>');

                if is_void_element(name) {
                    continue;
                }

                serialize_children_depth(&child_elem, to_remove, output, depth + 1);

                output.push_str("</");
                output.push_str(name);
                output.push('>');
            }
            // Comments, doctypes and processing instructions carry no content
            _ => {}
        }
    }
}
