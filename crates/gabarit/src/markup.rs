//! HTML fragment reader for the built-in tree

use crate::dom::Node;
use scraper::{ElementRef, Html};
use scraper::node::Node as HtmlNode;
use tracing::debug;

/// Parse an HTML fragment into a list of sibling [`Node`]s.
///
/// Parsing follows the HTML5 algorithm in a `<body>` context, so tag and
/// attribute names come back lowercased and the parser's usual repairs
/// apply (directive tags placed directly inside a `<table>` get moved out,
/// for instance). Comments, doctypes and processing instructions are
/// dropped; whitespace text is kept.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let fragment = Html::parse_fragment(html);
    if !fragment.errors.is_empty() {
        debug!(errors = ?fragment.errors, "html fragment parsed with errors");
    }

    // The fragment's content hangs off a synthetic <html> root
    convert_children(fragment.root_element())
}

fn convert_children(parent: ElementRef<'_>) -> Vec<Node> {
    parent
        .children()
        .filter_map(|child| match child.value() {
            HtmlNode::Text(text) => Some(Node::text(&**text)),
            HtmlNode::Element(_) => ElementRef::wrap(child).map(convert_element),
            _ => None,
        })
        .collect()
}

fn convert_element(element: ElementRef<'_>) -> Node {
    let value = element.value();
    Node::element(value.name(), value.attrs(), convert_children(element))
}
