//! Host tree interface and the built-in owned tree
//!
//! The compiler and renderer only ever talk to a tree through [`DomNode`].
//! Children are addressed by index, so a host only needs to support
//! positional insertion and removal on its child lists.

use std::fmt;

/// Tree-mutation primitives a host tree must provide.
pub trait DomNode: Sized {
    fn create_text(text: &str) -> Self;

    fn create_element(tag: &str) -> Self;

    /// Copy this node; `deep` copies the whole subtree. The copy must be
    /// independent of the original.
    fn clone_node(&self, deep: bool) -> Self;

    /// Tag name for elements, `None` for text nodes
    fn tag_name(&self) -> Option<&str>;

    /// Content for text nodes, `None` for elements
    fn text(&self) -> Option<&str>;

    /// Attribute names in document order
    fn attribute_names(&self) -> Vec<String>;

    fn get_attribute(&self, name: &str) -> Option<&str>;

    fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    fn set_attribute(&mut self, name: &str, value: &str);

    fn remove_attribute(&mut self, name: &str) -> Option<String>;

    fn child_nodes(&self) -> &[Self];

    fn child_mut(&mut self, index: usize) -> Option<&mut Self>;

    /// Insert `node` so that it ends up at `index`; `index == len` appends.
    fn insert_before(&mut self, node: Self, index: usize);

    /// Insert `node` right after the child at `index`.
    fn insert_after(&mut self, node: Self, index: usize) {
        self.insert_before(node, index + 1);
    }

    fn append_child(&mut self, node: Self) {
        let len = self.child_nodes().len();
        self.insert_before(node, len);
    }

    fn remove_child(&mut self, index: usize) -> Option<Self>;

    /// Swap the child at `index` for `node`, returning the old child.
    fn replace_child(&mut self, index: usize, node: Self) -> Option<Self>;
}

const TEXT_TAG: &str = "#text";

/// Elements whose end tag is never written
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text content is written unescaped
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A node in the built-in owned tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Element tag name (e.g., "div", "p") or "#text" for text nodes
    tag: String,
    /// Attributes in insertion order (empty for text nodes)
    attrs: Vec<(String, String)>,
    /// Text content (for text nodes) or empty
    text: String,
    children: Vec<Node>,
}

impl Node {
    pub fn element<I, K, V>(tag: impl Into<String>, attrs: I, children: Vec<Node>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tag: tag.into(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            text: String::new(),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            tag: TEXT_TAG.to_string(),
            attrs: Vec::new(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Concatenated text of this subtree
    pub fn text_content(&self) -> String {
        if self.is_text() {
            return self.text.clone();
        }
        let mut out = String::new();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Serialize this subtree as HTML.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(&mut html, false);
        html
    }

    fn write_html(&self, html: &mut String, raw_text: bool) {
        if self.is_text() {
            if raw_text {
                html.push_str(&self.text);
            } else {
                escape_into(html, &self.text, false);
            }
            return;
        }

        html.push('<');
        html.push_str(&self.tag);
        for (name, value) in &self.attrs {
            html.push(' ');
            html.push_str(name);
            html.push_str("=\"");
            escape_into(html, value, true);
            html.push('"');
        }
        html.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        let raw = RAW_TEXT_ELEMENTS.contains(&self.tag.as_str());
        for child in &self.children {
            child.write_html(html, raw);
        }

        html.push_str("</");
        html.push_str(&self.tag);
        html.push('>');
    }
}

/// Serialize a sibling list as HTML.
pub fn to_html(nodes: &[Node]) -> String {
    let mut html = String::new();
    for node in nodes {
        node.write_html(&mut html, false);
    }
    html
}

fn escape_into(out: &mut String, s: &str, attribute: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

impl DomNode for Node {
    fn create_text(text: &str) -> Self {
        Node::text(text)
    }

    fn create_element(tag: &str) -> Self {
        Node::element(tag, Vec::<(String, String)>::new(), Vec::new())
    }

    fn clone_node(&self, deep: bool) -> Self {
        if deep {
            return self.clone();
        }
        Self {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            text: self.text.clone(),
            children: Vec::new(),
        }
    }

    fn tag_name(&self) -> Option<&str> {
        (!self.is_text()).then_some(self.tag.as_str())
    }

    fn text(&self) -> Option<&str> {
        self.is_text().then_some(self.text.as_str())
    }

    fn attribute_names(&self) -> Vec<String> {
        self.attrs.iter().map(|(name, _)| name.clone()).collect()
    }

    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        if self.is_text() {
            return;
        }
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(n, _)| n == name)?;
        Some(self.attrs.remove(index).1)
    }

    fn child_nodes(&self) -> &[Self] {
        &self.children
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut Self> {
        self.children.get_mut(index)
    }

    fn insert_before(&mut self, node: Self, index: usize) {
        if self.is_text() {
            return;
        }
        let index = index.min(self.children.len());
        self.children.insert(index, node);
    }

    fn remove_child(&mut self, index: usize) -> Option<Self> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    fn replace_child(&mut self, index: usize, node: Self) -> Option<Self> {
        let slot = self.children.get_mut(index)?;
        Some(std::mem::replace(slot, node))
    }
}
