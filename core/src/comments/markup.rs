//! # Markup Tree
//!
//! Owned, parser-independent tree of documentation comment markup.

use crate::error::{AppError, AppResult};

/// The content of a comment element: an ordered list of text and element nodes.
pub type Markup = Vec<MarkupNode>;

/// A node in a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    /// Character data with entities already decoded.
    Text(String),
    /// A tagged element such as `<see cref="..."/>` or `<para>`.
    Element(MarkupElement),
}

impl MarkupNode {
    /// Convenience constructor for text nodes.
    pub fn text(value: impl Into<String>) -> Self {
        MarkupNode::Text(value.into())
    }
}

/// A tagged markup element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupElement {
    /// Local tag name.
    pub tag: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child nodes.
    pub children: Markup,
}

impl MarkupElement {
    /// Creates an element without attributes.
    pub fn new(tag: impl Into<String>, children: Markup) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children,
        }
    }

    /// Looks up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated character data of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[MarkupNode], out: &mut String) {
    for node in nodes {
        match node {
            MarkupNode::Text(text) => out.push_str(text),
            MarkupNode::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// Converts the children of a parsed XML node into owned markup.
pub(crate) fn from_xml_children(node: roxmltree::Node<'_, '_>) -> Markup {
    let mut markup = Vec::new();
    for child in node.children() {
        if child.is_text() {
            if let Some(text) = child.text() {
                markup.push(MarkupNode::text(text));
            }
        } else if child.is_element() {
            let attributes = child
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect();
            markup.push(MarkupNode::Element(MarkupElement {
                tag: child.tag_name().name().to_string(),
                attributes,
                children: from_xml_children(child),
            }));
        }
    }
    markup
}

/// Parses an inner-XML fragment (e.g. the body of a `<summary>`) into markup.
pub fn parse_fragment(inner_xml: &str) -> AppResult<Markup> {
    let wrapped = format!("<fragment>{}</fragment>", inner_xml);
    let document = roxmltree::Document::parse(&wrapped)
        .map_err(|e| AppError::Parse(format!("Malformed comment markup: {}", e)))?;
    Ok(from_xml_children(document.root_element()))
}
