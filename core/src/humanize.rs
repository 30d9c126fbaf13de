#![deny(missing_docs)]

//! # Text Humanizer
//!
//! Turns documentation comment markup into display text for OpenAPI fields.
//!
//! Cross references collapse to the referenced name, inline code becomes a
//! backtick span, paragraphs and lists become line-based text. Tags that are
//! not recognised are dropped while their content is kept.

use crate::comments::markup::{parse_fragment, MarkupElement, MarkupNode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// How `cref` targets of `<see>`/`<seealso>` are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrefDisplay {
    /// Drop the kind prefix only: `T:Acme.Models.User` -> `Acme.Models.User`.
    #[default]
    Qualified,
    /// Innermost name without parameters or arity: `M:Acme.Repo.Get(System.Int32)` -> `Get`.
    ShortName,
}

impl FromStr for CrefDisplay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "qualified" | "full" => Ok(CrefDisplay::Qualified),
            "short" | "short_name" | "short-name" => Ok(CrefDisplay::ShortName),
            other => Err(format!("unknown cref display '{}'", other)),
        }
    }
}

impl fmt::Display for CrefDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CrefDisplay::Qualified => "qualified",
            CrefDisplay::ShortName => "short",
        })
    }
}

/// Rendering options for [`humanize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HumanizeOptions {
    /// Display form for `cref` references.
    #[serde(default)]
    pub cref_display: CrefDisplay,
}

/// Humanizes a markup tree.
pub fn humanize(markup: &[MarkupNode], options: &HumanizeOptions) -> String {
    let renderer = Renderer {
        options,
        indent: common_indent(markup),
    };
    let mut raw = String::new();
    renderer.render_nodes(markup, &mut raw);
    normalize_lines(&raw)
}

/// Humanizes raw inner XML.
///
/// Fragments that are not well-formed degrade to tag stripping.
///
/// # Examples
/// ```
/// use xmldoc_core::humanize::{humanize_text, HumanizeOptions};
///
/// let text = humanize_text("  Returns the item.  ", &HumanizeOptions::default());
/// assert_eq!(text, "Returns the item.");
/// ```
pub fn humanize_text(inner_xml: &str, options: &HumanizeOptions) -> String {
    match parse_fragment(inner_xml) {
        Ok(markup) => humanize(&markup, options),
        Err(e) => {
            tracing::debug!(error = %e, "comment markup is not well-formed, stripping tags");
            let stripped = decode_entities(&strip_tags(inner_xml));
            let text = MarkupNode::text(stripped);
            humanize(std::slice::from_ref(&text), options)
        }
    }
}

fn strip_tags(text: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let tag_re = TAG_RE.get_or_init(|| {
        Regex::new(r"</?[A-Za-z_][A-Za-z0-9_.:-]*(\s[^<>]*)?/?>").expect("Invalid regex")
    });
    tag_re.replace_all(text, "").into_owned()
}

/// Decodes the predefined XML entities. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

struct Renderer<'o> {
    options: &'o HumanizeOptions,
    /// Indentation shared by every continuation line of the comment.
    indent: usize,
}

impl Renderer<'_> {
    fn render_nodes(&self, nodes: &[MarkupNode], out: &mut String) {
        for node in nodes {
            match node {
                MarkupNode::Text(text) => out.push_str(&dedent(text, self.indent)),
                MarkupNode::Element(element) => self.render_element(element, out),
            }
        }
    }

    /// Renders nodes as a single line.
    fn render_inline(&self, nodes: &[MarkupNode]) -> String {
        let mut buf = String::new();
        self.render_nodes(nodes, &mut buf);
        buf.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn render_element(&self, element: &MarkupElement, out: &mut String) {
        match element.tag.as_str() {
            "see" | "seealso" => self.render_reference(element, out),
            "paramref" | "typeparamref" => match element.attribute("name") {
                Some(name) => out.push_str(name),
                None => out.push_str(&self.render_inline(&element.children)),
            },
            "c" => {
                let code = self.render_inline(&element.children);
                if !code.is_empty() {
                    out.push('`');
                    out.push_str(&code);
                    out.push('`');
                }
            }
            "code" => {
                let code = dedent(&element.text_content(), self.indent);
                if code.trim_end().contains('\n') {
                    out.push_str("\n\n```\n");
                    out.push_str(code.trim_end().trim_start_matches(['\n', '\r']));
                    out.push_str("\n```\n\n");
                } else if !code.trim().is_empty() {
                    out.push('`');
                    out.push_str(code.trim());
                    out.push('`');
                }
            }
            "para" => {
                out.push_str("\n\n");
                self.render_nodes(&element.children, out);
                out.push_str("\n\n");
            }
            "br" => out.push('\n'),
            "list" => self.render_list(element, out),
            "a" => {
                let text = self.render_inline(&element.children);
                match (text.is_empty(), element.attribute("href")) {
                    (false, Some(href)) => out.push_str(&format!("[{}]({})", text, href)),
                    (true, Some(href)) => out.push_str(href),
                    _ => out.push_str(&text),
                }
            }
            "b" | "strong" => self.render_wrapped(element, "**", out),
            "i" | "em" => self.render_wrapped(element, "*", out),
            _ => self.render_nodes(&element.children, out),
        }
    }

    fn render_wrapped(&self, element: &MarkupElement, marker: &str, out: &mut String) {
        let text = self.render_inline(&element.children);
        if !text.is_empty() {
            out.push_str(marker);
            out.push_str(&text);
            out.push_str(marker);
        }
    }

    fn render_reference(&self, element: &MarkupElement, out: &mut String) {
        if let Some(word) = element.attribute("langword") {
            out.push('`');
            out.push_str(word.trim());
            out.push('`');
            return;
        }
        let text = self.render_inline(&element.children);
        if !text.is_empty() {
            out.push_str(&text);
        } else if let Some(cref) = element.attribute("cref") {
            out.push_str(display_cref(cref, self.options.cref_display));
        } else if let Some(href) = element.attribute("href") {
            out.push_str(href);
        }
    }

    fn render_list(&self, element: &MarkupElement, out: &mut String) {
        let numbered = matches!(element.attribute("type"), Some("number") | Some("ordered"));
        let items = element.children.iter().filter_map(|node| match node {
            MarkupNode::Element(item) if item.tag == "item" => Some(item),
            _ => None,
        });
        for (i, item) in items.enumerate() {
            let mut term = String::new();
            let mut description = String::new();
            for child in &item.children {
                if let MarkupNode::Element(part) = child {
                    match part.tag.as_str() {
                        "term" => term = self.render_inline(&part.children),
                        "description" => description = self.render_inline(&part.children),
                        _ => {}
                    }
                }
            }
            let line = match (term.is_empty(), description.is_empty()) {
                (false, false) => format!("{}: {}", term, description),
                (false, true) => term,
                (true, false) => description,
                (true, true) => self.render_inline(&item.children),
            };
            out.push('\n');
            if numbered {
                out.push_str(&format!("{}. ", i + 1));
            } else {
                out.push_str("- ");
            }
            out.push_str(&line);
        }
        out.push_str("\n\n");
    }
}

fn display_cref(cref: &str, display: CrefDisplay) -> &str {
    let bytes = cref.as_bytes();
    let unprefixed = if bytes.len() > 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        &cref[2..]
    } else {
        cref
    };
    match display {
        CrefDisplay::Qualified => unprefixed,
        CrefDisplay::ShortName => {
            let head = unprefixed.split(['(', '~']).next().unwrap_or(unprefixed);
            let last = head.rsplit('.').next().unwrap_or(head);
            last.split('`').next().unwrap_or(last)
        }
    }
}

/// Smallest indentation of any non-blank continuation line in the tree.
fn common_indent(markup: &[MarkupNode]) -> usize {
    fn visit(nodes: &[MarkupNode], min: &mut Option<usize>) {
        for node in nodes {
            match node {
                MarkupNode::Text(text) => {
                    for line in text.split('\n').skip(1) {
                        let line = line.trim_end_matches('\r');
                        if line.trim().is_empty() {
                            continue;
                        }
                        let width = line.chars().take_while(|c| c.is_whitespace()).count();
                        *min = Some(min.map_or(width, |m| m.min(width)));
                    }
                }
                MarkupNode::Element(element) => visit(&element.children, min),
            }
        }
    }
    let mut min = None;
    visit(markup, &mut min);
    min.unwrap_or(0)
}

/// Normalises line endings and strips up to `indent` leading whitespace
/// characters from every line after the first.
fn dedent(text: &str, indent: usize) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if indent == 0 {
        return text;
    }
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            let skip = line
                .char_indices()
                .take_while(|(_, c)| c.is_whitespace())
                .take(indent)
                .last()
                .map_or(0, |(pos, c)| pos + c.len_utf8());
            out.push_str(&line[skip..]);
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Trims line ends, collapses blank-line runs and trims the whole text.
fn normalize_lines(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in raw.split('\n') {
        let line = line.trim_end();
        if line.is_empty() && lines.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}
