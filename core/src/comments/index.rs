#![deny(missing_docs)]

//! # Comment Index
//!
//! Loads compiler-emitted documentation comment files:
//!
//! ```xml
//! <doc>
//!   <assembly><name>Acme.Api</name></assembly>
//!   <members>
//!     <member name="M:Acme.Api.UsersController.Get(System.Int32)">
//!       <summary>Gets a user.</summary>
//!       <param name="id">The user id.</param>
//!       <response code="404">No such user.</response>
//!     </member>
//!   </members>
//! </doc>
//! ```
//!
//! The index is immutable once built and safe to share between threads.

use crate::comments::markup::{from_xml_children, Markup};
use crate::error::{AppError, AppResult};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A `<param name="...">` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedDoc {
    /// Value of the `name` attribute.
    pub name: String,
    /// Element content.
    pub content: Markup,
}

/// A `<response code="...">` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDoc {
    /// Value of the `code` attribute (e.g. `"404"`).
    pub code: String,
    /// Element content.
    pub content: Markup,
}

/// Everything documented for a single member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberDoc {
    /// Canonical identifier (`name` attribute of `<member>`).
    pub name: String,
    /// First `<summary>`.
    pub summary: Option<Markup>,
    /// First `<remarks>`.
    pub remarks: Option<Markup>,
    /// `<param>` sections in document order.
    pub params: Vec<NamedDoc>,
    /// `<response>` sections in document order.
    pub responses: Vec<ResponseDoc>,
}

impl MemberDoc {
    /// Finds the first `<param>` whose name matches exactly (case-sensitive).
    pub fn param(&self, name: &str) -> Option<&Markup> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.content)
    }
}

/// Queryable documentation comment source, keyed by canonical identifier.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    members: HashMap<String, MemberDoc>,
    assemblies: Vec<String>,
}

impl CommentIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the contents of a single comment file.
    pub fn parse(xml: &str) -> AppResult<Self> {
        Self::parse_with_origin(xml, "<memory>")
    }

    /// Reads and parses a comment file from disk.
    pub fn load(path: &Path) -> AppResult<Self> {
        let xml = fs::read_to_string(path).map_err(|e| {
            AppError::General(format!(
                "Failed to read comment file {:?}: {}",
                path, e
            ))
        })?;
        let index = Self::parse_with_origin(&xml, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            members = index.len(),
            "loaded documentation comments"
        );
        Ok(index)
    }

    /// Loads several comment files. Later files take precedence for shared members.
    pub fn load_all<I, P>(paths: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut index = Self::new();
        for path in paths {
            index.extend(Self::load(path.as_ref())?);
        }
        Ok(index)
    }

    /// Merges `other` into `self`; entries from `other` replace existing ones.
    pub fn extend(&mut self, other: CommentIndex) {
        for (name, member) in other.members {
            if self.members.contains_key(&name) {
                tracing::debug!(member = %name, "member documented in more than one file");
            }
            self.members.insert(name, member);
        }
        for assembly in other.assemblies {
            if !self.assemblies.contains(&assembly) {
                self.assemblies.push(assembly);
            }
        }
    }

    /// Exact lookup by canonical identifier.
    pub fn member(&self, id: &str) -> Option<&MemberDoc> {
        self.members.get(id)
    }

    /// Number of documented members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no member is documented.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Assembly names declared by the loaded files.
    pub fn assemblies(&self) -> &[String] {
        &self.assemblies
    }

    fn parse_with_origin(xml: &str, origin: &str) -> AppResult<Self> {
        let document = roxmltree::Document::parse(xml).map_err(|e| {
            AppError::Parse(format!("Malformed comment file {}: {}", origin, e))
        })?;

        let root = document.root_element();
        if root.tag_name().name() != "doc" {
            return Err(AppError::Parse(format!(
                "Comment file {} has root <{}>, expected <doc>",
                origin,
                root.tag_name().name()
            )));
        }

        let mut index = Self::new();
        for section in root.children().filter(|n| n.is_element()) {
            match section.tag_name().name() {
                "assembly" => {
                    let name = section
                        .children()
                        .find(|n| n.has_tag_name("name"))
                        .and_then(|n| n.text())
                        .map(str::trim)
                        .filter(|n| !n.is_empty());
                    if let Some(name) = name {
                        index.assemblies.push(name.to_string());
                    }
                }
                "members" => {
                    for node in section.children().filter(|n| n.has_tag_name("member")) {
                        let Some(name) = node.attribute("name") else {
                            tracing::warn!(origin, "skipping <member> without a name attribute");
                            continue;
                        };
                        if index.members.contains_key(name) {
                            tracing::debug!(origin, member = name, "duplicate member ignored");
                            continue;
                        }
                        index
                            .members
                            .insert(name.to_string(), parse_member(name, node, origin));
                    }
                }
                _ => {}
            }
        }
        Ok(index)
    }
}

fn parse_member(name: &str, node: roxmltree::Node<'_, '_>, origin: &str) -> MemberDoc {
    let mut member = MemberDoc {
        name: name.to_string(),
        ..MemberDoc::default()
    };

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "summary" if member.summary.is_none() => {
                member.summary = Some(from_xml_children(child));
            }
            "remarks" if member.remarks.is_none() => {
                member.remarks = Some(from_xml_children(child));
            }
            "param" => match child.attribute("name") {
                Some(param) => member.params.push(NamedDoc {
                    name: param.to_string(),
                    content: from_xml_children(child),
                }),
                None => {
                    tracing::warn!(origin, member = name, "skipping <param> without a name attribute");
                }
            },
            "response" => match child.attribute("code") {
                Some(code) => member.responses.push(ResponseDoc {
                    code: code.to_string(),
                    content: from_xml_children(child),
                }),
                None => {
                    tracing::warn!(origin, member = name, "skipping <response> without a code attribute");
                }
            },
            _ => {}
        }
    }

    member
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::markup::MarkupNode;
    use std::io::Write;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<doc>
    <assembly>
        <name>Acme.Api</name>
    </assembly>
    <members>
        <member name="M:Acme.Api.UsersController.Get(System.Int32)">
            <summary>Gets a user.</summary>
            <summary>Ignored second summary.</summary>
            <remarks>Requires a token.</remarks>
            <param name="id">The user id.</param>
            <param name="id">Shadowed.</param>
            <param>No name.</param>
            <response code="200">The user.</response>
            <response code="404">No such user.</response>
            <response>No code.</response>
        </member>
        <member name="P:Acme.Api.Models.Paging.Page">
            <summary>One-based page.</summary>
        </member>
        <member name="P:Acme.Api.Models.Paging.Page">
            <summary>Duplicate entry.</summary>
        </member>
    </members>
</doc>"#;

    #[test]
    fn test_parse_members() {
        let index = CommentIndex::parse(SAMPLE).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.assemblies(), &["Acme.Api".to_string()]);

        let method = index
            .member("M:Acme.Api.UsersController.Get(System.Int32)")
            .unwrap();
        assert_eq!(method.summary, Some(vec![MarkupNode::text("Gets a user.")]));
        assert_eq!(
            method.remarks,
            Some(vec![MarkupNode::text("Requires a token.")])
        );
        assert_eq!(method.params.len(), 2);
        assert_eq!(
            method.param("id"),
            Some(&vec![MarkupNode::text("The user id.")])
        );
        assert_eq!(
            method.responses.iter().map(|r| r.code.as_str()).collect::<Vec<_>>(),
            vec!["200", "404"]
        );
    }

    #[test]
    fn test_param_lookup_is_case_sensitive() {
        let index = CommentIndex::parse(SAMPLE).unwrap();
        let method = index
            .member("M:Acme.Api.UsersController.Get(System.Int32)")
            .unwrap();
        assert!(method.param("Id").is_none());
    }

    #[test]
    fn test_first_duplicate_member_wins_within_a_file() {
        let index = CommentIndex::parse(SAMPLE).unwrap();
        let prop = index.member("P:Acme.Api.Models.Paging.Page").unwrap();
        assert_eq!(prop.summary, Some(vec![MarkupNode::text("One-based page.")]));
    }

    #[test]
    fn test_lookup_miss() {
        let index = CommentIndex::parse(SAMPLE).unwrap();
        assert!(index.member("M:Acme.Api.UsersController.Get").is_none());
    }

    #[test]
    fn test_malformed_xml_fails_at_load() {
        let err = CommentIndex::parse("<doc><members></doc>").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_wrong_root_fails_at_load() {
        let err = CommentIndex::parse("<project><members/></project>").unwrap_err();
        assert!(format!("{}", err).contains("expected <doc>"));
    }

    #[test]
    fn test_later_file_wins_on_extend() {
        let mut first = CommentIndex::parse(
            r#"<doc><members><member name="T:A"><summary>old</summary></member></members></doc>"#,
        )
        .unwrap();
        let second = CommentIndex::parse(
            r#"<doc><members><member name="T:A"><summary>new</summary></member><member name="T:B"/></members></doc>"#,
        )
        .unwrap();
        first.extend(second);
        assert_eq!(first.len(), 2);
        assert_eq!(
            first.member("T:A").unwrap().summary,
            Some(vec![MarkupNode::text("new")])
        );
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let index = CommentIndex::load_all([file.path()]).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CommentIndex::load(Path::new("/definitely/not/here.xml")).unwrap_err();
        assert!(format!("{}", err).contains("Failed to read comment file"));
    }

    #[test]
    fn test_index_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CommentIndex>();
    }
}
