//! # XML Comments Document Filter
//!
//! Describes document-level tags with the `<summary>` of the type behind each tag
//! (typically the controller that groups the tagged operations).

use crate::comments::CommentIndex;
use crate::humanize::{humanize, HumanizeOptions};
use crate::identity::{comment_id_for_type, NamedType};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

/// Document filter backed by a [`CommentIndex`].
#[derive(Debug, Clone, Copy)]
pub struct XmlCommentsDocumentFilter<'a> {
    index: &'a CommentIndex,
    options: HumanizeOptions,
}

impl<'a> XmlCommentsDocumentFilter<'a> {
    /// Creates a filter with the given humanizer options.
    pub fn new(index: &'a CommentIndex, options: HumanizeOptions) -> Self {
        Self { index, options }
    }

    /// Sets `tags[].description` for every tag whose type is documented.
    /// Tags missing from the document are appended. Returns the number of tags described.
    pub fn apply(&self, document: &mut Value, tags: &IndexMap<String, NamedType>) -> usize {
        let Some(root) = document.as_object_mut() else {
            return 0;
        };

        let mut described = 0;
        for (tag, ty) in tags {
            let comment_id = comment_id_for_type(ty);
            let Some(summary) = self
                .index
                .member(&comment_id)
                .and_then(|member| member.summary.as_ref())
            else {
                tracing::debug!(tag = %tag, %comment_id, "no summary for tag type");
                continue;
            };
            let description = humanize(summary, &self.options);

            let entries = root
                .entry("tags")
                .or_insert_with(|| Value::Array(Vec::new()));
            let Some(entries) = entries.as_array_mut() else {
                tracing::warn!("document 'tags' is not an array, leaving it untouched");
                return described;
            };

            let existing = entries
                .iter()
                .position(|entry| entry.get("name").and_then(Value::as_str) == Some(tag.as_str()));
            match existing {
                Some(i) => {
                    if let Some(entry) = entries[i].as_object_mut() {
                        set_description(entry, description);
                    }
                }
                None => entries.push(json!({ "name": tag, "description": description })),
            }
            described += 1;
        }
        described
    }
}

fn set_description(entry: &mut Map<String, Value>, description: String) {
    entry.insert("description".to_string(), Value::String(description));
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<doc><members>
        <member name="T:Acme.Api.UsersController"><summary>Manage users.</summary></member>
        <member name="T:Acme.Api.OrdersController"><summary>Manage <see cref="T:Acme.Api.Order"/>s.</summary></member>
    </members></doc>"#;

    fn tags() -> IndexMap<String, NamedType> {
        let mut tags = IndexMap::new();
        tags.insert(
            "Users".to_string(),
            NamedType::parse("Acme.Api.UsersController").unwrap(),
        );
        tags.insert(
            "Orders".to_string(),
            NamedType::parse("Acme.Api.OrdersController").unwrap(),
        );
        tags.insert(
            "Health".to_string(),
            NamedType::parse("Acme.Api.HealthController").unwrap(),
        );
        tags
    }

    #[test]
    fn test_updates_existing_and_appends_missing_tags() {
        let index = CommentIndex::parse(XML).unwrap();
        let mut doc = json!({
            "openapi": "3.1.0",
            "tags": [{ "name": "Users", "description": "old" }]
        });
        let filter = XmlCommentsDocumentFilter::new(&index, HumanizeOptions::default());
        assert_eq!(filter.apply(&mut doc, &tags()), 2);
        assert_eq!(
            doc["tags"],
            json!([
                { "name": "Users", "description": "Manage users." },
                { "name": "Orders", "description": "Manage Acme.Api.Orders." }
            ])
        );
    }

    #[test]
    fn test_creates_tags_array_when_missing() {
        let index = CommentIndex::parse(XML).unwrap();
        let mut doc = json!({ "openapi": "3.1.0" });
        let mut only_users = tags();
        only_users.truncate(1);
        XmlCommentsDocumentFilter::new(&index, HumanizeOptions::default())
            .apply(&mut doc, &only_users);
        assert_eq!(doc["tags"][0]["name"], "Users");
    }

    #[test]
    fn test_undocumented_tags_do_not_create_entries() {
        let index = CommentIndex::new();
        let mut doc = json!({ "openapi": "3.1.0" });
        let described =
            XmlCommentsDocumentFilter::new(&index, HumanizeOptions::default()).apply(&mut doc, &tags());
        assert_eq!(described, 0);
        assert!(doc.get("tags").is_none());
    }
}
