#![deny(missing_docs)]

//! # Document Enrichment
//!
//! Runs the XML comment filters over a serialized OpenAPI document.
//!
//! Each manifest binding locates one operation (by `operationId` or by path and method).
//! The operation is lifted into the OpenAPI model, filtered, and only the fields the
//! filter may touch are written back: `summary`, `description`, parameter descriptions
//! and response descriptions. Everything else in the document is preserved verbatim.

use crate::comments::CommentIndex;
use crate::error::{AppError, AppResult};
use crate::filters::{OperationFilter, XmlCommentsDocumentFilter, XmlCommentsOperationFilter};
use crate::humanize::HumanizeOptions;
use crate::manifest::{ApiManifest, OperationSelector};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use utoipa::openapi::path::{Operation, OperationBuilder, Parameter, ParameterBuilder};
use utoipa::openapi::response::ResponseBuilder;
use utoipa::openapi::{Ref, RefOr};

/// HTTP methods that may key an operation under a path item.
const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Serialization format of a document or manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON.
    Json,
    /// YAML.
    Yaml,
}

impl DocumentFormat {
    /// `.json` files are JSON; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Parses an OpenAPI document.
pub fn parse_document(text: &str, format: DocumentFormat) -> AppResult<Value> {
    let document: Value = match format {
        DocumentFormat::Json => serde_json::from_str(text)
            .map_err(|e| AppError::Parse(format!("Invalid OpenAPI JSON: {}", e)))?,
        DocumentFormat::Yaml => serde_yaml::from_str(text)
            .map_err(|e| AppError::Parse(format!("Invalid OpenAPI YAML: {}", e)))?,
    };
    if !document.is_object() {
        return Err(AppError::Parse(
            "OpenAPI document must be a mapping at the top level".into(),
        ));
    }
    Ok(document)
}

/// Serializes an OpenAPI document; JSON output is pretty-printed.
pub fn render_document(document: &Value, format: DocumentFormat) -> AppResult<String> {
    match format {
        DocumentFormat::Json => serde_json::to_string_pretty(document)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| AppError::General(format!("Failed to serialize JSON: {}", e))),
        DocumentFormat::Yaml => serde_yaml::to_string(document)
            .map_err(|e| AppError::General(format!("Failed to serialize YAML: {}", e))),
    }
}

/// Outcome of [`enrich_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichReport {
    /// Operations the filter ran on.
    pub enriched: usize,
    /// Bindings whose operation was not found in the document.
    pub unmatched: Vec<String>,
    /// Tags given a description.
    pub tagged: usize,
}

/// Applies the operation filter to every bound operation, then the tag filter.
pub fn enrich_document(
    document: &mut Value,
    manifest: &ApiManifest,
    index: &CommentIndex,
    options: &HumanizeOptions,
) -> AppResult<EnrichReport> {
    if !document.is_object() {
        return Err(AppError::Parse(
            "OpenAPI document must be a mapping at the top level".into(),
        ));
    }

    let operation_ids = operation_id_routes(document);
    let filter = XmlCommentsOperationFilter::new(index).with_options(*options);
    let mut report = EnrichReport::default();

    for binding in &manifest.operations {
        let selector = binding.selector()?;
        let route = match &selector {
            OperationSelector::OperationId(id) => operation_ids.get(id).cloned(),
            OperationSelector::Route { path, method } => Some((path.clone(), method.clone())),
        };
        let target = match route {
            Some((path, method)) => operation_mut(document, &path, &method),
            None => None,
        };
        let Some(target) = target else {
            tracing::warn!(operation = %selector, "operation not found in document");
            report.unmatched.push(selector.to_string());
            continue;
        };

        let mut operation = operation_from_value(target);
        filter.apply(&mut operation, &binding.api);
        patch_operation(target, &operation);
        tracing::debug!(operation = %selector, "operation enriched");
        report.enriched += 1;
    }

    report.tagged = XmlCommentsDocumentFilter::new(index, *options).apply(document, &manifest.tags);
    tracing::info!(
        enriched = report.enriched,
        unmatched = report.unmatched.len(),
        tagged = report.tagged,
        "document enrichment finished"
    );
    Ok(report)
}

/// `operationId` -> (path, method). The first occurrence of a duplicate id wins.
fn operation_id_routes(document: &Value) -> HashMap<String, (String, String)> {
    let mut routes = HashMap::new();
    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return routes;
    };
    for (path, item) in paths {
        for method in HTTP_METHODS {
            let Some(id) = item
                .get(*method)
                .and_then(|op| op.get("operationId"))
                .and_then(Value::as_str)
            else {
                continue;
            };
            if routes.contains_key(id) {
                tracing::warn!(operation_id = %id, path = %path, "duplicate operationId ignored");
                continue;
            }
            routes.insert(id.to_string(), (path.clone(), method.to_string()));
        }
    }
    routes
}

fn operation_mut<'a>(document: &'a mut Value, path: &str, method: &str) -> Option<&'a mut Value> {
    document
        .get_mut("paths")?
        .get_mut(path)?
        .get_mut(method)
        .filter(|op| op.is_object())
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Lifts the fields the filter reads or writes into the OpenAPI model.
fn operation_from_value(value: &Value) -> Operation {
    let mut operation = OperationBuilder::new().build();
    operation.summary = str_field(value, "summary");
    operation.description = str_field(value, "description");

    if let Some(parameters) = value.get("parameters").and_then(Value::as_array) {
        let parameters: Vec<Parameter> = parameters
            .iter()
            .map(|raw| {
                let mut parameter = ParameterBuilder::new()
                    .name(str_field(raw, "name").unwrap_or_default())
                    .build();
                parameter.description = str_field(raw, "description");
                parameter
            })
            .collect();
        operation.parameters = Some(parameters);
    }

    if let Some(responses) = value.get("responses").and_then(Value::as_object) {
        for (code, raw) in responses {
            let response = match str_field(raw, "$ref") {
                Some(location) => RefOr::Ref(Ref::new(location)),
                None => RefOr::T(
                    ResponseBuilder::new()
                        .description(str_field(raw, "description").unwrap_or_default())
                        .build(),
                ),
            };
            operation.responses.responses.insert(code.clone(), response);
        }
    }
    operation
}

/// Writes the filter's output back without disturbing unrelated fields.
fn patch_operation(target: &mut Value, operation: &Operation) {
    let Some(object) = target.as_object_mut() else {
        return;
    };

    if let Some(summary) = &operation.summary {
        object.insert("summary".to_string(), Value::String(summary.clone()));
    }
    if let Some(description) = &operation.description {
        object.insert("description".to_string(), Value::String(description.clone()));
    }

    if let (Some(parameters), Some(raw_parameters)) = (
        &operation.parameters,
        object.get_mut("parameters").and_then(Value::as_array_mut),
    ) {
        for (parameter, raw) in parameters.iter().zip(raw_parameters.iter_mut()) {
            let (Some(description), Some(raw)) = (&parameter.description, raw.as_object_mut())
            else {
                continue;
            };
            if !raw.contains_key("$ref") {
                raw.insert("description".to_string(), Value::String(description.clone()));
            }
        }
    }

    if operation.responses.responses.is_empty() {
        return;
    }
    let raw_responses = object
        .entry("responses")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(raw_responses) = raw_responses.as_object_mut() else {
        tracing::warn!("operation 'responses' is not a mapping, leaving it untouched");
        return;
    };
    for (code, response) in &operation.responses.responses {
        let RefOr::T(response) = response else {
            continue;
        };
        let created = !raw_responses.contains_key(code);
        let raw = raw_responses
            .entry(code.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(raw) = raw.as_object_mut() else {
            continue;
        };
        // A response object must carry a description, even an empty one.
        let untouched = !created && response.description.is_empty() && !raw.contains_key("description");
        if raw.contains_key("$ref") || untouched {
            continue;
        }
        raw.insert(
            "description".to_string(),
            Value::String(response.description.clone()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const XML: &str = r#"<doc><members>
        <member name="M:Acme.Api.UsersController.Get(System.Int32)">
            <summary>Gets a user.</summary>
            <param name="id">The user id.</param>
            <response code="404">No such user.</response>
        </member>
        <member name="T:Acme.Api.UsersController"><summary>Users.</summary></member>
    </members></doc>"#;

    const MANIFEST: &str = r#"
operations:
  - operation_id: getUser
    action:
      method:
        declaring_type: Acme.Api.UsersController
        name: Get
        parameters: [System.Int32]
      parameters:
        - name: id
  - operation_id: missing
tags:
  Users: Acme.Api.UsersController
"#;

    fn document() -> Value {
        json!({
            "openapi": "3.1.0",
            "info": { "title": "Acme", "version": "1" },
            "paths": {
                "/users/{id}": {
                    "get": {
                        "operationId": "getUser",
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } },
                            { "$ref": "#/components/parameters/Trace" }
                        ],
                        "responses": {
                            "200": { "description": "OK", "content": { "application/json": {} } }
                        },
                        "x-custom": true
                    }
                }
            }
        })
    }

    #[test]
    fn test_enrich_document_patches_only_documented_fields() {
        let index = CommentIndex::parse(XML).unwrap();
        let manifest = ApiManifest::parse(MANIFEST, DocumentFormat::Yaml).unwrap();
        let mut doc = document();

        let report =
            enrich_document(&mut doc, &manifest, &index, &HumanizeOptions::default()).unwrap();
        assert_eq!(report.enriched, 1);
        assert_eq!(report.unmatched, vec!["operationId 'missing'".to_string()]);
        assert_eq!(report.tagged, 1);

        let op = &doc["paths"]["/users/{id}"]["get"];
        assert_eq!(op["summary"], "Gets a user.");
        assert_eq!(op["parameters"][0]["description"], "The user id.");
        assert_eq!(op["parameters"][0]["schema"], json!({ "type": "integer" }));
        assert_eq!(op["parameters"][1], json!({ "$ref": "#/components/parameters/Trace" }));
        assert_eq!(op["responses"]["200"]["description"], "OK");
        assert_eq!(op["responses"]["200"]["content"], json!({ "application/json": {} }));
        assert_eq!(op["responses"]["404"], json!({ "description": "No such user." }));
        assert_eq!(op["x-custom"], true);
        assert!(op.get("description").is_none());
        assert_eq!(doc["tags"], json!([{ "name": "Users", "description": "Users." }]));
    }

    #[test]
    fn test_route_selector() {
        let index = CommentIndex::parse(XML).unwrap();
        let manifest = ApiManifest::parse(
            r#"{"operations": [{"path": "/users/{id}", "method": "GET",
                "action": {"method": {"declaring_type": "Acme.Api.UsersController",
                "name": "Get", "parameters": ["System.Int32"]}}}]}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        let mut doc = document();
        let report =
            enrich_document(&mut doc, &manifest, &index, &HumanizeOptions::default()).unwrap();
        assert_eq!(report.enriched, 1);
        assert_eq!(doc["paths"]["/users/{id}"]["get"]["summary"], "Gets a user.");
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let index = CommentIndex::parse(XML).unwrap();
        let manifest = ApiManifest::parse(MANIFEST, DocumentFormat::Yaml).unwrap();
        let mut doc = document();
        let options = HumanizeOptions::default();
        enrich_document(&mut doc, &manifest, &index, &options).unwrap();
        let once = doc.clone();
        enrich_document(&mut doc, &manifest, &index, &options).unwrap();
        assert_eq!(doc, once);
    }

    #[test]
    fn test_undocumented_operation_is_unchanged() {
        let index = CommentIndex::new();
        let manifest = ApiManifest::parse(MANIFEST, DocumentFormat::Yaml).unwrap();
        let mut doc = document();
        enrich_document(&mut doc, &manifest, &index, &HumanizeOptions::default()).unwrap();
        assert_eq!(doc, document());
    }

    #[test]
    fn test_empty_response_element_creates_described_response() {
        let index = CommentIndex::parse(
            r#"<doc><members>
                <member name="M:Acme.Api.UsersController.Get(System.Int32)">
                    <response code="404"/>
                </member>
            </members></doc>"#,
        )
        .unwrap();
        let manifest = ApiManifest::parse(MANIFEST, DocumentFormat::Yaml).unwrap();
        let mut doc = document();
        enrich_document(&mut doc, &manifest, &index, &HumanizeOptions::default()).unwrap();

        let responses = &doc["paths"]["/users/{id}"]["get"]["responses"];
        assert_eq!(responses["404"], json!({ "description": "" }));
        assert_eq!(responses["200"]["description"], "OK");
    }

    #[test]
    fn test_parse_document_rejects_scalars() {
        assert!(matches!(
            parse_document("42", DocumentFormat::Json),
            Err(AppError::Parse(_))
        ));
        assert!(parse_document("openapi: 3.1.0\n", DocumentFormat::Yaml).is_ok());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("api.JSON")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("api.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("api")), DocumentFormat::Yaml);
    }

    #[test]
    fn test_render_json_preserves_key_order() {
        let doc = json!({ "openapi": "3.1.0", "info": {}, "paths": {} });
        let text = render_document(&doc, DocumentFormat::Json).unwrap();
        let openapi = text.find("openapi").unwrap();
        let paths = text.find("paths").unwrap();
        assert!(openapi < paths);
        assert!(text.ends_with("}\n"));
    }
}
