#![deny(missing_docs)]

//! # XML Comments Operation Filter
//!
//! Merges documentation comments into an OpenAPI operation:
//!
//! 1. `<summary>` / `<remarks>` of the action method -> operation summary / description.
//! 2. `<param name="...">` -> description of the matching operation parameter.
//! 3. `<response code="...">` -> response description, creating missing responses.
//! 4. `<summary>` of a model property -> description of the parameter bound to it.
//!
//! Step 4 runs even when the method is undocumented and wins over step 2.

use crate::comments::{CommentIndex, Markup, MemberDoc};
use crate::filters::api_description::{ActionDescriptor, ApiDescription};
use crate::humanize::{humanize, HumanizeOptions};
use crate::identity::{comment_id_for_method, comment_id_for_property};
use utoipa::openapi::path::{Operation, Parameter};
use utoipa::openapi::response::ResponseBuilder;
use utoipa::openapi::{RefOr, Responses};

/// Post-processes a generated operation using host metadata.
pub trait OperationFilter {
    /// Mutates `operation` in place.
    fn apply(&self, operation: &mut Operation, context: &ApiDescription);
}

/// Operation filter backed by a [`CommentIndex`].
#[derive(Debug, Clone, Copy)]
pub struct XmlCommentsOperationFilter<'a> {
    index: &'a CommentIndex,
    options: HumanizeOptions,
}

impl<'a> XmlCommentsOperationFilter<'a> {
    /// Creates a filter with default humanizer options.
    pub fn new(index: &'a CommentIndex) -> Self {
        Self {
            index,
            options: HumanizeOptions::default(),
        }
    }

    /// Overrides the humanizer options.
    pub fn with_options(mut self, options: HumanizeOptions) -> Self {
        self.options = options;
        self
    }

    fn text(&self, markup: &Markup) -> String {
        humanize(markup, &self.options)
    }

    fn apply_method_doc(&self, operation: &mut Operation, member: &MemberDoc) {
        if let Some(summary) = &member.summary {
            operation.summary = Some(self.text(summary));
        }
        if let Some(remarks) = &member.remarks {
            operation.description = Some(self.text(remarks));
        }
    }

    fn apply_param_docs(
        &self,
        parameters: &mut [Parameter],
        member: &MemberDoc,
        action: &ActionDescriptor,
        context: &ApiDescription,
    ) {
        for parameter in parameters.iter_mut() {
            let Some(action_parameter) = context.find_action_parameter(&parameter.name) else {
                continue;
            };
            // The comment lookup uses the declared name verbatim (case-sensitive).
            if let Some(content) = member.param(&action_parameter.name) {
                parameter.description = Some(self.text(content));
            } else {
                tracing::trace!(
                    method = %action.method.name,
                    parameter = %action_parameter.name,
                    "no <param> documentation"
                );
            }
        }
    }

    fn apply_response_docs(&self, responses: &mut Responses, member: &MemberDoc) {
        for doc in &member.responses {
            let description = self.text(&doc.content);
            let entry = responses
                .responses
                .entry(doc.code.clone())
                .or_insert_with(|| RefOr::T(ResponseBuilder::new().build()));
            match entry {
                RefOr::T(response) => response.description = description,
                RefOr::Ref(_) => {
                    tracing::debug!(code = %doc.code, "response is a reference, leaving it untouched");
                }
            }
        }
    }

    fn apply_property_docs(&self, parameters: &mut [Parameter], context: &ApiDescription) {
        for parameter in parameters.iter_mut() {
            let Some(property) = context.find_bound_property(&parameter.name) else {
                continue;
            };
            let comment_id = comment_id_for_property(&property);
            let Some(member) = self.index.member(&comment_id) else {
                tracing::trace!(%comment_id, "no documentation for bound property");
                continue;
            };
            if let Some(summary) = &member.summary {
                parameter.description = Some(self.text(summary));
            }
        }
    }
}

impl OperationFilter for XmlCommentsOperationFilter<'_> {
    fn apply(&self, operation: &mut Operation, context: &ApiDescription) {
        if let Some(action) = &context.action {
            let comment_id = comment_id_for_method(&action.method);
            match self.index.member(&comment_id) {
                Some(member) => {
                    tracing::debug!(%comment_id, "applying method documentation");
                    self.apply_method_doc(operation, member);
                    if let Some(parameters) = operation.parameters.as_mut() {
                        self.apply_param_docs(parameters, member, action, context);
                    }
                    self.apply_response_docs(&mut operation.responses, member);
                }
                None => tracing::debug!(%comment_id, "no documentation for action method"),
            }
        } else {
            tracing::debug!("operation has no action method, skipping method documentation");
        }

        if let Some(parameters) = operation.parameters.as_mut() {
            self.apply_property_docs(parameters, context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::api_description::{ActionParameter, ApiParameterDescription};
    use crate::identity::{MethodIdentity, NamedType, TypeRef};
    use utoipa::openapi::path::{OperationBuilder, ParameterBuilder, ParameterIn};
    use utoipa::openapi::Ref;

    const XML: &str = r#"<doc><members>
        <member name="M:Acme.Api.UsersController.Get(System.Int32,Acme.Api.Models.Paging)">
            <summary>
            Gets a user.
            </summary>
            <remarks>Requires <c>users:read</c>.</remarks>
            <param name="id">The user id.</param>
            <param name="paging">Paging options.</param>
            <response code="200">The user.</response>
            <response code="404">No such user.</response>
        </member>
        <member name="P:Acme.Api.Models.Paging.Page">
            <summary>One-based page number.</summary>
        </member>
    </members></doc>"#;

    fn get_user() -> ApiDescription {
        let paging = NamedType::parse("Acme.Api.Models.Paging").unwrap();
        ApiDescription {
            action: Some(ActionDescriptor {
                method: MethodIdentity::new(
                    NamedType::parse("Acme.Api.UsersController").unwrap(),
                    "Get",
                    vec![
                        TypeRef::parse("System.Int32").unwrap(),
                        TypeRef::Named(paging.clone()),
                    ],
                ),
                parameters: vec![ActionParameter::new("id"), ActionParameter::new("paging")],
            }),
            parameter_descriptions: vec![
                ApiParameterDescription::direct("id"),
                ApiParameterDescription::property("Page", paging, "Page"),
            ],
        }
    }

    fn param(name: &str) -> Parameter {
        ParameterBuilder::new()
            .name(name)
            .parameter_in(ParameterIn::Query)
            .build()
    }

    fn operation() -> Operation {
        OperationBuilder::new()
            .summary(Some("generated"))
            .parameters(Some(vec![param("Id"), param("page")]))
            .build()
    }

    #[test]
    fn test_method_documentation_is_applied() {
        let index = CommentIndex::parse(XML).unwrap();
        let mut op = operation();
        XmlCommentsOperationFilter::new(&index).apply(&mut op, &get_user());

        assert_eq!(op.summary.as_deref(), Some("Gets a user."));
        assert_eq!(op.description.as_deref(), Some("Requires `users:read`."));

        let params = op.parameters.as_ref().unwrap();
        assert_eq!(params[0].description.as_deref(), Some("The user id."));
        assert_eq!(params[1].description.as_deref(), Some("One-based page number."));
    }

    #[test]
    fn test_missing_response_codes_are_created() {
        let index = CommentIndex::parse(XML).unwrap();
        let mut op = operation();
        XmlCommentsOperationFilter::new(&index).apply(&mut op, &get_user());

        match op.responses.responses.get("404") {
            Some(RefOr::T(response)) => assert_eq!(response.description, "No such user."),
            _ => panic!("404 response should have been created"),
        }
        assert!(op.responses.responses.contains_key("200"));
    }

    #[test]
    fn test_referenced_responses_are_left_alone() {
        let index = CommentIndex::parse(XML).unwrap();
        let mut op = operation();
        op.responses.responses.insert(
            "404".to_string(),
            RefOr::Ref(Ref::new("#/components/responses/NotFound")),
        );
        XmlCommentsOperationFilter::new(&index).apply(&mut op, &get_user());
        assert!(matches!(
            op.responses.responses.get("404"),
            Some(RefOr::Ref(_))
        ));
    }

    #[test]
    fn test_no_match_leaves_operation_unchanged() {
        let index = CommentIndex::parse(XML).unwrap();
        let mut api = get_user();
        if let Some(action) = api.action.as_mut() {
            action.method.name = "Delete".into();
        }
        api.parameter_descriptions.clear();

        let mut op = operation();
        let before = serde_json::to_value(&op).unwrap();
        XmlCommentsOperationFilter::new(&index).apply(&mut op, &api);
        assert_eq!(serde_json::to_value(&op).unwrap(), before);
    }

    #[test]
    fn test_property_docs_apply_without_action() {
        let index = CommentIndex::parse(XML).unwrap();
        let mut api = get_user();
        api.action = None;

        let mut op = operation();
        XmlCommentsOperationFilter::new(&index).apply(&mut op, &api);

        assert_eq!(op.summary.as_deref(), Some("generated"));
        let params = op.parameters.as_ref().unwrap();
        assert!(params[0].description.is_none());
        assert_eq!(params[1].description.as_deref(), Some("One-based page number."));
    }

    #[test]
    fn test_responses_apply_without_parameters() {
        let index = CommentIndex::parse(XML).unwrap();
        let mut op = OperationBuilder::new().build();
        XmlCommentsOperationFilter::new(&index).apply(&mut op, &get_user());
        assert!(op.parameters.is_none());
        assert_eq!(op.responses.responses.len(), 2);
    }
}
