#![deny(missing_docs)]

//! # XmlDoc Core
//!
//! Core library for merging XML documentation comments into OpenAPI documents.

/// Shared error types.
pub mod error;

/// Documentation comment identifiers for methods, properties and types.
pub mod identity;

/// Parsed XML documentation files.
pub mod comments;

/// Markup to plain text conversion.
pub mod humanize;

/// Operation and document filters.
pub mod filters;

/// Host metadata describing the operations of an API.
pub mod manifest;

/// Runs the filters over a serialized OpenAPI document.
pub mod enrich;

pub use comments::{CommentIndex, MemberDoc};
pub use enrich::{enrich_document, parse_document, render_document, DocumentFormat, EnrichReport};
pub use error::{AppError, AppResult};
pub use filters::{
    ApiDescription, OperationFilter, XmlCommentsDocumentFilter, XmlCommentsOperationFilter,
};
pub use humanize::{humanize, humanize_text, CrefDisplay, HumanizeOptions};
pub use identity::{
    comment_id_for_method, comment_id_for_property, comment_id_for_type, MethodIdentity,
    NamedType, PropertyIdentity, TypeRef,
};
pub use manifest::{ApiManifest, OperationBinding, OperationSelector};
