#![deny(missing_docs)]

//! # Filters Module
//!
//! - **api_description**: Host metadata describing each operation.
//! - **operation**: Merges member documentation into OpenAPI operations.
//! - **document**: Describes document tags from type documentation.

pub mod api_description;
pub mod document;
pub mod operation;

pub use api_description::{
    names_match, ActionDescriptor, ActionParameter, ApiDescription, ApiParameterDescription,
    ModelMetadata,
};
pub use document::XmlCommentsDocumentFilter;
pub use operation::{OperationFilter, XmlCommentsOperationFilter};
