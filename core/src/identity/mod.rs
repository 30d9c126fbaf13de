#![deny(missing_docs)]

//! # Identity Module
//!
//! - **types**: Structural type references and their textual notation.
//! - **members**: Method and property identities supplied by the host.
//! - **comment_id**: Canonical documentation comment identifiers.

pub mod comment_id;
pub mod members;
pub mod types;

pub use comment_id::{comment_id_for_method, comment_id_for_property, comment_id_for_type};
pub use members::{MethodIdentity, PropertyIdentity};
pub use types::{NamedType, TypeRef, TypeSegment};
