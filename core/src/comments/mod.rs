#![deny(missing_docs)]

//! # Comments Module
//!
//! - **markup**: Owned markup tree for comment content.
//! - **index**: The queryable index of a documentation comment file.

pub mod index;
pub mod markup;

pub use index::{CommentIndex, MemberDoc, NamedDoc, ResponseDoc};
pub use markup::{parse_fragment, Markup, MarkupElement, MarkupNode};
