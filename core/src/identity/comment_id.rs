#![deny(missing_docs)]

//! # Comment Identifiers
//!
//! Builds the canonical keys that documentation comment files index members by:
//! a kind prefix (`T:`, `M:`, `P:`) followed by the fully qualified member name.
//!
//! - Declaring types render in definition form: ``Acme.Repo`1``.
//! - Parameter types render constructed generics with braces:
//!   `System.Collections.Generic.List{System.Int32}`.
//! - Generic parameters render positionally: `` `0 `` (type), ``` ``0 ``` (method).
//! - Nested types, namespaces and the member name are all joined with `.`;
//!   dots inside a member name (`.ctor`, explicit implementations) become `#`.

use crate::identity::members::{MethodIdentity, PropertyIdentity};
use crate::identity::types::{NamedType, TypeRef};

/// Builds the `M:` identifier for a method.
///
/// # Examples
/// ```
/// use xmldoc_core::identity::{comment_id_for_method, MethodIdentity, NamedType, TypeRef};
///
/// let controller = NamedType::parse("Acme.Api.UsersController").unwrap();
/// let method = MethodIdentity::new(
///     controller,
///     "Get",
///     vec![TypeRef::parse("System.Int32").unwrap()],
/// );
/// assert_eq!(comment_id_for_method(&method), "M:Acme.Api.UsersController.Get(System.Int32)");
/// ```
pub fn comment_id_for_method(method: &MethodIdentity) -> String {
    let mut id = String::from("M:");
    append_named(&mut id, &method.declaring_type, false);
    id.push('.');
    append_member_name(&mut id, &method.name);
    if method.generic_arity > 0 {
        id.push_str("``");
        id.push_str(&method.generic_arity.to_string());
    }
    append_parameters(&mut id, &method.parameters);
    if method.is_conversion_operator() {
        if let Some(return_type) = &method.return_type {
            id.push('~');
            append_type(&mut id, return_type);
        }
    }
    id
}

/// Builds the `P:` identifier for a property (or indexer).
pub fn comment_id_for_property(property: &PropertyIdentity) -> String {
    let mut id = String::from("P:");
    append_named(&mut id, &property.declaring_type, false);
    id.push('.');
    append_member_name(&mut id, &property.name);
    append_parameters(&mut id, &property.parameters);
    id
}

/// Builds the `T:` identifier for a type.
pub fn comment_id_for_type(ty: &NamedType) -> String {
    let mut id = String::from("T:");
    append_named(&mut id, ty, false);
    id
}

fn append_member_name(id: &mut String, name: &str) {
    id.extend(name.chars().map(|c| if c == '.' { '#' } else { c }));
}

fn append_parameters(id: &mut String, parameters: &[TypeRef]) {
    if parameters.is_empty() {
        return;
    }
    id.push('(');
    for (i, param) in parameters.iter().enumerate() {
        if i > 0 {
            id.push(',');
        }
        append_type(id, param);
    }
    id.push(')');
}

fn append_type(id: &mut String, ty: &TypeRef) {
    match ty {
        TypeRef::Named(named) => append_named(id, named, true),
        TypeRef::TypeParameter(position) => {
            id.push('`');
            id.push_str(&position.to_string());
        }
        TypeRef::MethodTypeParameter(position) => {
            id.push_str("``");
            id.push_str(&position.to_string());
        }
        TypeRef::Array { element, rank } => {
            append_type(id, element);
            if *rank <= 1 {
                id.push_str("[]");
            } else {
                id.push('[');
                id.push_str(&vec!["0:"; *rank].join(","));
                id.push(']');
            }
        }
        TypeRef::ByRef(inner) => {
            append_type(id, inner);
            id.push('@');
        }
        TypeRef::Pointer(inner) => {
            append_type(id, inner);
            id.push('*');
        }
    }
}

/// Appends a named type. `expand` renders constructed generic arguments in braces,
/// otherwise each generic segment keeps its arity marker.
fn append_named(id: &mut String, ty: &NamedType, expand: bool) {
    if let Some(ns) = &ty.namespace {
        id.push_str(ns);
        id.push('.');
    }
    let expand = expand && !ty.generic_args.is_empty();
    let mut args = ty.generic_args.iter();
    for (i, segment) in ty.segments.iter().enumerate() {
        if i > 0 {
            id.push('.');
        }
        id.push_str(&segment.name);
        if segment.arity == 0 {
            continue;
        }
        if expand {
            id.push('{');
            for (j, arg) in args.by_ref().take(segment.arity).enumerate() {
                if j > 0 {
                    id.push(',');
                }
                append_type(id, arg);
            }
            id.push('}');
        } else {
            id.push('`');
            id.push_str(&segment.arity.to_string());
        }
    }
}
