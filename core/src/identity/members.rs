//! # Member Identities
//!
//! Reflection-free descriptions of the members whose documentation is looked up.

use crate::identity::types::{NamedType, TypeRef};
use serde::{Deserialize, Serialize};

/// The (declaring type, method signature, parameter types) tuple of an action method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodIdentity {
    /// Type declaring the method.
    pub declaring_type: NamedType,
    /// Method name (`.ctor` for constructors).
    pub name: String,
    /// Number of generic parameters on the method itself.
    #[serde(default)]
    pub generic_arity: usize,
    /// Parameter types in declaration order.
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    /// Return type. Only part of the identifier for conversion operators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
}

impl MethodIdentity {
    /// Creates a non-generic method identity.
    pub fn new(declaring_type: NamedType, name: impl Into<String>, parameters: Vec<TypeRef>) -> Self {
        Self {
            declaring_type,
            name: name.into(),
            generic_arity: 0,
            parameters,
            return_type: None,
        }
    }

    /// Sets the method's own generic arity.
    pub fn with_generic_arity(mut self, arity: usize) -> Self {
        self.generic_arity = arity;
        self
    }

    /// Sets the return type (used for `op_Implicit` / `op_Explicit`).
    pub fn with_return_type(mut self, return_type: TypeRef) -> Self {
        self.return_type = Some(return_type);
        self
    }

    /// Whether the return type participates in the identifier.
    pub fn is_conversion_operator(&self) -> bool {
        self.name == "op_Implicit" || self.name == "op_Explicit"
    }
}

/// The (declaring type, property name) tuple of a model-bound property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyIdentity {
    /// Type declaring the property.
    pub declaring_type: NamedType,
    /// Property name.
    pub name: String,
    /// Index parameter types; empty for ordinary properties.
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
}

impl PropertyIdentity {
    /// Creates an ordinary (non-indexer) property identity.
    pub fn new(declaring_type: NamedType, name: impl Into<String>) -> Self {
        Self {
            declaring_type,
            name: name.into(),
            parameters: Vec::new(),
        }
    }
}
