#![deny(missing_docs)]

//! # API Description
//!
//! What the host framework knows about one operation: the action method behind it,
//! the method's declared parameters and how each API parameter is bound.

use crate::identity::{MethodIdentity, NamedType, PropertyIdentity};
use serde::{Deserialize, Serialize};

/// Host-supplied metadata for one API operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiDescription {
    /// The conventional action behind the operation; `None` for endpoints not backed
    /// by a method the host can describe.
    #[serde(default)]
    pub action: Option<ActionDescriptor>,
    /// Parameter metadata as discovered by the host, including model binding.
    #[serde(default)]
    pub parameter_descriptions: Vec<ApiParameterDescription>,
}

/// The action method and its declared parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Identity of the action method.
    pub method: MethodIdentity,
    /// Declared parameters in signature order.
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
}

/// A declared action parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParameter {
    /// Name as declared in the method signature.
    pub name: String,
    /// Explicit binding name (e.g. `[FromQuery(Name = "q")]`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binder_model_name: Option<String>,
}

impl ActionParameter {
    /// Creates a parameter without an explicit binding name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binder_model_name: None,
        }
    }

    /// Sets the explicit binding name.
    pub fn bound_as(mut self, binder_model_name: impl Into<String>) -> Self {
        self.binder_model_name = Some(binder_model_name.into());
        self
    }

    /// The name the parameter is exposed under: the binding name when set.
    pub fn exposed_name(&self) -> &str {
        self.binder_model_name.as_deref().unwrap_or(&self.name)
    }
}

/// A parameter as described by the host's API explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiParameterDescription {
    /// Exposed parameter name.
    pub name: String,
    /// Model metadata; present with a container type and property name when the
    /// parameter is bound to a property of a model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_metadata: Option<ModelMetadata>,
}

impl ApiParameterDescription {
    /// A parameter bound directly to an action argument.
    pub fn direct(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_metadata: None,
        }
    }

    /// A parameter bound to `container.property`.
    pub fn property(name: impl Into<String>, container: NamedType, property: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_metadata: Some(ModelMetadata {
                container_type: Some(container),
                property_name: Some(property.into()),
                declaring_type: None,
            }),
        }
    }
}

/// Model-binding metadata of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model type containing the bound property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_type: Option<NamedType>,
    /// Bound property name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    /// Type declaring the property when it is inherited from a base of the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_type: Option<NamedType>,
}

impl ModelMetadata {
    /// The property this metadata points at, if it describes a property binding.
    pub fn property_identity(&self) -> Option<PropertyIdentity> {
        let container = self.container_type.as_ref()?;
        let name = self.property_name.as_ref()?;
        let declaring = self.declaring_type.as_ref().unwrap_or(container);
        Some(PropertyIdentity::new(declaring.clone(), name.clone()))
    }
}

impl ApiDescription {
    /// First declared action parameter whose exposed name matches `name`, ignoring case.
    pub fn find_action_parameter(&self, name: &str) -> Option<&ActionParameter> {
        self.action
            .as_ref()?
            .parameters
            .iter()
            .find(|p| names_match(p.exposed_name(), name))
    }

    /// First property-bound parameter description whose name matches `name`, ignoring case,
    /// together with the identity of the bound property.
    pub fn find_bound_property(&self, name: &str) -> Option<PropertyIdentity> {
        self.parameter_descriptions.iter().find_map(|description| {
            let property = description.model_metadata.as_ref()?.property_identity()?;
            names_match(&description.name, name).then_some(property)
        })
    }
}

/// Case-insensitive name comparison.
pub fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
