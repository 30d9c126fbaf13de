#![deny(missing_docs)]

//! # API Manifest
//!
//! The host's description of its operations, exported for offline enrichment:
//!
//! ```yaml
//! operations:
//!   - operation_id: getUser
//!     action:
//!       method:
//!         declaring_type: Acme.Api.UsersController
//!         name: Get
//!         parameters: [System.Int32]
//!       parameters:
//!         - name: id
//!     parameter_descriptions:
//!       - name: id
//! tags:
//!   Users: Acme.Api.UsersController
//! ```

use crate::enrich::DocumentFormat;
use crate::error::{AppError, AppResult};
use crate::filters::ApiDescription;
use crate::identity::NamedType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// How a binding locates its operation in the OpenAPI document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationSelector {
    /// By `operationId`.
    OperationId(String),
    /// By path template and lower-case HTTP method.
    Route {
        /// Path template, e.g. `/users/{id}`.
        path: String,
        /// Lower-case method, e.g. `get`.
        method: String,
    },
}

impl fmt::Display for OperationSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationSelector::OperationId(id) => write!(f, "operationId '{}'", id),
            OperationSelector::Route { path, method } => {
                write!(f, "{} {}", method.to_ascii_uppercase(), path)
            }
        }
    }
}

/// Host metadata for one operation plus how to find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationBinding {
    /// `operationId` of the target operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Path template of the target operation (used with `method`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// HTTP method of the target operation (used with `path`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// What the host knows about the operation.
    #[serde(flatten)]
    pub api: ApiDescription,
}

impl OperationBinding {
    /// Resolves the selector; `operation_id` takes precedence over `path` + `method`.
    pub fn selector(&self) -> AppResult<OperationSelector> {
        if let Some(id) = &self.operation_id {
            return Ok(OperationSelector::OperationId(id.clone()));
        }
        match (&self.path, &self.method) {
            (Some(path), Some(method)) => Ok(OperationSelector::Route {
                path: path.clone(),
                method: method.to_ascii_lowercase(),
            }),
            _ => Err(AppError::Parse(
                "operation binding needs 'operation_id' or both 'path' and 'method'".into(),
            )),
        }
    }
}

/// All operation bindings and tag types of one API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiManifest {
    /// Operation bindings.
    #[serde(default)]
    pub operations: Vec<OperationBinding>,
    /// Tag name -> type whose summary describes the tag.
    #[serde(default)]
    pub tags: IndexMap<String, NamedType>,
}

impl ApiManifest {
    /// Parses a manifest.
    pub fn parse(text: &str, format: DocumentFormat) -> AppResult<Self> {
        let manifest: ApiManifest = match format {
            DocumentFormat::Json => serde_json::from_str(text)
                .map_err(|e| AppError::Parse(format!("Invalid manifest JSON: {}", e)))?,
            DocumentFormat::Yaml => serde_yaml::from_str(text)
                .map_err(|e| AppError::Parse(format!("Invalid manifest YAML: {}", e)))?,
        };
        for binding in &manifest.operations {
            binding.selector()?;
        }
        Ok(manifest)
    }

    /// Reads a manifest, choosing the format from the file extension.
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::General(format!("Failed to read manifest {:?}: {}", path, e)))?;
        Self::parse(&text, DocumentFormat::from_path(path))
    }
}
