//! Route configuration errors.

use thiserror::Error;

/// A route tree that cannot be served.
///
/// Raised while building a [`crate::RouteRegistry`]; a registry that exists is
/// always valid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("route path must not be empty")]
    EmptyPath,

    #[error("route path '{0}' must start with '/'")]
    NotAbsolute(String),

    #[error("route path '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("route path '{0}' declares a parameter without a name")]
    UnnamedParameter(String),

    #[error("duplicate route path '{0}'")]
    DuplicatePath(String),

    #[error("route '{path}' declares malformed permission '{permission}'")]
    MalformedPermission { path: String, permission: String },

    #[error("route '{0}' has an empty title")]
    MissingTitle(String),

    #[error("route '{path}' redirects to invalid path '{target}'")]
    InvalidRedirect { path: String, target: String },

    #[error("failed to parse route configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
