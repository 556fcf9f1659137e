use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An atomic capability requirement: an action on a resource.
///
/// Identity is the `(resource, action)` pair. The textual form is
/// `resource:action` (e.g. `"bookings:approve"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permission {
    resource: Cow<'static, str>,
    action: Cow<'static, str>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermissionParseError {
    #[error("permission '{0}' is not of the form 'resource:action'")]
    MissingSeparator(String),

    #[error("permission '{0}' has an empty resource or action")]
    EmptyPart(String),
}

impl Permission {
    pub fn new(
        resource: impl Into<Cow<'static, str>>,
        action: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Compile-time permission constant.
    pub const fn from_static(resource: &'static str, action: &'static str) -> Self {
        Self {
            resource: Cow::Borrowed(resource),
            action: Cow::Borrowed(action),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Both parts non-empty and free of surrounding whitespace.
    pub fn is_well_formed(&self) -> bool {
        fn part_ok(s: &str) -> bool {
            !s.is_empty() && s.trim() == s
        }
        part_ok(&self.resource) && part_ok(&self.action)
    }

    /// Human-readable form shown in denial views (`"payments - view"`).
    pub fn label(&self) -> String {
        format!("{} - {}", self.resource, self.action)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

impl FromStr for Permission {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource, action) = s
            .split_once(':')
            .ok_or_else(|| PermissionParseError::MissingSeparator(s.to_string()))?;

        let permission = Permission::new(resource.to_string(), action.to_string());
        if !permission.is_well_formed() {
            return Err(PermissionParseError::EmptyPart(s.to_string()));
        }
        Ok(permission)
    }
}
