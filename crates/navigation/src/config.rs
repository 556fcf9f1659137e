//! Navigation settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use reservei_auth::{AccessPolicy, Role};

use crate::menu::MenuOptions;

pub const ENV_GUEST_ROLE: &str = "RESERVEI_NAV_GUEST_ROLE";
pub const ENV_HOME_PATH: &str = "RESERVEI_NAV_HOME_PATH";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("home path '{0}' must start with '/'")]
    InvalidHomePath(String),

    #[error("guest role must not be empty")]
    EmptyGuestRole,

    #[error("failed to parse navigation config: {0}")]
    Parse(String),
}

/// Host-tunable navigation behaviour. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    /// Role treated as an authenticated but unprovisioned account.
    pub guest_role: String,
    /// Target of the "go home" action on the denial view.
    pub home_path: String,
    pub show_search: bool,
    pub show_categories: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            guest_role: Role::GUEST.as_str().to_string(),
            home_path: "/".to_string(),
            show_search: true,
            show_categories: true,
        }
    }
}

impl NavigationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `RESERVEI_NAV_GUEST_ROLE` / `RESERVEI_NAV_HOME_PATH`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(role) = lookup(ENV_GUEST_ROLE) {
            config.guest_role = role;
        }
        match lookup(ENV_HOME_PATH) {
            Some(path) => config.home_path = path,
            None => tracing::debug!("{ENV_HOME_PATH} not set; using '/'"),
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.guest_role.trim().is_empty() {
            return Err(ConfigError::EmptyGuestRole);
        }
        if !self.home_path.starts_with('/') {
            return Err(ConfigError::InvalidHomePath(self.home_path.clone()));
        }
        Ok(())
    }

    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy {
            guest_role: Role::new(self.guest_role.clone()),
        }
    }

    pub fn menu_options(&self) -> MenuOptions {
        MenuOptions {
            show_search: self.show_search,
            show_categories: self.show_categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = NavigationConfig::from_json("{}").unwrap();
        assert_eq!(config, NavigationConfig::default());
        assert_eq!(config.access_policy(), AccessPolicy::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config =
            NavigationConfig::from_json(r#"{"guestRole": "pending", "showSearch": false}"#)
                .unwrap();
        assert_eq!(config.guest_role, "pending");
        assert!(!config.show_search);
        assert!(config.show_categories);
        assert_eq!(config.home_path, "/");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            NavigationConfig::from_json(r#"{"homePath": "dashboard"}"#),
            Err(ConfigError::InvalidHomePath("dashboard".to_string()))
        );
        assert_eq!(
            NavigationConfig::from_json(r#"{"guestRole": " "}"#),
            Err(ConfigError::EmptyGuestRole)
        );
        assert!(matches!(
            NavigationConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn environment_lookup_overrides_defaults() {
        let config = NavigationConfig::from_lookup(|key| match key {
            ENV_GUEST_ROLE => Some("visitante".to_string()),
            ENV_HOME_PATH => Some("/dashboard-master".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.guest_role, "visitante");
        assert_eq!(config.home_path, "/dashboard-master");
    }
}
