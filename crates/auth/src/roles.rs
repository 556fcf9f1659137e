use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role identifier used for RBAC.
///
/// Roles are opaque strings at this layer. The only role with built-in meaning
/// is [`Role::GUEST`], which marks an authenticated but unprovisioned account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const GUEST: Role = Role(Cow::Borrowed("guest"));
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const MANAGER: Role = Role(Cow::Borrowed("manager"));
    pub const USER: Role = Role(Cow::Borrowed("user"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role → permission table.
///
/// Unknown roles resolve to no permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissions {
    grants: HashMap<Role, Vec<Permission>>,
}

const ADMIN_GRANTS: &[(&str, &[&str])] = &[
    ("dashboard", &["view", "analytics", "reports"]),
    ("users", &["view", "create", "edit", "delete", "manage_roles"]),
    ("customers", &["view", "create", "edit", "delete", "export"]),
    ("bookings", &["view", "create", "edit", "delete", "approve", "cancel"]),
    ("finance", &["view", "transactions", "refunds", "reports", "settings"]),
    ("marketing", &["view", "campaigns", "emails", "sms", "analytics"]),
    ("reports", &["view", "create", "export", "schedule"]),
    ("settings", &["view", "general", "security", "integrations", "backup"]),
    ("deploy", &["view", "staging", "production", "monitoring", "rollback"]),
];

const MANAGER_GRANTS: &[(&str, &[&str])] = &[
    ("dashboard", &["view", "analytics", "reports"]),
    ("users", &["view"]),
    ("customers", &["view", "create", "edit", "export"]),
    ("bookings", &["view", "create", "edit", "approve", "cancel"]),
    ("finance", &["view", "transactions", "refunds", "reports"]),
    ("marketing", &["view", "campaigns", "emails", "sms", "analytics"]),
    ("reports", &["view", "create", "export", "schedule"]),
    ("settings", &["view", "general"]),
    ("deploy", &["view", "staging", "monitoring"]),
];

const USER_GRANTS: &[(&str, &[&str])] = &[
    ("dashboard", &["view"]),
    ("customers", &["view", "create", "edit"]),
    ("bookings", &["view", "create", "edit"]),
    ("finance", &["view"]),
    ("marketing", &["view"]),
    ("reports", &["view"]),
    ("settings", &["view"]),
];

fn expand(grants: &[(&'static str, &[&'static str])]) -> Vec<Permission> {
    grants
        .iter()
        .flat_map(|&(resource, actions)| {
            actions
                .iter()
                .map(move |&action| Permission::from_static(resource, action))
        })
        .collect()
}

impl RolePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default back-office table: `admin`, `manager` and `user`.
    pub fn reservei() -> Self {
        Self::new()
            .with_role(Role::ADMIN, expand(ADMIN_GRANTS))
            .with_role(Role::MANAGER, expand(MANAGER_GRANTS))
            .with_role(Role::USER, expand(USER_GRANTS))
    }

    pub fn with_role(mut self, role: Role, permissions: Vec<Permission>) -> Self {
        self.grants.insert(role, permissions);
        self
    }

    pub fn permissions_for(&self, role: &Role) -> &[Permission] {
        self.grants.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Roles whose grants include `permission`, sorted by name.
    pub fn roles_granting(&self, permission: &Permission) -> Vec<&Role> {
        let mut roles: Vec<&Role> = self
            .grants
            .iter()
            .filter(|(_, perms)| perms.contains(permission))
            .map(|(role, _)| role)
            .collect();
        roles.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        roles
    }
}
