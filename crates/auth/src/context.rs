use serde::{Deserialize, Serialize};

use crate::{Permission, Role, RolePermissions};

/// Caller identity as seen by access checks.
///
/// Supplied by the host's session layer on every evaluation; nothing here is
/// cached between decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub is_authenticated: bool,
    pub role: Role,
    pub permissions: Vec<Permission>,
}

impl AuthContext {
    pub fn new(is_authenticated: bool, role: Role, permissions: Vec<Permission>) -> Self {
        Self {
            is_authenticated,
            role,
            permissions,
        }
    }

    /// Not signed in. Carries the guest role and no permissions.
    pub fn anonymous() -> Self {
        Self::new(false, Role::GUEST, Vec::new())
    }

    /// Authenticated caller whose permissions come from the role table.
    pub fn for_role(role: Role, table: &RolePermissions) -> Self {
        let permissions = table.permissions_for(&role).to_vec();
        Self::new(true, role, permissions)
    }

    pub fn holds(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// At least one of `required` is held. An empty list grants nothing.
    pub fn has_any_permission(&self, required: &[Permission]) -> bool {
        required.iter().any(|p| self.holds(p))
    }

    /// Every entry of `required` is held. An empty list is satisfied.
    pub fn has_all_permissions(&self, required: &[Permission]) -> bool {
        required.iter().all(|p| self.holds(p))
    }
}
