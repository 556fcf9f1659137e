//! `reservei-auth` — permission model and access evaluation for the back-office.
//!
//! Pure policy code: no UI, no storage, no ambient session state. Callers pass
//! an explicit [`AuthContext`] into every decision.

pub mod context;
pub mod evaluate;
pub mod permissions;
pub mod roles;

pub use context::AuthContext;
pub use evaluate::{
    AccessDecision, AccessExplanation, AccessPolicy, DenialReason, EvaluationError,
    RouteAuthorization, evaluate_access, explain_access, has_permission,
};
pub use permissions::{Permission, PermissionParseError};
pub use roles::{Role, RolePermissions};
