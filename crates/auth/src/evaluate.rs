use serde::Serialize;
use thiserror::Error;

use crate::{AuthContext, Permission, Role};

/// Access requirements of a navigable target.
///
/// Implement this on anything that should be gated (route descriptors, menu
/// entries). Guards and menus evaluate through this trait so both apply the
/// same policy.
pub trait RouteAuthorization {
    fn path(&self) -> &str;

    fn requires_auth(&self) -> bool;

    /// Required permissions, all of which must be held.
    fn required_permissions(&self) -> &[Permission];
}

/// Policy knobs that are not part of a route's own declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Role treated as "authenticated but unprovisioned".
    pub guest_role: Role,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            guest_role: Role::GUEST,
        }
    }
}

/// Why a route was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "missing", rename_all = "snake_case")]
pub enum DenialReason {
    NotAuthenticated,
    MissingPermissions(Vec<Permission>),
    GuestRole,
    /// Evaluation itself failed; the route is denied.
    EvaluationFailed,
}

impl DenialReason {
    pub fn missing_permissions(&self) -> &[Permission] {
        match self {
            DenialReason::MissingPermissions(missing) => missing,
            _ => &[],
        }
    }
}

impl core::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DenialReason::NotAuthenticated => f.write_str("authentication required"),
            DenialReason::MissingPermissions(missing) => {
                let labels: Vec<String> = missing.iter().map(Permission::label).collect();
                write!(f, "missing permissions: {}", labels.join(", "))
            }
            DenialReason::GuestRole => f.write_str("guest accounts cannot access this route"),
            DenialReason::EvaluationFailed => f.write_str("access could not be evaluated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum AccessDecision {
    Allowed,
    Denied(DenialReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }

    pub fn denial(&self) -> Option<&DenialReason> {
        match self {
            AccessDecision::Allowed => None,
            AccessDecision::Denied(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("route '{path}' declares malformed permission '{permission}'")]
    MalformedPermission { path: String, permission: String },
}

/// `true` when `route` declares no permissions or every declared permission is
/// present in `user_permissions` (compared by resource and action).
///
/// Ordering and duplicates in either list do not matter.
pub fn has_permission<R>(route: &R, user_permissions: &[Permission]) -> bool
where
    R: RouteAuthorization + ?Sized,
{
    route
        .required_permissions()
        .iter()
        .all(|required| user_permissions.contains(required))
}

fn missing_permissions<R>(route: &R, held: &[Permission]) -> Vec<Permission>
where
    R: RouteAuthorization + ?Sized,
{
    let mut missing: Vec<Permission> = Vec::new();
    for required in route.required_permissions() {
        if !held.contains(required) && !missing.contains(required) {
            missing.push(required.clone());
        }
    }
    missing
}

/// Decide whether `ctx` may access `route`.
///
/// Rules run in order and stop at the first failure:
/// 1. auth required but caller not authenticated
/// 2. declared permissions not all held
/// 3. auth required and caller holds the guest role
///
/// - No IO
/// - No panics
/// - Deterministic in its three inputs
pub fn evaluate_access<R>(
    route: &R,
    ctx: &AuthContext,
    policy: &AccessPolicy,
) -> Result<AccessDecision, EvaluationError>
where
    R: RouteAuthorization + ?Sized,
{
    if let Some(bad) = route
        .required_permissions()
        .iter()
        .find(|p| !p.is_well_formed())
    {
        return Err(EvaluationError::MalformedPermission {
            path: route.path().to_string(),
            permission: bad.to_string(),
        });
    }

    let decision = if route.requires_auth() && !ctx.is_authenticated {
        AccessDecision::Denied(DenialReason::NotAuthenticated)
    } else if !has_permission(route, &ctx.permissions) {
        AccessDecision::Denied(DenialReason::MissingPermissions(missing_permissions(
            route,
            &ctx.permissions,
        )))
    } else if route.requires_auth() && ctx.role == policy.guest_role {
        AccessDecision::Denied(DenialReason::GuestRole)
    } else {
        AccessDecision::Allowed
    };

    tracing::debug!(
        path = route.path(),
        role = ctx.role.as_str(),
        allowed = decision.is_allowed(),
        "access evaluated"
    );

    Ok(decision)
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Auditable record of a single access decision.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub path: String,
    pub granted: bool,
    /// Human-readable reason for the decision.
    pub reason: String,
    pub requires_auth: bool,
    pub is_authenticated: bool,
    pub role: String,
    pub required_permissions: Vec<String>,
    pub held_permissions: Vec<String>,
    pub denial: Option<DenialReason>,
}

/// Explain why `ctx` is allowed or denied on `route`.
///
/// Evaluation errors are reported as a denial, matching how guards treat them.
pub fn explain_access<R>(route: &R, ctx: &AuthContext, policy: &AccessPolicy) -> AccessExplanation
where
    R: RouteAuthorization + ?Sized,
{
    let (decision, reason) = match evaluate_access(route, ctx, policy) {
        Ok(AccessDecision::Allowed) => {
            let reason = if route.required_permissions().is_empty() && !route.requires_auth() {
                "Route is public".to_string()
            } else if route.required_permissions().is_empty() {
                format!("Authenticated as '{}'; route declares no permissions", ctx.role)
            } else {
                format!(
                    "Caller holds every required permission ({})",
                    route.required_permissions().len()
                )
            };
            (AccessDecision::Allowed, reason)
        }
        Ok(AccessDecision::Denied(denial)) => {
            let reason = format!("Denied: {denial}");
            (AccessDecision::Denied(denial), reason)
        }
        Err(err) => (
            AccessDecision::Denied(DenialReason::EvaluationFailed),
            format!("Denied: {err}"),
        ),
    };

    let mut held: Vec<String> = ctx.permissions.iter().map(|p| p.to_string()).collect();
    held.sort();
    held.dedup();

    AccessExplanation {
        path: route.path().to_string(),
        granted: decision.is_allowed(),
        reason,
        requires_auth: route.requires_auth(),
        is_authenticated: ctx.is_authenticated,
        role: ctx.role.as_str().to_string(),
        required_permissions: route
            .required_permissions()
            .iter()
            .map(|p| p.to_string())
            .collect(),
        held_permissions: held,
        denial: decision.denial().cloned(),
    }
}
