//! Navigation guard: gates content behind a route's access rules.
//!
//! The guard is a small state machine. It starts in [`GuardState::Checking`],
//! runs the shared evaluator once its inputs are known, and settles in
//! [`GuardState::Authorized`] or [`GuardState::Unauthorized`]. Any change of
//! inputs triggers a full re-evaluation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use reservei_auth::{
    AccessDecision, AccessPolicy, AuthContext, DenialReason, Permission, evaluate_access,
};
use reservei_routes::RouteDescriptor;

use crate::NavigationConfig;

/// Emitted whenever a guard denies access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnauthorizedAccess {
    pub path: String,
    pub role: String,
    pub reason: DenialReason,
    pub occurred_at: DateTime<Utc>,
}

/// Host callbacks invoked by the guard.
pub trait GuardHooks {
    /// Called on every denial, before any redirect.
    fn on_unauthorized(&mut self, _event: &UnauthorizedAccess) {}

    /// Client-side redirect. Return `false` when the host cannot route
    /// in-app; the guard then requests a full navigation instead.
    fn on_redirect(&mut self, _path: &str) -> bool {
        false
    }
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl GuardHooks for NoopHooks {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectMode {
    /// Handled by the host router.
    Client,
    /// Host router declined; reload at the target path.
    FullNavigation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DeniedAction {
    GoBack,
    GoHome { path: String },
}

/// Deterministic "Access Denied" panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDeniedView {
    pub path: String,
    pub reason: DenialReason,
    pub missing: Vec<Permission>,
    pub actions: Vec<DeniedAction>,
}

impl AccessDeniedView {
    fn new(path: &str, reason: DenialReason, home_path: &str) -> Self {
        Self {
            path: path.to_string(),
            missing: reason.missing_permissions().to_vec(),
            reason,
            actions: vec![
                DeniedAction::GoBack,
                DeniedAction::GoHome {
                    path: home_path.to_string(),
                },
            ],
        }
    }

    /// Missing permissions as `resource - action` lines.
    pub fn missing_labels(&self) -> Vec<String> {
        self.missing.iter().map(Permission::label).collect()
    }

    pub fn message(&self) -> String {
        format!("Access denied to '{}': {}", self.path, self.reason)
    }
}

/// What the guard does once access has been refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DenialOutcome {
    Redirect { path: String, mode: RedirectMode },
    Fallback { text: String },
    AccessDenied { view: AccessDeniedView },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardState {
    Checking,
    Authorized,
    Unauthorized {
        reason: DenialReason,
        outcome: DenialOutcome,
    },
}

impl GuardState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GuardState::Authorized)
    }
}

/// What the host should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView<T> {
    Loading,
    Content(T),
    Redirecting { path: String, mode: RedirectMode },
    Fallback(String),
    AccessDenied(AccessDeniedView),
}

/// Guard around the content of a single route.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    route: RouteDescriptor,
    policy: AccessPolicy,
    home_path: String,
    state: GuardState,
    /// Auth inputs of the last evaluation; `None` until the first one.
    evaluated_with: Option<AuthContext>,
}

impl NavigationGuard {
    pub fn new(route: RouteDescriptor, config: &NavigationConfig) -> Self {
        Self {
            route,
            policy: config.access_policy(),
            home_path: config.home_path.clone(),
            state: GuardState::Checking,
            evaluated_with: None,
        }
    }

    pub fn route(&self) -> &RouteDescriptor {
        &self.route
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Run the decision for `auth`, replacing any previous state.
    pub fn evaluate<H>(&mut self, auth: &AuthContext, hooks: &mut H) -> &GuardState
    where
        H: GuardHooks + ?Sized,
    {
        let reason = match evaluate_access(&self.route, auth, &self.policy) {
            Ok(AccessDecision::Allowed) => None,
            Ok(AccessDecision::Denied(reason)) => Some(reason),
            Err(err) => {
                tracing::error!(
                    path = %self.route.path,
                    error = %err,
                    "access evaluation failed; denying"
                );
                Some(DenialReason::EvaluationFailed)
            }
        };

        self.state = match reason {
            None => {
                tracing::debug!(path = %self.route.path, "route authorized");
                GuardState::Authorized
            }
            Some(reason) => self.deny(auth, reason, hooks),
        };
        self.evaluated_with = Some(auth.clone());
        &self.state
    }

    /// Re-evaluate only when the route or the auth inputs changed since the
    /// last evaluation (or when nothing has been evaluated yet).
    pub fn update<H>(
        &mut self,
        route: &RouteDescriptor,
        auth: &AuthContext,
        hooks: &mut H,
    ) -> &GuardState
    where
        H: GuardHooks + ?Sized,
    {
        let route_changed = &self.route != route;
        if route_changed {
            self.route = route.clone();
        }
        if route_changed || self.evaluated_with.as_ref() != Some(auth) {
            return self.evaluate(auth, hooks);
        }
        &self.state
    }

    fn deny<H>(&self, auth: &AuthContext, reason: DenialReason, hooks: &mut H) -> GuardState
    where
        H: GuardHooks + ?Sized,
    {
        tracing::warn!(
            path = %self.route.path,
            role = auth.role.as_str(),
            reason = %reason,
            "route access denied"
        );

        hooks.on_unauthorized(&UnauthorizedAccess {
            path: self.route.path.clone(),
            role: auth.role.as_str().to_string(),
            reason: reason.clone(),
            occurred_at: Utc::now(),
        });

        let outcome = if let Some(target) = &self.route.redirect_to {
            let mode = if hooks.on_redirect(target) {
                RedirectMode::Client
            } else {
                RedirectMode::FullNavigation
            };
            DenialOutcome::Redirect {
                path: target.clone(),
                mode,
            }
        } else if let Some(text) = &self.route.fallback {
            DenialOutcome::Fallback { text: text.clone() }
        } else {
            DenialOutcome::AccessDenied {
                view: AccessDeniedView::new(&self.route.path, reason.clone(), &self.home_path),
            }
        };

        GuardState::Unauthorized { reason, outcome }
    }

    /// Map the current state to a view around `content`.
    pub fn render<T>(&self, content: T) -> GuardView<T> {
        match &self.state {
            GuardState::Checking => GuardView::Loading,
            GuardState::Authorized => GuardView::Content(content),
            GuardState::Unauthorized { outcome, .. } => match outcome {
                DenialOutcome::Redirect { path, mode } => GuardView::Redirecting {
                    path: path.clone(),
                    mode: *mode,
                },
                DenialOutcome::Fallback { text } => GuardView::Fallback(text.clone()),
                DenialOutcome::AccessDenied { view } => GuardView::AccessDenied(view.clone()),
            },
        }
    }
}
