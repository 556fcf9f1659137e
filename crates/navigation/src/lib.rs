//! `reservei-navigation` — route guard and navigation menu.
//!
//! Both apply the access policy from `reservei-auth` to routes from
//! `reservei-routes` and produce plain view models; rendering is left to the
//! host UI.

pub mod config;
pub mod guard;
pub mod menu;

pub use config::{ConfigError, NavigationConfig};
pub use guard::{
    AccessDeniedView, DeniedAction, DenialOutcome, GuardHooks, GuardState, GuardView,
    NavigationGuard, NoopHooks, RedirectMode, UnauthorizedAccess,
};
pub use menu::{
    ExpansionKey, MenuGroup, MenuNode, MenuNodeId, MenuOptions, MenuView, NavigationMenu, Selection,
};
