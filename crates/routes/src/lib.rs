//! `reservei-routes` — the static route tree of the back-office.
//!
//! Routes are declared once (built-in [`catalog`] or JSON), validated when the
//! [`RouteRegistry`] is built, and only read afterwards.

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod pattern;
pub mod registry;

pub use catalog::CategoryInfo;
pub use descriptor::{Breadcrumb, RouteDescriptor, RouteMetadata};
pub use error::RegistryError;
pub use pattern::{PathParams, RoutePattern};
pub use registry::{RouteMatch, RouteRegistry};
