//! Read-only route registry and its query operations.

use std::collections::HashSet;

use reservei_auth::RouteAuthorization;

use crate::{Breadcrumb, PathParams, RegistryError, RouteDescriptor, RoutePattern};

/// A route resolved from a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDescriptor,
    pub params: PathParams,
}

/// Validated, immutable route tree.
///
/// # Invariants
/// - Every path is unique across the whole tree, up to trailing slashes and
///   parameter names.
/// - Every path parses as a [`RoutePattern`].
/// - Every declared permission is well formed.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    routes: Vec<RouteDescriptor>,
    /// Compiled patterns in depth-first order, paired with the child-index
    /// trail leading to the descriptor.
    patterns: Vec<(Vec<usize>, RoutePattern)>,
}

impl RouteRegistry {
    pub fn new(routes: Vec<RouteDescriptor>) -> Result<Self, RegistryError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut patterns = Vec::new();
        let mut trail = Vec::new();
        for (idx, route) in routes.iter().enumerate() {
            trail.push(idx);
            validate(route, &mut trail, &mut seen, &mut patterns)?;
            trail.pop();
        }

        tracing::info!(
            top_level = routes.len(),
            total = patterns.len(),
            "route registry loaded"
        );

        Ok(Self { routes, patterns })
    }

    /// Build a registry from a JSON array of route descriptors.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let routes: Vec<RouteDescriptor> = serde_json::from_str(json)?;
        Self::new(routes)
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Every descriptor in the tree, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> + '_ {
        self.patterns.iter().filter_map(|(trail, _)| self.resolve(trail))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn resolve(&self, trail: &[usize]) -> Option<&RouteDescriptor> {
        let (first, rest) = trail.split_first()?;
        let mut node = self.routes.get(*first)?;
        for idx in rest {
            node = node.children.get(*idx)?;
        }
        Some(node)
    }

    /// Exact lookup: the first route (depth-first, declaration order) whose
    /// path equals `path` verbatim. Parameter segments are not expanded.
    pub fn find_route_by_path(&self, path: &str) -> Option<&RouteDescriptor> {
        fn walk<'a>(routes: &'a [RouteDescriptor], path: &str) -> Option<&'a RouteDescriptor> {
            for route in routes {
                if route.path == path {
                    return Some(route);
                }
                if let Some(found) = walk(&route.children, path) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.routes, path)
    }

    /// Resolve a concrete path: an exact match wins, then the first literal
    /// pattern (depth-first) matching segment-wise, then the first
    /// parameterised one.
    pub fn match_route(&self, path: &str) -> Option<RouteMatch<'_>> {
        if let Some(route) = self.find_route_by_path(path) {
            return Some(RouteMatch {
                route,
                params: PathParams::new(),
            });
        }

        self.match_patterns(path, false).or_else(|| self.match_patterns(path, true))
    }

    fn match_patterns(&self, path: &str, with_params: bool) -> Option<RouteMatch<'_>> {
        self.patterns
            .iter()
            .filter(|(_, pattern)| pattern.has_params() == with_params)
            .find_map(|(trail, pattern)| {
                let params = pattern.matches(path)?;
                let route = self.resolve(trail)?;
                Some(RouteMatch { route, params })
            })
    }

    /// Declared breadcrumbs of the exact match, or nothing.
    pub fn generate_breadcrumbs(&self, path: &str) -> Vec<Breadcrumb> {
        self.find_route_by_path(path)
            .map(|route| route.breadcrumbs.clone())
            .unwrap_or_default()
    }

    /// Top-level routes in `category`. Children are not searched.
    pub fn get_routes_by_category(&self, category: &str) -> Vec<&RouteDescriptor> {
        self.routes
            .iter()
            .filter(|r| r.metadata.category.as_deref() == Some(category))
            .collect()
    }

    /// Top-level routes flagged `is_public`.
    pub fn get_public_routes(&self) -> Vec<&RouteDescriptor> {
        self.routes.iter().filter(|r| r.metadata.is_public).collect()
    }

    /// Top-level routes that require authentication.
    pub fn get_protected_routes(&self) -> Vec<&RouteDescriptor> {
        self.routes.iter().filter(|r| r.requires_auth).collect()
    }

    /// Distinct top-level categories in first-seen order.
    pub fn get_all_categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for category in self.routes.iter().filter_map(|r| r.metadata.category.as_deref()) {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        categories
    }

    /// Top-level routes whose page calls `service`.
    pub fn get_routes_with_api(&self, service: &str) -> Vec<&RouteDescriptor> {
        self.routes
            .iter()
            .filter(|r| r.metadata.api_services.iter().any(|s| s == service))
            .collect()
    }
}

fn validate(
    route: &RouteDescriptor,
    trail: &mut Vec<usize>,
    seen: &mut HashSet<String>,
    patterns: &mut Vec<(Vec<usize>, RoutePattern)>,
) -> Result<(), RegistryError> {
    let pattern = RoutePattern::parse(&route.path)?;

    if !seen.insert(pattern.canonical()) {
        return Err(RegistryError::DuplicatePath(route.path.clone()));
    }
    if route.metadata.title.trim().is_empty() {
        return Err(RegistryError::MissingTitle(route.path.clone()));
    }
    if let Some(bad) = route.required_permissions().iter().find(|p| !p.is_well_formed()) {
        return Err(RegistryError::MalformedPermission {
            path: route.path.clone(),
            permission: bad.to_string(),
        });
    }
    if let Some(target) = &route.redirect_to {
        if !target.starts_with('/') {
            return Err(RegistryError::InvalidRedirect {
                path: route.path.clone(),
                target: target.clone(),
            });
        }
    }

    patterns.push((trail.clone(), pattern));

    for (idx, child) in route.children.iter().enumerate() {
        trail.push(idx);
        validate(child, trail, seen, patterns)?;
        trail.pop();
    }
    Ok(())
}
