//! Route declarations.

use serde::{Deserialize, Serialize};

use reservei_auth::{Permission, RouteAuthorization};

/// Display metadata of a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_admin: bool,
    /// Backend services the page talks to.
    #[serde(default)]
    pub api_services: Vec<String>,
}

impl RouteMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sort key used by menus; undeclared order sorts as 0.
    pub fn sort_order(&self) -> i32 {
        self.order.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl Breadcrumb {
    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: Some(href.into()),
            is_active: false,
        }
    }

    pub fn active(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: None,
            is_active: true,
        }
    }
}

/// Static declaration of a navigable path.
///
/// `path` may contain `:name` parameter segments. Children are access-checked
/// independently of their parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    pub path: String,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub metadata: RouteMetadata,
    #[serde(default)]
    pub breadcrumbs: Vec<Breadcrumb>,
    #[serde(default)]
    pub children: Vec<RouteDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    /// Text shown instead of the denial view when access is refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl RouteDescriptor {
    /// Public route (no authentication, no permissions).
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: false,
            permissions: Vec::new(),
            metadata: RouteMetadata::new(title),
            breadcrumbs: Vec::new(),
            children: Vec::new(),
            redirect_to: None,
            fallback: None,
        }
    }

    pub fn protected(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.metadata.icon = Some(icon.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.metadata.category = Some(category.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.metadata.order = Some(order);
        self
    }

    pub fn public(mut self) -> Self {
        self.metadata.is_public = true;
        self
    }

    pub fn admin(mut self) -> Self {
        self.metadata.is_admin = true;
        self
    }

    pub fn api_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.api_services = services.into_iter().map(Into::into).collect();
        self
    }

    pub fn breadcrumbs(mut self, breadcrumbs: Vec<Breadcrumb>) -> Self {
        self.breadcrumbs = breadcrumbs;
        self
    }

    pub fn child(mut self, child: RouteDescriptor) -> Self {
        self.children.push(child);
        self
    }

    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_to = Some(target.into());
        self
    }

    pub fn fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

impl RouteAuthorization for RouteDescriptor {
    fn path(&self) -> &str {
        &self.path
    }

    fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    fn required_permissions(&self) -> &[Permission] {
        &self.permissions
    }
}
