//! Navigation menu over the accessible part of the route tree.
//!
//! Visible routes are copied into a flat arena of [`MenuNode`]s (parents
//! before children) and addressed by [`MenuNodeId`]. Expansion state is a set
//! of open keys, so toggling is O(1) regardless of tree depth.

use std::collections::HashSet;

use serde::Serialize;

use reservei_auth::{AccessPolicy, AuthContext, evaluate_access};
use reservei_routes::catalog::{self, CategoryInfo};
use reservei_routes::{RouteDescriptor, RoutePattern, RouteRegistry};

/// Group for routes that declare no category.
pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MenuNodeId(usize);

impl MenuNodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuNode {
    pub id: MenuNodeId,
    pub path: String,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub order: i32,
    pub parent: Option<MenuNodeId>,
    pub children: Vec<MenuNodeId>,
}

impl MenuNode {
    pub fn is_branch(&self) -> bool {
        !self.children.is_empty()
    }

    /// Case-insensitive substring match over title, description and tags.
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuOptions {
    pub show_search: bool,
    pub show_categories: bool,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            show_search: true,
            show_categories: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpansionKey {
    Category(String),
    Node(MenuNodeId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuGroup<'a> {
    pub category: String,
    pub info: Option<&'static CategoryInfo>,
    pub expanded: bool,
    pub items: Vec<&'a MenuNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuView<'a> {
    /// Search text is active: flat list of matches.
    Search(Vec<&'a MenuNode>),
    Categories(Vec<MenuGroup<'a>>),
    /// Categories disabled: top-level nodes in declaration order.
    Tree(Vec<&'a MenuNode>),
}

/// Result of selecting a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Navigated(String),
    Toggled { expanded: bool },
}

#[derive(Debug, Clone)]
pub struct NavigationMenu {
    nodes: Vec<MenuNode>,
    roots: Vec<MenuNodeId>,
    options: MenuOptions,
    expanded: HashSet<ExpansionKey>,
    search: String,
    current_path: Option<String>,
    collapsed: bool,
}

impl NavigationMenu {
    pub fn build(
        registry: &RouteRegistry,
        auth: &AuthContext,
        policy: &AccessPolicy,
        options: MenuOptions,
    ) -> Self {
        let mut menu = Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            options,
            expanded: HashSet::new(),
            search: String::new(),
            current_path: None,
            collapsed: false,
        };
        menu.populate(registry, auth, policy);
        menu
    }

    /// Rebuild visibility for new auth inputs, keeping open categories and
    /// open nodes that are still visible.
    pub fn refresh(&mut self, registry: &RouteRegistry, auth: &AuthContext, policy: &AccessPolicy) {
        let open_paths: Vec<String> = self
            .expanded
            .iter()
            .filter_map(|key| match key {
                ExpansionKey::Node(id) => self.node(*id).map(|n| n.path.clone()),
                ExpansionKey::Category(_) => None,
            })
            .collect();
        self.expanded
            .retain(|key| matches!(key, ExpansionKey::Category(_)));

        self.nodes.clear();
        self.roots.clear();
        self.populate(registry, auth, policy);

        for path in open_paths {
            if let Some(id) = self.find_by_path(&path) {
                self.expanded.insert(ExpansionKey::Node(id));
            }
        }
    }

    fn populate(&mut self, registry: &RouteRegistry, auth: &AuthContext, policy: &AccessPolicy) {
        for route in registry.routes() {
            if let Some(id) = self.insert(route, None, auth, policy) {
                self.roots.push(id);
            }
        }
        tracing::debug!(
            visible = self.nodes.len(),
            role = auth.role.as_str(),
            "navigation menu built"
        );
    }

    fn insert(
        &mut self,
        route: &RouteDescriptor,
        parent: Option<MenuNodeId>,
        auth: &AuthContext,
        policy: &AccessPolicy,
    ) -> Option<MenuNodeId> {
        if !is_visible(route, auth, policy) {
            return None;
        }

        let id = MenuNodeId(self.nodes.len());
        let inherited = parent
            .and_then(|p| self.node(p))
            .map(|p| p.category.clone());
        let category = route
            .metadata
            .category
            .clone()
            .or(inherited)
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        self.nodes.push(MenuNode {
            id,
            path: route.path.clone(),
            title: route.metadata.title.clone(),
            description: route.metadata.description.clone(),
            icon: route.metadata.icon.clone(),
            category,
            tags: route.metadata.tags.clone(),
            order: route.metadata.sort_order(),
            parent,
            children: Vec::new(),
        });

        for child in &route.children {
            if let Some(child_id) = self.insert(child, Some(id), auth, policy) {
                self.nodes[id.0].children.push(child_id);
            }
        }
        Some(id)
    }

    pub fn node(&self, id: MenuNodeId) -> Option<&MenuNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    pub fn roots(&self) -> impl Iterator<Item = &MenuNode> + '_ {
        self.roots.iter().filter_map(|id| self.node(*id))
    }

    pub fn children(&self, id: MenuNodeId) -> Vec<&MenuNode> {
        self.node(id)
            .map(|n| n.children.iter().filter_map(|c| self.node(*c)).collect())
            .unwrap_or_default()
    }

    pub fn find_by_path(&self, path: &str) -> Option<MenuNodeId> {
        self.nodes.iter().find(|n| n.path == path).map(|n| n.id)
    }

    /// Top-level nodes grouped by category. Groups keep first-seen order;
    /// items are sorted by ascending `order` (stable).
    pub fn categorized(&self) -> Vec<MenuGroup<'_>> {
        let mut groups: Vec<MenuGroup<'_>> = Vec::new();
        for node in self.roots() {
            match groups.iter_mut().find(|g| g.category == node.category) {
                Some(group) => group.items.push(node),
                None => groups.push(MenuGroup {
                    category: node.category.clone(),
                    info: catalog::category(&node.category),
                    expanded: self.is_category_expanded(&node.category),
                    items: vec![node],
                }),
            }
        }
        for group in &mut groups {
            group.items.sort_by_key(|n| n.order);
        }
        groups
    }

    /// Every visible node matching `query`, parents before children.
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&MenuNode> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.nodes.iter().filter(|n| n.matches(&needle)).collect()
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn view(&self) -> MenuView<'_> {
        if self.options.show_search && !self.search.trim().is_empty() {
            MenuView::Search(self.search(&self.search))
        } else if self.options.show_categories {
            MenuView::Categories(self.categorized())
        } else {
            MenuView::Tree(self.roots().collect())
        }
    }

    pub fn is_category_expanded(&self, category: &str) -> bool {
        self.expanded
            .contains(&ExpansionKey::Category(category.to_string()))
    }

    pub fn is_node_expanded(&self, id: MenuNodeId) -> bool {
        self.expanded.contains(&ExpansionKey::Node(id))
    }

    /// Returns the new expansion state.
    pub fn toggle(&mut self, key: ExpansionKey) -> bool {
        if self.expanded.remove(&key) {
            false
        } else {
            self.expanded.insert(key);
            true
        }
    }

    pub fn toggle_category(&mut self, category: &str) -> bool {
        self.toggle(ExpansionKey::Category(category.to_string()))
    }

    /// Leaves navigate (the callback receives the path); branches toggle.
    /// Unknown ids select nothing.
    pub fn select<F>(&mut self, id: MenuNodeId, on_navigate: F) -> Option<Selection>
    where
        F: FnOnce(&str),
    {
        let node = self.node(id)?;
        if node.is_branch() {
            let expanded = self.toggle(ExpansionKey::Node(id));
            return Some(Selection::Toggled { expanded });
        }

        let path = node.path.clone();
        on_navigate(&path);
        self.current_path = Some(path.clone());
        Some(Selection::Navigated(path))
    }

    pub fn set_current_path(&mut self, path: impl Into<String>) {
        self.current_path = Some(path.into());
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    /// The node's own path is current, or the current path lies beneath it.
    pub fn is_active(&self, id: MenuNodeId) -> bool {
        let (Some(node), Some(current)) = (self.node(id), self.current_path.as_deref()) else {
            return false;
        };
        if node.path == current {
            return true;
        }
        node.path != "/"
            && current
                .strip_prefix(node.path.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }
}

/// A route shows up when the shared evaluator allows it and it can be
/// navigated to directly (no `:param` segments).
fn is_visible(route: &RouteDescriptor, auth: &AuthContext, policy: &AccessPolicy) -> bool {
    let navigable = RoutePattern::parse(&route.path)
        .map(|p| !p.has_params())
        .unwrap_or(false);
    if !navigable {
        return false;
    }

    match evaluate_access(route, auth, policy) {
        Ok(decision) => decision.is_allowed(),
        Err(err) => {
            tracing::warn!(path = %route.path, error = %err, "hiding route that failed evaluation");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reservei_auth::{Permission, Role};

    fn registry() -> RouteRegistry {
        RouteRegistry::new(vec![
            RouteDescriptor::new("/", "Início").category("dashboards").public(),
            RouteDescriptor::new("/bookings", "Reservas")
                .protected()
                .category("gestao")
                .order(2)
                .permission(Permission::from_static("bookings", "view"))
                .child(
                    RouteDescriptor::new("/bookings/new", "Nova Reserva")
                        .protected()
                        .permission(Permission::from_static("bookings", "create")),
                )
                .child(RouteDescriptor::new("/bookings/:id", "Detalhes").protected()),
            RouteDescriptor::new("/customers", "Clientes")
                .protected()
                .category("gestao")
                .order(1)
                .tags(["crm"]),
            RouteDescriptor::new("/reports", "Relatórios")
                .protected()
                .description("Exportação e analytics")
                .category("relatorios"),
            RouteDescriptor::new("/about", "Sobre"),
        ])
        .unwrap()
    }

    fn staff(permissions: Vec<Permission>) -> AuthContext {
        AuthContext::new(true, Role::new("staff"), permissions)
    }

    fn menu_for(auth: &AuthContext) -> NavigationMenu {
        NavigationMenu::build(&registry(), auth, &AccessPolicy::default(), MenuOptions::default())
    }

    fn paths<'a>(nodes: impl IntoIterator<Item = &'a MenuNode>) -> Vec<&'a str> {
        nodes.into_iter().map(|n| n.path.as_str()).collect()
    }

    #[test]
    fn anonymous_sees_public_routes_only() {
        let menu = menu_for(&AuthContext::anonymous());
        assert_eq!(paths(menu.roots()), vec!["/", "/about"]);
    }

    #[test]
    fn children_are_checked_independently() {
        let menu = menu_for(&staff(vec![Permission::from_static("bookings", "view")]));
        let bookings = menu.find_by_path("/bookings").unwrap();
        assert!(menu.children(bookings).is_empty());
        assert!(!menu.node(bookings).unwrap().is_branch());

        let menu = menu_for(&staff(vec![
            Permission::from_static("bookings", "view"),
            Permission::from_static("bookings", "create"),
        ]));
        let bookings = menu.find_by_path("/bookings").unwrap();
        assert_eq!(paths(menu.children(bookings)), vec!["/bookings/new"]);
    }

    #[test]
    fn hidden_parent_hides_subtree() {
        let menu = menu_for(&staff(vec![Permission::from_static("bookings", "create")]));
        assert!(menu.find_by_path("/bookings").is_none());
        assert!(menu.find_by_path("/bookings/new").is_none());
    }

    #[test]
    fn parameterised_routes_are_not_listed() {
        let menu = menu_for(&staff(vec![Permission::from_static("bookings", "view")]));
        assert!(menu.find_by_path("/bookings/:id").is_none());
    }

    #[test]
    fn guest_role_sees_no_protected_routes() {
        let guest = AuthContext::new(true, Role::GUEST, vec![]);
        let menu = menu_for(&guest);
        assert_eq!(paths(menu.roots()), vec!["/", "/about"]);
    }

    #[test]
    fn groups_keep_insertion_order_and_sort_by_order() {
        let menu = menu_for(&staff(vec![Permission::from_static("bookings", "view")]));
        let groups = menu.categorized();
        let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, vec!["dashboards", "gestao", "relatorios", DEFAULT_CATEGORY]);
        assert_eq!(paths(groups[1].items.iter().copied()), vec!["/customers", "/bookings"]);
        assert_eq!(groups[1].info.map(|i| i.name), Some("Gestão"));
        assert!(!groups[1].expanded);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let menu = menu_for(&staff(vec![Permission::from_static("bookings", "view")]));
        assert_eq!(paths(menu.search("relat")), vec!["/reports"]);
        assert_eq!(paths(menu.search("ANALYTICS")), vec!["/reports"]);
        assert_eq!(paths(menu.search("Crm")), vec!["/customers"]);
        assert!(menu.search("   ").is_empty());
        assert!(menu.search("hotel").is_empty());
    }

    #[test]
    fn view_switches_to_search_results() {
        let mut menu = menu_for(&staff(vec![]));
        assert!(matches!(menu.view(), MenuView::Categories(_)));

        menu.set_search("relat");
        let MenuView::Search(results) = menu.view() else {
            panic!("expected search view");
        };
        assert_eq!(paths(results), vec!["/reports"]);

        let mut plain = NavigationMenu::build(
            &registry(),
            &staff(vec![]),
            &AccessPolicy::default(),
            MenuOptions {
                show_search: false,
                show_categories: false,
            },
        );
        plain.set_search("relat");
        assert!(matches!(plain.view(), MenuView::Tree(_)));
    }

    #[test]
    fn select_navigates_leaves_and_toggles_branches() {
        let mut menu = menu_for(&staff(vec![
            Permission::from_static("bookings", "view"),
            Permission::from_static("bookings", "create"),
        ]));
        let mut navigated = Vec::new();

        let bookings = menu.find_by_path("/bookings").unwrap();
        assert_eq!(
            menu.select(bookings, |p| navigated.push(p.to_string())),
            Some(Selection::Toggled { expanded: true })
        );
        assert!(menu.is_node_expanded(bookings));
        assert_eq!(
            menu.select(bookings, |p| navigated.push(p.to_string())),
            Some(Selection::Toggled { expanded: false })
        );

        let new_booking = menu.find_by_path("/bookings/new").unwrap();
        assert_eq!(
            menu.select(new_booking, |p| navigated.push(p.to_string())),
            Some(Selection::Navigated("/bookings/new".to_string()))
        );
        assert_eq!(navigated, vec!["/bookings/new"]);
        assert_eq!(menu.current_path(), Some("/bookings/new"));
        assert!(menu.is_active(bookings));
        assert!(menu.is_active(new_booking));
        assert!(!menu.is_active(menu.find_by_path("/").unwrap()));

        assert_eq!(menu.select(MenuNodeId(999), |_| {}), None);
    }

    #[test]
    fn category_toggle_is_independent() {
        let mut menu = menu_for(&staff(vec![]));
        assert!(menu.toggle_category("gestao"));
        assert!(menu.is_category_expanded("gestao"));
        assert!(!menu.is_category_expanded("relatorios"));
        assert!(!menu.toggle_category("gestao"));
    }

    #[test]
    fn refresh_keeps_expansion_of_surviving_nodes() {
        let registry = registry();
        let policy = AccessPolicy::default();
        let full = staff(vec![
            Permission::from_static("bookings", "view"),
            Permission::from_static("bookings", "create"),
        ]);
        let mut menu = NavigationMenu::build(&registry, &full, &policy, MenuOptions::default());
        let bookings = menu.find_by_path("/bookings").unwrap();
        menu.toggle(ExpansionKey::Node(bookings));
        menu.toggle_category("gestao");

        menu.refresh(&registry, &AuthContext::anonymous(), &policy);
        assert!(menu.find_by_path("/bookings").is_none());
        assert!(menu.is_category_expanded("gestao"));

        menu.refresh(&registry, &full, &policy);
        let bookings = menu.find_by_path("/bookings").unwrap();
        assert!(!menu.is_node_expanded(bookings));
    }

    #[test]
    fn collapsed_flag_toggles() {
        let mut menu = menu_for(&AuthContext::anonymous());
        assert!(!menu.collapsed());
        assert!(menu.toggle_collapsed());
        assert!(!menu.toggle_collapsed());
    }
}
