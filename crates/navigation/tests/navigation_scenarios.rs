use reservei_auth::{AccessPolicy, AuthContext, Permission, Role, RolePermissions, has_permission};
use reservei_navigation::{
    GuardHooks, GuardView, MenuOptions, MenuView, NavigationConfig, NavigationGuard,
    NavigationMenu, NoopHooks, UnauthorizedAccess,
};
use reservei_routes::{RouteDescriptor, RoutePattern};
use reservei_routes::catalog::reservei_registry;

#[derive(Default)]
struct AuditLog {
    denied: Vec<UnauthorizedAccess>,
}

impl GuardHooks for AuditLog {
    fn on_unauthorized(&mut self, event: &UnauthorizedAccess) {
        self.denied.push(event.clone());
    }
}

fn init_logging() {
    reservei_observability::init();
}

fn payments_route() -> RouteDescriptor {
    RouteDescriptor::new("/payments", "Pagamentos")
        .protected()
        .permission(Permission::from_static("payments", "view"))
}

fn staff(permissions: Vec<Permission>) -> AuthContext {
    AuthContext::new(true, Role::new("staff"), permissions)
}

#[test]
fn staff_with_payments_view_sees_page() {
    let mut guard = NavigationGuard::new(payments_route(), &NavigationConfig::default());
    guard.evaluate(&staff(vec![Permission::from_static("payments", "view")]), &mut NoopHooks);
    assert_eq!(guard.render("payments page"), GuardView::Content("payments page"));
}

#[test]
fn staff_with_only_process_is_shown_access_denied() {
    init_logging();
    let mut guard = NavigationGuard::new(payments_route(), &NavigationConfig::default());
    let mut audit = AuditLog::default();
    guard.evaluate(&staff(vec![Permission::from_static("payments", "process")]), &mut audit);

    let GuardView::AccessDenied(view) = guard.render("payments page") else {
        panic!("expected access denied panel");
    };
    assert_eq!(view.path, "/payments");
    assert_eq!(view.missing_labels(), vec!["payments - view"]);
    assert_eq!(audit.denied.len(), 1);
}

#[test]
fn public_home_renders_for_anonymous() {
    let home = RouteDescriptor::new("/", "Início");
    let mut guard = NavigationGuard::new(home, &NavigationConfig::default());
    guard.evaluate(&AuthContext::anonymous(), &mut NoopHooks);
    assert_eq!(guard.render(1), GuardView::Content(1));
}

#[test]
fn authenticated_guest_is_denied_protected_routes() {
    let mut guard = NavigationGuard::new(payments_route(), &NavigationConfig::default());
    let guest = AuthContext::new(
        true,
        Role::GUEST,
        vec![Permission::from_static("payments", "view")],
    );
    guard.evaluate(&guest, &mut NoopHooks);
    assert!(matches!(guard.render(()), GuardView::AccessDenied(_)));
}

#[test]
fn menu_search_finds_reports_in_catalog() {
    let registry = reservei_registry().unwrap();
    let auth = AuthContext::for_role(Role::MANAGER, &RolePermissions::reservei());
    let mut menu = NavigationMenu::build(
        &registry,
        &auth,
        &AccessPolicy::default(),
        MenuOptions::default(),
    );

    menu.set_search("relat");
    let MenuView::Search(results) = menu.view() else {
        panic!("expected search results");
    };
    let paths: Vec<&str> = results.iter().map(|n| n.path.as_str()).collect();
    // "/finance" matches through its description.
    assert_eq!(paths, vec!["/finance", "/reports"]);
}

#[test]
fn guard_and_menu_agree_on_every_catalog_route() {
    init_logging();
    let registry = reservei_registry().unwrap();
    let table = RolePermissions::reservei();
    let config = NavigationConfig::default();
    let contexts = [
        AuthContext::anonymous(),
        AuthContext::new(true, Role::GUEST, vec![]),
        AuthContext::for_role(Role::USER, &table),
        AuthContext::for_role(Role::MANAGER, &table),
        AuthContext::for_role(Role::ADMIN, &table),
    ];

    let policy = config.access_policy();

    for auth in &contexts {
        let menu = NavigationMenu::build(&registry, auth, &policy, config.menu_options());
        for route in registry.iter() {
            if RoutePattern::parse(&route.path).unwrap().has_params() {
                continue;
            }
            let mut guard = NavigationGuard::new(route.clone(), &config);
            guard.evaluate(auth, &mut NoopHooks);
            assert_eq!(
                guard.state().is_authorized(),
                menu.find_by_path(&route.path).is_some(),
                "guard and menu disagree on '{}' for role '{}'",
                route.path,
                auth.role
            );
        }
    }
}

#[test]
fn admin_menu_lists_every_navigable_route() {
    let registry = reservei_registry().unwrap();
    let admin = AuthContext::for_role(Role::ADMIN, &RolePermissions::reservei());
    let menu = NavigationMenu::build(
        &registry,
        &admin,
        &AccessPolicy::default(),
        MenuOptions::default(),
    );

    for route in registry.iter() {
        if RoutePattern::parse(&route.path).unwrap().has_params() {
            continue;
        }
        assert!(menu.find_by_path(&route.path).is_some(), "admin menu misses '{}'", route.path);
    }
}

#[test]
fn admin_reaches_admin_routes_that_manager_cannot() {
    let registry = reservei_registry().unwrap();
    let table = RolePermissions::reservei();
    let users = registry.find_route_by_path("/users").unwrap();

    let admin = AuthContext::for_role(Role::ADMIN, &table);
    let manager = AuthContext::for_role(Role::MANAGER, &table);
    assert!(has_permission(users, &admin.permissions));
    assert!(!has_permission(users, &manager.permissions));

    let mut guard = NavigationGuard::new(users.clone(), &NavigationConfig::default());
    guard.evaluate(&manager, &mut NoopHooks);
    assert_eq!(
        guard.render(()),
        GuardView::Fallback("Somente administradores podem gerenciar usuários.".to_string())
    );
}
