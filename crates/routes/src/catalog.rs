//! Built-in route tree of the Reservei Viagens back-office.

use serde::Serialize;

use reservei_auth::Permission;

use crate::{Breadcrumb, RegistryError, RouteDescriptor, RouteRegistry};

/// Display information for a menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

const CATEGORIES: &[CategoryInfo] = &[
    CategoryInfo {
        key: "dashboards",
        name: "Dashboards",
        description: "Dashboards e visões gerais",
        icon: "BarChart3",
    },
    CategoryInfo {
        key: "gestao",
        name: "Gestão",
        description: "Sistemas de gestão",
        icon: "Building",
    },
    CategoryInfo {
        key: "negocio",
        name: "Negócio",
        description: "Módulos de negócio",
        icon: "Briefcase",
    },
    CategoryInfo {
        key: "auth",
        name: "Autenticação",
        description: "Sistema de autenticação",
        icon: "Lock",
    },
    CategoryInfo {
        key: "communication",
        name: "Comunicação",
        description: "Sistemas de comunicação",
        icon: "MessageCircle",
    },
    CategoryInfo {
        key: "marketing",
        name: "Marketing",
        description: "Marketing e SEO",
        icon: "TrendingUp",
    },
    CategoryInfo {
        key: "relatorios",
        name: "Relatórios",
        description: "Relatórios e analytics",
        icon: "FileText",
    },
    CategoryInfo {
        key: "admin",
        name: "Administração",
        description: "Painel administrativo",
        icon: "Settings",
    },
    CategoryInfo {
        key: "support",
        name: "Suporte",
        description: "Sistema de suporte",
        icon: "HelpCircle",
    },
];

pub fn categories() -> &'static [CategoryInfo] {
    CATEGORIES
}

pub fn category(key: &str) -> Option<&'static CategoryInfo> {
    CATEGORIES.iter().find(|c| c.key == key)
}

fn home() -> Breadcrumb {
    Breadcrumb::link("Início", "/")
}

fn perm(resource: &'static str, action: &'static str) -> Permission {
    Permission::from_static(resource, action)
}

/// The back-office route declarations.
pub fn reservei_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("/", "Dashboard")
            .description("Visão geral do sistema")
            .icon("Home")
            .category("dashboards")
            .order(0)
            .public()
            .api_services(["core", "analytics"])
            .breadcrumbs(vec![Breadcrumb::active("Início")]),
        RouteDescriptor::new("/login", "Entrar")
            .description("Acesso ao sistema")
            .icon("Lock")
            .category("auth")
            .public()
            .api_services(["auth"]),
        RouteDescriptor::new("/analytics-dashboard", "Analytics")
            .description("Dashboard avançado de analytics")
            .icon("BarChart3")
            .category("dashboards")
            .order(1)
            .protected()
            .permission(perm("dashboard", "analytics"))
            .tags(["métricas", "kpi"])
            .api_services(["analytics", "data", "reports"])
            .redirect_to("/login"),
        RouteDescriptor::new("/bookings", "Reservas")
            .description("Gestão de reservas e agendamentos")
            .icon("Calendar")
            .category("gestao")
            .order(1)
            .protected()
            .permission(perm("bookings", "view"))
            .tags(["reservas", "agenda"])
            .api_services(["travel", "payments"])
            .breadcrumbs(vec![home(), Breadcrumb::active("Reservas")])
            .child(
                RouteDescriptor::new("/bookings/new", "Nova Reserva")
                    .icon("Plus")
                    .category("gestao")
                    .protected()
                    .permission(perm("bookings", "create"))
                    .breadcrumbs(vec![
                        home(),
                        Breadcrumb::link("Reservas", "/bookings"),
                        Breadcrumb::active("Nova Reserva"),
                    ]),
            )
            .child(
                RouteDescriptor::new("/bookings/:id", "Detalhes da Reserva")
                    .category("gestao")
                    .protected()
                    .permission(perm("bookings", "view"))
                    .breadcrumbs(vec![
                        home(),
                        Breadcrumb::link("Reservas", "/bookings"),
                        Breadcrumb::active("Detalhes"),
                    ]),
            ),
        RouteDescriptor::new("/customers", "Clientes")
            .description("CRM completo de clientes")
            .icon("Users")
            .category("gestao")
            .order(2)
            .protected()
            .permission(perm("customers", "view"))
            .tags(["crm"])
            .api_services(["sales", "loyalty", "data"])
            .breadcrumbs(vec![home(), Breadcrumb::active("Clientes")])
            .child(
                RouteDescriptor::new("/customers/:id", "Perfil do Cliente")
                    .category("gestao")
                    .protected()
                    .permission(perm("customers", "view")),
            ),
        RouteDescriptor::new("/hotels", "Hotéis")
            .description("Sistema completo de gestão de hotéis")
            .icon("Building")
            .category("gestao")
            .order(3)
            .protected()
            .api_services(["travel", "data"]),
        RouteDescriptor::new("/travel-packages", "Pacotes de Viagem")
            .description("Gestão de viagens e pacotes")
            .icon("Plane")
            .category("negocio")
            .order(1)
            .protected()
            .tags(["pacotes", "turismo"])
            .api_services(["travel", "attractions"]),
        RouteDescriptor::new("/payments", "Pagamentos")
            .description("Transações e conciliação")
            .icon("CreditCard")
            .category("negocio")
            .order(2)
            .protected()
            .permission(perm("finance", "transactions"))
            .api_services(["payments", "finance"])
            .breadcrumbs(vec![home(), Breadcrumb::active("Pagamentos")]),
        RouteDescriptor::new("/finance", "Financeiro")
            .description("Fluxo de caixa, reembolsos e relatórios financeiros")
            .icon("DollarSign")
            .category("negocio")
            .order(3)
            .protected()
            .permission(perm("finance", "view"))
            .api_services(["finance", "payments", "sectoral_finance"])
            .child(
                RouteDescriptor::new("/finance/refunds", "Reembolsos")
                    .category("negocio")
                    .protected()
                    .permission(perm("finance", "refunds")),
            ),
        RouteDescriptor::new("/marketing", "Campanhas")
            .description("Campanhas de e-mail e SMS")
            .icon("Megaphone")
            .category("marketing")
            .order(1)
            .protected()
            .permission(perm("marketing", "campaigns"))
            .tags(["email", "sms"])
            .api_services(["marketing", "analytics"]),
        RouteDescriptor::new("/chat", "Atendimento")
            .description("Chat e chatbot de atendimento")
            .icon("MessageCircle")
            .category("communication")
            .protected()
            .api_services(["chat", "notifications"]),
        RouteDescriptor::new("/reports", "Relatórios")
            .description("Relatórios gerenciais e exportação")
            .icon("FileText")
            .category("relatorios")
            .order(1)
            .protected()
            .permission(perm("reports", "view"))
            .tags(["analytics", "exportação"])
            .api_services(["reports", "analytics"])
            .breadcrumbs(vec![home(), Breadcrumb::active("Relatórios")]),
        RouteDescriptor::new("/users", "Usuários")
            .description("Gestão de usuários e funções")
            .icon("UserCog")
            .category("admin")
            .order(1)
            .protected()
            .admin()
            .permission(perm("users", "view"))
            .permission(perm("users", "manage_roles"))
            .fallback("Somente administradores podem gerenciar usuários."),
        RouteDescriptor::new("/settings", "Configurações")
            .description("Configurações gerais do sistema")
            .icon("Settings")
            .category("admin")
            .order(2)
            .protected()
            .permission(perm("settings", "view"))
            .child(
                RouteDescriptor::new("/settings/security", "Segurança")
                    .category("admin")
                    .protected()
                    .admin()
                    .permission(perm("settings", "security")),
            ),
        RouteDescriptor::new("/deploy", "Deploy")
            .description("Monitoramento e publicação em produção")
            .icon("Rocket")
            .category("admin")
            .order(3)
            .protected()
            .admin()
            .permission(perm("deploy", "view")),
        RouteDescriptor::new("/tickets", "Tickets")
            .description("Sistema de tickets de suporte")
            .icon("HelpCircle")
            .category("support")
            .protected()
            .api_services(["tickets"]),
    ]
}

/// Registry over [`reservei_routes`].
pub fn reservei_registry() -> Result<RouteRegistry, RegistryError> {
    RouteRegistry::new(reservei_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reservei_auth::{AccessPolicy, AuthContext, Role, RolePermissions, evaluate_access};

    #[test]
    fn built_in_catalog_is_valid() {
        let reg = reservei_registry().unwrap();
        assert!(reg.find_route_by_path("/reports").is_some());
        assert!(reg.match_route("/bookings/123").is_some());
    }

    #[test]
    fn every_route_category_has_display_info() {
        let reg = reservei_registry().unwrap();
        for route in reg.iter() {
            if let Some(key) = route.metadata.category.as_deref() {
                assert!(category(key).is_some(), "no category info for '{key}'");
            }
        }
    }

    #[test]
    fn public_routes_are_home_and_login() {
        let reg = reservei_registry().unwrap();
        let public: Vec<&str> = reg
            .get_public_routes()
            .into_iter()
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(public, vec!["/", "/login"]);
    }

    #[test]
    fn admin_is_authorized_on_every_route() {
        let reg = reservei_registry().unwrap();
        let admin = AuthContext::for_role(Role::ADMIN, &RolePermissions::reservei());
        for route in reg.iter() {
            let decision = evaluate_access(route, &admin, &AccessPolicy::default()).unwrap();
            assert!(decision.is_allowed(), "admin denied on '{}'", route.path);
        }
    }

    #[test]
    fn every_required_permission_is_granted_to_some_role() {
        let reg = reservei_registry().unwrap();
        let table = RolePermissions::reservei();
        for route in reg.iter() {
            for permission in &route.permissions {
                assert!(
                    !table.roles_granting(permission).is_empty(),
                    "'{}' requires {permission}, which no role holds",
                    route.path
                );
            }
        }
    }

    #[test]
    fn payments_is_open_to_managers_but_not_users() {
        let reg = reservei_registry().unwrap();
        let table = RolePermissions::reservei();
        let payments = reg.find_route_by_path("/payments").unwrap();
        let policy = AccessPolicy::default();

        let manager = AuthContext::for_role(Role::MANAGER, &table);
        assert!(evaluate_access(payments, &manager, &policy).unwrap().is_allowed());

        let user = AuthContext::for_role(Role::USER, &table);
        assert!(!evaluate_access(payments, &user, &policy).unwrap().is_allowed());
    }
}
