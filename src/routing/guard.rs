// ============================================================================
// GUARDS - Decisiones de navegación
// ============================================================================
// Mientras la sesión está en Loading no se decide nada: ni render ni redirect.
// El rol viene del payload sin verificar del token, así que esto solo oculta
// UI; el backend es quien autoriza.
// ============================================================================

use crate::models::auth::Role;
use crate::state::session_state::SessionStatus;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Rehidratación pendiente: no renderizar nada
    Pending,
    Allow,
    /// Sin sesión: ir a /login y volver a `return_to` después
    RedirectToLogin { return_to: String },
    /// Sesión válida pero sin el rol requerido
    RedirectToHome,
}

/// Guard de rutas protegidas
pub fn guard(status: &SessionStatus, required_roles: Option<&[Role]>, requested_path: &str) -> GuardDecision {
    match status {
        SessionStatus::Loading => GuardDecision::Pending,
        SessionStatus::Anonymous => GuardDecision::RedirectToLogin {
            return_to: requested_path.to_string(),
        },
        SessionStatus::Authenticated(user) => match required_roles {
            Some(roles) if !user.has_any_role(roles) => GuardDecision::RedirectToHome,
            _ => GuardDecision::Allow,
        },
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicDecision {
    Pending,
    Allow,
    Redirect(String),
}

/// Guard inverso para páginas públicas (login): con sesión, afuera
pub fn public_only_guard(status: &SessionStatus, default_route: &str) -> PublicDecision {
    match status {
        SessionStatus::Loading => PublicDecision::Pending,
        SessionStatus::Anonymous => PublicDecision::Allow,
        SessionStatus::Authenticated(_) => PublicDecision::Redirect(default_route.to_string()),
    }
}

/// Destino post-login: el path recordado, salvo que sea el propio login
pub fn post_login_target(return_to: Option<&str>, default_route: &str) -> String {
    match return_to.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) if !path.starts_with("/login") => path.to_string(),
        _ => default_route.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::User;
    use crate::routing::route::Route;
    use crate::state::session_state::SessionStore;
    use crate::utils::jwt::encode_test_token;
    use crate::utils::storage::MemoryStorage;
    use crate::utils::STORAGE_KEY_TOKEN;
    use serde_json::json;
    use std::rc::Rc;

    fn user(role: Role) -> SessionStatus {
        SessionStatus::Authenticated(User { id: "u1".into(), username: "u".into(), role })
    }

    #[test]
    fn loading_renders_nothing() {
        assert_eq!(guard(&SessionStatus::Loading, None, "/patients"), GuardDecision::Pending);
        assert_eq!(public_only_guard(&SessionStatus::Loading, "/"), PublicDecision::Pending);
    }

    #[test]
    fn anonymous_goes_to_login_remembering_path() {
        assert_eq!(
            guard(&SessionStatus::Anonymous, Some(&[Role::Admin]), "/admin/users"),
            GuardDecision::RedirectToLogin { return_to: "/admin/users".into() }
        );
    }

    #[test]
    fn viewer_on_admin_route_goes_home() {
        let route = Route::AdminUsers;
        assert_eq!(
            guard(&user(Role::Viewer), route.required_roles(), &route.path()),
            GuardDecision::RedirectToHome
        );
    }

    #[test]
    fn authenticated_without_requirements_is_allowed() {
        assert_eq!(guard(&user(Role::Viewer), None, "/"), GuardDecision::Allow);
    }

    #[test]
    fn public_only_redirects_logged_in_users() {
        assert_eq!(public_only_guard(&user(Role::Medico), "/"), PublicDecision::Redirect("/".into()));
        assert_eq!(public_only_guard(&SessionStatus::Anonymous, "/"), PublicDecision::Allow);
    }

    #[test]
    fn post_login_target_defaults() {
        assert_eq!(post_login_target(Some("/patients"), "/"), "/patients");
        assert_eq!(post_login_target(Some("/login"), "/"), "/");
        assert_eq!(post_login_target(None, "/"), "/");
    }

    #[test]
    fn stored_medico_token_opens_clinical_routes() {
        let now = 1_700_000_000;
        let token = encode_test_token(&json!({
            "sub": "u1", "username": "doc1", "role": "medico", "exp": now + 3600
        }));
        let store = SessionStore::new(Rc::new(MemoryStorage::with_item(STORAGE_KEY_TOKEN, &token)));

        let status = store.rehydrate_at(now);
        assert_eq!(
            store.user(),
            Some(User { id: "u1".into(), username: "doc1".into(), role: Role::Medico })
        );
        let route = Route::Patients;
        assert_eq!(guard(&status, route.required_roles(), &route.path()), GuardDecision::Allow);
    }
}
