// ============================================================================
// SESSION VIEWMODEL - Login / logout
// ============================================================================
// El formulario vive acá; el resultado del login lo aplica el SessionStore.
// ============================================================================

use crate::error::AppError;
use crate::models::auth::{LoginRequest, User};
use crate::services::{ApiClient, AuthService};
use crate::state::fetch_state::InFlight;
use crate::state::reactivity::ReactiveState;
use crate::state::session_state::SessionStore;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub remember: bool,
}

impl LoginForm {
    pub fn to_request(&self) -> Result<LoginRequest, AppError> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(AppError::Validation("Ingrese usuario y contraseña".to_string()));
        }
        Ok(LoginRequest {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Clone)]
pub struct SessionViewModel {
    session: SessionStore,
    auth: AuthService,
    pub form: ReactiveState<LoginForm>,
    in_flight: InFlight,
}

impl SessionViewModel {
    pub fn new(session: SessionStore) -> Self {
        let remembered = session.remembered_username();
        let form = LoginForm {
            remember: remembered.is_some(),
            username: remembered.unwrap_or_default(),
            password: String::new(),
        };
        Self {
            auth: AuthService::new(ApiClient::new(session.clone())),
            session,
            form: ReactiveState::new(form),
            in_flight: InFlight::new(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Login. Un segundo submit mientras hay uno en curso se ignora (Cancelled).
    pub async fn login(&self) -> Result<User, AppError> {
        if !self.in_flight.begin() {
            return Err(AppError::Cancelled);
        }
        self.session.clear_error();
        // Re-render para mostrar el botón deshabilitado
        self.form.update(|_| {});

        let form = self.form.get();
        let result = match form.to_request() {
            Ok(request) => self.auth.login(&request).await,
            Err(e) => Err(e),
        };
        let outcome = self.session.complete_login(result, chrono::Utc::now().timestamp());

        if outcome.is_ok() {
            self.session
                .remember_username(form.remember.then_some(form.username.as_str()));
        }
        self.form.update_silent(|f| f.password.clear());
        self.in_flight.finish();
        self.form.update(|_| {});
        outcome
    }

    pub fn logout(&self) {
        self.session.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credentials_are_rejected_before_any_request() {
        let form = LoginForm { username: "  ".into(), password: "x".into(), remember: false };
        assert!(matches!(form.to_request(), Err(AppError::Validation(_))));
        let form = LoginForm { username: "doc".into(), password: String::new(), remember: false };
        assert!(form.to_request().is_err());
    }

    #[test]
    fn username_is_trimmed() {
        let form = LoginForm { username: " doc1 ".into(), password: "secret".into(), remember: true };
        let request = form.to_request().unwrap();
        assert_eq!(request.username, "doc1");
        assert_eq!(request.password, "secret");
    }
}
