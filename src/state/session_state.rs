// ============================================================================
// SESSION STATE - Fuente única de "quién está logueado y con qué rol"
// ============================================================================
// Se crea explícitamente en App::new() y se inyecta a quien lo necesite.
// Ciclo: Loading -> {Authenticated, Anonymous}; login/logout alternan entre
// ambos. Solo rehydrate() sale de Loading.
// ============================================================================

use std::rc::Rc;
use crate::error::AppError;
use crate::models::auth::{TokenResponse, User};
use crate::state::reactivity::ReactiveState;
use crate::utils::jwt::decode_valid_claims;
use crate::utils::storage::TokenStorage;
use crate::utils::{STORAGE_KEY_REMEMBERED_USERNAME, STORAGE_KEY_TOKEN};

/// Estado derivado que consumen los guards
#[derive(Clone, Debug, PartialEq)]
pub enum SessionStatus {
    Loading,
    Authenticated(User),
    Anonymous,
}

/// Datos de la sesión. `user` presente sii `token` presente y vigente.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            token: None,
            user: None,
            loading: true,
            error: None,
        }
    }
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        if self.loading {
            return SessionStatus::Loading;
        }
        match (&self.token, &self.user) {
            (Some(_), Some(user)) => SessionStatus::Authenticated(user.clone()),
            _ => SessionStatus::Anonymous,
        }
    }

    fn anonymous(error: Option<String>) -> Self {
        Self { token: None, user: None, loading: false, error }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn TokenStorage>,
    state: ReactiveState<Session>,
}

impl SessionStore {
    /// Nueva sesión en estado Loading (falta rehidratar)
    pub fn new(storage: Rc<dyn TokenStorage>) -> Self {
        Self {
            storage,
            state: ReactiveState::new(Session::default()),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.get()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.with(Session::status)
    }

    pub fn token(&self) -> Option<String> {
        self.state.with(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }

    pub fn error(&self) -> Option<String> {
        self.state.with(|s| s.error.clone())
    }

    pub fn subscribe<F: Fn() + 'static>(&self, callback: F) {
        self.state.subscribe(callback);
    }

    /// Rehidratación única al arrancar, usando el reloj real
    pub fn rehydrate(&self) -> SessionStatus {
        self.rehydrate_at(chrono::Utc::now().timestamp())
    }

    /// Lee el token guardado y lo restaura si no expiró. Un token expirado
    /// o ilegible se descarta en silencio. No verifica la firma.
    pub fn rehydrate_at(&self, now_secs: i64) -> SessionStatus {
        let restored = self.storage.get(STORAGE_KEY_TOKEN).and_then(|token| {
            match decode_valid_claims(&token, now_secs) {
                Ok(claims) => Some((token, claims.to_user())),
                Err(e) => {
                    log::info!("🗑️ [SESSION] Token guardado descartado: {}", e);
                    if let Err(e) = self.storage.remove(STORAGE_KEY_TOKEN) {
                        log::warn!("⚠️ [SESSION] No se pudo limpiar el token: {}", e);
                    }
                    None
                }
            }
        });

        let session = match restored {
            Some((token, user)) => {
                log::info!("✅ [SESSION] Sesión restaurada: {} ({})", user.username, user.role);
                Session { token: Some(token), user: Some(user), loading: false, error: None }
            }
            None => Session::anonymous(None),
        };
        self.state.set(session);
        self.status()
    }

    /// Limpia el error previo antes de un nuevo intento de login
    pub fn clear_error(&self) {
        self.state.update(|s| s.error = None);
    }

    /// Aplica el resultado del request de login.
    ///
    /// Éxito: token presente y decodificable -> se persiste y se publica el
    /// usuario. Cualquier otro caso deja la sesión anónima con el mensaje
    /// del backend y sin tocar el storage.
    pub fn complete_login(
        &self,
        response: Result<TokenResponse, AppError>,
        now_secs: i64,
    ) -> Result<User, AppError> {
        let outcome = response.and_then(|resp| {
            let token = resp
                .access_token
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| {
                    AppError::Authentication("La respuesta no incluye un token de acceso".to_string())
                })?;
            let claims = decode_valid_claims(&token, now_secs).map_err(|e| match e {
                AppError::Authentication(msg) => AppError::Authentication(msg),
                other => AppError::Authentication(format!("Token inválido: {}", other)),
            })?;
            Ok((token, claims.to_user()))
        });
        // Sin token persistido no hay sesión: el error llega al formulario
        let outcome = outcome.and_then(|(token, user)| {
            self.storage.set(STORAGE_KEY_TOKEN, &token)?;
            Ok((token, user))
        });

        match outcome {
            Ok((token, user)) => {
                log::info!("✅ [SESSION] Login exitoso: {} ({})", user.username, user.role);
                self.state.set(Session {
                    token: Some(token),
                    user: Some(user.clone()),
                    loading: false,
                    error: None,
                });
                Ok(user)
            }
            Err(e) => {
                let message = e.user_message();
                log::warn!("❌ [SESSION] Login rechazado: {}", message);
                self.state.set(Session::anonymous(Some(message)));
                Err(e)
            }
        }
    }

    /// Cierra la sesión: limpia storage y estado. Sin request al backend.
    pub fn logout(&self) {
        if let Err(e) = self.storage.remove(STORAGE_KEY_TOKEN) {
            log::warn!("⚠️ [SESSION] Error limpiando token: {}", e);
        }
        log::info!("👋 [SESSION] Logout");
        self.state.set(Session::anonymous(None));
    }

    /// El backend rechazó el token (401) en un request autenticado
    pub fn expire(&self, message: &str) {
        if self.token().is_none() {
            return;
        }
        if let Err(e) = self.storage.remove(STORAGE_KEY_TOKEN) {
            log::warn!("⚠️ [SESSION] Error limpiando token: {}", e);
        }
        log::warn!("⏰ [SESSION] Token rechazado por el backend: {}", message);
        self.state.set(Session::anonymous(Some("La sesión expiró. Ingrese nuevamente.".to_string())));
    }

    pub fn remembered_username(&self) -> Option<String> {
        self.storage.get(STORAGE_KEY_REMEMBERED_USERNAME)
    }

    /// Recuerda (o olvida) el usuario del formulario de login
    pub fn remember_username(&self, username: Option<&str>) {
        let result = match username.map(str::trim).filter(|u| !u.is_empty()) {
            Some(u) => self.storage.set(STORAGE_KEY_REMEMBERED_USERNAME, u),
            None => self.storage.remove(STORAGE_KEY_REMEMBERED_USERNAME),
        };
        if let Err(e) = result {
            log::warn!("⚠️ [SESSION] {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use crate::utils::jwt::encode_test_token;
    use crate::utils::storage::MemoryStorage;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn token(role: &str, exp: i64) -> String {
        encode_test_token(&json!({"sub": "u1", "username": "doc1", "role": role, "exp": exp}))
    }

    fn store_with(storage: &MemoryStorage) -> SessionStore {
        SessionStore::new(Rc::new(storage.clone()))
    }

    #[test]
    fn starts_loading() {
        let store = store_with(&MemoryStorage::new());
        assert_eq!(store.status(), SessionStatus::Loading);
    }

    #[test]
    fn rehydrate_with_valid_token_restores_user() {
        let storage = MemoryStorage::with_item(STORAGE_KEY_TOKEN, &token("medico", NOW + 3600));
        let store = store_with(&storage);

        let status = store.rehydrate_at(NOW);
        let expected = User { id: "u1".into(), username: "doc1".into(), role: Role::Medico };
        assert_eq!(status, SessionStatus::Authenticated(expected));
        assert!(store.token().is_some());
    }

    #[test]
    fn rehydrate_with_expired_token_discards_it() {
        let storage = MemoryStorage::with_item(STORAGE_KEY_TOKEN, &token("admin", NOW - 1));
        let store = store_with(&storage);

        assert_eq!(store.rehydrate_at(NOW), SessionStatus::Anonymous);
        assert!(storage.get(STORAGE_KEY_TOKEN).is_none());
        assert!(store.error().is_none());
    }

    #[test]
    fn rehydrate_with_garbage_token_is_anonymous() {
        let storage = MemoryStorage::with_item(STORAGE_KEY_TOKEN, "basura");
        let store = store_with(&storage);
        assert_eq!(store.rehydrate_at(NOW), SessionStatus::Anonymous);
        assert!(storage.is_empty());
    }

    #[test]
    fn login_success_persists_token() {
        let storage = MemoryStorage::new();
        let store = store_with(&storage);
        store.rehydrate_at(NOW);

        let tok = token("admin", NOW + 60);
        let resp = TokenResponse { access_token: Some(tok.clone()), token_type: Some("bearer".into()) };
        let user = store.complete_login(Ok(resp), NOW).unwrap();

        assert_eq!(user.role, Role::Admin);
        assert_eq!(storage.get(STORAGE_KEY_TOKEN), Some(tok));
        assert!(matches!(store.status(), SessionStatus::Authenticated(_)));
    }

    #[test]
    fn login_rejected_keeps_anonymous_and_shows_backend_detail() {
        let storage = MemoryStorage::new();
        let store = store_with(&storage);
        store.rehydrate_at(NOW);

        let rejected = AppError::from_status(401, r#"{"detail": "Usuario o contraseña incorrectos"}"#);
        assert!(store.complete_login(Err(rejected), NOW).is_err());

        assert_eq!(store.status(), SessionStatus::Anonymous);
        assert_eq!(store.error().as_deref(), Some("Usuario o contraseña incorrectos"));
        assert!(storage.is_empty());
    }

    #[test]
    fn login_without_token_field_is_an_auth_error() {
        let storage = MemoryStorage::new();
        let store = store_with(&storage);
        store.rehydrate_at(NOW);

        let resp = TokenResponse { access_token: None, token_type: None };
        let err = store.complete_login(Ok(resp), NOW).unwrap_err();
        assert!(err.is_unauthorized());
        assert!(storage.get(STORAGE_KEY_TOKEN).is_none());
    }

    #[test]
    fn logout_clears_storage_and_state() {
        let storage = MemoryStorage::with_item(STORAGE_KEY_TOKEN, &token("viewer", NOW + 60));
        let store = store_with(&storage);
        store.rehydrate_at(NOW);

        store.logout();
        assert_eq!(store.status(), SessionStatus::Anonymous);
        assert!(storage.get(STORAGE_KEY_TOKEN).is_none());
    }

    /// localStorage lleno o bloqueado
    struct ReadOnlyStorage(Option<String>);

    impl TokenStorage for ReadOnlyStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.0.clone().filter(|_| key == STORAGE_KEY_TOKEN)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), AppError> {
            Err(AppError::Storage("Error guardando en localStorage".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), AppError> {
            Err(AppError::Storage("Error borrando de localStorage".to_string()))
        }
    }

    #[test]
    fn login_with_failing_storage_shows_error() {
        let store = SessionStore::new(Rc::new(ReadOnlyStorage(None)));
        store.rehydrate_at(NOW);

        let resp = TokenResponse { access_token: Some(token("medico", NOW + 60)), token_type: None };
        let result = store.complete_login(Ok(resp), NOW);

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(store.status(), SessionStatus::Anonymous);
        assert_eq!(store.error().as_deref(), Some("Error guardando en localStorage"));
        assert!(store.token().is_none());
    }

    #[test]
    fn expire_with_failing_storage_still_ends_session() {
        let store = SessionStore::new(Rc::new(ReadOnlyStorage(Some(token("viewer", NOW + 60)))));
        assert!(matches!(store.rehydrate_at(NOW), SessionStatus::Authenticated(_)));
        store.expire("401");
        assert_eq!(store.status(), SessionStatus::Anonymous);
        assert!(store.error().is_some());
        assert!(store.token().is_none());
    }

    #[test]
    fn expire_sets_message_only_when_logged_in() {
        let storage = MemoryStorage::with_item(STORAGE_KEY_TOKEN, &token("viewer", NOW + 60));
        let store = store_with(&storage);
        store.rehydrate_at(NOW);
        store.expire("401");
        assert_eq!(store.status(), SessionStatus::Anonymous);
        assert!(store.error().is_some());

        store.clear_error();
        store.expire("401");
        assert!(store.error().is_none());
    }

    #[test]
    fn remembered_username_roundtrip() {
        let storage = MemoryStorage::new();
        let store = store_with(&storage);
        store.remember_username(Some(" doc1 "));
        assert_eq!(store.remembered_username().as_deref(), Some("doc1"));
        store.remember_username(None);
        assert!(store.remembered_username().is_none());
    }
}
