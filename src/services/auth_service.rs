// ============================================================================
// AUTH SERVICE - Login contra el backend
// ============================================================================

use crate::error::AppError;
use crate::models::auth::{LoginRequest, TokenResponse};
use crate::services::api_client::ApiClient;

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// POST /auth/login. No hay logout en el backend: el token se descarta localmente.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AppError> {
        log::info!("🔐 [AUTH] Login para usuario: {}", request.username);
        self.api.post("/auth/login", request).await
    }
}
