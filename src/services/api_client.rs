// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP
// ============================================================================
// Adjunta el bearer token de la sesión en cada request y mapea los status
// no exitosos a AppError. Un 401 con sesión activa expira la sesión; el
// guard se encarga de mandar al usuario al login.
// ============================================================================

use gloo_net::http::{Request, RequestBuilder, Response};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::AbortSignal;
use crate::config::CONFIG;
use crate::error::AppError;
use crate::state::session_state::SessionStore;

// Caracteres que viajan sin escapar en un valor de query
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Cliente API (barato de clonar, comparte la sesión)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(session: SessionStore) -> Self {
        Self::with_base_url(CONFIG.backend_url(), session)
    }

    pub fn with_base_url(base_url: &str, session: SessionStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.get_with_signal(path, None).await
    }

    /// GET abortable (listados con cancelación)
    pub async fn get_with_signal<T: DeserializeOwned>(
        &self,
        path: &str,
        signal: Option<&AbortSignal>,
    ) -> Result<T, AppError> {
        let request = self
            .prepare(Request::get(&self.url(path)))
            .abort_signal(signal)
            .build()
            .map_err(|e| AppError::Network(format!("Request inválido: {}", e)))?;
        let response = self.execute(request, signal).await?;
        decode_response(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, AppError> {
        let request = self
            .prepare(Request::post(&self.url(path)))
            .json(body)
            .map_err(|e| AppError::Decode(format!("Body no serializable: {}", e)))?;
        let response = self.execute(request, None).await?;
        decode_response(response).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, AppError> {
        let request = self
            .prepare(Request::put(&self.url(path)))
            .json(body)
            .map_err(|e| AppError::Decode(format!("Body no serializable: {}", e)))?;
        let response = self.execute(request, None).await?;
        decode_response(response).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, AppError> {
        let request = self
            .prepare(Request::patch(&self.url(path)))
            .json(body)
            .map_err(|e| AppError::Decode(format!("Body no serializable: {}", e)))?;
        let response = self.execute(request, None).await?;
        decode_response(response).await
    }

    /// DELETE: el cuerpo de la respuesta (si hay) se ignora
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        let request = self
            .prepare(Request::delete(&self.url(path)))
            .build()
            .map_err(|e| AppError::Network(format!("Request inválido: {}", e)))?;
        self.execute(request, None).await.map(|_| ())
    }

    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match self.session.token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn execute(&self, request: Request, signal: Option<&AbortSignal>) -> Result<Response, AppError> {
        let method = request.method();
        let url = request.url();
        log::debug!("🌐 [API] {:?} {}", method, url);

        let response = request.send().await.map_err(|e| {
            if signal.map(AbortSignal::aborted).unwrap_or(false) {
                AppError::Cancelled
            } else {
                AppError::Network(e.to_string())
            }
        })?;

        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let error = AppError::from_status(status, &body);
        log::warn!("❌ [API] {:?} {} -> {}: {}", method, url, status, error);

        if status == 401 {
            self.session.expire(&error.user_message());
        }
        Err(error)
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let text = response
        .text()
        .await
        .map_err(|e| AppError::Network(format!("Error leyendo respuesta: {}", e)))?;
    decode_body(&text)
}

/// Decodifica el cuerpo JSON. Un cuerpo vacío se trata como `null`.
pub fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, AppError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| AppError::Decode(e.to_string()))
}

/// Agrega una query string al path, omitiendo parámetros vacíos
pub fn with_query(path: &str, params: &[(&str, String)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| format!("{}={}", key, utf8_percent_encode(value.trim(), QUERY_VALUE)))
        .collect();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}

/// Escapa un segmento de path (ids provenientes de la URL)
pub fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::epc::GenerateResponse;
    use serde_json::Value;

    #[test]
    fn query_skips_blank_params_and_escapes() {
        let path = with_query(
            "/patients",
            &[
                ("page", "2".to_string()),
                ("page_size", "20".to_string()),
                ("q", "pérez & co".to_string()),
                ("estado", "  ".to_string()),
            ],
        );
        assert_eq!(path, "/patients?page=2&page_size=20&q=p%C3%A9rez%20%26%20co");
    }

    #[test]
    fn query_without_params_keeps_path() {
        assert_eq!(with_query("/admin/costs", &[("desde", String::new())]), "/admin/costs");
    }

    #[test]
    fn path_segment_escapes_slashes() {
        assert_eq!(path_segment("a/b"), "a%2Fb");
        assert_eq!(path_segment("12"), "12");
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let value: Option<GenerateResponse> = decode_body("").unwrap();
        assert!(value.is_none());
        let value: Value = decode_body("  ").unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let result: Result<Vec<String>, AppError> = decode_body("{\"a\":");
        assert!(matches!(result, Err(AppError::Decode(_))));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let session = SessionStore::new(std::rc::Rc::new(crate::utils::MemoryStorage::new()));
        let api = ApiClient::with_base_url("http://localhost:8000/", session);
        assert_eq!(api.url("/patients"), "http://localhost:8000/patients");
    }
}
