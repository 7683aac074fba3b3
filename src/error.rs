// ============================================================================
// ERRORES - Taxonomía única de errores de la consola
// ============================================================================
// Todos los errores se capturan en el componente que hizo el request y se
// muestran inline. Ninguno se reintenta automáticamente.
// ============================================================================

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// Credenciales inválidas, token ausente o expirado
    #[error("error de autenticación: {0}")]
    Authentication(String),
    /// Sesión válida pero rol insuficiente
    #[error("acceso denegado: {0}")]
    Forbidden(String),
    #[error("recurso no encontrado: {0}")]
    NotFound(String),
    /// Rechazo del backend por datos inválidos (400/422)
    #[error("datos inválidos: {0}")]
    Validation(String),
    #[error("error del servidor ({status}): {message}")]
    Backend { status: u16, message: String },
    #[error("error de red: {0}")]
    Network(String),
    /// Respuesta con forma inesperada
    #[error("respuesta inválida del servidor: {0}")]
    Decode(String),
    #[error("error de almacenamiento local: {0}")]
    Storage(String),
    /// Request abortado porque sus parámetros cambiaron
    #[error("request cancelado")]
    Cancelled,
}

impl AppError {
    /// Mapea un status HTTP no exitoso + cuerpo a la variante correspondiente
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_error_message(body)
            .unwrap_or_else(|| default_status_message(status).to_string());
        match status {
            401 => AppError::Authentication(message),
            403 => AppError::Forbidden(message),
            404 => AppError::NotFound(message),
            400 | 422 => AppError::Validation(message),
            _ => AppError::Backend { status, message },
        }
    }

    /// Texto a mostrar al usuario
    pub fn user_message(&self) -> String {
        match self {
            AppError::Authentication(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg) => msg.clone(),
            AppError::Backend { message, .. } => message.clone(),
            AppError::Network(_) => {
                "No se pudo conectar con el servidor. Intente nuevamente.".to_string()
            }
            AppError::Decode(_) => "El servidor devolvió una respuesta inesperada.".to_string(),
            AppError::Storage(msg) => msg.clone(),
            AppError::Cancelled => String::new(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Authentication(_))
    }
}

fn default_status_message(status: u16) -> &'static str {
    match status {
        401 => "Sesión inválida o expirada",
        403 => "No tiene permisos para esta acción",
        404 => "No encontrado",
        400 | 422 => "Datos inválidos",
        500..=599 => "Error interno del servidor",
        _ => "Error inesperado",
    }
}

/// Extrae el mensaje del payload de error estructurado del backend.
///
/// Soporta `{"detail": "..."}` (también `message` / `error`) y la lista de
/// errores de validación por campo `{"detail": [{"loc": [...], "msg": "..."}]}`,
/// que se concatenan como `campo: mensaje; campo: mensaje`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    for key in ["detail", "message", "error"] {
        match value.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Array(items)) => {
                let parts: Vec<String> = items.iter().filter_map(field_error_message).collect();
                if !parts.is_empty() {
                    return Some(parts.join("; "));
                }
            }
            Some(Value::Object(obj)) => {
                if let Some(Value::String(s)) = obj.get("message") {
                    return Some(s.clone());
                }
            }
            _ => {}
        }
    }
    None
}

fn field_error_message(item: &Value) -> Option<String> {
    if let Value::String(s) = item {
        return Some(s.clone());
    }
    let msg = item.get("msg").or_else(|| item.get("message"))?.as_str()?;
    // loc: ["body", "apellido"] -> "apellido"
    let field = item
        .get("loc")
        .and_then(Value::as_array)
        .and_then(|loc| loc.iter().rev().find_map(|part| part.as_str()))
        .filter(|f| *f != "body");
    Some(match field {
        Some(field) => format!("{}: {}", field, msg),
        None => msg.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_detail() {
        let body = r#"{"detail": "Usuario o contraseña incorrectos"}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Usuario o contraseña incorrectos")
        );
    }

    #[test]
    fn concatenates_field_errors() {
        let body = r#"{"detail": [
            {"loc": ["body", "apellido"], "msg": "campo requerido", "type": "missing"},
            {"loc": ["body", "documento"], "msg": "formato inválido"}
        ]}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("apellido: campo requerido; documento: formato inválido")
        );
    }

    #[test]
    fn falls_back_to_message_and_error_keys() {
        assert_eq!(
            extract_error_message(r#"{"message": "Tenant inactivo"}"#).as_deref(),
            Some("Tenant inactivo")
        );
        assert_eq!(
            extract_error_message(r#"{"error": {"message": "Fallo IA"}}"#).as_deref(),
            Some("Fallo IA")
        );
        assert_eq!(extract_error_message("<html>502</html>"), None);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::from_status(401, r#"{"detail":"Credenciales inválidas"}"#),
            AppError::Authentication("Credenciales inválidas".to_string())
        );
        assert!(AppError::from_status(404, "").is_not_found());
        assert!(matches!(AppError::from_status(422, "{}"), AppError::Validation(_)));
        assert_eq!(
            AppError::from_status(503, ""),
            AppError::Backend { status: 503, message: "Error interno del servidor".to_string() }
        );
    }

    #[test]
    fn cancelled_has_no_user_message() {
        assert!(AppError::Cancelled.is_cancelled());
        assert!(AppError::Cancelled.user_message().is_empty());
    }
}
