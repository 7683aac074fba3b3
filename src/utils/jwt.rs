// ============================================================================
// JWT - Decodificación del payload (SIN verificar firma)
// ============================================================================
// El payload solo se usa para mostrar identidad y ocultar rutas por rol.
// No es un límite de autorización: el backend valida la firma en cada request.
// ============================================================================

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use crate::error::AppError;
use crate::models::auth::TokenClaims;

/// Decodifica el segmento de claims de un JWT `header.payload.signature`
pub fn decode_claims(token: &str) -> Result<TokenClaims, AppError> {
    let mut parts = token.trim().split('.');
    let payload = match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_)) if !payload.is_empty() => payload,
        _ => return Err(AppError::Decode("token con formato inválido".to_string())),
    };

    // Algunos emisores agregan padding aunque base64url no lo requiera
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AppError::Decode(format!("payload no es base64url: {}", e)))?;

    serde_json::from_slice::<TokenClaims>(&bytes)
        .map_err(|e| AppError::Decode(format!("claims inválidos: {}", e)))
}

/// Claims solo si el token no expiró en `now_secs`
pub fn decode_valid_claims(token: &str, now_secs: i64) -> Result<TokenClaims, AppError> {
    let claims = decode_claims(token)?;
    if claims.is_expired(now_secs) {
        return Err(AppError::Authentication("La sesión expiró".to_string()));
    }
    Ok(claims)
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{}.{}.firma-no-verificada", header, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use serde_json::json;

    #[test]
    fn decodes_payload_without_signature_check() {
        let token = encode_test_token(&json!({
            "sub": "u1", "username": "doc1", "role": "medico", "exp": 2_000_000_000i64
        }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.username.as_deref(), Some("doc1"));
        assert_eq!(claims.role, Role::Medico);
    }

    #[test]
    fn numeric_subject_is_accepted() {
        let token = encode_test_token(&json!({"sub": 42, "role": "admin", "exp": 10}));
        assert_eq!(decode_claims(&token).unwrap().sub, "42");
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(decode_claims("no-es-un-jwt").is_err());
        assert!(decode_claims("a..c").is_err());
        assert!(decode_claims("a.%%%.c").is_err());
        let no_role = encode_test_token(&json!({"sub": "u1", "exp": 10}));
        assert!(decode_claims(&no_role).is_err());
    }

    #[test]
    fn expiry_is_checked_against_now() {
        let token = encode_test_token(&json!({"sub": "u1", "role": "viewer", "exp": 1000}));
        assert!(decode_valid_claims(&token, 999).is_ok());
        assert!(decode_valid_claims(&token, 1000).is_err());
    }
}
