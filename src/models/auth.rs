use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Medico,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Medico => "medico",
            Role::Viewer => "viewer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Medico => "Médico",
            Role::Viewer => "Lectura",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "medico" | "médico" => Some(Role::Medico),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    pub const ALL: [Role; 3] = [Role::Admin, Role::Medico, Role::Viewer];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Sin Debug derivado: no debe terminar en logs
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Respuesta del endpoint de login. `access_token` puede faltar si el backend
/// responde 200 con otro formato; eso se trata como error de autenticación.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Claims del payload JWT
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(deserialize_with = "string_or_number")]
    pub sub: String,
    #[serde(default)]
    pub username: Option<String>,
    pub role: Role,
    pub exp: i64,
}

impl TokenClaims {
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.exp <= now_secs
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.sub.clone(),
            username: self.username.clone().unwrap_or_else(|| self.sub.clone()),
            role: self.role,
        }
    }
}

/// Identidad del usuario logueado
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

/// Id opcional que el backend puede mandar como texto o número
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrap(#[serde(deserialize_with = "string_or_number")] String);
    Ok(Option::<Wrap>::deserialize(deserializer)?.map(|w| w.0))
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_and_display() {
        assert_eq!(Role::parse(" Médico "), Some(Role::Medico));
        assert_eq!(Role::parse("root"), None);
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn user_falls_back_to_subject_for_username() {
        let claims = TokenClaims { sub: "u9".into(), username: None, role: Role::Viewer, exp: 1 };
        assert_eq!(claims.to_user().username, "u9");
    }

    #[test]
    fn login_request_debug_hides_password() {
        let req = LoginRequest { username: "doc1".into(), password: "secreta".into() };
        assert!(!format!("{:?}", req).contains("secreta"));
    }
}
