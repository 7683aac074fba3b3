// ============================================================================
// ROUTES - Rutas de la consola (hash routing: #/patients, #/epc/12, ...)
// ============================================================================

use crate::models::auth::Role;

const CLINICAL_ROLES: &[Role] = &[Role::Admin, Role::Medico];
const ADMIN_ROLES: &[Role] = &[Role::Admin];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Patients,
    PatientNew,
    PatientEdit(String),
    /// EPC por id; `patient_id` permite el open-or-create si no existe
    Epc { id: String, patient_id: Option<String> },
    Snomed(String),
    AdminUsers,
    AdminTenants,
    AdminBranding(String),
    AdminGoldenRules,
    AdminHealth,
    AdminCosts,
    AdminFeedback,
    NotFound(String),
}

impl Route {
    /// Parsea un path (`/epc/12?patient=7`). Acepta con o sin `#`.
    pub fn parse(raw: &str) -> Route {
        let raw = raw.trim().trim_start_matches('#');
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["patients"] => Route::Patients,
            ["patients", "new"] => Route::PatientNew,
            ["patients", id] => Route::PatientEdit(id.to_string()),
            ["epc", id] => Route::Epc {
                id: id.to_string(),
                patient_id: query_param(query, "patient"),
            },
            ["snomed"] => Route::Snomed("diagnosticos".to_string()),
            ["snomed", catalog] => Route::Snomed(catalog.to_string()),
            ["admin"] | ["admin", "users"] => Route::AdminUsers,
            ["admin", "tenants"] => Route::AdminTenants,
            ["admin", "tenants", id, "branding"] => Route::AdminBranding(id.to_string()),
            ["admin", "golden-rules"] => Route::AdminGoldenRules,
            ["admin", "health"] => Route::AdminHealth,
            ["admin", "costs"] => Route::AdminCosts,
            ["admin", "feedback"] => Route::AdminFeedback,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Home => "/".to_string(),
            Route::Patients => "/patients".to_string(),
            Route::PatientNew => "/patients/new".to_string(),
            Route::PatientEdit(id) => format!("/patients/{}", id),
            Route::Epc { id, patient_id: Some(pid) } => format!("/epc/{}?patient={}", id, pid),
            Route::Epc { id, patient_id: None } => format!("/epc/{}", id),
            Route::Snomed(catalog) => format!("/snomed/{}", catalog),
            Route::AdminUsers => "/admin/users".to_string(),
            Route::AdminTenants => "/admin/tenants".to_string(),
            Route::AdminBranding(id) => format!("/admin/tenants/{}/branding", id),
            Route::AdminGoldenRules => "/admin/golden-rules".to_string(),
            Route::AdminHealth => "/admin/health".to_string(),
            Route::AdminCosts => "/admin/costs".to_string(),
            Route::AdminFeedback => "/admin/feedback".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Roles permitidos; `None` = cualquier usuario autenticado
    pub fn required_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::Patients | Route::PatientNew | Route::PatientEdit(_) | Route::Epc { .. } => {
                Some(CLINICAL_ROLES)
            }
            Route::AdminUsers
            | Route::AdminTenants
            | Route::AdminBranding(_)
            | Route::AdminGoldenRules
            | Route::AdminHealth
            | Route::AdminCosts
            | Route::AdminFeedback => Some(ADMIN_ROLES),
            _ => None,
        }
    }

    /// Rutas solo para anónimos
    pub fn is_public_only(&self) -> bool {
        matches!(self, Route::Login)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Ingresar",
            Route::Home => "Inicio",
            Route::Patients => "Pacientes",
            Route::PatientNew => "Nuevo paciente",
            Route::PatientEdit(_) => "Editar paciente",
            Route::Epc { .. } => "Epicrisis",
            Route::Snomed(_) => "Catálogos SNOMED",
            Route::AdminUsers => "Usuarios",
            Route::AdminTenants => "Instituciones",
            Route::AdminBranding(_) => "Branding",
            Route::AdminGoldenRules => "Reglas de oro",
            Route::AdminHealth => "Estado del sistema",
            Route::AdminCosts => "Costos",
            Route::AdminFeedback => "Feedback",
            Route::NotFound(_) => "No encontrado",
        }
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

/// Entradas del sidebar (se filtran por rol al renderizar)
pub fn sidebar_links() -> Vec<(Route, &'static str)> {
    vec![
        (Route::Home, "🏠"),
        (Route::Patients, "🧑‍⚕️"),
        (Route::Snomed("diagnosticos".to_string()), "📚"),
        (Route::AdminUsers, "👥"),
        (Route::AdminTenants, "🏥"),
        (Route::AdminGoldenRules, "⭐"),
        (Route::AdminHealth, "🩺"),
        (Route::AdminCosts, "💲"),
        (Route::AdminFeedback, "💬"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_path_roundtrip() {
        let routes = vec![
            Route::Login,
            Route::Home,
            Route::Patients,
            Route::PatientNew,
            Route::PatientEdit("7".into()),
            Route::Epc { id: "12".into(), patient_id: Some("7".into()) },
            Route::Epc { id: "12".into(), patient_id: None },
            Route::Snomed("medicamentos".into()),
            Route::AdminBranding("3".into()),
            Route::AdminGoldenRules,
            Route::AdminFeedback,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn parse_accepts_hash_prefix() {
        assert_eq!(Route::parse("#/patients"), Route::Patients);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("#/nada/por/aqui"), Route::NotFound("/nada/por/aqui".into()));
    }

    #[test]
    fn role_requirements() {
        assert_eq!(Route::Home.required_roles(), None);
        assert_eq!(Route::AdminHealth.required_roles(), Some(ADMIN_ROLES));
        assert!(Route::Patients.required_roles().unwrap().contains(&Role::Medico));
        assert!(Route::Login.is_public_only());
    }
}
