/// Clave de localStorage del bearer token
pub const STORAGE_KEY_TOKEN: &str = "epc_admin_token";

/// Clave del usuario recordado en el login (conveniencia, opcional)
pub const STORAGE_KEY_REMEMBERED_USERNAME: &str = "epc_admin_remembered_username";

/// ID del elemento raíz en index.html
pub const ROOT_ELEMENT_ID: &str = "app";

/// Rutas fijas
pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Estado que el backend asigna a una EPC finalizada
pub const EPC_ESTADO_FINALIZADA: &str = "finalizada";

/// Catálogos SNOMED disponibles
pub const SNOMED_CATALOGS: [(&str, &str); 3] = [
    ("diagnosticos", "Diagnósticos"),
    ("procedimientos", "Procedimientos"),
    ("medicamentos", "Medicamentos"),
];
