// ============================================================================
// SERVICES - SOLO comunicación HTTP (sin lógica de UI)
// ============================================================================

pub mod api_client;
pub mod auth_service;
pub mod patient_service;
pub mod epc_service;
pub mod hce_service;
pub mod admin_service;
pub mod catalog_service;

pub use api_client::ApiClient;
pub use auth_service::AuthService;
pub use patient_service::PatientService;
pub use epc_service::EpcService;
pub use hce_service::HceService;
pub use admin_service::AdminService;
pub use catalog_service::CatalogService;
