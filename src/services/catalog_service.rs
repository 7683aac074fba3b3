// ============================================================================
// CATALOG SERVICE - Catálogos SNOMED (solo lectura)
// ============================================================================

use web_sys::AbortSignal;
use crate::error::AppError;
use crate::models::snomed::SnomedConcept;
use crate::services::api_client::{path_segment, ApiClient};

#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
}

impl CatalogService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn snomed(&self, catalog: &str, signal: Option<&AbortSignal>) -> Result<Vec<SnomedConcept>, AppError> {
        self.api
            .get_with_signal(&format!("/catalogs/snomed/{}", path_segment(catalog)), signal)
            .await
    }
}
