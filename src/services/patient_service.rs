// ============================================================================
// PATIENT SERVICE - Listado paginado en servidor + ABM
// ============================================================================

use web_sys::AbortSignal;
use crate::error::AppError;
use crate::models::patient::{Patient, PatientInput, PatientPage};
use crate::services::api_client::{path_segment, with_query, ApiClient};
use crate::state::list_state::ListViewState;

/// Filtro de estado del listado de pacientes
pub const ESTADO_FILTER: &str = "estado";

#[derive(Clone)]
pub struct PatientService {
    api: ApiClient,
}

impl PatientService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &ListViewState, signal: Option<&AbortSignal>) -> Result<PatientPage, AppError> {
        self.api.get_with_signal(&list_path(query), signal).await
    }

    pub async fn get(&self, id: &str) -> Result<Patient, AppError> {
        self.api.get(&format!("/patients/{}", path_segment(id))).await
    }

    pub async fn create(&self, input: &PatientInput) -> Result<Patient, AppError> {
        log::info!("➕ [PATIENTS] Creando paciente {} {}", input.nombre, input.apellido);
        self.api.post("/patients", input).await
    }

    pub async fn update(&self, id: &str, input: &PatientInput) -> Result<Patient, AppError> {
        log::info!("✏️ [PATIENTS] Actualizando paciente {}", id);
        self.api.put(&format!("/patients/{}", path_segment(id)), input).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        log::info!("🗑️ [PATIENTS] Eliminando paciente {}", id);
        self.api.delete(&format!("/patients/{}", path_segment(id))).await
    }
}

/// `/patients?page&page_size&q&estado` a partir del estado del listado
pub fn list_path(query: &ListViewState) -> String {
    with_query(
        "/patients",
        &[
            ("page", query.page().to_string()),
            ("page_size", query.page_size().to_string()),
            ("q", query.search().to_string()),
            ("estado", query.filter(ESTADO_FILTER).unwrap_or_default().to_string()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_path_reflects_query_state() {
        let mut query = ListViewState::new(20);
        query.set_search("gomez");
        query.set_filter(ESTADO_FILTER, "internado");
        query.set_page(2);
        assert_eq!(list_path(&query), "/patients?page=2&page_size=20&q=gomez&estado=internado");
    }

    #[test]
    fn list_path_omits_empty_search() {
        let query = ListViewState::new(50);
        assert_eq!(list_path(&query), "/patients?page=1&page_size=50");
    }
}
