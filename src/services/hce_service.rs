// ============================================================================
// HCE SERVICE - Importación desde el WebService externo + lectura
// ============================================================================

use crate::error::AppError;
use crate::models::hce::{ExternalEpisode, HceHistory, HceImportRequest, HceImportResult};
use crate::services::api_client::{path_segment, with_query, ApiClient};

#[derive(Clone)]
pub struct HceService {
    api: ApiClient,
}

impl HceService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn external_episodes(&self, patient_id: &str) -> Result<Vec<ExternalEpisode>, AppError> {
        let path = with_query("/hce/external/episodes", &[("patient_id", patient_id.to_string())]);
        self.api.get(&path).await
    }

    pub async fn import(&self, patient_id: &str, episode_id: &str) -> Result<HceImportResult, AppError> {
        log::info!("📥 [HCE] Importando episodio {} del paciente {}", episode_id, patient_id);
        let request = HceImportRequest {
            patient_id: patient_id.to_string(),
            episode_id: episode_id.to_string(),
        };
        self.api.post("/hce/import", &request).await
    }

    pub async fn history(&self, patient_id: &str) -> Result<HceHistory, AppError> {
        self.api.get(&format!("/hce/{}/history", path_segment(patient_id))).await
    }
}
