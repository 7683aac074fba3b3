// ============================================================================
// EPC SERVICE - Documento, contexto, guardado, generación IA e impresión
// ============================================================================

use crate::error::AppError;
use crate::models::epc::{Epc, EpcContext, EpcPatch, GenerateResponse, OpenEpcRequest, OpenEpcResponse};
use crate::services::api_client::{path_segment, ApiClient};

#[derive(Clone)]
pub struct EpcService {
    api: ApiClient,
}

impl EpcService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get(&self, id: &str) -> Result<Epc, AppError> {
        self.api.get(&format!("/epc/{}", path_segment(id))).await
    }

    /// Open-or-create: devuelve la EPC abierta del paciente o crea una nueva
    pub async fn open(&self, patient_id: &str, admission_id: Option<&str>) -> Result<OpenEpcResponse, AppError> {
        let request = OpenEpcRequest {
            patient_id: patient_id.to_string(),
            admission_id: admission_id.map(str::to_string),
        };
        self.api.post("/epc/open", &request).await
    }

    pub async fn context(&self, id: &str) -> Result<EpcContext, AppError> {
        self.api.get(&format!("/epc/{}/context", path_segment(id))).await
    }

    pub async fn patch(&self, id: &str, patch: &EpcPatch) -> Result<Epc, AppError> {
        log::info!("💾 [EPC] PATCH epc {} (estado={:?})", id, patch.estado);
        self.api.patch(&format!("/epc/{}", path_segment(id)), patch).await
    }

    /// Dispara la generación IA. Puede tardar; no hay timeout propio.
    pub async fn generate(&self, id: &str) -> Result<Option<GenerateResponse>, AppError> {
        log::info!("🤖 [EPC] Generando contenido para epc {}", id);
        self.api
            .post(&format!("/epc/{}/generate", path_segment(id)), &serde_json::json!({}))
            .await
    }

    /// Documento imprimible servido por el backend
    pub fn print_url(&self, id: &str) -> String {
        self.api.url(&format!("/epc/{}/print", path_segment(id)))
    }
}
