// ============================================================================
// ADMIN SERVICE - Usuarios, instituciones, branding, reglas, salud, costos
// ============================================================================

use serde::Deserialize;
use serde_json::Value;
use web_sys::AbortSignal;
use crate::error::AppError;
use crate::models::admin::{
    AdminUser, Branding, CostRow, GoldenRule, GoldenRuleInput, HealthStatus, Tenant, TenantInput, UserInput,
};
use crate::models::feedback::{FeedbackTab, FeedbackTabKind};
use crate::services::api_client::{path_segment, with_query, ApiClient};

/// `/admin/costs` responde la lista sola o envuelta en `{rows: [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum CostsPayload {
    Rows(Vec<CostRow>),
    Wrapped { rows: Vec<CostRow> },
}

#[derive(Clone)]
pub struct AdminService {
    api: ApiClient,
}

impl AdminService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    // ---------------------------------------------------------------- users

    pub async fn users(&self, signal: Option<&AbortSignal>) -> Result<Vec<AdminUser>, AppError> {
        self.api.get_with_signal("/admin/users", signal).await
    }

    pub async fn create_user(&self, input: &UserInput) -> Result<AdminUser, AppError> {
        log::info!("➕ [ADMIN] Alta de usuario {} ({})", input.username, input.role);
        self.api.post("/admin/users", input).await
    }

    pub async fn update_user(&self, id: &str, input: &UserInput) -> Result<AdminUser, AppError> {
        log::info!("✏️ [ADMIN] Actualizando usuario {} (rol {})", id, input.role);
        self.api.put(&format!("/admin/users/{}", path_segment(id)), input).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        log::info!("🗑️ [ADMIN] Baja de usuario {}", id);
        self.api.delete(&format!("/admin/users/{}", path_segment(id))).await
    }

    // -------------------------------------------------------------- tenants

    pub async fn tenants(&self, signal: Option<&AbortSignal>) -> Result<Vec<Tenant>, AppError> {
        self.api.get_with_signal("/admin/tenants", signal).await
    }

    pub async fn create_tenant(&self, input: &TenantInput) -> Result<Tenant, AppError> {
        self.api.post("/admin/tenants", input).await
    }

    pub async fn update_tenant(&self, id: &str, input: &TenantInput) -> Result<Tenant, AppError> {
        self.api.put(&format!("/admin/tenants/{}", path_segment(id)), input).await
    }

    pub async fn branding(&self, tenant_id: &str) -> Result<Branding, AppError> {
        self.api
            .get(&format!("/admin/tenants/{}/branding", path_segment(tenant_id)))
            .await
    }

    pub async fn update_branding(&self, tenant_id: &str, branding: &Branding) -> Result<Branding, AppError> {
        log::info!("🎨 [ADMIN] Guardando branding de institución {}", tenant_id);
        self.api
            .put(&format!("/admin/tenants/{}/branding", path_segment(tenant_id)), branding)
            .await
    }

    // --------------------------------------------------------- golden rules

    pub async fn golden_rules(&self, signal: Option<&AbortSignal>) -> Result<Vec<GoldenRule>, AppError> {
        self.api.get_with_signal("/admin/golden-rules", signal).await
    }

    pub async fn create_golden_rule(&self, input: &GoldenRuleInput) -> Result<GoldenRule, AppError> {
        self.api.post("/admin/golden-rules", input).await
    }

    pub async fn update_golden_rule(&self, id: &str, input: &GoldenRuleInput) -> Result<GoldenRule, AppError> {
        self.api.put(&format!("/admin/golden-rules/{}", path_segment(id)), input).await
    }

    pub async fn delete_golden_rule(&self, id: &str) -> Result<(), AppError> {
        self.api.delete(&format!("/admin/golden-rules/{}", path_segment(id))).await
    }

    // ------------------------------------------------------ health / costs

    pub async fn health(&self, signal: Option<&AbortSignal>) -> Result<Vec<HealthStatus>, AppError> {
        self.api.get_with_signal("/admin/health", signal).await
    }

    pub async fn costs(&self, desde: &str, hasta: &str, signal: Option<&AbortSignal>) -> Result<Vec<CostRow>, AppError> {
        let path = with_query(
            "/admin/costs",
            &[("desde", desde.to_string()), ("hasta", hasta.to_string())],
        );
        let payload: CostsPayload = self.api.get_with_signal(&path, signal).await?;
        Ok(match payload {
            CostsPayload::Rows(rows) | CostsPayload::Wrapped { rows } => rows,
        })
    }

    // ------------------------------------------------------------- feedback

    pub async fn feedback(&self, kind: FeedbackTabKind, signal: Option<&AbortSignal>) -> Result<FeedbackTab, AppError> {
        let raw: Value = self.api.get_with_signal(kind.endpoint(), signal).await?;
        decode_feedback(kind, raw)
    }
}

/// Cada pestaña tiene su propia forma de payload
pub fn decode_feedback(kind: FeedbackTabKind, raw: Value) -> Result<FeedbackTab, AppError> {
    let decoded = match kind {
        FeedbackTabKind::Resumen => serde_json::from_value(raw).map(FeedbackTab::Resumen),
        FeedbackTabKind::PorSeccion => serde_json::from_value(raw).map(FeedbackTab::PorSeccion),
        FeedbackTabKind::Comentarios => serde_json::from_value(raw).map(FeedbackTab::Comentarios),
    };
    decoded.map_err(|e| AppError::Decode(format!("{}: {}", kind.label(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feedback_payloads_decode_per_tab() {
        let summary = decode_feedback(
            FeedbackTabKind::Resumen,
            json!({"total_epcs": 10, "con_feedback": 4, "puntaje_promedio": 4.5}),
        )
        .unwrap();
        assert_eq!(summary.kind(), FeedbackTabKind::Resumen);

        let sections = decode_feedback(
            FeedbackTabKind::PorSeccion,
            json!([{"seccion": "evolucion", "evaluaciones": 3}]),
        )
        .unwrap();
        assert!(matches!(sections, FeedbackTab::PorSeccion(ref rows) if rows.len() == 1));
    }

    #[test]
    fn feedback_shape_mismatch_is_decode_error() {
        let result = decode_feedback(FeedbackTabKind::Comentarios, json!({"total_epcs": 1}));
        assert!(matches!(result, Err(AppError::Decode(_))));
    }

    #[test]
    fn costs_payload_accepts_both_shapes() {
        let row = json!({"fecha": "2024-05-01", "modelo": "m", "costo_usd": 1.5});
        let plain: CostsPayload = serde_json::from_value(json!([row.clone()])).unwrap();
        let wrapped: CostsPayload = serde_json::from_value(json!({"rows": [row]})).unwrap();
        for payload in [plain, wrapped] {
            let rows = match payload {
                CostsPayload::Rows(rows) | CostsPayload::Wrapped { rows } => rows,
            };
            assert_eq!(rows.len(), 1);
        }
    }
}
