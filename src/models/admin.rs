use serde::{Deserialize, Serialize};
use crate::models::auth::{string_or_number, Role};

/// Usuario administrable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default = "default_true")]
    pub activo: bool,
    #[serde(default)]
    pub last_login: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInput {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    pub activo: bool,
    /// Solo en alta o reseteo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Hospital / institución
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default = "default_true")]
    pub activo: bool,
    #[serde(default)]
    pub ws_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantInput {
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    pub activo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ws_url: Option<String>,
}

/// Branding por tenant (impresión de EPC y encabezado)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default)]
    pub nombre_institucion: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub color_primario: Option<String>,
    #[serde(default)]
    pub pie_impresion: Option<String>,
}

impl Branding {
    pub fn validate(&self) -> Result<(), String> {
        if self.nombre_institucion.trim().is_empty() {
            return Err("nombre_institucion: campo requerido".to_string());
        }
        if let Some(color) = self.color_primario.as_deref().filter(|c| !c.is_empty()) {
            let hex = color.strip_prefix('#').unwrap_or("");
            if !(hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())) {
                return Err("color_primario: usar formato #RRGGBB".to_string());
            }
        }
        Ok(())
    }
}

/// Regla de oro que el backend inyecta en la generación IA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenRule {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub seccion: String,
    pub texto: String,
    #[serde(default = "default_true")]
    pub activa: bool,
    #[serde(default)]
    pub prioridad: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldenRuleInput {
    pub seccion: String,
    pub texto: String,
    pub activa: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prioridad: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Ok,
    #[serde(alias = "degraded")]
    Degradado,
    #[serde(alias = "down", alias = "error")]
    Caido,
}

impl ServiceState {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceState::Ok => "OK",
            ServiceState::Degradado => "Degradado",
            ServiceState::Caido => "Caído",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ServiceState::Ok => "status-ok",
            ServiceState::Degradado => "status-warn",
            ServiceState::Caido => "status-down",
        }
    }
}

/// Estado de un servicio del backend (health check)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub servicio: String,
    pub estado: ServiceState,
    #[serde(default)]
    pub latencia_ms: Option<f64>,
    #[serde(default)]
    pub detalle: Option<String>,
    #[serde(default)]
    pub checked_at: Option<String>,
}

/// Conteo por estado para el resumen del dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthSummary {
    pub ok: usize,
    pub degradado: usize,
    pub caido: usize,
}

impl HealthSummary {
    pub fn from_statuses(statuses: &[HealthStatus]) -> Self {
        statuses.iter().fold(Self::default(), |mut acc, s| {
            match s.estado {
                ServiceState::Ok => acc.ok += 1,
                ServiceState::Degradado => acc.degradado += 1,
                ServiceState::Caido => acc.caido += 1,
            }
            acc
        })
    }

    pub fn overall(&self) -> ServiceState {
        if self.caido > 0 {
            ServiceState::Caido
        } else if self.degradado > 0 {
            ServiceState::Degradado
        } else {
            ServiceState::Ok
        }
    }
}

/// Fila del dashboard de costos de generación
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub fecha: String,
    pub modelo: String,
    #[serde(default)]
    pub tokens_entrada: u64,
    #[serde(default)]
    pub tokens_salida: u64,
    #[serde(default)]
    pub costo_usd: f64,
    #[serde(default)]
    pub generaciones: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostTotals {
    pub tokens_entrada: u64,
    pub tokens_salida: u64,
    pub costo_usd: f64,
}

impl CostTotals {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a CostRow>) -> Self {
        rows.into_iter().fold(Self::default(), |mut acc, row| {
            acc.tokens_entrada += row.tokens_entrada;
            acc.tokens_salida += row.tokens_salida;
            acc.costo_usd += row.costo_usd;
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health(servicio: &str, estado: ServiceState) -> HealthStatus {
        HealthStatus { servicio: servicio.into(), estado, latencia_ms: None, detalle: None, checked_at: None }
    }

    #[test]
    fn health_summary_overall_is_worst_state() {
        let statuses = vec![
            health("db", ServiceState::Ok),
            health("llm", ServiceState::Degradado),
            health("ws", ServiceState::Ok),
        ];
        let summary = HealthSummary::from_statuses(&statuses);
        assert_eq!(summary, HealthSummary { ok: 2, degradado: 1, caido: 0 });
        assert_eq!(summary.overall(), ServiceState::Degradado);
    }

    #[test]
    fn service_state_aliases() {
        let s: HealthStatus = serde_json::from_str(r#"{"servicio":"ws","estado":"down"}"#).unwrap();
        assert_eq!(s.estado, ServiceState::Caido);
    }

    #[test]
    fn cost_totals_sum_rows() {
        let rows = vec![
            CostRow { fecha: "2024-05-01".into(), modelo: "a".into(), tokens_entrada: 10, tokens_salida: 5, costo_usd: 0.5, generaciones: None },
            CostRow { fecha: "2024-05-02".into(), modelo: "a".into(), tokens_entrada: 20, tokens_salida: 1, costo_usd: 0.25, generaciones: Some(3) },
        ];
        let totals = CostTotals::from_rows(&rows);
        assert_eq!(totals.tokens_entrada, 30);
        assert_eq!(totals.tokens_salida, 6);
        assert!((totals.costo_usd - 0.75).abs() < 1e-9);
    }

    #[test]
    fn branding_color_validation() {
        let mut b = Branding { nombre_institucion: "Hospital".into(), ..Default::default() };
        assert!(b.validate().is_ok());
        b.color_primario = Some("rojo".into());
        assert!(b.validate().is_err());
        b.color_primario = Some("#1A2b3C".into());
        assert!(b.validate().is_ok());
    }
}
