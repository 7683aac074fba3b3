use serde::{Deserialize, Serialize};
use crate::models::auth::{opt_string_or_number, string_or_number};

/// Episodio del WebService externo del hospital (vía backend)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExternalEpisode {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub fecha_ingreso: String,
    #[serde(default)]
    pub fecha_egreso: Option<String>,
    #[serde(default)]
    pub servicio: Option<String>,
    #[serde(default)]
    pub diagnostico: Option<String>,
    /// true si ya fue importado anteriormente
    #[serde(default)]
    pub importado: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct HceImportRequest {
    pub patient_id: String,
    pub episode_id: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HceImportResult {
    #[serde(default)]
    pub imported_entries: usize,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub epc_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Entrada individual de la historia clínica
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HceEntry {
    /// Fecha ISO (`2024-03-01T10:30:00`, con o sin zona) o solo fecha
    pub fecha: String,
    #[serde(default = "default_tipo")]
    pub tipo: String,
    #[serde(default)]
    pub autor: Option<String>,
    #[serde(default)]
    pub texto: String,
    #[serde(default)]
    pub seccion: Option<String>,
}

fn default_tipo() -> String {
    "Nota".to_string()
}

/// Internación con sus evoluciones anidadas
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HceAdmission {
    #[serde(default)]
    pub fecha_ingreso: Option<String>,
    #[serde(default)]
    pub servicio: Option<String>,
    #[serde(default)]
    pub entries: Vec<HceEntry>,
}

/// Historia clínica completa de un paciente
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HceHistory {
    #[serde(deserialize_with = "string_or_number")]
    pub patient_id: String,
    #[serde(default)]
    pub admissions: Vec<HceAdmission>,
    /// Entradas sueltas no asociadas a una internación
    #[serde(default)]
    pub entries: Vec<HceEntry>,
}

impl HceHistory {
    pub fn all_entries(&self) -> impl Iterator<Item = &HceEntry> {
        self.admissions
            .iter()
            .flat_map(|a| a.entries.iter())
            .chain(self.entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_result_accepts_numeric_epc_id() {
        let result: HceImportResult = serde_json::from_str(r#"{"imported_entries": 4, "epc_id": 17}"#).unwrap();
        assert_eq!(result.epc_id.as_deref(), Some("17"));

        let result: HceImportResult = serde_json::from_str(r#"{"epc_id": "e-9"}"#).unwrap();
        assert_eq!(result.epc_id.as_deref(), Some("e-9"));
        assert_eq!(result.imported_entries, 0);

        let result: HceImportResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result.epc_id, None);
    }
}
