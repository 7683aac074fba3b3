use serde::{Deserialize, Serialize};
use crate::models::auth::{opt_string_or_number, string_or_number};
use crate::models::patient::Patient;

/// Documento de epicrisis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Epc {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub admission_id: Option<String>,
    #[serde(default = "default_estado")]
    pub estado: String,
    #[serde(default)]
    pub fecha_ingreso: Option<String>,
    #[serde(default)]
    pub fecha_egreso: Option<String>,
    #[serde(default)]
    pub servicio: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub medico_responsable_id: Option<String>,
    #[serde(default)]
    pub motivo_internacion: Option<String>,
    #[serde(default)]
    pub diagnostico_principal: Option<String>,
    #[serde(default)]
    pub evolucion: Option<String>,
    #[serde(default)]
    pub indicaciones_alta: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_estado() -> String {
    "borrador".to_string()
}

/// Internación asociada a la EPC
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Admission {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub fecha_ingreso: Option<String>,
    #[serde(default)]
    pub fecha_egreso: Option<String>,
    #[serde(default)]
    pub servicio: Option<String>,
    #[serde(default)]
    pub cama: Option<String>,
    #[serde(default)]
    pub diagnostico_ingreso: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub medico_responsable_id: Option<String>,
}

/// Secciones extraídas por la generación IA ("structured")
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSections {
    #[serde(default)]
    pub fecha_ingreso: Option<String>,
    #[serde(default)]
    pub fecha_egreso: Option<String>,
    #[serde(default)]
    pub servicio: Option<String>,
    #[serde(default)]
    pub motivo_internacion: Option<String>,
    #[serde(default)]
    pub diagnostico_principal: Option<String>,
    #[serde(default)]
    pub evolucion: Option<String>,
    #[serde(default)]
    pub indicaciones_alta: Option<String>,
    #[serde(default)]
    pub procedimientos: Vec<String>,
    #[serde(default)]
    pub medicacion: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructuredContent {
    pub structured: GeneratedSections,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

/// Snapshot del contenido generado. El backend devuelve un objeto con
/// `structured`, un texto plano, o nada (EPC nunca generada).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedContent {
    Structured(StructuredContent),
    Plain(String),
    Empty(EmptyContent),
}

/// Solo `{}`: un objeto con otras claves no es "nunca generada"
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyContent {}

impl GeneratedContent {
    pub fn sections(&self) -> Option<&GeneratedSections> {
        match self {
            GeneratedContent::Structured(c) => Some(&c.structured),
            _ => None,
        }
    }

    pub fn plain_text(&self) -> Option<&str> {
        match self {
            GeneratedContent::Plain(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            GeneratedContent::Structured(_) => false,
            GeneratedContent::Plain(s) => s.trim().is_empty(),
            GeneratedContent::Empty(_) => true,
        }
    }
}

/// Profesional asignable como responsable
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub especialidad: Option<String>,
}

/// Bundle de contexto de `/epc/{id}/context`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpcContext {
    pub epc: Epc,
    #[serde(default)]
    pub patient: Option<Patient>,
    #[serde(default)]
    pub admission: Option<Admission>,
    #[serde(default)]
    pub generated: Option<GeneratedContent>,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
}

impl EpcContext {
    pub fn structured(&self) -> Option<&GeneratedSections> {
        self.generated.as_ref().and_then(GeneratedContent::sections)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OpenEpcRequest {
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_id: Option<String>,
}

/// Respuesta de open-or-create
#[derive(Clone, Debug, Deserialize)]
pub struct OpenEpcResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub created: bool,
}

/// Subconjunto editable que se envía en el PATCH
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EpcPatch {
    pub fecha_ingreso: Option<String>,
    pub fecha_egreso: Option<String>,
    pub servicio: Option<String>,
    pub medico_responsable_id: Option<String>,
    pub motivo_internacion: Option<String>,
    pub diagnostico_principal: Option<String>,
    pub evolucion: Option<String>,
    pub indicaciones_alta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_content_variants_decode() {
        let structured: GeneratedContent = serde_json::from_str(
            r#"{"structured": {"diagnostico_principal": "Neumonía"}, "model": "m1"}"#,
        )
        .unwrap();
        assert_eq!(
            structured.sections().unwrap().diagnostico_principal.as_deref(),
            Some("Neumonía")
        );

        let plain: GeneratedContent = serde_json::from_str(r#""Paciente de 70 años...""#).unwrap();
        assert_eq!(plain.plain_text(), Some("Paciente de 70 años..."));

        let empty: GeneratedContent = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn object_without_structured_is_a_decode_error() {
        let result = serde_json::from_str::<GeneratedContent>(r#"{"resumen": "texto", "model": "m1"}"#);
        assert!(result.is_err());

        let json = r#"{"epc": {"id": 3, "patient_id": "p1"}, "generated": {"sections": {}}}"#;
        assert!(serde_json::from_str::<EpcContext>(json).is_err());
    }

    #[test]
    fn context_decodes_with_missing_parts() {
        let json = r#"{"epc": {"id": 3, "patient_id": "p1"}, "staff": []}"#;
        let ctx: EpcContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.epc.id, "3");
        assert_eq!(ctx.epc.estado, "borrador");
        assert!(ctx.structured().is_none());
    }

    #[test]
    fn malformed_context_fails_fast() {
        let json = r#"{"epc": {"patient_id": "p1"}}"#;
        assert!(serde_json::from_str::<EpcContext>(json).is_err());
    }
}
