use serde::{Deserialize, Serialize};
use crate::models::auth::string_or_number;

/// Paciente tal como lo devuelve el backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    #[serde(default)]
    pub documento: Option<String>,
    #[serde(default)]
    pub fecha_nacimiento: Option<String>,
    #[serde(default)]
    pub sexo: Option<String>,
    #[serde(default)]
    pub obra_social: Option<String>,
    #[serde(default)]
    pub nro_historia: Option<String>,
    /// "internado" | "alta" | ... (lo define el backend)
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.apellido.trim(), self.nombre.trim())
    }
}

/// Página de pacientes (paginación del lado del servidor)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientPage {
    pub items: Vec<Patient>,
    pub total: usize,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default)]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

impl PatientPage {
    pub fn total_pages(&self) -> usize {
        let size = if self.page_size == 0 { self.items.len().max(1) } else { self.page_size };
        self.total.div_ceil(size).max(1)
    }
}

/// Payload de alta/edición
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    pub nombre: String,
    pub apellido: String,
    pub documento: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obra_social: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nro_historia: Option<String>,
}

impl PatientInput {
    pub fn from_patient(p: &Patient) -> Self {
        Self {
            nombre: p.nombre.clone(),
            apellido: p.apellido.clone(),
            documento: p.documento.clone().unwrap_or_default(),
            fecha_nacimiento: p.fecha_nacimiento.clone(),
            sexo: p.sexo.clone(),
            obra_social: p.obra_social.clone(),
            nro_historia: p.nro_historia.clone(),
        }
    }

    /// Validación local previa al envío. Devuelve un mensaje por campo faltante.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.nombre.trim().is_empty() {
            errors.push("nombre: campo requerido".to_string());
        }
        if self.apellido.trim().is_empty() {
            errors.push("apellido: campo requerido".to_string());
        }
        let documento = self.documento.trim();
        if documento.is_empty() {
            errors.push("documento: campo requerido".to_string());
        } else if !documento.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-') {
            errors.push("documento: solo letras, números, puntos o guiones".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_numeric_ids() {
        let json = r#"{"id": 7, "nombre": "Ana", "apellido": "Pérez", "estado": "internado"}"#;
        let p: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, "7");
        assert_eq!(p.full_name(), "Pérez, Ana");
    }

    #[test]
    fn total_pages_is_at_least_one() {
        let page = PatientPage { items: vec![], total: 0, page: 1, page_size: 20 };
        assert_eq!(page.total_pages(), 1);
        let page = PatientPage { items: vec![], total: 45, page: 1, page_size: 20 };
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn validation_lists_missing_fields() {
        let input = PatientInput { nombre: "Ana".into(), ..Default::default() };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("apellido"));

        let input = PatientInput {
            nombre: "Ana".into(),
            apellido: "Pérez".into(),
            documento: "30.123.456".into(),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }
}
