use serde::{Deserialize, Serialize};
use crate::models::auth::string_or_number;

/// Concepto SNOMED CT de un catálogo de referencia (solo lectura)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnomedConcept {
    #[serde(deserialize_with = "string_or_number", alias = "conceptId")]
    pub concept_id: String,
    pub term: String,
    #[serde(default, alias = "semanticTag")]
    pub semantic_tag: Option<String>,
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_camel_case_rows() {
        let row: SnomedConcept = serde_json::from_str(
            r#"{"conceptId": 233604007, "term": "Neumonía", "semanticTag": "trastorno"}"#,
        )
        .unwrap();
        assert_eq!(row.concept_id, "233604007");
        assert_eq!(row.semantic_tag.as_deref(), Some("trastorno"));
        assert!(row.active);
    }
}
