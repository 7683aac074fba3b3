// ============================================================================
// RECORDS - Columnas y ListRecord de cada tabla de la consola
// ============================================================================

use crate::models::admin::{AdminUser, CostRow, GoldenRule, HealthStatus, Tenant};
use crate::models::feedback::{FeedbackBySection, FeedbackComment};
use crate::models::snomed::SnomedConcept;
use crate::state::list_state::SortDirection;
use crate::viewmodels::list_pipeline::{FieldValue, ListRecord};

/// Columna de tabla
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    /// Dirección al ordenar por primera vez
    pub default_direction: SortDirection,
    /// Muestra un input de filtro en el encabezado
    pub filterable: bool,
}

const fn col(key: &'static str, label: &'static str, filterable: bool) -> Column {
    Column { key, label, default_direction: SortDirection::Asc, filterable }
}

/// Columnas temporales: por defecto lo más reciente primero
const fn time_col(key: &'static str, label: &'static str) -> Column {
    Column { key, label, default_direction: SortDirection::Desc, filterable: false }
}

fn joined(parts: &[Option<&str>]) -> String {
    parts.iter().flatten().copied().collect::<Vec<_>>().join(" ")
}

fn yes_no(flag: bool) -> FieldValue {
    FieldValue::text(if flag { "sí" } else { "no" })
}

// ============================================================================
// SNOMED
// ============================================================================

pub const SNOMED_COLUMNS: [Column; 3] = [
    col("concept_id", "Concept ID", false),
    col("term", "Término", false),
    col("semantic_tag", "Tag semántico", true),
];

impl ListRecord for SnomedConcept {
    fn field(&self, key: &str) -> FieldValue {
        match key {
            "concept_id" => FieldValue::text(self.concept_id.as_str()),
            "term" => FieldValue::text(self.term.as_str()),
            "semantic_tag" => FieldValue::opt_text(self.semantic_tag.as_deref()),
            "active" => yes_no(self.active),
            _ => FieldValue::Missing,
        }
    }

    fn search_haystack(&self) -> String {
        joined(&[Some(self.concept_id.as_str()), Some(self.term.as_str()), self.semantic_tag.as_deref()])
    }
}

// ============================================================================
// USUARIOS / INSTITUCIONES
// ============================================================================

pub const USER_COLUMNS: [Column; 5] = [
    col("username", "Usuario", false),
    col("nombre", "Nombre", false),
    col("role", "Rol", true),
    col("activo", "Activo", true),
    time_col("last_login", "Último ingreso"),
];

impl ListRecord for AdminUser {
    fn field(&self, key: &str) -> FieldValue {
        match key {
            "username" => FieldValue::text(self.username.as_str()),
            "nombre" => FieldValue::opt_text(self.nombre.as_deref()),
            "email" => FieldValue::opt_text(self.email.as_deref()),
            "role" => FieldValue::text(self.role.label()),
            "activo" => yes_no(self.activo),
            "last_login" => FieldValue::date(self.last_login.as_deref()),
            _ => FieldValue::Missing,
        }
    }

    fn search_haystack(&self) -> String {
        joined(&[Some(self.username.as_str()), self.nombre.as_deref(), self.email.as_deref(), Some(self.role.label())])
    }
}

pub const TENANT_COLUMNS: [Column; 4] = [
    col("nombre", "Institución", false),
    col("codigo", "Código", false),
    col("activo", "Activa", true),
    col("ws_url", "WebService HCE", false),
];

impl ListRecord for Tenant {
    fn field(&self, key: &str) -> FieldValue {
        match key {
            "nombre" => FieldValue::text(self.nombre.as_str()),
            "codigo" => FieldValue::opt_text(self.codigo.as_deref()),
            "activo" => yes_no(self.activo),
            "ws_url" => FieldValue::opt_text(self.ws_url.as_deref()),
            _ => FieldValue::Missing,
        }
    }

    fn search_haystack(&self) -> String {
        joined(&[Some(self.nombre.as_str()), self.codigo.as_deref()])
    }
}

// ============================================================================
// REGLAS DE ORO
// ============================================================================

pub const GOLDEN_RULE_COLUMNS: [Column; 5] = [
    col("seccion", "Sección", true),
    col("texto", "Regla", false),
    col("activa", "Activa", true),
    col("prioridad", "Prioridad", false),
    time_col("updated_at", "Actualizada"),
];

impl ListRecord for GoldenRule {
    fn field(&self, key: &str) -> FieldValue {
        match key {
            "seccion" => FieldValue::text(self.seccion.as_str()),
            "texto" => FieldValue::text(self.texto.as_str()),
            "activa" => yes_no(self.activa),
            "prioridad" => FieldValue::number(self.prioridad.map(|p| p as f64)),
            "updated_at" => FieldValue::date(self.updated_at.as_deref()),
            _ => FieldValue::Missing,
        }
    }

    fn search_haystack(&self) -> String {
        joined(&[Some(self.seccion.as_str()), Some(self.texto.as_str())])
    }
}

/// Agrupa filas ya filtradas/ordenadas por sección, en orden de aparición
pub fn group_by_section<'a>(rows: &[&'a GoldenRule]) -> Vec<(String, Vec<&'a GoldenRule>)> {
    let mut groups: Vec<(String, Vec<&'a GoldenRule>)> = Vec::new();
    for &rule in rows {
        match groups.iter_mut().find(|(seccion, _)| *seccion == rule.seccion) {
            Some((_, members)) => members.push(rule),
            None => groups.push((rule.seccion.clone(), vec![rule])),
        }
    }
    groups
}

// ============================================================================
// SALUD / COSTOS
// ============================================================================

pub const HEALTH_COLUMNS: [Column; 4] = [
    col("servicio", "Servicio", false),
    col("estado", "Estado", true),
    col("latencia_ms", "Latencia (ms)", false),
    time_col("checked_at", "Verificado"),
];

impl ListRecord for HealthStatus {
    fn field(&self, key: &str) -> FieldValue {
        match key {
            "servicio" => FieldValue::text(self.servicio.as_str()),
            "estado" => FieldValue::text(self.estado.label()),
            "latencia_ms" => FieldValue::number(self.latencia_ms),
            "detalle" => FieldValue::opt_text(self.detalle.as_deref()),
            "checked_at" => FieldValue::date(self.checked_at.as_deref()),
            _ => FieldValue::Missing,
        }
    }

    fn search_haystack(&self) -> String {
        joined(&[Some(self.servicio.as_str()), Some(self.estado.label()), self.detalle.as_deref()])
    }
}

pub const COST_COLUMNS: [Column; 6] = [
    time_col("fecha", "Fecha"),
    col("modelo", "Modelo", true),
    col("generaciones", "Generaciones", false),
    col("tokens_entrada", "Tokens entrada", false),
    col("tokens_salida", "Tokens salida", false),
    col("costo_usd", "Costo (USD)", false),
];

impl ListRecord for CostRow {
    fn field(&self, key: &str) -> FieldValue {
        match key {
            "fecha" => FieldValue::date(Some(self.fecha.as_str())),
            "modelo" => FieldValue::text(self.modelo.as_str()),
            "generaciones" => FieldValue::number(self.generaciones.map(|g| g as f64)),
            "tokens_entrada" => FieldValue::Number(self.tokens_entrada as f64),
            "tokens_salida" => FieldValue::Number(self.tokens_salida as f64),
            "costo_usd" => FieldValue::Number(self.costo_usd),
            _ => FieldValue::Missing,
        }
    }

    fn search_haystack(&self) -> String {
        joined(&[Some(self.fecha.as_str()), Some(self.modelo.as_str())])
    }
}

// ============================================================================
// FEEDBACK
// ============================================================================

pub const FEEDBACK_SECTION_COLUMNS: [Column; 4] = [
    col("seccion", "Sección", false),
    col("evaluaciones", "Evaluaciones", false),
    col("puntaje_promedio", "Puntaje promedio", false),
    col("tasa_edicion", "Tasa de edición (%)", false),
];

impl ListRecord for FeedbackBySection {
    fn field(&self, key: &str) -> FieldValue {
        match key {
            "seccion" => FieldValue::text(self.seccion.as_str()),
            "evaluaciones" => FieldValue::Number(self.evaluaciones as f64),
            "puntaje_promedio" => FieldValue::number(self.puntaje_promedio),
            "tasa_edicion" => FieldValue::number(self.tasa_edicion),
            _ => FieldValue::Missing,
        }
    }

    fn search_haystack(&self) -> String {
        self.seccion.clone()
    }
}

pub const FEEDBACK_COMMENT_COLUMNS: [Column; 5] = [
    time_col("fecha", "Fecha"),
    col("seccion", "Sección", true),
    col("autor", "Autor", true),
    col("puntaje", "Puntaje", false),
    col("comentario", "Comentario", false),
];

impl ListRecord for FeedbackComment {
    fn field(&self, key: &str) -> FieldValue {
        match key {
            "epc_id" => FieldValue::text(self.epc_id.as_str()),
            "fecha" => FieldValue::date(self.fecha.as_deref()),
            "seccion" => FieldValue::opt_text(self.seccion.as_deref()),
            "autor" => FieldValue::opt_text(self.autor.as_deref()),
            "puntaje" => FieldValue::number(self.puntaje),
            "comentario" => FieldValue::text(self.comentario.as_str()),
            _ => FieldValue::Missing,
        }
    }

    fn search_haystack(&self) -> String {
        joined(&[Some(self.comentario.as_str()), self.seccion.as_deref(), self.autor.as_deref()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::list_state::ListViewState;
    use crate::viewmodels::list_pipeline::{apply, EmptyReason};

    fn concept(id: &str, term: &str, tag: Option<&str>) -> SnomedConcept {
        SnomedConcept {
            concept_id: id.into(),
            term: term.into(),
            semantic_tag: tag.map(Into::into),
            catalog: None,
            active: true,
        }
    }

    fn rule(id: &str, seccion: &str, prioridad: Option<i64>) -> GoldenRule {
        GoldenRule {
            id: id.into(),
            seccion: seccion.into(),
            texto: format!("regla {}", id),
            activa: true,
            prioridad,
            updated_at: None,
        }
    }

    #[test]
    fn snomed_search_and_tag_filter() {
        let rows = vec![
            concept("1", "Neumonía", Some("trastorno")),
            concept("2", "Apendicectomía", Some("procedimiento")),
            concept("3", "Neumotórax", Some("trastorno")),
        ];
        let mut state = ListViewState::new(20);
        state.set_search("neumo");
        state.set_filter("semantic_tag", "trast");
        state.toggle_sort("term", SortDirection::Asc);

        let page = apply(&rows, &state);
        let ids: Vec<&str> = page.rows.iter().map(|c| c.concept_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn missing_priority_sorts_last() {
        let rows = vec![rule("a", "evolucion", None), rule("b", "evolucion", Some(2)), rule("c", "alta", Some(1))];
        let mut state = ListViewState::new(20);
        state.toggle_sort("prioridad", SortDirection::Desc);
        let page = apply(&rows, &state);
        let ids: Vec<&str> = page.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn rules_group_in_order_of_appearance() {
        let rows = vec![rule("1", "evolucion", None), rule("2", "alta", None), rule("3", "evolucion", None)];
        let refs: Vec<&GoldenRule> = rows.iter().collect();
        let groups = group_by_section(&refs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "evolucion");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "alta");
    }

    #[test]
    fn empty_catalog_reports_no_data() {
        let rows: Vec<SnomedConcept> = Vec::new();
        let page = apply(&rows, &ListViewState::new(20));
        assert_eq!(page.empty_reason, Some(EmptyReason::NoData));
    }
}
