// ============================================================================
// LIST PIPELINE - filtro global -> filtros por columna -> orden -> página
// ============================================================================
// Función pura sobre datos ya obtenidos: no hace I/O y no puede fallar.
// Se recalcula completa en cada cambio de ListViewState.
// ============================================================================

use std::cmp::Ordering;
use crate::state::list_state::{ListViewState, SortDirection};
use crate::utils::text::{compare_text, normalize_query, parse_datetime};

/// Valor de un campo para filtrar/ordenar
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// Timestamp (segundos) + texto original para filtrar/mostrar
    Date { ts: i64, raw: String },
    Missing,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() { FieldValue::Missing } else { FieldValue::Text(value) }
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        value.map(FieldValue::text).unwrap_or(FieldValue::Missing)
    }

    pub fn number(value: Option<f64>) -> Self {
        match value {
            Some(n) if n.is_finite() => FieldValue::Number(n),
            _ => FieldValue::Missing,
        }
    }

    /// Fecha en texto; si no parsea se ordena como texto
    pub fn date(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => FieldValue::Missing,
            Some(raw) => match parse_datetime(raw) {
                Some(dt) => FieldValue::Date { ts: dt.and_utc().timestamp(), raw: raw.to_string() },
                None => FieldValue::Text(raw.to_string()),
            },
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Representación en texto (para filtros por columna)
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Date { raw, .. } => raw.clone(),
            FieldValue::Missing => String::new(),
        }
    }

    fn numeric(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Date { ts, .. } => Some(*ts as f64),
            _ => None,
        }
    }
}

/// Registro que puede pasar por el pipeline
pub trait ListRecord {
    fn field(&self, key: &str) -> FieldValue;

    /// Campos buscables concatenados (se compara en minúsculas)
    fn search_haystack(&self) -> String;
}

/// Por qué una página no tiene filas
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyReason {
    NoData,
    NoMatches,
    PageOutOfRange,
}

impl EmptyReason {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyReason::NoData => "Sin resultados: todavía no hay registros.",
            EmptyReason::NoMatches => "Sin resultados para los filtros aplicados.",
            EmptyReason::PageOutOfRange => "Sin resultados en esta página.",
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct ListPage<'a, T> {
    pub rows: Vec<&'a T>,
    /// Total filtrado (antes de paginar)
    pub total: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
    pub empty_reason: Option<EmptyReason>,
}

impl<T> ListPage<'_, T> {
    /// "Mostrando 21-40 de 45"
    pub fn range_label(&self) -> String {
        if self.rows.is_empty() {
            return format!("0 de {}", self.total);
        }
        let start = (self.page - 1) * self.page_size + 1;
        format!("Mostrando {}-{} de {}", start, start + self.rows.len() - 1, self.total)
    }
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Compara dos valores presentes; números antes que texto
fn compare_present(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a.numeric(), b.numeric()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_text(&a.display(), &b.display()),
    }
}

/// Orden con faltantes siempre al final, en ambas direcciones
pub fn compare_values(a: &FieldValue, b: &FieldValue, direction: SortDirection) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = compare_present(a, b);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

/// Pasos 1-3: búsqueda global, filtros por columna (AND) y orden estable
pub fn filter_and_sort<'a, T: ListRecord>(records: &'a [T], state: &ListViewState) -> Vec<&'a T> {
    let query = normalize_query(state.search());
    let filters: Vec<(&str, String)> = state
        .filters()
        .iter()
        .map(|(k, v)| (k.as_str(), normalize_query(v)))
        .filter(|(_, v)| !v.is_empty())
        .collect();

    let mut rows: Vec<&T> = records
        .iter()
        .filter(|r| query.is_empty() || r.search_haystack().to_lowercase().contains(&query))
        .filter(|r| {
            filters
                .iter()
                .all(|(key, value)| r.field(key).display().to_lowercase().contains(value.as_str()))
        })
        .collect();

    if let Some(key) = state.sort_key() {
        let direction = state.sort_direction();
        // sort_by es estable: empates conservan el orden original
        rows.sort_by(|a, b| compare_values(&a.field(key), &b.field(key), direction));
    }
    rows
}

/// Pipeline completo (pasos 1-4)
pub fn apply<'a, T: ListRecord>(records: &'a [T], state: &ListViewState) -> ListPage<'a, T> {
    let filtered = filter_and_sort(records, state);
    paginate(filtered, state.page(), state.page_size(), records.is_empty())
}

/// Paso 4: rebanada `[(page-1)*size, page*size)`
pub fn paginate<T>(filtered: Vec<&T>, page: usize, page_size: usize, source_empty: bool) -> ListPage<'_, T> {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total = filtered.len();
    let pages = total_pages(total, page_size);

    let start = (page - 1).saturating_mul(page_size);
    let rows: Vec<&T> = filtered.into_iter().skip(start).take(page_size).collect();

    let empty_reason = if !rows.is_empty() {
        None
    } else if source_empty {
        Some(EmptyReason::NoData)
    } else if total == 0 {
        Some(EmptyReason::NoMatches)
    } else {
        Some(EmptyReason::PageOutOfRange)
    };

    ListPage { rows, total, total_pages: pages, page, page_size, empty_reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: usize,
        apellido: Option<String>,
        edad: Option<i64>,
    }

    impl ListRecord for Row {
        fn field(&self, key: &str) -> FieldValue {
            match key {
                "apellido" => FieldValue::opt_text(self.apellido.as_deref()),
                "edad" => FieldValue::number(self.edad.map(|e| e as f64)),
                "id" => FieldValue::Number(self.id as f64),
                _ => FieldValue::Missing,
            }
        }

        fn search_haystack(&self) -> String {
            format!("{} {}", self.apellido.clone().unwrap_or_default(), self.id)
        }
    }

    fn row(id: usize, apellido: &str) -> Row {
        Row { id, apellido: Some(apellido.to_string()), edad: None }
    }

    #[test]
    fn column_filter_and_sort_ascending() {
        let rows = vec![row(1, "Fernandez"), row(2, "Garcia"), row(3, "Fernandes")];
        let mut state = ListViewState::new(20);
        state.set_filter("apellido", "FERN");
        state.set_sort("apellido", SortDirection::Asc);

        let page = apply(&rows, &state);
        let names: Vec<&str> = page.rows.iter().map(|r| r.apellido.as_deref().unwrap()).collect();
        assert_eq!(names, vec!["Fernandes", "Fernandez"]);
    }

    #[test]
    fn pages_of_twenty_then_fifty() {
        let rows: Vec<Row> = (1..=45).map(|i| row(i, &format!("P{}", i))).collect();
        let mut state = ListViewState::new(20);

        let page = apply(&rows, &state);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.rows.len(), 20);
        assert_eq!(page.rows.first().unwrap().id, 1);
        assert_eq!(page.rows.last().unwrap().id, 20);

        state.set_page(3);
        state.set_page_size(50);
        let page = apply(&rows, &state);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.rows.len(), 45);
    }

    #[test]
    fn global_search_is_case_insensitive_and_trimmed() {
        let rows = vec![row(1, "Pérez"), row(2, "Gómez")];
        let mut state = ListViewState::new(20);
        state.set_search("  PÉR ");
        let page = apply(&rows, &state);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, 1);
    }

    #[test]
    fn sort_is_accent_insensitive() {
        let rows = vec![row(1, "Zapata"), row(2, "Álvarez"), row(3, "alonso")];
        let mut state = ListViewState::new(20);
        state.set_sort("apellido", SortDirection::Asc);
        let ids: Vec<usize> = apply(&rows, &state).rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn missing_values_last_in_both_directions() {
        let rows = vec![
            Row { id: 1, apellido: None, edad: Some(40) },
            Row { id: 2, apellido: None, edad: None },
            Row { id: 3, apellido: None, edad: Some(20) },
        ];
        let mut state = ListViewState::new(20);
        state.set_sort("edad", SortDirection::Asc);
        let asc: Vec<usize> = apply(&rows, &state).rows.iter().map(|r| r.id).collect();
        assert_eq!(asc, vec![3, 1, 2]);

        state.set_sort("edad", SortDirection::Desc);
        let desc: Vec<usize> = apply(&rows, &state).rows.iter().map(|r| r.id).collect();
        assert_eq!(desc, vec![1, 3, 2]);
    }

    #[test]
    fn empty_reasons() {
        let empty: Vec<Row> = vec![];
        let state = ListViewState::new(20);
        assert_eq!(apply(&empty, &state).empty_reason, Some(EmptyReason::NoData));

        let rows = vec![row(1, "Ruiz")];
        let mut state = ListViewState::new(20);
        state.set_search("xyz");
        assert_eq!(apply(&rows, &state).empty_reason, Some(EmptyReason::NoMatches));

        let mut state = ListViewState::new(20);
        state.set_page(4);
        let page = apply(&rows, &state);
        assert_eq!(page.empty_reason, Some(EmptyReason::PageOutOfRange));
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn dates_sort_chronologically() {
        assert_eq!(
            compare_values(
                &FieldValue::date(Some("2024-02-01")),
                &FieldValue::date(Some("2024-01-15T10:00:00")),
                SortDirection::Asc
            ),
            Ordering::Greater
        );
        assert_eq!(FieldValue::date(Some("  ")), FieldValue::Missing);
    }

    #[test]
    fn range_label() {
        let rows: Vec<Row> = (1..=45).map(|i| row(i, "X")).collect();
        let mut state = ListViewState::new(20);
        state.set_page(3);
        assert_eq!(apply(&rows, &state).range_label(), "Mostrando 41-45 de 45");
    }

    fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
        prop::collection::vec(
            (prop::option::of("[a-cA-C]{0,3}"), prop::option::of(-5i64..5)),
            0..60,
        )
        .prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(id, (apellido, edad))| Row { id, apellido, edad })
                .collect()
        })
    }

    fn arb_state() -> impl Strategy<Value = ListViewState> {
        (
            "[abc]{0,2}",
            prop::option::of("[abc]{0,1}"),
            prop::option::of((prop::bool::ANY, prop::bool::ANY)),
            1usize..15,
        )
            .prop_map(|(search, filter, sort, size)| {
                let mut state = ListViewState::new(size);
                state.set_search(&search);
                if let Some(f) = filter {
                    state.set_filter("apellido", &f);
                }
                if let Some((by_edad, asc)) = sort {
                    let dir = if asc { SortDirection::Asc } else { SortDirection::Desc };
                    state.set_sort(if by_edad { "edad" } else { "apellido" }, dir);
                }
                state
            })
    }

    proptest! {
        #[test]
        fn filter_and_sort_is_idempotent(rows in arb_rows(), state in arb_state()) {
            let first: Vec<Row> = filter_and_sort(&rows, &state).into_iter().cloned().collect();
            let second: Vec<Row> = filter_and_sort(&first, &state).into_iter().cloned().collect();
            let again: Vec<Row> = filter_and_sort(&rows, &state).into_iter().cloned().collect();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&first, &again);
        }

        #[test]
        fn concatenated_pages_rebuild_the_filtered_list(rows in arb_rows(), state in arb_state()) {
            let expected: Vec<usize> = filter_and_sort(&rows, &state).iter().map(|r| r.id).collect();
            let page_count = total_pages(expected.len(), state.page_size());

            let mut collected = Vec::new();
            let mut paging = state.clone();
            for page in 1..=page_count {
                paging.set_page(page);
                collected.extend(apply(&rows, &paging).rows.iter().map(|r| r.id));
            }
            prop_assert_eq!(collected, expected);
        }

        #[test]
        fn missing_sort_values_are_always_last(rows in arb_rows(), asc in prop::bool::ANY) {
            let mut state = ListViewState::new(100);
            let dir = if asc { SortDirection::Asc } else { SortDirection::Desc };
            state.set_sort("edad", dir);
            let sorted = filter_and_sort(&rows, &state);
            let first_missing = sorted.iter().position(|r| r.edad.is_none()).unwrap_or(sorted.len());
            prop_assert!(sorted[first_missing..].iter().all(|r| r.edad.is_none()));
        }
    }
}
