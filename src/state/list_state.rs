// ============================================================================
// LIST STATE - Búsqueda, filtros por columna, orden y página de una tabla
// ============================================================================
// Invariante: cualquier cambio de búsqueda, filtro, orden o tamaño de página
// vuelve a la página 1.
// ============================================================================

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// Interacción del usuario con los controles de una tabla
#[derive(Clone, Debug, PartialEq)]
pub enum ListAction {
    Search(String),
    Filter(String, String),
    ClearFilters,
    /// Click en un encabezado: clave + dirección por defecto de la columna
    ToggleSort(String, SortDirection),
    Page(usize),
    PageSize(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListViewState {
    search: String,
    filters: BTreeMap<String, String>,
    sort_key: Option<String>,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
}

impl Default for ListViewState {
    fn default() -> Self {
        Self::new(20)
    }
}

impl ListViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
            sort_key: None,
            sort_direction: SortDirection::Desc,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Estado inicial ordenado por una columna
    pub fn sorted_by(mut self, key: &str, direction: SortDirection) -> Self {
        self.sort_key = Some(key.to_string());
        self.sort_direction = direction;
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
        self.page = 1;
    }

    /// Filtro por columna; un valor vacío lo elimina
    pub fn set_filter(&mut self, key: &str, value: &str) {
        if value.trim().is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), value.to_string());
        }
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.filters.clear();
        self.page = 1;
    }

    pub fn set_sort(&mut self, key: &str, direction: SortDirection) {
        self.sort_key = Some(key.to_string());
        self.sort_direction = direction;
        self.page = 1;
    }

    /// Misma columna: invierte la dirección. Columna nueva: usa `default`.
    pub fn toggle_sort(&mut self, key: &str, default: SortDirection) {
        if self.sort_key.as_deref() == Some(key) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = Some(key.to_string());
            self.sort_direction = default;
        }
        self.page = 1;
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 1;
    }

    /// Cambio de página. Es el único setter que no resetea.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn apply(&mut self, action: ListAction) {
        match action {
            ListAction::Search(text) => self.set_search(&text),
            ListAction::Filter(key, value) => self.set_filter(&key, &value),
            ListAction::ClearFilters => self.clear_filters(),
            ListAction::ToggleSort(key, default) => self.toggle_sort(&key, default),
            ListAction::Page(page) => self.set_page(page),
            ListAction::PageSize(size) => self.set_page_size(size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page_3() -> ListViewState {
        let mut state = ListViewState::new(20);
        state.set_page(3);
        state
    }

    #[test]
    fn every_input_change_resets_page() {
        let mut s = on_page_3();
        s.set_search("ana");
        assert_eq!(s.page(), 1);

        let mut s = on_page_3();
        s.set_filter("apellido", "FERN");
        assert_eq!(s.page(), 1);

        let mut s = on_page_3();
        s.toggle_sort("apellido", SortDirection::Asc);
        assert_eq!(s.page(), 1);

        let mut s = on_page_3();
        s.set_page_size(50);
        assert_eq!(s.page(), 1);

        let mut s = on_page_3();
        s.clear_filters();
        assert_eq!(s.page(), 1);
    }

    #[test]
    fn toggle_same_key_flips_new_key_uses_default() {
        let mut s = ListViewState::new(20);
        s.toggle_sort("created_at", SortDirection::Desc);
        assert_eq!(s.sort_direction(), SortDirection::Desc);
        s.toggle_sort("created_at", SortDirection::Desc);
        assert_eq!(s.sort_direction(), SortDirection::Asc);
        s.toggle_sort("apellido", SortDirection::Asc);
        assert_eq!(s.sort_key(), Some("apellido"));
        assert_eq!(s.sort_direction(), SortDirection::Asc);
    }

    #[test]
    fn empty_filter_value_removes_filter() {
        let mut s = ListViewState::new(20);
        s.set_filter("estado", "alta");
        s.set_filter("estado", "  ");
        assert!(s.filters().is_empty());
    }

    #[test]
    fn actions_route_to_setters() {
        let mut s = on_page_3();
        s.apply(ListAction::Page(5));
        assert_eq!(s.page(), 5);
        s.apply(ListAction::Filter("estado".into(), "alta".into()));
        assert_eq!(s.filter("estado"), Some("alta"));
        assert_eq!(s.page(), 1);
        s.apply(ListAction::ToggleSort("fecha".into(), SortDirection::Desc));
        assert_eq!(s.sort_key(), Some("fecha"));
    }

    #[test]
    fn defaults() {
        let s = ListViewState::default();
        assert_eq!(s.page_size(), 20);
        assert_eq!(s.sort_direction(), SortDirection::Desc);
        assert_eq!(s.page(), 1);
    }
}
