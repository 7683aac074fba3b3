// ============================================================================
// SNOMED VIEWMODEL - Catálogos de referencia (solo lectura)
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::models::snomed::SnomedConcept;
use crate::services::{ApiClient, CatalogService};
use crate::state::list_state::{ListViewState, SortDirection};
use crate::utils::constants::SNOMED_CATALOGS;
use crate::viewmodels::remote_list::RemoteList;

#[derive(Clone)]
pub struct SnomedViewModel {
    service: CatalogService,
    catalog: Rc<RefCell<Option<String>>>,
    pub concepts: RemoteList<SnomedConcept>,
}

impl SnomedViewModel {
    pub fn new(api: ApiClient, page_size: usize, debounce_ms: u32) -> Self {
        Self {
            service: CatalogService::new(api),
            catalog: Rc::new(RefCell::new(None)),
            concepts: RemoteList::new(ListViewState::new(page_size).sorted_by("term", SortDirection::Asc), debounce_ms),
        }
    }

    pub fn current_catalog(&self) -> Option<String> {
        self.catalog.borrow().clone()
    }

    /// Carga el catálogo si cambió (o si nunca se cargó)
    pub fn show(&self, catalog: &str) {
        if !Self::is_known_catalog(catalog) {
            log::warn!("⚠️ [SNOMED] Catálogo desconocido: {}", catalog);
            return;
        }
        if self.current_catalog().as_deref() == Some(catalog) && self.concepts.is_loaded() {
            return;
        }
        *self.catalog.borrow_mut() = Some(catalog.to_string());
        let service = self.service.clone();
        let catalog = catalog.to_string();
        self.concepts.load(move |signal| async move { service.snomed(&catalog, signal.as_ref()).await });
    }

    pub fn is_known_catalog(catalog: &str) -> bool {
        SNOMED_CATALOGS.iter().any(|(key, _)| *key == catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_listed_catalogs_are_known() {
        assert!(SnomedViewModel::is_known_catalog("diagnosticos"));
        assert!(SnomedViewModel::is_known_catalog("medicamentos"));
        assert!(!SnomedViewModel::is_known_catalog("alergias"));
        assert!(!SnomedViewModel::is_known_catalog(""));
    }
}
