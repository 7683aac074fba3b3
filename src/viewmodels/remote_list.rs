// ============================================================================
// REMOTE LIST - Tabla cargada una vez del backend + pipeline en cliente
// ============================================================================
// Cada `load` emite un ticket nuevo: si llega tarde (otro load lo reemplazó)
// el resultado se descarta sin tocar el estado.
// ============================================================================

use std::future::Future;
use wasm_bindgen_futures::spawn_local;
use web_sys::AbortSignal;
use crate::error::AppError;
use crate::state::debounce::DebouncedInput;
use crate::state::fetch_state::CancellationSlot;
use crate::state::list_state::{ListAction, ListViewState};
use crate::state::reactivity::ReactiveState;

#[derive(Clone, Debug, PartialEq)]
pub struct RemoteListState<T> {
    pub records: Vec<T>,
    pub query: ListViewState,
    /// Lo que el usuario tipeó; la búsqueda aplicada llega con debounce
    pub search_draft: String,
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
}

impl<T> RemoteListState<T> {
    pub fn new(query: ListViewState) -> Self {
        Self {
            records: Vec::new(),
            search_draft: query.search().to_string(),
            query,
            loading: false,
            loaded: false,
            error: None,
        }
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Aplica el resultado de un fetch vigente. Un error conserva las filas previas.
    pub fn finish_load(&mut self, result: Result<Vec<T>, AppError>) {
        self.loading = false;
        match result {
            Ok(records) => {
                self.records = records;
                self.loaded = true;
                self.error = None;
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => self.error = Some(e.user_message()),
        }
    }
}

pub struct RemoteList<T> {
    state: ReactiveState<RemoteListState<T>>,
    slot: CancellationSlot,
    search: DebouncedInput,
}

impl<T> Clone for RemoteList<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            slot: self.slot.clone(),
            search: self.search.clone(),
        }
    }
}

impl<T: 'static> RemoteList<T> {
    pub fn new(query: ListViewState, debounce_ms: u32) -> Self {
        Self {
            state: ReactiveState::new(RemoteListState::new(query)),
            slot: CancellationSlot::new(),
            search: DebouncedInput::new(debounce_ms),
        }
    }

    pub fn state(&self) -> &ReactiveState<RemoteListState<T>> {
        &self.state
    }

    pub fn subscribe<F: Fn() + 'static>(&self, callback: F) {
        self.state.subscribe(callback);
    }

    pub fn is_loaded(&self) -> bool {
        self.state.with(|s| s.loaded)
    }

    /// Recarga con `fetch`; el signal aborta el request si se emite otro ticket
    pub fn load<F, Fut>(&self, fetch: F)
    where
        F: FnOnce(Option<AbortSignal>) -> Fut + 'static,
        Fut: Future<Output = Result<Vec<T>, AppError>> + 'static,
    {
        let ticket = self.slot.issue();
        self.state.update(RemoteListState::begin_load);

        let state = self.state.clone();
        let slot = self.slot.clone();
        spawn_local(async move {
            let result = fetch(ticket.signal().cloned()).await;
            if !slot.is_current(&ticket) {
                log::debug!("⏭️ [LIST] Resultado obsoleto descartado (ticket {})", ticket.generation());
                return;
            }
            state.update(|s| s.finish_load(result));
        });
    }

    /// Cancela el fetch en curso (al salir de la pantalla)
    pub fn cancel(&self) {
        self.slot.cancel();
        self.search.cancel();
        self.state.update_silent(|s| s.loading = false);
    }

    /// Acción sobre los controles de la tabla. La búsqueda pasa por el debounce.
    pub fn dispatch(&self, action: ListAction) {
        match action {
            ListAction::Search(text) => {
                self.state.update_silent(|s| s.search_draft = text.clone());
                let state = self.state.clone();
                self.search.input(text, move |value| {
                    state.update(|s| s.query.apply(ListAction::Search(value)));
                });
            }
            ListAction::ClearFilters => {
                self.search.cancel();
                self.state.update(|s| {
                    s.search_draft.clear();
                    s.query.apply(ListAction::ClearFilters);
                });
            }
            other => self.state.update(|s| s.query.apply(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> RemoteListState<u32> {
        let mut s = RemoteListState::new(ListViewState::new(20));
        s.begin_load();
        s.finish_load(Ok(vec![1, 2, 3]));
        s
    }

    #[test]
    fn successful_load_replaces_records() {
        let s = loaded();
        assert_eq!(s.records, vec![1, 2, 3]);
        assert!(s.loaded);
        assert!(!s.loading);
    }

    #[test]
    fn error_keeps_previous_rows() {
        let mut s = loaded();
        s.begin_load();
        s.finish_load(Err(AppError::Network("down".into())));
        assert_eq!(s.records, vec![1, 2, 3]);
        assert!(s.error.is_some());
    }

    #[test]
    fn cancelled_load_shows_nothing() {
        let mut s = loaded();
        s.begin_load();
        s.finish_load(Err(AppError::Cancelled));
        assert!(s.error.is_none());
        assert!(!s.loading);
    }

    #[test]
    fn non_search_actions_apply_immediately() {
        let list: RemoteList<u32> = RemoteList::new(ListViewState::new(20), 300);
        list.dispatch(ListAction::Page(3));
        assert_eq!(list.state().with(|s| s.query.page()), 3);
        list.dispatch(ListAction::Filter("estado".into(), "alta".into()));
        assert_eq!(list.state().with(|s| s.query.page()), 1);
    }
}
