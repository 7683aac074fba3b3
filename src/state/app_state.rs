// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================
// Sesión + ruta actual + error de render. El estado propio de cada pantalla
// vive en su ViewModel.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::routing::Route;
use crate::services::ApiClient;
use crate::state::reactivity::ReactiveState;
use crate::state::session_state::SessionStore;
use crate::utils::storage::TokenStorage;

#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    pub route: ReactiveState<Route>,
    /// Path pedido antes del redirect a /login
    pub return_to: Rc<RefCell<Option<String>>>,
    /// Mensaje técnico del último render fallido (pantalla "Algo salió mal")
    pub render_error: ReactiveState<Option<String>>,
}

impl AppState {
    pub fn new(storage: Rc<dyn TokenStorage>, initial_route: Route) -> Self {
        Self {
            session: SessionStore::new(storage),
            route: ReactiveState::new(initial_route),
            return_to: Rc::new(RefCell::new(None)),
            render_error: ReactiveState::new(None),
        }
    }

    /// Cliente HTTP ligado a la sesión actual
    pub fn api(&self) -> ApiClient {
        ApiClient::new(self.session.clone())
    }

    pub fn current_route(&self) -> Route {
        self.route.get()
    }

    /// Cambio de ruta (hashchange). Limpia el error de render previo.
    pub fn set_route(&self, route: Route) {
        if self.render_error.with(Option::is_some) {
            self.render_error.update_silent(|e| *e = None);
        }
        self.route.set(route);
    }

    pub fn remember_return_to(&self, path: &str) {
        *self.return_to.borrow_mut() = Some(path.to_string());
    }

    pub fn take_return_to(&self) -> Option<String> {
        self.return_to.borrow_mut().take()
    }

    pub fn set_render_error(&self, message: Option<String>) {
        self.render_error.set(message);
    }

    /// Suscribirse a cambios de sesión, ruta y error de render
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + Clone + 'static,
    {
        self.session.subscribe(callback.clone());
        self.route.subscribe(callback.clone());
        self.render_error.subscribe(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::MemoryStorage;
    use std::cell::Cell;

    fn state() -> AppState {
        AppState::new(Rc::new(MemoryStorage::new()), Route::Home)
    }

    #[test]
    fn return_to_is_consumed_once() {
        let s = state();
        s.remember_return_to("/patients");
        assert_eq!(s.take_return_to().as_deref(), Some("/patients"));
        assert_eq!(s.take_return_to(), None);
    }

    #[test]
    fn route_change_notifies_and_clears_render_error() {
        let s = state();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        s.subscribe_to_changes(move || counter.set(counter.get() + 1));

        s.set_render_error(Some("boom".into()));
        s.set_route(Route::Patients);

        assert_eq!(s.current_route(), Route::Patients);
        assert!(s.render_error.with(Option::is_none));
        assert_eq!(calls.get(), 2);
    }
}
