// ============================================================================
// EPICRISIS ADMIN - FRONTEND MVVM (RUST PURO)
// ============================================================================
// Arquitectura MVVM:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Estado + Lógica UI
// - Services: SOLO comunicación API
// - State: Sesión, ruta y estado reactivo con Rc<RefCell>
// - Models: Estructuras compartidas con backend
// ============================================================================

mod config;
mod error;
mod models;
mod services;
mod state;
mod routing;
mod dom;
mod views;
mod viewmodels;
mod utils;
mod app;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_logger::Config;
use crate::app::App;
use crate::config::CONFIG;
use crate::routing::current_route;
use crate::state::app_state::AppState;
use crate::utils::browser_storage;

// Instancia global de la App
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(Config::new(CONFIG.log_level()));
    log::info!("🚀 {} ({})", CONFIG.app_title, CONFIG.environment);

    let state = AppState::new(browser_storage(), current_route());
    let status = state.session.rehydrate();
    log::info!("🔐 [MAIN] Sesión rehidratada: {:?}", status);

    let mut app = App::new(state)?;
    app.render()?;
    APP.with(|cell| *cell.borrow_mut() = Some(app));

    // El listener se registra una sola vez
    if let Some(win) = web_sys::window() {
        let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
            APP.with(|cell| {
                if let Some(app) = cell.borrow().as_ref() {
                    app.state().set_route(current_route());
                }
            });
        }) as Box<dyn FnMut(web_sys::Event)>);
        win.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Re-render completo de la app
pub fn rerender_app() {
    APP.with(|cell| match cell.borrow_mut().as_mut() {
        Some(app) => {
            if let Err(e) = app.render() {
                log::error!("❌ [RERENDER] Error re-renderizando: {:?}", e);
            }
        }
        None => log::warn!("⚠️ [RERENDER] App no está inicializada"),
    });
}
