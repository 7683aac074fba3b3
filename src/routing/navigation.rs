// ============================================================================
// NAVIGATION - Hash routing sobre window.location
// ============================================================================

use crate::routing::Route;

/// Path actual según el hash (`#/patients` -> `/patients`)
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .map(|hash| hash.trim_start_matches('#').to_string())
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| "/".to_string())
}

pub fn current_route() -> Route {
    Route::parse(&current_path())
}

/// Navega cambiando el hash; el listener de hashchange actualiza el estado
pub fn navigate(path: &str) {
    log::debug!("🧭 [ROUTER] navigate -> {}", path);
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_hash(path) {
            log::error!("❌ [ROUTER] No se pudo navegar a {}: {:?}", path, e);
        }
    }
}

/// Abre una URL en una pestaña nueva (impresión de EPC)
pub fn open_in_new_tab(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.open_with_url_and_target(url, "_blank") {
            log::error!("❌ [ROUTER] No se pudo abrir {}: {:?}", url, e);
        }
    }
}
