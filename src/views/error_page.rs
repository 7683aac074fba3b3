// ============================================================================
// ERROR PAGE - Fallback de render y 404
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, ElementBuilder};
use crate::routing::navigate;
use crate::state::app_state::AppState;
use crate::utils::constants::HOME_PATH;
use crate::views::shared::button;

/// "Algo salió mal" con el detalle técnico plegado
pub fn render_error_page(state: &AppState, message: &str) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("error-page").attr("role", "alert")?.build();
    append_child(&page, &ElementBuilder::new("h2")?.text("Algo salió mal").build())?;
    append_child(
        &page,
        &ElementBuilder::new("p")?
            .text("Ocurrió un error inesperado al mostrar esta pantalla.")
            .build(),
    )?;

    let state = state.clone();
    let back = button("Volver al dashboard", "btn-primary", false, move || {
        state.set_render_error(None);
        navigate(HOME_PATH);
    })?;
    append_child(&page, &back)?;

    let details = ElementBuilder::new("details")?.class("error-details").build();
    append_child(&details, &ElementBuilder::new("summary")?.text("Detalle técnico").build())?;
    append_child(&details, &ElementBuilder::new("pre")?.text(message).build())?;
    append_child(&page, &details)?;
    Ok(page)
}

pub fn render_not_found(path: &str) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("not-found").build();
    append_child(&page, &ElementBuilder::new("h2")?.text("Página no encontrada").build())?;
    append_child(&page, &ElementBuilder::new("p")?.text(&format!("No existe la ruta {}", path)).build())?;
    let link = ElementBuilder::new("a")?
        .attr("href", &format!("#{}", HOME_PATH))?
        .text("Ir al inicio")
        .build();
    append_child(&page, &link)?;
    Ok(page)
}
