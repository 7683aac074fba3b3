// ============================================================================
// MODAL - Overlay con cabecera y botón de cierre
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, on_click, ElementBuilder};

pub fn render_modal(id: &str, title: &str, body: Element, on_close: Rc<dyn Fn()>) -> Result<Element, JsValue> {
    let overlay = ElementBuilder::new("div")?
        .id(id)?
        .class("modal-overlay")
        .attr("role", "dialog")?
        .attr("aria-modal", "true")?
        .build();

    // Click en el fondo cierra; dentro del contenido no
    {
        let on_close = on_close.clone();
        on_click(&overlay, move |e| {
            if e.target().map(JsValue::from) == e.current_target().map(JsValue::from) {
                on_close();
            }
        })?;
    }

    let content = ElementBuilder::new("div")?.class("modal-content").build();
    let header = ElementBuilder::new("div")?.class("modal-header").build();
    append_child(&header, &ElementBuilder::new("h3")?.text(title).build())?;
    let close_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .attr("aria-label", "Cerrar")?
        .class("btn-close")
        .text("✕")
        .build();
    on_click(&close_btn, move |_| on_close())?;
    append_child(&header, &close_btn)?;

    append_child(&content, &header)?;
    append_child(&content, &body)?;
    append_child(&overlay, &content)?;
    Ok(overlay)
}
