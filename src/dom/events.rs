// ============================================================================
// EVENT HANDLING - Sistema de eventos
// ============================================================================
// Los listeners se registran con Closure + forget(). Cuando el elemento se
// destruye (re-render con clear_children) el navegador libera el listener.
// Los listeners globales (window) se registran UNA VEZ en el arranque.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, MouseEvent};

fn listen<E, F>(element: &Element, event_type: &str, handler: F) -> Result<(), JsValue>
where
    E: JsCast + FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    element.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Click simple
pub fn on_click<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    listen(element, "click", handler)
}

/// `input` con el valor actual del control
pub fn on_input<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(String) + 'static,
{
    listen(element, "input", move |e: Event| {
        if let Some(value) = event_value(&e) {
            handler(value);
        }
    })
}

/// `change` (selects, fechas, checkboxes)
pub fn on_change<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(String) + 'static,
{
    listen(element, "change", move |e: Event| {
        if let Some(value) = event_value(&e) {
            handler(value);
        }
    })
}

/// Estado de un checkbox en cada `change`
pub fn on_toggle<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(bool) + 'static,
{
    listen(element, "change", move |e: Event| {
        if let Some(input) = e.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
            handler(input.checked());
        }
    })
}

/// Submit de formulario sin recargar la página
pub fn on_submit<F>(form: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    listen(form, "submit", move |e: Event| {
        e.prevent_default();
        handler();
    })
}

/// Valor del control que disparó el evento
pub fn event_value(event: &Event) -> Option<String> {
    let target = event.target()?;
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(area) = target.dyn_ref::<HtmlTextAreaElement>() {
        return Some(area.value());
    }
    target.dyn_ref::<HtmlSelectElement>().map(|select| select.value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_instantiate_for_dom_event_types() {
        let click: fn(&Element, &str, fn(MouseEvent)) -> Result<(), JsValue> = listen::<MouseEvent, fn(MouseEvent)>;
        let change: fn(&Element, &str, fn(Event)) -> Result<(), JsValue> = listen::<Event, fn(Event)>;
        assert_ne!(click as usize, 0);
        assert_ne!(change as usize, 0);
    }
}
