// ============================================================================
// FOCUS - Preserva el foco de los inputs entre re-renders completos
// ============================================================================

use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlInputElement, HtmlTextAreaElement};
use crate::dom::{document, get_element_by_id};

/// Foco y cursor del control activo antes de limpiar el DOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSnapshot {
    id: String,
    selection: Option<(u32, u32)>,
}

/// Solo se preservan controles con `id`
pub fn snapshot_focus() -> Option<FocusSnapshot> {
    let active = document()?.active_element()?;
    let id = active.id();
    if id.is_empty() {
        return None;
    }
    let selection = if let Some(input) = active.dyn_ref::<HtmlInputElement>() {
        match (input.selection_start(), input.selection_end()) {
            (Ok(Some(start)), Ok(Some(end))) => Some((start, end)),
            _ => None,
        }
    } else if let Some(area) = active.dyn_ref::<HtmlTextAreaElement>() {
        match (area.selection_start(), area.selection_end()) {
            (Ok(Some(start)), Ok(Some(end))) => Some((start, end)),
            _ => None,
        }
    } else {
        None
    };
    Some(FocusSnapshot { id, selection })
}

pub fn restore_focus(snapshot: &FocusSnapshot) {
    let Some(element) = get_element_by_id(&snapshot.id) else {
        return;
    };
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let _ = html.focus();
    }
    let Some((start, end)) = snapshot.selection else {
        return;
    };
    // Inputs tipo date/number no soportan selección; el error se ignora
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        let _ = input.set_selection_range(start, end);
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        let _ = area.set_selection_range(start, end);
    }
}
