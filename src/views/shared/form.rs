// ============================================================================
// FORM - Campos, botones y banners
// ============================================================================
// Los inputs llevan `id` para que el re-render completo les devuelva el foco.
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, on_change, on_click, on_input, on_toggle, ElementBuilder};

fn labeled(id: &str, label: &str, control: Element) -> Result<Element, JsValue> {
    let group = ElementBuilder::new("div")?.class("form-group").build();
    let label = ElementBuilder::new("label")?.attr("for", id)?.text(label).build();
    append_child(&group, &label)?;
    append_child(&group, &control)?;
    Ok(group)
}

/// Input de texto (o date/email/password/number según `input_type`)
pub fn text_field<F>(id: &str, label: &str, input_type: &str, value: &str, disabled: bool, handler: F) -> Result<Element, JsValue>
where
    F: FnMut(String) + 'static,
{
    let input = ElementBuilder::new("input")?
        .id(id)?
        .class("form-input")
        .attr("type", input_type)?
        .attr("value", value)?
        .flag("disabled", disabled)?
        .build();
    on_input(&input, handler)?;
    labeled(id, label, input)
}

pub fn textarea_field<F>(id: &str, label: &str, value: &str, rows: u32, disabled: bool, handler: F) -> Result<Element, JsValue>
where
    F: FnMut(String) + 'static,
{
    let area = ElementBuilder::new("textarea")?
        .id(id)?
        .class("form-textarea")
        .attr("rows", &rows.to_string())?
        .flag("disabled", disabled)?
        .text(value)
        .build();
    on_input(&area, handler)?;
    labeled(id, label, area)
}

/// Select con opción vacía opcional (`placeholder`)
pub fn select_field<F>(
    id: &str,
    label: &str,
    options: &[(String, String)],
    selected: &str,
    placeholder: Option<&str>,
    disabled: bool,
    handler: F,
) -> Result<Element, JsValue>
where
    F: FnMut(String) + 'static,
{
    let select = render_select(id, options, selected, placeholder, disabled, handler)?;
    labeled(id, label, select)
}

/// Select sin label (filtros de tabla)
pub fn render_select<F>(
    id: &str,
    options: &[(String, String)],
    selected: &str,
    placeholder: Option<&str>,
    disabled: bool,
    handler: F,
) -> Result<Element, JsValue>
where
    F: FnMut(String) + 'static,
{
    let select = ElementBuilder::new("select")?
        .id(id)?
        .class("form-select")
        .flag("disabled", disabled)?
        .build();
    if let Some(text) = placeholder {
        let option = ElementBuilder::new("option")?
            .attr("value", "")?
            .flag("selected", selected.is_empty())?
            .text(text)
            .build();
        append_child(&select, &option)?;
    }
    for (value, text) in options {
        let option = ElementBuilder::new("option")?
            .attr("value", value)?
            .flag("selected", value == selected)?
            .text(text)
            .build();
        append_child(&select, &option)?;
    }
    on_change(&select, handler)?;
    Ok(select)
}

pub fn checkbox_field<F>(id: &str, label: &str, checked: bool, handler: F) -> Result<Element, JsValue>
where
    F: FnMut(bool) + 'static,
{
    let wrapper = ElementBuilder::new("label")?.class("form-check").build();
    let input = ElementBuilder::new("input")?
        .id(id)?
        .attr("type", "checkbox")?
        .flag("checked", checked)?
        .build();
    on_toggle(&input, handler)?;
    append_child(&wrapper, &input)?;
    append_child(&wrapper, &ElementBuilder::new("span")?.text(label).build())?;
    Ok(wrapper)
}

pub fn button<F>(label: &str, class: &str, disabled: bool, mut handler: F) -> Result<Element, JsValue>
where
    F: FnMut() + 'static,
{
    let btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class(class)
        .flag("disabled", disabled)?
        .text(label)
        .build();
    on_click(&btn, move |_| handler())?;
    Ok(btn)
}

/// Banner de error o aviso; None si no hay mensaje
pub fn banner(kind: &str, message: Option<&str>) -> Result<Option<Element>, JsValue> {
    let Some(message) = message else {
        return Ok(None);
    };
    let icon = if kind == "error" { "❌" } else { "✅" };
    let element = ElementBuilder::new("div")?
        .class(&format!("banner banner-{}", kind))
        .attr("role", if kind == "error" { "alert" } else { "status" })?
        .text(&format!("{} {}", icon, message))
        .build();
    Ok(Some(element))
}

pub fn append_banner(parent: &Element, kind: &str, message: Option<&str>) -> Result<(), JsValue> {
    if let Some(element) = banner(kind, message)? {
        append_child(parent, &element)?;
    }
    Ok(())
}

pub fn loading(message: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("loading")
        .attr("aria-busy", "true")?
        .text(&format!("⏳ {}", message))
        .build())
}

/// Encabezado de página con acciones a la derecha
pub fn page_header(title: &str, actions: Vec<Element>) -> Result<Element, JsValue> {
    let header = ElementBuilder::new("div")?.class("page-header").build();
    append_child(&header, &ElementBuilder::new("h2")?.text(title).build())?;
    let bar = ElementBuilder::new("div")?.class("page-actions").build();
    for action in actions {
        append_child(&bar, &action)?;
    }
    append_child(&header, &bar)?;
    Ok(header)
}
