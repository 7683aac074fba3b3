// ============================================================================
// BRANDING VIEW - Identidad visual e impresión de una institución
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, on_submit, ElementBuilder};
use crate::routing::{navigate, Route};
use crate::viewmodels::ViewModels;
use crate::views::shared::{append_banner, button, loading, page_header, text_field, textarea_field};

fn optional(value: String) -> Option<String> {
    Some(value).filter(|v| !v.trim().is_empty())
}

pub fn render_branding(vms: &ViewModels) -> Result<Element, JsValue> {
    let admin = &vms.admin;
    let s = admin.branding.get();

    let page = ElementBuilder::new("div")?.class("admin-page").build();
    let back = button("↩ Instituciones", "btn-secondary", false, || navigate(&Route::AdminTenants.path()))?;
    append_child(&page, &page_header("Branding", vec![back])?)?;
    if s.loading {
        append_child(&page, &loading("Cargando branding…")?)?;
        return Ok(page);
    }
    append_banner(&page, "notice", s.notice.as_deref())?;
    append_banner(&page, "error", s.error.as_deref())?;

    let form = ElementBuilder::new("form")?.class("entity-form").build();
    let locked = s.saving;
    let vm = admin.clone();
    append_child(&form, &text_field("branding-nombre", "Nombre de la institución", "text", &s.form.nombre_institucion, locked, move |v| {
        vm.update_branding(|b| b.nombre_institucion = v)
    })?)?;
    let vm = admin.clone();
    append_child(&form, &text_field("branding-logo", "URL del logo", "url", s.form.logo_url.as_deref().unwrap_or(""), locked, move |v| {
        vm.update_branding(|b| b.logo_url = optional(v))
    })?)?;
    let vm = admin.clone();
    append_child(&form, &text_field("branding-color", "Color primario", "color", s.form.color_primario.as_deref().unwrap_or("#1d4ed8"), locked, move |v| {
        vm.update_branding(|b| b.color_primario = optional(v))
    })?)?;
    let vm = admin.clone();
    append_child(&form, &textarea_field("branding-pie", "Pie de impresión", s.form.pie_impresion.as_deref().unwrap_or(""), 3, locked, move |v| {
        vm.update_branding(|b| b.pie_impresion = optional(v))
    })?)?;

    let submit = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn-primary")
        .flag("disabled", locked)?
        .text(if locked { "Guardando…" } else { "💾 Guardar branding" })
        .build();
    append_child(&form, &ElementBuilder::new("div")?.class("form-actions").child(submit)?.build())?;
    let vm = admin.clone();
    on_submit(&form, move || vm.save_branding())?;
    append_child(&page, &form)?;
    Ok(page)
}
