// ============================================================================
// TENANTS VIEW - Instituciones
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, on_submit, ElementBuilder};
use crate::models::admin::Tenant;
use crate::routing::{navigate, Route};
use crate::viewmodels::admin_viewmodel::{Editor, TenantDraft};
use crate::viewmodels::records::TENANT_COLUMNS;
use crate::viewmodels::{AdminViewModel, ViewModels};
use crate::views::shared::{append_banner, button, checkbox_field, page_header, render_modal, render_remote_table, text_field};

fn render_row_actions(admin: &AdminViewModel, tenant: &Tenant) -> Result<Element, JsValue> {
    let group = ElementBuilder::new("div")?.class("btn-group").build();
    let (vm, target) = (admin.clone(), tenant.clone());
    append_child(&group, &button("✏️ Editar", "btn-small", false, move || vm.open_tenant_editor(Some(&target)))?)?;
    let id = tenant.id.clone();
    append_child(&group, &button("🎨 Branding", "btn-small", false, move || {
        navigate(&Route::AdminBranding(id.clone()).path())
    })?)?;
    Ok(group)
}

fn render_editor(admin: &AdminViewModel, editor: &Editor<TenantDraft>) -> Result<Element, JsValue> {
    let form = ElementBuilder::new("form")?.class("entity-form").build();
    append_banner(&form, "error", editor.error.as_deref())?;
    let draft = &editor.draft;
    let locked = editor.saving;

    let vm = admin.clone();
    append_child(&form, &text_field("tenant-nombre", "Nombre", "text", &draft.nombre, locked, move |v| {
        vm.update_tenant_draft(|d| d.nombre = v)
    })?)?;
    let vm = admin.clone();
    append_child(&form, &text_field("tenant-codigo", "Código", "text", &draft.codigo, locked, move |v| {
        vm.update_tenant_draft(|d| d.codigo = v)
    })?)?;
    let vm = admin.clone();
    append_child(&form, &text_field("tenant-ws-url", "URL del WebService HCE", "url", &draft.ws_url, locked, move |v| {
        vm.update_tenant_draft(|d| d.ws_url = v)
    })?)?;
    let vm = admin.clone();
    append_child(&form, &checkbox_field("tenant-activo", "Activa", draft.activo, move |on| {
        vm.update_tenant_draft(|d| d.activo = on)
    })?)?;

    let submit = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn-primary")
        .flag("disabled", locked)?
        .text(if locked { "Guardando…" } else { "Guardar" })
        .build();
    append_child(&form, &ElementBuilder::new("div")?.class("form-actions").child(submit)?.build())?;
    let vm = admin.clone();
    on_submit(&form, move || vm.save_tenant())?;
    Ok(form)
}

pub fn render_tenants(vms: &ViewModels) -> Result<Element, JsValue> {
    let admin = &vms.admin;
    let page = ElementBuilder::new("div")?.class("admin-page").build();
    let vm = admin.clone();
    let new_btn = button("➕ Nueva institución", "btn-primary", false, move || vm.open_tenant_editor(None))?;
    append_child(&page, &page_header("Instituciones", vec![new_btn])?)?;

    let actions = |tenant: &Tenant| render_row_actions(admin, tenant);
    append_child(&page, &render_remote_table("tenants", &admin.tenants, &TENANT_COLUMNS, Some(&actions))?)?;

    if let Some(editor) = admin.tenant_editor.get() {
        let title = if editor.is_new() { "Nueva institución" } else { "Editar institución" };
        let vm = admin.clone();
        let modal = render_modal("tenant-editor", title, render_editor(admin, &editor)?, Rc::new(move || vm.close_editors()))?;
        append_child(&page, &modal)?;
    }
    Ok(page)
}
