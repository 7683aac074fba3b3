// ============================================================================
// USERS VIEW - ABM de usuarios y roles
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, confirm, on_submit, ElementBuilder};
use crate::models::admin::AdminUser;
use crate::models::auth::Role;
use crate::viewmodels::admin_viewmodel::{Editor, UserDraft};
use crate::viewmodels::records::USER_COLUMNS;
use crate::viewmodels::{AdminViewModel, ViewModels};
use crate::views::shared::{
    append_banner, button, checkbox_field, page_header, render_modal, render_remote_table, select_field, text_field,
};

fn render_row_actions(admin: &AdminViewModel, user: &AdminUser) -> Result<Element, JsValue> {
    let group = ElementBuilder::new("div")?.class("btn-group").build();
    let (vm, target) = (admin.clone(), user.clone());
    append_child(&group, &button("✏️ Editar", "btn-small", false, move || vm.open_user_editor(Some(&target)))?)?;
    let (vm, id, username) = (admin.clone(), user.id.clone(), user.username.clone());
    append_child(&group, &button("🗑️", "btn-small btn-danger", false, move || {
        if confirm(&format!("¿Eliminar al usuario {}?", username)) {
            vm.delete_user(&id);
        }
    })?)?;
    Ok(group)
}

fn render_editor(admin: &AdminViewModel, editor: &Editor<UserDraft>) -> Result<Element, JsValue> {
    let form = ElementBuilder::new("form")?.class("entity-form").build();
    append_banner(&form, "error", editor.error.as_deref())?;
    let draft = &editor.draft;
    let locked = editor.saving;

    let text = |id: &str, label: &str, kind: &str, value: &str, set: fn(&mut UserDraft, String)| {
        let vm = admin.clone();
        text_field(id, label, kind, value, locked, move |v| vm.update_user_draft(|d| set(d, v)))
    };
    append_child(&form, &text("user-username", "Usuario", "text", &draft.username, |d, v| d.username = v)?)?;
    append_child(&form, &text("user-nombre", "Nombre", "text", &draft.nombre, |d, v| d.nombre = v)?)?;
    append_child(&form, &text("user-email", "Email", "email", &draft.email, |d, v| d.email = v)?)?;
    let password_label = if editor.is_new() { "Contraseña" } else { "Nueva contraseña (opcional)" };
    append_child(&form, &text("user-password", password_label, "password", &draft.password, |d, v| d.password = v)?)?;

    let roles: Vec<(String, String)> = Role::ALL
        .iter()
        .map(|r| (r.as_str().to_string(), r.label().to_string()))
        .collect();
    let vm = admin.clone();
    append_child(&form, &select_field("user-role", "Rol", &roles, draft.role.as_str(), None, locked, move |value| {
        if let Some(role) = Role::parse(&value) {
            vm.update_user_draft(|d| d.role = role);
        }
    })?)?;
    let vm = admin.clone();
    append_child(&form, &checkbox_field("user-activo", "Activo", draft.activo, move |on| {
        vm.update_user_draft(|d| d.activo = on)
    })?)?;

    let submit = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn-primary")
        .flag("disabled", locked)?
        .text(if locked { "Guardando…" } else { "Guardar" })
        .build();
    append_child(&form, &ElementBuilder::new("div")?.class("form-actions").child(submit)?.build())?;
    let vm = admin.clone();
    on_submit(&form, move || vm.save_user())?;
    Ok(form)
}

pub fn render_users(vms: &ViewModels) -> Result<Element, JsValue> {
    let admin = &vms.admin;
    let page = ElementBuilder::new("div")?.class("admin-page").build();
    let vm = admin.clone();
    let new_btn = button("➕ Nuevo usuario", "btn-primary", false, move || vm.open_user_editor(None))?;
    append_child(&page, &page_header("Usuarios", vec![new_btn])?)?;

    let actions = |user: &AdminUser| render_row_actions(admin, user);
    append_child(&page, &render_remote_table("users", &admin.users, &USER_COLUMNS, Some(&actions))?)?;

    if let Some(editor) = admin.user_editor.get() {
        let title = if editor.is_new() { "Nuevo usuario" } else { "Editar usuario" };
        let vm = admin.clone();
        let modal = render_modal("user-editor", title, render_editor(admin, &editor)?, Rc::new(move || vm.close_editors()))?;
        append_child(&page, &modal)?;
    }
    Ok(page)
}
