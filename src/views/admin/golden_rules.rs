// ============================================================================
// GOLDEN RULES VIEW - Reglas de oro agrupadas por sección
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, confirm, on_submit, ElementBuilder};
use crate::models::admin::GoldenRule;
use crate::viewmodels::admin_viewmodel::{Editor, RuleDraft};
use crate::viewmodels::list_pipeline;
use crate::viewmodels::records::{group_by_section, GOLDEN_RULE_COLUMNS};
use crate::viewmodels::{AdminViewModel, ViewModels};
use crate::views::shared::table::{empty_row, list_dispatch, render_head, render_row, render_toolbar};
use crate::views::shared::{
    append_banner, button, checkbox_field, loading, page_header, render_modal, render_pagination, text_field, textarea_field,
};

fn render_row_actions(admin: &AdminViewModel, rule: &GoldenRule) -> Result<Element, JsValue> {
    let group = ElementBuilder::new("div")?.class("btn-group").build();
    let (vm, target) = (admin.clone(), rule.clone());
    append_child(&group, &button("✏️ Editar", "btn-small", false, move || vm.open_rule_editor(Some(&target)))?)?;
    let (vm, id) = (admin.clone(), rule.id.clone());
    append_child(&group, &button("🗑️", "btn-small btn-danger", false, move || {
        if confirm("¿Eliminar esta regla de oro?") {
            vm.delete_rule(&id);
        }
    })?)?;
    Ok(group)
}

fn render_editor(admin: &AdminViewModel, editor: &Editor<RuleDraft>) -> Result<Element, JsValue> {
    let form = ElementBuilder::new("form")?.class("entity-form").build();
    append_banner(&form, "error", editor.error.as_deref())?;
    let draft = &editor.draft;
    let locked = editor.saving;

    let vm = admin.clone();
    append_child(&form, &text_field("rule-seccion", "Sección", "text", &draft.seccion, locked, move |v| {
        vm.update_rule_draft(|d| d.seccion = v)
    })?)?;
    let vm = admin.clone();
    append_child(&form, &textarea_field("rule-texto", "Regla", &draft.texto, 4, locked, move |v| {
        vm.update_rule_draft(|d| d.texto = v)
    })?)?;
    let vm = admin.clone();
    append_child(&form, &text_field("rule-prioridad", "Prioridad", "number", &draft.prioridad, locked, move |v| {
        vm.update_rule_draft(|d| d.prioridad = v)
    })?)?;
    let vm = admin.clone();
    append_child(&form, &checkbox_field("rule-activa", "Activa", draft.activa, move |on| {
        vm.update_rule_draft(|d| d.activa = on)
    })?)?;

    let submit = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn-primary")
        .flag("disabled", locked)?
        .text(if locked { "Guardando…" } else { "Guardar" })
        .build();
    append_child(&form, &ElementBuilder::new("div")?.class("form-actions").child(submit)?.build())?;
    let vm = admin.clone();
    on_submit(&form, move || vm.save_rule())?;
    Ok(form)
}

fn render_grouped_table(admin: &AdminViewModel) -> Result<Element, JsValue> {
    let id = "rules";
    let dispatch = list_dispatch(&admin.rules);
    let actions = |rule: &GoldenRule| render_row_actions(admin, rule);
    let colspan = GOLDEN_RULE_COLUMNS.len() + 1;

    admin.rules.state().with(|s| {
        let view = ElementBuilder::new("div")?.class("list-view").build();
        append_child(&view, &render_toolbar(id, &s.search_draft, s.loading && s.loaded, &dispatch)?)?;
        append_banner(&view, "error", s.error.as_deref())?;
        if s.loading && !s.loaded {
            append_child(&view, &loading("Cargando reglas…")?)?;
            return Ok(view);
        }

        let page = list_pipeline::apply(&s.records, &s.query);
        let table = ElementBuilder::new("table")?.class("data-table grouped").build();
        append_child(&table, &render_head(id, &GOLDEN_RULE_COLUMNS, &s.query, true, &dispatch)?)?;
        let tbody = ElementBuilder::new("tbody")?.build();
        for (section, rules) in group_by_section(&page.rows) {
            let header = ElementBuilder::new("tr")?.class("group-row").build();
            let title = ElementBuilder::new("td")?
                .attr("colspan", &colspan.to_string())?
                .text(&format!("{} ({})", section, rules.len()))
                .build();
            append_child(&header, &title)?;
            append_child(&tbody, &header)?;
            for rule in rules {
                append_child(&tbody, &render_row(rule, &GOLDEN_RULE_COLUMNS, Some(&actions))?)?;
            }
        }
        if let Some(reason) = page.empty_reason {
            append_child(&tbody, &empty_row(reason, colspan)?)?;
        }
        append_child(&table, &tbody)?;
        append_child(&view, &table)?;
        append_child(
            &view,
            &render_pagination(id, page.page, page.total_pages, &page.range_label(), page.page_size, dispatch.clone())?,
        )?;
        Ok(view)
    })
}

pub fn render_golden_rules(vms: &ViewModels) -> Result<Element, JsValue> {
    let admin = &vms.admin;
    let page = ElementBuilder::new("div")?.class("admin-page").build();
    let vm = admin.clone();
    let new_btn = button("➕ Nueva regla", "btn-primary", false, move || vm.open_rule_editor(None))?;
    append_child(&page, &page_header("Reglas de oro", vec![new_btn])?)?;
    append_child(&page, &render_grouped_table(admin)?)?;

    if let Some(editor) = admin.rule_editor.get() {
        let title = if editor.is_new() { "Nueva regla" } else { "Editar regla" };
        let vm = admin.clone();
        let modal = render_modal("rule-editor", title, render_editor(admin, &editor)?, Rc::new(move || vm.close_editors()))?;
        append_child(&page, &modal)?;
    }
    Ok(page)
}
