// ============================================================================
// EPC EDITOR VIEW - Formulario de epicrisis con generación IA e impresión
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, ElementBuilder};
use crate::models::hce::HceImportResult;
use crate::routing::{navigate, Route};
use crate::viewmodels::epc_viewmodel::{EpcEditorState, EpcField, FieldKind};
use crate::viewmodels::hce_viewmodel::OnImported;
use crate::viewmodels::ViewModels;
use crate::views::hce::render_hce_modals;
use crate::views::shared::{append_banner, button, loading, page_header, select_field, text_field, textarea_field};

fn render_field(vms: &ViewModels, s: &EpcEditorState, field: EpcField) -> Result<Element, JsValue> {
    let id = format!("epc-{}", field.key());
    let value = s.form.get(field);
    let locked = s.saving;
    let epc = vms.epc.clone();
    let on_edit = move |value: String| epc.edit(field, &value);
    match field.kind() {
        FieldKind::Date => text_field(&id, field.label(), "date", value, locked, on_edit),
        FieldKind::Text => text_field(&id, field.label(), "text", value, locked, on_edit),
        FieldKind::Multiline => textarea_field(&id, field.label(), value, 6, locked, on_edit),
        FieldKind::Staff => {
            let options: Vec<(String, String)> = s
                .staff()
                .iter()
                .map(|m| {
                    let label = match &m.especialidad {
                        Some(esp) => format!("{} ({})", m.nombre, esp),
                        None => m.nombre.clone(),
                    };
                    (m.id.clone(), label)
                })
                .collect();
            select_field(&id, field.label(), &options, value, Some("Seleccione…"), locked, on_edit)
        }
    }
}

fn render_summary(s: &EpcEditorState) -> Result<Option<Element>, JsValue> {
    let Some(ctx) = &s.context else {
        return Ok(None);
    };
    let summary = ElementBuilder::new("div")?.class("epc-summary").build();
    if let Some(patient) = &ctx.patient {
        let documento = patient.documento.as_deref().unwrap_or("s/d");
        append_child(
            &summary,
            &ElementBuilder::new("p")?
                .class("epc-patient")
                .text(&format!("🧑 {} · DNI {}", patient.full_name(), documento))
                .build(),
        )?;
    }
    if let Some(admission) = &ctx.admission {
        let servicio = admission.servicio.as_deref().unwrap_or("-");
        let cama = admission.cama.as_deref().unwrap_or("-");
        append_child(
            &summary,
            &ElementBuilder::new("p")?
                .class("epc-admission")
                .text(&format!("🛏️ Servicio {} · Cama {}", servicio, cama))
                .build(),
        )?;
    }
    let estado = ElementBuilder::new("span")?
        .class("badge")
        .class_if("badge-final", s.finalized)?
        .text(&ctx.epc.estado)
        .build();
    append_child(&summary, &estado)?;
    Ok(Some(summary))
}

pub fn render_epc_editor(vms: &ViewModels) -> Result<Element, JsValue> {
    let s = vms.epc.state.get();
    let page = ElementBuilder::new("div")?.class("epc-page").build();

    let back = button("↩ Volver", "btn-secondary", false, || navigate(&Route::Patients.path()))?;
    if s.loading {
        append_child(&page, &page_header("Epicrisis", vec![back])?)?;
        append_child(&page, &loading("Cargando epicrisis…")?)?;
        return Ok(page);
    }

    let mut actions = Vec::new();
    if s.context.is_some() {
        let epc = vms.epc.clone();
        let generate_label = if s.generating { "⏳ Generando…" } else { "✨ Generar con IA" };
        actions.push(button(generate_label, "btn-secondary", s.generating || s.saving, move || epc.generate())?);

        if let Some(patient_id) = s.patient_id().map(str::to_string) {
            let hce = vms.hce.clone();
            actions.push(button("📖 Historia clínica", "btn-secondary", false, move || hce.open_reader(&patient_id))?);
        }

        let epc = vms.epc.clone();
        actions.push(button("🖨️ Imprimir", "btn-secondary", false, move || epc.print())?);
    }
    actions.push(back);
    append_child(&page, &page_header("Epicrisis", actions)?)?;

    append_banner(&page, "notice", s.notice.as_deref())?;
    append_banner(&page, "error", s.error.as_deref())?;
    if s.context.is_none() {
        return Ok(page);
    }

    if let Some(summary) = render_summary(&s)? {
        append_child(&page, &summary)?;
    }

    let form = ElementBuilder::new("form")?.class("entity-form epc-form").build();
    for field in EpcField::ALL {
        append_child(&form, &render_field(vms, &s, field)?)?;
    }
    let epc = vms.epc.clone();
    let save_label = if s.saving { "Guardando…" } else { "💾 Guardar y finalizar" };
    let save = button(save_label, "btn-primary", s.saving || s.generating, move || epc.save())?;
    let form_actions = ElementBuilder::new("div")?.class("form-actions").child(save)?.build();
    append_child(&form, &form_actions)?;
    append_child(&page, &form)?;

    // Desde el editor solo se abre el lector; la importación vive en el listado
    let noop: OnImported = Rc::new(|_: HceImportResult| {});
    for modal in render_hce_modals(&vms.hce, noop)? {
        append_child(&page, &modal)?;
    }
    Ok(page)
}
