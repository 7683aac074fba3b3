// ============================================================================
// PATIENT FORM VIEW - Alta / edición
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use crate::dom::{append_child, on_submit, ElementBuilder};
use crate::routing::{navigate, Route};
use crate::viewmodels::patients_viewmodel::PatientField;
use crate::viewmodels::ViewModels;
use crate::views::shared::{button, loading, page_header, text_field};

pub fn render_patient_form(vms: &ViewModels) -> Result<Element, JsValue> {
    let s = vms.patients.form.get();
    let title = if s.patient_id.is_some() { "Editar paciente" } else { "Nuevo paciente" };

    let page = ElementBuilder::new("div")?.class("patient-form-page").build();
    append_child(&page, &page_header(title, Vec::new())?)?;

    if s.loading {
        append_child(&page, &loading("Cargando paciente…")?)?;
        return Ok(page);
    }

    if !s.errors.is_empty() {
        let list = ElementBuilder::new("ul")?.class("banner banner-error").attr("role", "alert")?.build();
        for error in &s.errors {
            append_child(&list, &ElementBuilder::new("li")?.text(error).build())?;
        }
        append_child(&page, &list)?;
    }

    let form = ElementBuilder::new("form")?.class("entity-form").build();
    for (index, field) in PatientField::ALL.into_iter().enumerate() {
        let patients = vms.patients.clone();
        let input = text_field(
            &format!("patient-field-{}", index),
            field.label(),
            field.input_type(),
            &field.value(&s.input),
            s.saving,
            move |value| patients.set_field(field, &value),
        )?;
        append_child(&form, &input)?;
    }

    let actions = ElementBuilder::new("div")?.class("form-actions").build();
    let submit = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn-primary")
        .flag("disabled", s.saving)?
        .text(if s.saving { "Guardando…" } else { "💾 Guardar" })
        .build();
    append_child(&actions, &submit)?;
    append_child(&actions, &button("Cancelar", "btn-secondary", false, || navigate(&Route::Patients.path()))?)?;
    append_child(&form, &actions)?;

    let patients = vms.patients.clone();
    on_submit(&form, move || {
        let patients = patients.clone();
        spawn_local(async move {
            if patients.save().await {
                navigate(&Route::Patients.path());
            }
        });
    })?;

    append_child(&page, &form)?;
    Ok(page)
}
