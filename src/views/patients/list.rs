// ============================================================================
// PATIENT LIST VIEW - Listado paginado en servidor
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, confirm, ElementBuilder};
use crate::models::hce::HceImportResult;
use crate::models::patient::Patient;
use crate::routing::{navigate, Route};
use crate::services::patient_service::ESTADO_FILTER;
use crate::viewmodels::hce_viewmodel::OnImported;
use crate::viewmodels::patients_viewmodel::{PatientListState, PATIENT_ESTADOS};
use crate::viewmodels::ViewModels;
use crate::views::hce::render_hce_modals;
use crate::views::shared::table::empty_row;
use crate::views::shared::{append_banner, button, loading, page_header, render_pagination, render_search_box, render_select, Dispatch};

const COLUMNS: [&str; 6] = ["Apellido", "Nombre", "Documento", "Historia", "Estado", "Acciones"];

/// Id que usa el editor para el open-or-create de una EPC nueva
const NEW_EPC_ID: &str = "nueva";

fn render_actions(vms: &ViewModels, patient: &Patient) -> Result<Element, JsValue> {
    let group = ElementBuilder::new("div")?.class("btn-group").build();

    let id = patient.id.clone();
    append_child(&group, &button("✏️ Editar", "btn-small", false, move || {
        navigate(&Route::PatientEdit(id.clone()).path())
    })?)?;

    let id = patient.id.clone();
    append_child(&group, &button("📄 EPC", "btn-small", false, move || {
        navigate(&Route::Epc { id: NEW_EPC_ID.to_string(), patient_id: Some(id.clone()) }.path())
    })?)?;

    let (hce, id) = (vms.hce.clone(), patient.id.clone());
    append_child(&group, &button("📥 Importar HCE", "btn-small", false, move || hce.open_import(&id))?)?;

    let (hce, id) = (vms.hce.clone(), patient.id.clone());
    append_child(&group, &button("📖 Historia", "btn-small", false, move || hce.open_reader(&id))?)?;

    let (patients, target) = (vms.patients.clone(), patient.clone());
    append_child(&group, &button("🗑️", "btn-small btn-danger", false, move || {
        if confirm(&format!("¿Eliminar al paciente {}?", target.full_name())) {
            patients.delete(&target);
        }
    })?)?;
    Ok(group)
}

fn render_table(vms: &ViewModels, s: &PatientListState) -> Result<Element, JsValue> {
    let table = ElementBuilder::new("table")?.class("data-table").build();
    let head = ElementBuilder::new("tr")?.build();
    for title in COLUMNS {
        append_child(&head, &ElementBuilder::new("th")?.text(title).build())?;
    }
    append_child(&table, &ElementBuilder::new("thead")?.child(head)?.build())?;

    let tbody = ElementBuilder::new("tbody")?.build();
    if let Some(page) = &s.page {
        for patient in &page.items {
            let tr = ElementBuilder::new("tr")?.build();
            let cells = [
                patient.apellido.as_str(),
                patient.nombre.as_str(),
                patient.documento.as_deref().unwrap_or(""),
                patient.nro_historia.as_deref().unwrap_or(""),
                patient.estado.as_deref().unwrap_or(""),
            ];
            for text in cells {
                append_child(&tr, &ElementBuilder::new("td")?.text(text).build())?;
            }
            let actions = ElementBuilder::new("td")?.class("row-actions").child(render_actions(vms, patient)?)?.build();
            append_child(&tr, &actions)?;
            append_child(&tbody, &tr)?;
        }
    }
    if let Some(reason) = s.empty_reason() {
        append_child(&tbody, &empty_row(reason, COLUMNS.len())?)?;
    }
    append_child(&table, &tbody)?;
    Ok(table)
}

pub fn render_patient_list(vms: &ViewModels) -> Result<Element, JsValue> {
    let s = vms.patients.list.get();
    let dispatch: Dispatch = {
        let patients = vms.patients.clone();
        Rc::new(move |action| patients.dispatch(action))
    };

    let page = ElementBuilder::new("div")?.class("patients-page").build();
    let new_btn = button("➕ Nuevo paciente", "btn-primary", false, || navigate(&Route::PatientNew.path()))?;
    append_child(&page, &page_header("Pacientes", vec![new_btn])?)?;
    append_banner(&page, "notice", s.notice.as_deref())?;
    append_banner(&page, "error", s.error.as_deref())?;

    let toolbar = ElementBuilder::new("div")?.class("list-toolbar").build();
    append_child(
        &toolbar,
        &render_search_box("patients-search", &s.search_draft, "Buscar por nombre, documento o historia…", dispatch.clone())?,
    )?;
    let estados: Vec<(String, String)> = PATIENT_ESTADOS
        .iter()
        .map(|(value, label)| (value.to_string(), label.to_string()))
        .collect();
    let patients = vms.patients.clone();
    let estado = render_select(
        "patients-estado",
        &estados,
        s.query.filter(ESTADO_FILTER).unwrap_or(""),
        Some("Todos los estados"),
        false,
        move |value| patients.set_estado(&value),
    )?;
    append_child(&toolbar, &estado)?;
    if s.loading && s.page.is_some() {
        append_child(&toolbar, &ElementBuilder::new("span")?.class("refreshing").text("Actualizando…").build())?;
    }
    append_child(&page, &toolbar)?;

    if s.loading && s.page.is_none() {
        append_child(&page, &loading("Cargando pacientes…")?)?;
    } else {
        append_child(&page, &render_table(vms, &s)?)?;
        if let Some(p) = &s.page {
            let label = format!("{} pacientes", p.total);
            append_child(
                &page,
                &render_pagination("patients", s.query.page(), p.total_pages(), &label, s.query.page_size(), dispatch)?,
            )?;
        }
    }

    let patients = vms.patients.clone();
    let on_imported: OnImported = Rc::new(move |result: HceImportResult| {
        let message = result
            .message
            .unwrap_or_else(|| format!("{} entradas importadas desde la HCE", result.imported_entries));
        patients.list.update_silent(|s| s.notice = Some(message));
        patients.fetch();
    });
    for modal in render_hce_modals(&vms.hce, on_imported)? {
        append_child(&page, &modal)?;
    }
    Ok(page)
}
