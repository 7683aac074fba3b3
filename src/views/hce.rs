// ============================================================================
// HCE VIEWS - Modal de importación de episodios y lector de historia clínica
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, ElementBuilder};
use crate::viewmodels::hce_viewmodel::{HceImportState, HceReaderState, OnImported};
use crate::viewmodels::HceViewModel;
use crate::views::shared::{append_banner, button, loading, render_modal};

fn cell(text: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("td")?.text(text).build())
}

fn render_import_body(vm: &HceViewModel, s: &HceImportState, on_imported: OnImported) -> Result<Element, JsValue> {
    let body = ElementBuilder::new("div")?.class("modal-body").build();
    append_banner(&body, "error", s.error.as_deref())?;
    if s.loading {
        append_child(&body, &loading("Consultando episodios en el WebService del hospital…")?)?;
        return Ok(body);
    }
    if s.episodes.is_empty() {
        append_child(&body, &ElementBuilder::new("p")?.class("empty").text("Sin episodios para importar.").build())?;
        return Ok(body);
    }

    let table = ElementBuilder::new("table")?.class("data-table").build();
    let head = ElementBuilder::new("tr")?.build();
    for title in ["Ingreso", "Egreso", "Servicio", "Diagnóstico", ""] {
        append_child(&head, &ElementBuilder::new("th")?.text(title).build())?;
    }
    append_child(&table, &ElementBuilder::new("thead")?.child(head)?.build())?;

    let tbody = ElementBuilder::new("tbody")?.build();
    let busy = s.importing.is_some();
    for episode in &s.episodes {
        let tr = ElementBuilder::new("tr")?.build();
        append_child(&tr, &cell(&episode.fecha_ingreso)?)?;
        append_child(&tr, &cell(episode.fecha_egreso.as_deref().unwrap_or("-"))?)?;
        append_child(&tr, &cell(episode.servicio.as_deref().unwrap_or("-"))?)?;
        append_child(&tr, &cell(episode.diagnostico.as_deref().unwrap_or("-"))?)?;

        let action = ElementBuilder::new("td")?.build();
        let this_row = s.importing.as_deref() == Some(episode.id.as_str());
        let label = match (this_row, episode.importado) {
            (true, _) => "Importando…",
            (false, true) => "Reimportar",
            (false, false) => "Importar",
        };
        let vm = vm.clone();
        let on_imported = on_imported.clone();
        let episode_id = episode.id.clone();
        let btn = button(label, "btn-primary", busy, move || vm.import_episode(&episode_id, on_imported.clone()))?;
        append_child(&action, &btn)?;
        append_child(&tr, &action)?;
        append_child(&tbody, &tr)?;
    }
    append_child(&table, &tbody)?;
    append_child(&body, &table)?;
    Ok(body)
}

fn render_reader_body(s: &HceReaderState) -> Result<Element, JsValue> {
    let body = ElementBuilder::new("div")?.class("modal-body").build();
    append_banner(&body, "error", s.error.as_deref())?;
    if s.loading {
        append_child(&body, &loading("Cargando historia clínica…")?)?;
    } else if s.text.is_empty() {
        append_child(&body, &ElementBuilder::new("p")?.class("empty").text("La historia clínica no tiene entradas.").build())?;
    } else {
        append_child(&body, &ElementBuilder::new("pre")?.class("clinical-text").text(&s.text).build())?;
    }
    Ok(body)
}

/// Modales abiertos (0, 1 o 2) para agregar al final de la pantalla
pub fn render_hce_modals(vm: &HceViewModel, on_imported: OnImported) -> Result<Vec<Element>, JsValue> {
    let mut modals = Vec::new();

    let import = vm.import.get();
    if import.open {
        let body = render_import_body(vm, &import, on_imported)?;
        let close_vm = vm.clone();
        modals.push(render_modal("hce-import-modal", "Importar desde HCE", body, Rc::new(move || close_vm.close_import()))?);
    }

    let reader = vm.reader.get();
    if reader.open {
        let body = render_reader_body(&reader)?;
        let close_vm = vm.clone();
        modals.push(render_modal("hce-reader-modal", "Historia clínica", body, Rc::new(move || close_vm.close_reader()))?);
    }
    Ok(modals)
}
