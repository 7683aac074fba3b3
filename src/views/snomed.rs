// ============================================================================
// SNOMED VIEW - Catálogos de referencia
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, ElementBuilder};
use crate::routing::Route;
use crate::utils::constants::SNOMED_CATALOGS;
use crate::viewmodels::records::SNOMED_COLUMNS;
use crate::viewmodels::{SnomedViewModel, ViewModels};
use crate::views::shared::{page_header, render_remote_table};

pub fn render_snomed(vms: &ViewModels, catalog: &str) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("snomed-page").build();
    append_child(&page, &page_header("Catálogos SNOMED", Vec::new())?)?;

    let tabs = ElementBuilder::new("nav")?.class("tabs").build();
    for (key, label) in SNOMED_CATALOGS {
        let tab = ElementBuilder::new("a")?
            .class("tab")
            .class_if("active", key == catalog)?
            .attr("href", &format!("#{}", Route::Snomed(key.to_string()).path()))?
            .text(label)
            .build();
        append_child(&tabs, &tab)?;
    }
    append_child(&page, &tabs)?;

    if !SnomedViewModel::is_known_catalog(catalog) {
        append_child(
            &page,
            &ElementBuilder::new("p")?
                .class("banner banner-error")
                .text(&format!("Catálogo desconocido: {}", catalog))
                .build(),
        )?;
        return Ok(page);
    }

    append_child(&page, &render_remote_table("snomed", &vms.snomed.concepts, &SNOMED_COLUMNS, None)?)?;
    Ok(page)
}
