// ============================================================================
// COSTS VIEW - Costos de generación por rango de fechas
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, ElementBuilder};
use crate::models::admin::CostTotals;
use crate::viewmodels::list_pipeline::filter_and_sort;
use crate::viewmodels::records::COST_COLUMNS;
use crate::viewmodels::ViewModels;
use crate::views::shared::{button, page_header, render_remote_table, text_field};

fn render_totals(totals: &CostTotals) -> Result<Element, JsValue> {
    let bar = ElementBuilder::new("div")?.class("cost-totals").build();
    let items = [
        ("Tokens entrada", totals.tokens_entrada.to_string()),
        ("Tokens salida", totals.tokens_salida.to_string()),
        ("Costo total", format!("USD {:.2}", totals.costo_usd)),
    ];
    for (label, value) in items {
        let item = ElementBuilder::new("div")?.class("cost-total").build();
        append_child(&item, &ElementBuilder::new("span")?.class("stat-label").text(label).build())?;
        append_child(&item, &ElementBuilder::new("strong")?.class("stat-value").text(&value).build())?;
        append_child(&bar, &item)?;
    }
    Ok(bar)
}

pub fn render_costs(vms: &ViewModels) -> Result<Element, JsValue> {
    let monitoring = &vms.monitoring;
    let range = monitoring.cost_range.get();

    let page = ElementBuilder::new("div")?.class("admin-page").build();
    append_child(&page, &page_header("Costos", Vec::new())?)?;

    let filters = ElementBuilder::new("div")?.class("range-filters").build();
    let vm = monitoring.clone();
    append_child(&filters, &text_field("costs-desde", "Desde", "date", &range.desde, false, move |v| {
        vm.set_cost_range(|r| r.desde = v)
    })?)?;
    let vm = monitoring.clone();
    append_child(&filters, &text_field("costs-hasta", "Hasta", "date", &range.hasta, false, move |v| {
        vm.set_cost_range(|r| r.hasta = v)
    })?)?;
    let vm = monitoring.clone();
    append_child(&filters, &button("Consultar", "btn-primary", false, move || vm.load_costs())?)?;
    append_child(&page, &filters)?;

    // Totales sobre las filas que pasan búsqueda y filtros
    let totals = monitoring.costs.state().with(|s| {
        s.loaded.then(|| CostTotals::from_rows(filter_and_sort(&s.records, &s.query)))
    });
    if let Some(totals) = totals {
        append_child(&page, &render_totals(&totals)?)?;
    }

    append_child(&page, &render_remote_table("costs", &monitoring.costs, &COST_COLUMNS, None)?)?;
    Ok(page)
}
