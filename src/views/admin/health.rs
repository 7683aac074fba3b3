// ============================================================================
// HEALTH VIEW - Estado de los servicios del backend
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, ElementBuilder};
use crate::models::admin::{HealthSummary, ServiceState};
use crate::viewmodels::records::HEALTH_COLUMNS;
use crate::viewmodels::ViewModels;
use crate::views::shared::{button, page_header, render_remote_table};

fn stat_card(label: &str, count: usize, state: ServiceState) -> Result<Element, JsValue> {
    let card = ElementBuilder::new("div")?.class(&format!("stat-card {}", state.css_class())).build();
    append_child(&card, &ElementBuilder::new("span")?.class("stat-value").text(&count.to_string()).build())?;
    append_child(&card, &ElementBuilder::new("span")?.class("stat-label").text(label).build())?;
    Ok(card)
}

pub fn render_health(vms: &ViewModels) -> Result<Element, JsValue> {
    let monitoring = &vms.monitoring;
    let page = ElementBuilder::new("div")?.class("admin-page").build();
    let vm = monitoring.clone();
    let refresh = button("🔄 Actualizar", "btn-secondary", false, move || vm.load_health())?;
    append_child(&page, &page_header("Estado del sistema", vec![refresh])?)?;

    let (summary, loaded) = monitoring
        .health
        .state()
        .with(|s| (HealthSummary::from_statuses(&s.records), s.loaded));
    if loaded {
        let overall = summary.overall();
        let banner = ElementBuilder::new("div")?
            .class(&format!("health-overall {}", overall.css_class()))
            .text(&format!("Estado general: {}", overall.label()))
            .build();
        append_child(&page, &banner)?;

        let cards = ElementBuilder::new("div")?.class("stat-grid").build();
        append_child(&cards, &stat_card("OK", summary.ok, ServiceState::Ok)?)?;
        append_child(&cards, &stat_card("Degradados", summary.degradado, ServiceState::Degradado)?)?;
        append_child(&cards, &stat_card("Caídos", summary.caido, ServiceState::Caido)?)?;
        append_child(&page, &cards)?;
    }

    append_child(&page, &render_remote_table("health", &monitoring.health, &HEALTH_COLUMNS, None)?)?;
    Ok(page)
}
