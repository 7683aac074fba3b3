// ============================================================================
// FEEDBACK VIEW - Visor en pestañas: resumen, por sección, comentarios
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, ElementBuilder};
use crate::models::feedback::{FeedbackSummary, FeedbackTab, FeedbackTabKind};
use crate::viewmodels::monitoring_viewmodel::FeedbackState;
use crate::viewmodels::records::{FEEDBACK_COMMENT_COLUMNS, FEEDBACK_SECTION_COLUMNS};
use crate::viewmodels::ViewModels;
use crate::views::shared::{append_banner, button, loading, page_header, render_records_table, render_search_box, Dispatch};

fn metric(value: Option<f64>, suffix: &str) -> String {
    value.map(|v| format!("{:.1}{}", v, suffix)).unwrap_or_else(|| "-".to_string())
}

fn render_summary(summary: &FeedbackSummary) -> Result<Element, JsValue> {
    let grid = ElementBuilder::new("div")?.class("stat-grid").build();
    let cards = [
        ("EPC totales", summary.total_epcs.to_string()),
        ("Con feedback", summary.con_feedback.to_string()),
        ("Puntaje promedio", metric(summary.puntaje_promedio, "")),
        ("Tasa de edición", metric(summary.tasa_edicion, " %")),
    ];
    for (label, value) in cards {
        let card = ElementBuilder::new("div")?.class("stat-card").build();
        append_child(&card, &ElementBuilder::new("span")?.class("stat-value").text(&value).build())?;
        append_child(&card, &ElementBuilder::new("span")?.class("stat-label").text(label).build())?;
        append_child(&grid, &card)?;
    }
    Ok(grid)
}

fn render_tab_content(s: &FeedbackState, dispatch: &Dispatch) -> Result<Element, JsValue> {
    let content = ElementBuilder::new("div")?.class("tab-content").build();
    append_banner(&content, "error", s.error.as_deref())?;
    if s.loading {
        append_child(&content, &loading("Cargando feedback…")?)?;
        return Ok(content);
    }
    let tabular = |content: &Element| -> Result<(), JsValue> {
        let toolbar = ElementBuilder::new("div")?.class("list-toolbar").build();
        append_child(&toolbar, &render_search_box("feedback-search", s.query.search(), "Buscar…", dispatch.clone())?)?;
        append_child(content, &toolbar)
    };
    match &s.tab {
        None => {}
        Some(FeedbackTab::Resumen(summary)) => append_child(&content, &render_summary(summary)?)?,
        Some(FeedbackTab::PorSeccion(rows)) => {
            tabular(&content)?;
            append_child(&content, &render_records_table("feedback-sections", rows, &s.query, &FEEDBACK_SECTION_COLUMNS, None, dispatch)?)?;
        }
        Some(FeedbackTab::Comentarios(rows)) => {
            tabular(&content)?;
            append_child(&content, &render_records_table("feedback-comments", rows, &s.query, &FEEDBACK_COMMENT_COLUMNS, None, dispatch)?)?;
        }
    }
    Ok(content)
}

pub fn render_feedback(vms: &ViewModels) -> Result<Element, JsValue> {
    let monitoring = &vms.monitoring;
    let s = monitoring.feedback.get();
    let dispatch: Dispatch = {
        let vm = monitoring.clone();
        Rc::new(move |action| vm.feedback_action(action))
    };

    let page = ElementBuilder::new("div")?.class("admin-page").build();
    append_child(&page, &page_header("Feedback", Vec::new())?)?;

    let tabs = ElementBuilder::new("nav")?.class("tabs").attr("role", "tablist")?.build();
    for kind in FeedbackTabKind::ALL {
        let vm = monitoring.clone();
        let class = if kind == s.active { "tab active" } else { "tab" };
        append_child(&tabs, &button(kind.label(), class, false, move || vm.select_feedback_tab(kind))?)?;
    }
    append_child(&page, &tabs)?;
    append_child(&page, &render_tab_content(&s, &dispatch)?)?;
    Ok(page)
}
