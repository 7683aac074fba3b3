// ============================================================================
// TABLE - Tabla con búsqueda, filtros por columna, orden y paginación
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::config::CONFIG;
use crate::dom::{append_child, on_click, on_input, ElementBuilder};
use crate::state::list_state::{ListAction, ListViewState, SortDirection};
use crate::viewmodels::list_pipeline::{self, EmptyReason, ListRecord};
use crate::viewmodels::records::Column;
use crate::viewmodels::remote_list::RemoteList;
use crate::views::shared::form::{append_banner, button, loading, render_select};

/// Destino de las acciones de la tabla
pub type Dispatch = Rc<dyn Fn(ListAction)>;

/// Acciones por fila (editar, borrar...)
pub type RowActions<'a, T> = &'a dyn Fn(&T) -> Result<Element, JsValue>;

pub fn render_search_box(id: &str, draft: &str, placeholder: &str, dispatch: Dispatch) -> Result<Element, JsValue> {
    let input = ElementBuilder::new("input")?
        .id(id)?
        .class("search-input")
        .attr("type", "search")?
        .attr("placeholder", placeholder)?
        .attr("value", draft)?
        .build();
    on_input(&input, move |value| dispatch(ListAction::Search(value)))?;
    Ok(input)
}

/// Paginador: anterior / siguiente, rango y tamaño de página
pub fn render_pagination(id: &str, page: usize, total_pages: usize, label: &str, page_size: usize, dispatch: Dispatch) -> Result<Element, JsValue> {
    let pager = ElementBuilder::new("div")?.class("pagination").build();

    let prev = {
        let dispatch = dispatch.clone();
        button("‹ Anterior", "btn-page", page <= 1, move || dispatch(ListAction::Page(page.saturating_sub(1).max(1))))?
    };
    let info = ElementBuilder::new("span")?
        .class("page-info")
        .text(&format!("Página {} de {} · {}", page, total_pages, label))
        .build();
    let next = {
        let dispatch = dispatch.clone();
        button("Siguiente ›", "btn-page", page >= total_pages, move || dispatch(ListAction::Page(page + 1)))?
    };

    let options: Vec<(String, String)> = CONFIG
        .list_config
        .page_size_options
        .iter()
        .map(|size| (size.to_string(), format!("{} por página", size)))
        .collect();
    let size_select = render_select(&format!("{}-page-size", id), &options, &page_size.to_string(), None, false, move |value| {
        if let Ok(size) = value.parse::<usize>() {
            dispatch(ListAction::PageSize(size));
        }
    })?;

    append_child(&pager, &prev)?;
    append_child(&pager, &info)?;
    append_child(&pager, &next)?;
    append_child(&pager, &size_select)?;
    Ok(pager)
}

pub fn render_head(id: &str, columns: &[Column], query: &ListViewState, with_actions: bool, dispatch: &Dispatch) -> Result<Element, JsValue> {
    let thead = ElementBuilder::new("thead")?.build();
    let titles = ElementBuilder::new("tr")?.build();
    for column in columns {
        let sorted = query.sort_key() == Some(column.key);
        let arrow = if sorted { query.sort_direction().arrow() } else { "" };
        let th = ElementBuilder::new("th")?
            .class("sortable")
            .class_if("sorted", sorted)?
            .attr("aria-sort", match (sorted, query.sort_direction()) {
                (false, _) => "none",
                (true, SortDirection::Asc) => "ascending",
                (true, SortDirection::Desc) => "descending",
            })?
            .text(&format!("{} {}", column.label, arrow))
            .build();
        let dispatch = dispatch.clone();
        let (key, direction) = (column.key.to_string(), column.default_direction);
        on_click(&th, move |_| dispatch(ListAction::ToggleSort(key.clone(), direction)))?;
        append_child(&titles, &th)?;
    }
    if with_actions {
        append_child(&titles, &ElementBuilder::new("th")?.text("Acciones").build())?;
    }
    append_child(&thead, &titles)?;

    if columns.iter().any(|c| c.filterable) {
        let filters = ElementBuilder::new("tr")?.class("filter-row").build();
        for column in columns {
            let th = ElementBuilder::new("th")?.build();
            if column.filterable {
                let input = ElementBuilder::new("input")?
                    .id(&format!("{}-filter-{}", id, column.key))?
                    .class("filter-input")
                    .attr("placeholder", "Filtrar…")?
                    .attr("value", query.filter(column.key).unwrap_or(""))?
                    .build();
                let dispatch = dispatch.clone();
                let key = column.key.to_string();
                on_input(&input, move |value| dispatch(ListAction::Filter(key.clone(), value)))?;
                append_child(&th, &input)?;
            }
            append_child(&filters, &th)?;
        }
        if with_actions {
            append_child(&filters, &ElementBuilder::new("th")?.build())?;
        }
        append_child(&thead, &filters)?;
    }
    Ok(thead)
}

/// Fila única con el motivo de la tabla vacía
pub fn empty_row(reason: EmptyReason, colspan: usize) -> Result<Element, JsValue> {
    let tr = ElementBuilder::new("tr")?.class("empty-row").build();
    let td = ElementBuilder::new("td")?
        .attr("colspan", &colspan.to_string())?
        .text(reason.message())
        .build();
    append_child(&tr, &td)?;
    Ok(tr)
}

/// Dispatch que enruta las acciones de la tabla al RemoteList
pub fn list_dispatch<T: 'static>(list: &RemoteList<T>) -> Dispatch {
    let list = list.clone();
    Rc::new(move |action| list.dispatch(action))
}

/// Búsqueda global, limpiar filtros e indicador de recarga
pub fn render_toolbar(id: &str, search_draft: &str, refreshing: bool, dispatch: &Dispatch) -> Result<Element, JsValue> {
    let toolbar = ElementBuilder::new("div")?.class("list-toolbar").build();
    append_child(&toolbar, &render_search_box(&format!("{}-search", id), search_draft, "Buscar…", dispatch.clone())?)?;
    let clear = {
        let dispatch = dispatch.clone();
        button("Limpiar filtros", "btn-secondary", false, move || dispatch(ListAction::ClearFilters))?
    };
    append_child(&toolbar, &clear)?;
    if refreshing {
        append_child(&toolbar, &ElementBuilder::new("span")?.class("refreshing").text("Actualizando…").build())?;
    }
    Ok(toolbar)
}

/// Fila de datos: una celda por columna más las acciones
pub fn render_row<T: ListRecord>(record: &T, columns: &[Column], actions: Option<RowActions<'_, T>>) -> Result<Element, JsValue> {
    let tr = ElementBuilder::new("tr")?.build();
    for column in columns {
        let td = ElementBuilder::new("td")?.text(&record.field(column.key).display()).build();
        append_child(&tr, &td)?;
    }
    if let Some(actions) = actions {
        let td = ElementBuilder::new("td")?.class("row-actions").build();
        append_child(&td, &actions(record)?)?;
        append_child(&tr, &td)?;
    }
    Ok(tr)
}

/// Tabla + paginador sobre registros en memoria (pipeline en cliente)
pub fn render_records_table<T: ListRecord>(
    id: &str,
    records: &[T],
    query: &ListViewState,
    columns: &[Column],
    actions: Option<RowActions<'_, T>>,
    dispatch: &Dispatch,
) -> Result<Element, JsValue> {
    let wrapper = ElementBuilder::new("div")?.class("table-wrapper").build();
    let page = list_pipeline::apply(records, query);
    let table = ElementBuilder::new("table")?.class("data-table").build();
    append_child(&table, &render_head(id, columns, query, actions.is_some(), dispatch)?)?;

    let tbody = ElementBuilder::new("tbody")?.build();
    for record in &page.rows {
        append_child(&tbody, &render_row(*record, columns, actions)?)?;
    }
    if let Some(reason) = page.empty_reason {
        let colspan = columns.len() + usize::from(actions.is_some());
        append_child(&tbody, &empty_row(reason, colspan)?)?;
    }
    append_child(&table, &tbody)?;
    append_child(&wrapper, &table)?;
    append_child(
        &wrapper,
        &render_pagination(id, page.page, page.total_pages, &page.range_label(), page.page_size, dispatch.clone())?,
    )?;
    Ok(wrapper)
}

/// Tabla completa sobre un RemoteList: los datos se transforman en cliente
pub fn render_remote_table<T: ListRecord + 'static>(
    id: &str,
    list: &RemoteList<T>,
    columns: &[Column],
    actions: Option<RowActions<'_, T>>,
) -> Result<Element, JsValue> {
    let dispatch = list_dispatch(list);

    list.state().with(|s| {
        let view = ElementBuilder::new("div")?.class("list-view").build();
        append_child(&view, &render_toolbar(id, &s.search_draft, s.loading && s.loaded, &dispatch)?)?;
        append_banner(&view, "error", s.error.as_deref())?;

        if s.loading && !s.loaded {
            append_child(&view, &loading("Cargando…")?)?;
        } else {
            append_child(&view, &render_records_table(id, &s.records, &s.query, columns, actions, &dispatch)?)?;
        }
        Ok(view)
    })
}
