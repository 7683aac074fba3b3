// ============================================================================
// HOME - Dashboard de entrada con accesos según rol
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, ElementBuilder};
use crate::models::auth::User;
use crate::routing::Route;
use crate::views::layout::visible_links;

pub fn render_home(user: &User) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("home").build();
    append_child(&page, &ElementBuilder::new("h2")?.text(&format!("Hola, {}", user.username)).build())?;
    append_child(
        &page,
        &ElementBuilder::new("p")?
            .class("home-role")
            .text(&format!("Ingresaste como {}", user.role.label()))
            .build(),
    )?;

    let grid = ElementBuilder::new("div")?.class("home-grid").build();
    for (route, icon) in visible_links(user) {
        if route == Route::Home {
            continue;
        }
        let card = ElementBuilder::new("a")?
            .class("home-card")
            .attr("href", &format!("#{}", route.path()))?
            .build();
        append_child(&card, &ElementBuilder::new("span")?.class("home-card-icon").text(icon).build())?;
        append_child(&card, &ElementBuilder::new("span")?.class("home-card-title").text(route.title()).build())?;
        append_child(&grid, &card)?;
    }
    append_child(&page, &grid)?;
    Ok(page)
}
