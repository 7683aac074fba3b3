// ============================================================================
// LAYOUT - Header, sidebar filtrado por rol, footer y outlet
// ============================================================================

use std::mem::discriminant;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::config::CONFIG;
use crate::dom::{append_child, ElementBuilder};
use crate::models::auth::User;
use crate::routing::{sidebar_links, Route};
use crate::viewmodels::ViewModels;
use crate::views::shared::button;

/// Links visibles para el usuario (mismo criterio que el guard)
pub fn visible_links(user: &User) -> Vec<(Route, &'static str)> {
    sidebar_links()
        .into_iter()
        .filter(|(route, _)| route.required_roles().map_or(true, |roles| user.has_any_role(roles)))
        .collect()
}

fn render_header(user: &User, vms: &ViewModels) -> Result<Element, JsValue> {
    let header = ElementBuilder::new("header")?.class("app-header").build();
    append_child(&header, &ElementBuilder::new("h1")?.class("app-title").text(&CONFIG.app_title).build())?;

    let account = ElementBuilder::new("div")?.class("header-account").build();
    let who = ElementBuilder::new("span")?
        .class("header-user")
        .text(&format!("👤 {} · {}", user.username, user.role.label()))
        .build();
    let session = vms.session.clone();
    let logout = button("Cerrar sesión", "btn-logout", false, move || {
        log::info!("👋 [LAYOUT] Logout");
        session.logout();
    })?;
    append_child(&account, &who)?;
    append_child(&account, &logout)?;
    append_child(&header, &account)?;
    Ok(header)
}

fn render_sidebar(user: &User, current: &Route) -> Result<Element, JsValue> {
    let nav = ElementBuilder::new("nav")?.class("app-sidebar").build();
    let list = ElementBuilder::new("ul")?.build();
    for (route, icon) in visible_links(user) {
        let active = discriminant(&route) == discriminant(current);
        let link = ElementBuilder::new("a")?
            .attr("href", &format!("#{}", route.path()))?
            .class("sidebar-link")
            .class_if("active", active)?
            .text(&format!("{} {}", icon, route.title()))
            .build();
        let item = ElementBuilder::new("li")?.child(link)?.build();
        append_child(&list, &item)?;
    }
    append_child(&nav, &list)?;
    Ok(nav)
}

fn render_footer() -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("footer")?
        .class("app-footer")
        .text(&format!("{} · entorno {}", CONFIG.app_title, CONFIG.environment))
        .build())
}

/// Envuelve el contenido de una ruta protegida
pub fn render_layout(user: &User, route: &Route, vms: &ViewModels, content: Element) -> Result<Element, JsValue> {
    let shell = ElementBuilder::new("div")?.class("app-shell").build();
    append_child(&shell, &render_header(user, vms)?)?;

    let body = ElementBuilder::new("div")?.class("app-body").build();
    append_child(&body, &render_sidebar(user, route)?)?;
    let main = ElementBuilder::new("main")?.class("app-content").child(content)?.build();
    append_child(&body, &main)?;
    append_child(&shell, &body)?;

    append_child(&shell, &render_footer()?)?;
    Ok(shell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    fn user(role: Role) -> User {
        User { id: "1".into(), username: "u".into(), role }
    }

    #[test]
    fn sidebar_hides_routes_the_role_cannot_open() {
        let viewer: Vec<Route> = visible_links(&user(Role::Viewer)).into_iter().map(|(r, _)| r).collect();
        assert!(viewer.contains(&Route::Home));
        assert!(!viewer.contains(&Route::Patients));
        assert!(!viewer.contains(&Route::AdminUsers));

        let medico: Vec<Route> = visible_links(&user(Role::Medico)).into_iter().map(|(r, _)| r).collect();
        assert!(medico.contains(&Route::Patients));
        assert!(!medico.contains(&Route::AdminHealth));

        assert_eq!(visible_links(&user(Role::Admin)).len(), sidebar_links().len());
    }
}
