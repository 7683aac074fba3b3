// ============================================================================
// LOGIN VIEW - Formulario de ingreso
// ============================================================================
// El redirect post-login lo resuelve la App con el guard de rutas públicas.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use crate::config::CONFIG;
use crate::dom::{append_child, on_submit, ElementBuilder};
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::viewmodels::ViewModels;
use crate::views::shared::{append_banner, checkbox_field, text_field};

pub fn render_login(state: &AppState, vms: &ViewModels) -> Result<Element, JsValue> {
    let vm = vms.session.clone();
    let form_state = vm.form.get();
    let submitting = vm.is_submitting();

    let screen = ElementBuilder::new("div")?.class("login-screen").build();
    let container = ElementBuilder::new("div")?.class("login-container").build();

    let header = ElementBuilder::new("div")?.class("login-header").build();
    append_child(&header, &ElementBuilder::new("div")?.class("logo-icon").text("🏥").build())?;
    append_child(&header, &ElementBuilder::new("h1")?.text(&CONFIG.app_title).build())?;
    append_child(&header, &ElementBuilder::new("p")?.text("Consola de epicrisis").build())?;
    append_child(&container, &header)?;

    append_banner(&container, "error", state.session.error().as_deref())?;

    let form = ElementBuilder::new("form")?.class("login-form").build();
    let username = {
        let vm = vm.clone();
        text_field("login-username", "Usuario", "text", &form_state.username, submitting, move |value| {
            vm.form.update_silent(|f| f.username = value);
        })?
    };
    let password = {
        let vm = vm.clone();
        text_field("login-password", "Contraseña", "password", &form_state.password, submitting, move |value| {
            vm.form.update_silent(|f| f.password = value);
        })?
    };
    let remember = {
        let vm = vm.clone();
        checkbox_field("login-remember", "Recordar usuario", form_state.remember, move |checked| {
            vm.form.update_silent(|f| f.remember = checked);
        })?
    };
    let submit = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn-login")
        .flag("disabled", submitting)?
        .text(if submitting { "Ingresando…" } else { "Ingresar" })
        .build();

    append_child(&form, &username)?;
    append_child(&form, &password)?;
    append_child(&form, &remember)?;
    append_child(&form, &submit)?;

    on_submit(&form, move || {
        let vm = vm.clone();
        spawn_local(async move {
            match vm.login().await {
                Ok(user) => log::info!("✅ [LOGIN] Sesión iniciada: {} ({})", user.username, user.role),
                Err(AppError::Cancelled) => {}
                Err(e) => log::warn!("⚠️ [LOGIN] Login rechazado: {}", e),
            }
        });
    })?;

    append_child(&container, &form)?;
    append_child(&screen, &container)?;
    Ok(screen)
}
