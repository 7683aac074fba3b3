// ============================================================================
// APP - Aplicación principal
// ============================================================================
// Re-render completo por cambio de estado: guard de la ruta, acción de
// entrada a la pantalla y layout con el contenido.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::config::CONFIG;
use crate::dom::{append_child, clear_children, get_element_by_id, restore_focus, snapshot_focus};
use crate::models::auth::User;
use crate::routing::{guard, navigate, post_login_target, public_only_guard, GuardDecision, PublicDecision, Route};
use crate::state::app_state::AppState;
use crate::utils::constants::{HOME_PATH, LOGIN_PATH};
use crate::viewmodels::ViewModels;
use crate::views::{self, render_error_page, render_layout, render_login, render_not_found};

pub struct App {
    state: AppState,
    vms: ViewModels,
    root: Element,
    /// Ruta cuya acción de entrada ya corrió
    entered: Option<Route>,
}

impl App {
    pub fn new(state: AppState) -> Result<Self, JsValue> {
        let root = get_element_by_id("app").ok_or_else(|| JsValue::from_str("No #app element found"))?;
        let vms = ViewModels::new(&state);

        // Batch: varios updates seguidos producen un solo re-render
        let scheduled = Rc::new(Cell::new(false));
        let schedule = move || {
            if scheduled.replace(true) {
                return;
            }
            let scheduled = scheduled.clone();
            gloo_timers::callback::Timeout::new(0, move || {
                scheduled.set(false);
                crate::rerender_app();
            })
            .forget();
        };
        state.subscribe_to_changes(schedule.clone());
        vms.subscribe_to_changes(schedule);

        Ok(Self { state, vms, root, entered: None })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn render(&mut self) -> Result<(), JsValue> {
        let route = self.state.current_route();
        log::debug!("🎬 [APP] render {}", route.path());
        let focus = snapshot_focus();
        clear_children(&self.root);

        if let Some(view) = self.resolve(&route)? {
            append_child(&self.root, &view)?;
        }
        if let Some(snapshot) = focus {
            restore_focus(&snapshot);
        }
        Ok(())
    }

    /// Aplica los guards. `None` = no se muestra nada (rehidratando o redirigiendo).
    fn resolve(&mut self, route: &Route) -> Result<Option<Element>, JsValue> {
        let status = self.state.session.status();

        if route.is_public_only() {
            self.entered = None;
            return match public_only_guard(&status, &CONFIG.default_route) {
                PublicDecision::Pending => Ok(None),
                PublicDecision::Allow => render_login(&self.state, &self.vms).map(Some),
                PublicDecision::Redirect(default_route) => {
                    let target = post_login_target(self.state.take_return_to().as_deref(), &default_route);
                    log::info!("🔀 [APP] Sesión activa, redirigiendo a {}", target);
                    navigate(&target);
                    Ok(None)
                }
            };
        }

        match guard(&status, route.required_roles(), &route.path()) {
            GuardDecision::Pending => Ok(None),
            GuardDecision::RedirectToLogin { return_to } => {
                self.entered = None;
                self.vms.cancel_all();
                self.state.remember_return_to(&return_to);
                navigate(LOGIN_PATH);
                Ok(None)
            }
            GuardDecision::RedirectToHome => {
                log::warn!("⛔ [APP] Rol insuficiente para {}", route.path());
                navigate(HOME_PATH);
                Ok(None)
            }
            GuardDecision::Allow => {
                let Some(user) = self.state.session.user() else {
                    return Ok(None);
                };
                if self.entered.as_ref() != Some(route) {
                    self.vms.cancel_all();
                    enter_route(&self.vms, route);
                    self.entered = Some(route.clone());
                }
                let content = self.render_content(&user, route)?;
                render_layout(&user, route, &self.vms, content).map(Some)
            }
        }
    }

    /// Contenido del outlet; un error de render cae en la pantalla de error
    fn render_content(&self, user: &User, route: &Route) -> Result<Element, JsValue> {
        if let Some(message) = self.state.render_error.get() {
            return render_error_page(&self.state, &message);
        }
        match route_view(&self.vms, user, route) {
            Ok(view) => Ok(view),
            Err(e) => {
                let message = format!("{:?}", e);
                log::error!("❌ [APP] Error renderizando {}: {}", route.path(), message);
                self.state.render_error.update_silent(|err| *err = Some(message.clone()));
                render_error_page(&self.state, &message)
            }
        }
    }
}

fn route_view(vms: &ViewModels, user: &User, route: &Route) -> Result<Element, JsValue> {
    match route {
        Route::Home => views::render_home(user),
        Route::Patients => views::render_patient_list(vms),
        Route::PatientNew | Route::PatientEdit(_) => views::render_patient_form(vms),
        Route::Epc { .. } => views::render_epc_editor(vms),
        Route::Snomed(catalog) => views::render_snomed(vms, catalog),
        Route::AdminUsers => views::admin::render_users(vms),
        Route::AdminTenants => views::admin::render_tenants(vms),
        Route::AdminBranding(_) => views::admin::render_branding(vms),
        Route::AdminGoldenRules => views::admin::render_golden_rules(vms),
        Route::AdminHealth => views::admin::render_health(vms),
        Route::AdminCosts => views::admin::render_costs(vms),
        Route::AdminFeedback => views::admin::render_feedback(vms),
        Route::NotFound(path) => render_not_found(path),
        Route::Login => render_not_found(&route.path()),
    }
}

/// Carga inicial de cada pantalla al entrar a su ruta
fn enter_route(vms: &ViewModels, route: &Route) {
    log::debug!("🚪 [APP] Entrando a {}", route.path());
    match route {
        Route::Patients => vms.patients.fetch(),
        Route::PatientNew => vms.patients.open_form(None),
        Route::PatientEdit(id) => vms.patients.open_form(Some(id.clone())),
        Route::Epc { id, patient_id } => vms.epc.load(id, patient_id.clone()),
        Route::Snomed(catalog) => vms.snomed.show(catalog),
        Route::AdminUsers => vms.admin.load_users(),
        Route::AdminTenants => vms.admin.load_tenants(),
        Route::AdminBranding(tenant_id) => vms.admin.load_branding(tenant_id),
        Route::AdminGoldenRules => vms.admin.load_rules(),
        Route::AdminHealth => vms.monitoring.load_health(),
        Route::AdminCosts => vms.monitoring.load_costs(),
        Route::AdminFeedback => {
            let active = vms.monitoring.feedback.with(|s| s.active);
            vms.monitoring.select_feedback_tab(active);
        }
        Route::Home | Route::Login | Route::NotFound(_) => {}
    }
}
