// ============================================================================
// ADMIN VIEWMODEL - ABM de usuarios, instituciones, branding y reglas de oro
// ============================================================================

use std::future::Future;
use wasm_bindgen_futures::spawn_local;
use crate::error::AppError;
use crate::models::admin::{AdminUser, Branding, GoldenRule, GoldenRuleInput, Tenant, TenantInput, UserInput};
use crate::models::auth::Role;
use crate::services::{AdminService, ApiClient};
use crate::state::fetch_state::InFlight;
use crate::state::list_state::{ListViewState, SortDirection};
use crate::state::reactivity::ReactiveState;
use crate::viewmodels::remote_list::RemoteList;

/// Formulario modal de alta/edición
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Editor<D> {
    /// None = alta
    pub target_id: Option<String>,
    pub draft: D,
    pub error: Option<String>,
    pub saving: bool,
}

impl<D> Editor<D> {
    pub fn create(draft: D) -> Self {
        Self { target_id: None, draft, error: None, saving: false }
    }

    pub fn edit(id: &str, draft: D) -> Self {
        Self { target_id: Some(id.to_string()), draft, error: None, saving: false }
    }

    pub fn is_new(&self) -> bool {
        self.target_id.is_none()
    }
}

fn optional(value: &str) -> Option<String> {
    Some(value.trim().to_string()).filter(|v| !v.is_empty())
}

// ============================================================================
// BORRADORES
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct UserDraft {
    pub username: String,
    pub nombre: String,
    pub email: String,
    pub role: Role,
    pub activo: bool,
    pub password: String,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            username: String::new(),
            nombre: String::new(),
            email: String::new(),
            role: Role::Viewer,
            activo: true,
            password: String::new(),
        }
    }
}

impl UserDraft {
    pub fn from_user(user: &AdminUser) -> Self {
        Self {
            username: user.username.clone(),
            nombre: user.nombre.clone().unwrap_or_default(),
            email: user.email.clone().unwrap_or_default(),
            role: user.role,
            activo: user.activo,
            password: String::new(),
        }
    }

    /// En alta la contraseña es obligatoria; en edición, vacía = no cambiarla
    pub fn to_input(&self, is_new: bool) -> Result<UserInput, String> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err("username: campo requerido".to_string());
        }
        if is_new && self.password.is_empty() {
            return Err("password: requerida para usuarios nuevos".to_string());
        }
        if let Some(email) = optional(&self.email) {
            if !email.contains('@') {
                return Err("email: formato inválido".to_string());
            }
        }
        Ok(UserInput {
            username: username.to_string(),
            nombre: optional(&self.nombre),
            email: optional(&self.email),
            role: self.role,
            activo: self.activo,
            password: Some(self.password.clone()).filter(|p| !p.is_empty()),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TenantDraft {
    pub nombre: String,
    pub codigo: String,
    pub activo: bool,
    pub ws_url: String,
}

impl Default for TenantDraft {
    fn default() -> Self {
        Self { nombre: String::new(), codigo: String::new(), activo: true, ws_url: String::new() }
    }
}

impl TenantDraft {
    pub fn from_tenant(tenant: &Tenant) -> Self {
        Self {
            nombre: tenant.nombre.clone(),
            codigo: tenant.codigo.clone().unwrap_or_default(),
            activo: tenant.activo,
            ws_url: tenant.ws_url.clone().unwrap_or_default(),
        }
    }

    pub fn to_input(&self) -> Result<TenantInput, String> {
        if self.nombre.trim().is_empty() {
            return Err("nombre: campo requerido".to_string());
        }
        let ws_url = optional(&self.ws_url);
        if let Some(url) = ws_url.as_deref() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err("ws_url: debe comenzar con http:// o https://".to_string());
            }
        }
        Ok(TenantInput {
            nombre: self.nombre.trim().to_string(),
            codigo: optional(&self.codigo),
            activo: self.activo,
            ws_url,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuleDraft {
    pub seccion: String,
    pub texto: String,
    pub activa: bool,
    pub prioridad: String,
}

impl Default for RuleDraft {
    fn default() -> Self {
        Self { seccion: String::new(), texto: String::new(), activa: true, prioridad: String::new() }
    }
}

impl RuleDraft {
    pub fn from_rule(rule: &GoldenRule) -> Self {
        Self {
            seccion: rule.seccion.clone(),
            texto: rule.texto.clone(),
            activa: rule.activa,
            prioridad: rule.prioridad.map(|p| p.to_string()).unwrap_or_default(),
        }
    }

    pub fn to_input(&self) -> Result<GoldenRuleInput, String> {
        if self.seccion.trim().is_empty() {
            return Err("seccion: campo requerido".to_string());
        }
        if self.texto.trim().is_empty() {
            return Err("texto: campo requerido".to_string());
        }
        let prioridad = match optional(&self.prioridad) {
            None => None,
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| "prioridad: debe ser un número entero".to_string())?),
        };
        Ok(GoldenRuleInput {
            seccion: self.seccion.trim().to_string(),
            texto: self.texto.trim().to_string(),
            activa: self.activa,
            prioridad,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrandingState {
    pub tenant_id: Option<String>,
    pub form: Branding,
    pub loading: bool,
    pub saving: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Un guardado en curso por editor: los editores no se bloquean entre sí
#[derive(Clone, Default)]
pub struct EditorSaves {
    pub users: InFlight,
    pub tenants: InFlight,
    pub rules: InFlight,
    pub branding: InFlight,
}

// ============================================================================
// VIEWMODEL
// ============================================================================

#[derive(Clone)]
pub struct AdminViewModel {
    service: AdminService,
    pub users: RemoteList<AdminUser>,
    pub user_editor: ReactiveState<Option<Editor<UserDraft>>>,
    pub tenants: RemoteList<Tenant>,
    pub tenant_editor: ReactiveState<Option<Editor<TenantDraft>>>,
    pub branding: ReactiveState<BrandingState>,
    pub rules: RemoteList<GoldenRule>,
    pub rule_editor: ReactiveState<Option<Editor<RuleDraft>>>,
    saves: EditorSaves,
}

impl AdminViewModel {
    pub fn new(api: ApiClient, page_size: usize, debounce_ms: u32) -> Self {
        let list = |key: &str, direction: SortDirection| ListViewState::new(page_size).sorted_by(key, direction);
        Self {
            service: AdminService::new(api),
            users: RemoteList::new(list("username", SortDirection::Asc), debounce_ms),
            user_editor: ReactiveState::new(None),
            tenants: RemoteList::new(list("nombre", SortDirection::Asc), debounce_ms),
            tenant_editor: ReactiveState::new(None),
            branding: ReactiveState::new(BrandingState::default()),
            rules: RemoteList::new(list("seccion", SortDirection::Asc), debounce_ms),
            rule_editor: ReactiveState::new(None),
            saves: EditorSaves::default(),
        }
    }

    /// Ejecuta un guardado del editor: cierra y recarga en éxito, muestra el error si no
    fn run_save<D, Fut, R>(saving: &InFlight, editor: ReactiveState<Option<Editor<D>>>, request: Fut, reload: R)
    where
        D: 'static,
        Fut: Future<Output = Result<(), AppError>> + 'static,
        R: FnOnce() + 'static,
    {
        if !saving.begin() {
            return;
        }
        editor.update(|e| {
            if let Some(e) = e {
                e.saving = true;
                e.error = None;
            }
        });
        let saving = saving.clone();
        spawn_local(async move {
            let result = request.await;
            saving.finish();
            match result {
                Ok(()) => {
                    editor.set(None);
                    reload();
                }
                Err(e) => editor.update(|ed| {
                    if let Some(ed) = ed {
                        ed.saving = false;
                        ed.error = Some(e.user_message());
                    }
                }),
            }
        });
    }

    fn set_editor_error<D>(editor: &ReactiveState<Option<Editor<D>>>, message: String) {
        editor.update(|e| {
            if let Some(e) = e {
                e.error = Some(message);
            }
        });
    }

    // ---------------------------------------------------------------- users

    pub fn load_users(&self) {
        let service = self.service.clone();
        self.users.load(move |signal| async move { service.users(signal.as_ref()).await });
    }

    pub fn open_user_editor(&self, user: Option<&AdminUser>) {
        let editor = match user {
            Some(u) => Editor::edit(&u.id, UserDraft::from_user(u)),
            None => Editor::create(UserDraft::default()),
        };
        self.user_editor.set(Some(editor));
    }

    pub fn update_user_draft(&self, change: impl FnOnce(&mut UserDraft)) {
        self.user_editor.update_silent(|e| {
            if let Some(e) = e {
                change(&mut e.draft);
            }
        });
    }

    pub fn save_user(&self) {
        let Some(editor) = self.user_editor.get() else {
            return;
        };
        let input = match editor.draft.to_input(editor.is_new()) {
            Ok(input) => input,
            Err(message) => return Self::set_editor_error(&self.user_editor, message),
        };
        let service = self.service.clone();
        let request = async move {
            match editor.target_id {
                Some(id) => service.update_user(&id, &input).await.map(|_| ()),
                None => service.create_user(&input).await.map(|_| ()),
            }
        };
        let this = self.clone();
        Self::run_save(&self.saves.users, self.user_editor.clone(), request, move || this.load_users());
    }

    pub fn delete_user(&self, id: &str) {
        let service = self.service.clone();
        let this = self.clone();
        let id = id.to_string();
        spawn_local(async move {
            match service.delete_user(&id).await {
                Ok(()) => this.load_users(),
                Err(e) => this.users.state().update(|s| s.error = Some(e.user_message())),
            }
        });
    }

    // -------------------------------------------------------------- tenants

    pub fn load_tenants(&self) {
        let service = self.service.clone();
        self.tenants.load(move |signal| async move { service.tenants(signal.as_ref()).await });
    }

    pub fn open_tenant_editor(&self, tenant: Option<&Tenant>) {
        let editor = match tenant {
            Some(t) => Editor::edit(&t.id, TenantDraft::from_tenant(t)),
            None => Editor::create(TenantDraft::default()),
        };
        self.tenant_editor.set(Some(editor));
    }

    pub fn update_tenant_draft(&self, change: impl FnOnce(&mut TenantDraft)) {
        self.tenant_editor.update_silent(|e| {
            if let Some(e) = e {
                change(&mut e.draft);
            }
        });
    }

    pub fn save_tenant(&self) {
        let Some(editor) = self.tenant_editor.get() else {
            return;
        };
        let input = match editor.draft.to_input() {
            Ok(input) => input,
            Err(message) => return Self::set_editor_error(&self.tenant_editor, message),
        };
        let service = self.service.clone();
        let request = async move {
            match editor.target_id {
                Some(id) => service.update_tenant(&id, &input).await.map(|_| ()),
                None => service.create_tenant(&input).await.map(|_| ()),
            }
        };
        let this = self.clone();
        Self::run_save(&self.saves.tenants, self.tenant_editor.clone(), request, move || this.load_tenants());
    }

    // ------------------------------------------------------------- branding

    pub fn load_branding(&self, tenant_id: &str) {
        self.branding.set(BrandingState {
            tenant_id: Some(tenant_id.to_string()),
            loading: true,
            ..BrandingState::default()
        });
        let service = self.service.clone();
        let branding = self.branding.clone();
        let tenant_id = tenant_id.to_string();
        spawn_local(async move {
            let result = service.branding(&tenant_id).await;
            branding.update(|s| {
                if s.tenant_id.as_deref() != Some(tenant_id.as_str()) {
                    return;
                }
                s.loading = false;
                match result {
                    Ok(form) => s.form = form,
                    // Sin branding configurado: formulario vacío
                    Err(e) if e.is_not_found() => {}
                    Err(e) => s.error = Some(e.user_message()),
                }
            });
        });
    }

    pub fn update_branding(&self, change: impl FnOnce(&mut Branding)) {
        self.branding.update_silent(|s| change(&mut s.form));
    }

    pub fn save_branding(&self) {
        let (tenant_id, form) = self.branding.with(|s| (s.tenant_id.clone(), s.form.clone()));
        let Some(tenant_id) = tenant_id else {
            return;
        };
        if let Err(message) = form.validate() {
            self.branding.update(|s| s.error = Some(message));
            return;
        }
        if !self.saves.branding.begin() {
            return;
        }
        self.branding.update(|s| {
            s.saving = true;
            s.error = None;
            s.notice = None;
        });
        let this = self.clone();
        spawn_local(async move {
            let result = this.service.update_branding(&tenant_id, &form).await;
            this.saves.branding.finish();
            this.branding.update(|s| {
                s.saving = false;
                match result {
                    Ok(saved) => {
                        s.form = saved;
                        s.notice = Some("Branding guardado".to_string());
                    }
                    Err(e) => s.error = Some(e.user_message()),
                }
            });
        });
    }

    // --------------------------------------------------------- golden rules

    pub fn load_rules(&self) {
        let service = self.service.clone();
        self.rules.load(move |signal| async move { service.golden_rules(signal.as_ref()).await });
    }

    pub fn open_rule_editor(&self, rule: Option<&GoldenRule>) {
        let editor = match rule {
            Some(r) => Editor::edit(&r.id, RuleDraft::from_rule(r)),
            None => Editor::create(RuleDraft::default()),
        };
        self.rule_editor.set(Some(editor));
    }

    pub fn update_rule_draft(&self, change: impl FnOnce(&mut RuleDraft)) {
        self.rule_editor.update_silent(|e| {
            if let Some(e) = e {
                change(&mut e.draft);
            }
        });
    }

    pub fn save_rule(&self) {
        let Some(editor) = self.rule_editor.get() else {
            return;
        };
        let input = match editor.draft.to_input() {
            Ok(input) => input,
            Err(message) => return Self::set_editor_error(&self.rule_editor, message),
        };
        let service = self.service.clone();
        let request = async move {
            match editor.target_id {
                Some(id) => service.update_golden_rule(&id, &input).await.map(|_| ()),
                None => service.create_golden_rule(&input).await.map(|_| ()),
            }
        };
        let this = self.clone();
        Self::run_save(&self.saves.rules, self.rule_editor.clone(), request, move || this.load_rules());
    }

    pub fn delete_rule(&self, id: &str) {
        let service = self.service.clone();
        let this = self.clone();
        let id = id.to_string();
        spawn_local(async move {
            match service.delete_golden_rule(&id).await {
                Ok(()) => this.load_rules(),
                Err(e) => this.rules.state().update(|s| s.error = Some(e.user_message())),
            }
        });
    }

    /// Cierra cualquier editor abierto
    pub fn close_editors(&self) {
        self.user_editor.set(None);
        self.tenant_editor.set(None);
        self.rule_editor.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_saves_do_not_block_each_other() {
        let saves = EditorSaves::default();
        assert!(saves.users.begin());
        assert!(!saves.users.begin());
        assert!(saves.tenants.begin());
        assert!(saves.rules.begin());
        assert!(saves.branding.begin());
        saves.users.finish();
        assert!(saves.users.begin());
        assert!(saves.tenants.is_busy());
    }

    #[test]
    fn new_user_requires_password() {
        let draft = UserDraft { username: "doc2".into(), ..UserDraft::default() };
        assert!(draft.to_input(true).is_err());
        let input = draft.to_input(false).unwrap();
        assert_eq!(input.password, None);
        assert_eq!(input.role, Role::Viewer);
    }

    #[test]
    fn user_role_change_is_sent() {
        let user = AdminUser {
            id: "5".into(),
            username: "doc".into(),
            nombre: None,
            email: Some("doc@hospital.org".into()),
            role: Role::Viewer,
            activo: true,
            last_login: None,
        };
        let mut draft = UserDraft::from_user(&user);
        draft.role = Role::Medico;
        assert_eq!(draft.to_input(false).unwrap().role, Role::Medico);
    }

    #[test]
    fn invalid_email_is_rejected() {
        let draft = UserDraft { username: "a".into(), email: "nope".into(), password: "x".into(), ..UserDraft::default() };
        assert!(draft.to_input(true).unwrap_err().starts_with("email"));
    }

    #[test]
    fn tenant_ws_url_must_be_http() {
        let draft = TenantDraft { nombre: "Hospital".into(), ws_url: "ftp://x".into(), ..TenantDraft::default() };
        assert!(draft.to_input().is_err());
        let draft = TenantDraft { nombre: "Hospital".into(), ws_url: "https://hce.local".into(), ..TenantDraft::default() };
        assert_eq!(draft.to_input().unwrap().ws_url.as_deref(), Some("https://hce.local"));
    }

    #[test]
    fn rule_priority_parses_or_fails() {
        let draft = RuleDraft { seccion: "evolucion".into(), texto: "No inventar".into(), prioridad: "3".into(), ..RuleDraft::default() };
        assert_eq!(draft.to_input().unwrap().prioridad, Some(3));
        let draft = RuleDraft { prioridad: "alta".into(), ..draft };
        assert!(draft.to_input().is_err());
    }

    #[test]
    fn editor_tracks_create_vs_edit() {
        assert!(Editor::create(RuleDraft::default()).is_new());
        assert!(!Editor::edit("9", RuleDraft::default()).is_new());
    }
}
