pub mod list_pipeline;
pub mod records;
pub mod remote_list;
pub mod session_viewmodel;
pub mod patients_viewmodel;
pub mod epc_viewmodel;
pub mod hce_viewmodel;
pub mod admin_viewmodel;
pub mod monitoring_viewmodel;
pub mod snomed_viewmodel;

pub use remote_list::{RemoteList, RemoteListState};
pub use session_viewmodel::SessionViewModel;
pub use patients_viewmodel::PatientsViewModel;
pub use epc_viewmodel::EpcViewModel;
pub use hce_viewmodel::HceViewModel;
pub use admin_viewmodel::AdminViewModel;
pub use monitoring_viewmodel::MonitoringViewModel;
pub use snomed_viewmodel::SnomedViewModel;

use crate::config::CONFIG;
use crate::state::app_state::AppState;

/// ViewModels de todas las pantallas; se crean una vez y viven con la App
#[derive(Clone)]
pub struct ViewModels {
    pub session: SessionViewModel,
    pub patients: PatientsViewModel,
    pub epc: EpcViewModel,
    pub hce: HceViewModel,
    pub admin: AdminViewModel,
    pub monitoring: MonitoringViewModel,
    pub snomed: SnomedViewModel,
}

impl ViewModels {
    pub fn new(state: &AppState) -> Self {
        let list = &CONFIG.list_config;
        let (page_size, debounce_ms) = (list.default_page_size, list.search_debounce_ms);
        Self {
            session: SessionViewModel::new(state.session.clone()),
            patients: PatientsViewModel::new(state.api(), page_size, debounce_ms),
            epc: EpcViewModel::new(state.api()),
            hce: HceViewModel::new(state.api()),
            admin: AdminViewModel::new(state.api(), page_size, debounce_ms),
            monitoring: MonitoringViewModel::new(state.api(), page_size, debounce_ms),
            snomed: SnomedViewModel::new(state.api(), page_size, debounce_ms),
        }
    }

    /// Cualquier cambio visible de un ViewModel dispara `callback`
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + Clone + 'static,
    {
        self.session.form.subscribe(callback.clone());
        self.patients.list.subscribe(callback.clone());
        self.patients.form.subscribe(callback.clone());
        self.epc.state.subscribe(callback.clone());
        self.hce.import.subscribe(callback.clone());
        self.hce.reader.subscribe(callback.clone());
        self.admin.users.subscribe(callback.clone());
        self.admin.user_editor.subscribe(callback.clone());
        self.admin.tenants.subscribe(callback.clone());
        self.admin.tenant_editor.subscribe(callback.clone());
        self.admin.branding.subscribe(callback.clone());
        self.admin.rules.subscribe(callback.clone());
        self.admin.rule_editor.subscribe(callback.clone());
        self.monitoring.health.subscribe(callback.clone());
        self.monitoring.costs.subscribe(callback.clone());
        self.monitoring.cost_range.subscribe(callback.clone());
        self.monitoring.feedback.subscribe(callback.clone());
        self.snomed.concepts.subscribe(callback);
    }

    /// Aborta los fetch y cierra los modales de pantallas que dejaron de estar visibles
    pub fn cancel_all(&self) {
        self.admin.close_editors();
        self.hce.close_import();
        self.hce.close_reader();
        self.patients.cancel();
        self.epc.cancel();
        self.admin.users.cancel();
        self.admin.tenants.cancel();
        self.admin.rules.cancel();
        self.monitoring.cancel();
        self.snomed.concepts.cancel();
    }
}
