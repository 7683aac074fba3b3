// ============================================================================
// HCE VIEWMODEL - Modales de importación y lectura de historia clínica
// ============================================================================

use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use crate::models::hce::{ExternalEpisode, HceImportResult};
use crate::services::{ApiClient, HceService};
use crate::state::fetch_state::InFlight;
use crate::state::reactivity::ReactiveState;
use crate::utils::clinical_text::build_grouped_clinical_text;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HceImportState {
    pub open: bool,
    pub patient_id: Option<String>,
    pub episodes: Vec<ExternalEpisode>,
    pub loading: bool,
    /// Episodio que se está importando
    pub importing: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HceReaderState {
    pub open: bool,
    pub patient_id: Option<String>,
    pub text: String,
    pub loading: bool,
    pub error: Option<String>,
}

/// Callback del dueño del modal tras una importación exitosa
pub type OnImported = Rc<dyn Fn(HceImportResult)>;

#[derive(Clone)]
pub struct HceViewModel {
    service: HceService,
    pub import: ReactiveState<HceImportState>,
    pub reader: ReactiveState<HceReaderState>,
    importing: InFlight,
}

impl HceViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            service: HceService::new(api),
            import: ReactiveState::new(HceImportState::default()),
            reader: ReactiveState::new(HceReaderState::default()),
            importing: InFlight::new(),
        }
    }

    // -------------------------------------------------------- importación

    /// Abre el modal y lista los episodios del WebService externo
    pub fn open_import(&self, patient_id: &str) {
        self.import.set(HceImportState {
            open: true,
            patient_id: Some(patient_id.to_string()),
            loading: true,
            ..HceImportState::default()
        });
        let service = self.service.clone();
        let import = self.import.clone();
        let patient_id = patient_id.to_string();
        spawn_local(async move {
            let result = service.external_episodes(&patient_id).await;
            import.update(|s| {
                // El modal pudo cerrarse o cambiar de paciente mientras tanto
                if s.patient_id.as_deref() != Some(patient_id.as_str()) {
                    return;
                }
                s.loading = false;
                match result {
                    Ok(episodes) => s.episodes = episodes,
                    Err(e) => s.error = Some(e.user_message()),
                }
            });
        });
    }

    pub fn close_import(&self) {
        self.import.set(HceImportState::default());
    }

    /// Importación one-shot. En éxito cierra el modal y avisa al dueño.
    pub fn import_episode(&self, episode_id: &str, on_imported: OnImported) {
        let Some(patient_id) = self.import.with(|s| s.patient_id.clone()) else {
            return;
        };
        if !self.importing.begin() {
            return;
        }
        self.import.update(|s| {
            s.importing = Some(episode_id.to_string());
            s.error = None;
        });

        let this = self.clone();
        let episode_id = episode_id.to_string();
        spawn_local(async move {
            let result = this.service.import(&patient_id, &episode_id).await;
            this.importing.finish();
            match result {
                Ok(imported) => {
                    log::info!("✅ [HCE] {} entradas importadas", imported.imported_entries);
                    this.close_import();
                    on_imported(imported);
                }
                Err(e) => this.import.update(|s| {
                    s.importing = None;
                    s.error = Some(e.user_message());
                }),
            }
        });
    }

    // ------------------------------------------------------------ lectura

    pub fn open_reader(&self, patient_id: &str) {
        self.reader.set(HceReaderState {
            open: true,
            patient_id: Some(patient_id.to_string()),
            loading: true,
            ..HceReaderState::default()
        });
        let service = self.service.clone();
        let reader = self.reader.clone();
        let patient_id = patient_id.to_string();
        spawn_local(async move {
            let result = service.history(&patient_id).await;
            reader.update(|s| {
                if s.patient_id.as_deref() != Some(patient_id.as_str()) {
                    return;
                }
                s.loading = false;
                match result {
                    Ok(history) => s.text = build_grouped_clinical_text(&history),
                    Err(e) => s.error = Some(e.user_message()),
                }
            });
        });
    }

    pub fn close_reader(&self) {
        self.reader.set(HceReaderState::default());
    }
}
