// ============================================================================
// PATIENTS VIEWMODEL - Listado paginado en servidor + formulario de paciente
// ============================================================================
// El listado no usa el pipeline en cliente: búsqueda, estado y página viajan
// como query al backend. Cada cambio dispara un fetch nuevo y cancela el
// anterior.
// ============================================================================

use wasm_bindgen_futures::spawn_local;
use crate::error::AppError;
use crate::models::patient::{Patient, PatientInput, PatientPage};
use crate::services::patient_service::ESTADO_FILTER;
use crate::services::{ApiClient, PatientService};
use crate::state::debounce::DebouncedInput;
use crate::state::fetch_state::{CancellationSlot, InFlight};
use crate::state::list_state::{ListAction, ListViewState};
use crate::state::reactivity::ReactiveState;
use crate::viewmodels::list_pipeline::EmptyReason;

/// Estados de paciente que ofrece el filtro
pub const PATIENT_ESTADOS: [(&str, &str); 3] = [("internado", "Internado"), ("alta", "Alta"), ("ambulatorio", "Ambulatorio")];

#[derive(Clone, Debug, PartialEq)]
pub struct PatientListState {
    pub query: ListViewState,
    pub search_draft: String,
    pub page: Option<PatientPage>,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl PatientListState {
    fn new(page_size: usize) -> Self {
        Self {
            query: ListViewState::new(page_size),
            search_draft: String::new(),
            page: None,
            loading: false,
            error: None,
            notice: None,
        }
    }

    /// Motivo de la tabla vacía para una página devuelta por el servidor
    pub fn empty_reason(&self) -> Option<EmptyReason> {
        let page = self.page.as_ref()?;
        if !page.items.is_empty() {
            return None;
        }
        let filtered = !self.query.search().trim().is_empty() || !self.query.filters().is_empty();
        Some(if page.total > 0 {
            EmptyReason::PageOutOfRange
        } else if filtered {
            EmptyReason::NoMatches
        } else {
            EmptyReason::NoData
        })
    }
}

/// Campos del formulario
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatientField {
    Nombre,
    Apellido,
    Documento,
    FechaNacimiento,
    Sexo,
    ObraSocial,
    NroHistoria,
}

impl PatientField {
    pub const ALL: [PatientField; 7] = [
        PatientField::Apellido,
        PatientField::Nombre,
        PatientField::Documento,
        PatientField::FechaNacimiento,
        PatientField::Sexo,
        PatientField::ObraSocial,
        PatientField::NroHistoria,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PatientField::Nombre => "Nombre *",
            PatientField::Apellido => "Apellido *",
            PatientField::Documento => "Documento *",
            PatientField::FechaNacimiento => "Fecha de nacimiento",
            PatientField::Sexo => "Sexo",
            PatientField::ObraSocial => "Obra social",
            PatientField::NroHistoria => "Nº de historia clínica",
        }
    }

    pub fn input_type(&self) -> &'static str {
        match self {
            PatientField::FechaNacimiento => "date",
            _ => "text",
        }
    }

    pub fn value(&self, input: &PatientInput) -> String {
        match self {
            PatientField::Nombre => input.nombre.clone(),
            PatientField::Apellido => input.apellido.clone(),
            PatientField::Documento => input.documento.clone(),
            PatientField::FechaNacimiento => input.fecha_nacimiento.clone().unwrap_or_default(),
            PatientField::Sexo => input.sexo.clone().unwrap_or_default(),
            PatientField::ObraSocial => input.obra_social.clone().unwrap_or_default(),
            PatientField::NroHistoria => input.nro_historia.clone().unwrap_or_default(),
        }
    }

    pub fn set(&self, input: &mut PatientInput, value: &str) {
        let optional = || Some(value.trim().to_string()).filter(|v| !v.is_empty());
        match self {
            PatientField::Nombre => input.nombre = value.to_string(),
            PatientField::Apellido => input.apellido = value.to_string(),
            PatientField::Documento => input.documento = value.to_string(),
            PatientField::FechaNacimiento => input.fecha_nacimiento = optional(),
            PatientField::Sexo => input.sexo = optional(),
            PatientField::ObraSocial => input.obra_social = optional(),
            PatientField::NroHistoria => input.nro_historia = optional(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientFormState {
    /// None = alta
    pub patient_id: Option<String>,
    pub input: PatientInput,
    pub errors: Vec<String>,
    pub loading: bool,
    pub saving: bool,
}

impl PatientFormState {
    /// Trim de los requeridos y validación local
    pub fn prepared_input(&self) -> Result<PatientInput, Vec<String>> {
        let mut input = self.input.clone();
        input.nombre = input.nombre.trim().to_string();
        input.apellido = input.apellido.trim().to_string();
        input.documento = input.documento.trim().to_string();
        input.validate().map(|_| input)
    }
}

#[derive(Clone)]
pub struct PatientsViewModel {
    service: PatientService,
    pub list: ReactiveState<PatientListState>,
    pub form: ReactiveState<PatientFormState>,
    slot: CancellationSlot,
    search: DebouncedInput,
    saving: InFlight,
}

impl PatientsViewModel {
    pub fn new(api: ApiClient, page_size: usize, debounce_ms: u32) -> Self {
        Self {
            service: PatientService::new(api),
            list: ReactiveState::new(PatientListState::new(page_size)),
            form: ReactiveState::new(PatientFormState::default()),
            slot: CancellationSlot::new(),
            search: DebouncedInput::new(debounce_ms),
            saving: InFlight::new(),
        }
    }

    /// Fetch de la página actual; cancela el anterior
    pub fn fetch(&self) {
        let ticket = self.slot.issue();
        let query = self.list.with(|s| s.query.clone());
        self.list.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let service = self.service.clone();
        let list = self.list.clone();
        let slot = self.slot.clone();
        spawn_local(async move {
            let result = service.list(&query, ticket.signal()).await;
            if !slot.is_current(&ticket) {
                return;
            }
            list.update(|s| {
                s.loading = false;
                match result {
                    Ok(page) => s.page = Some(page),
                    Err(AppError::Cancelled) => {}
                    Err(e) => s.error = Some(e.user_message()),
                }
            });
        });
    }

    /// Cambio en los controles del listado; la búsqueda pasa por el debounce
    pub fn dispatch(&self, action: ListAction) {
        if let ListAction::Search(text) = action {
            self.list.update_silent(|s| s.search_draft = text.clone());
            let this = self.clone();
            self.search.input(text, move |value| {
                this.list.update_silent(|s| s.query.apply(ListAction::Search(value)));
                this.fetch();
            });
            return;
        }
        self.list.update_silent(|s| s.query.apply(action));
        self.fetch();
    }

    pub fn set_estado(&self, estado: &str) {
        self.dispatch(ListAction::Filter(ESTADO_FILTER.to_string(), estado.to_string()));
    }

    pub fn cancel(&self) {
        self.slot.cancel();
        self.search.cancel();
    }

    pub fn delete(&self, patient: &Patient) {
        let service = self.service.clone();
        let this = self.clone();
        let id = patient.id.clone();
        let name = patient.full_name();
        spawn_local(async move {
            match service.delete(&id).await {
                Ok(()) => {
                    this.list.update_silent(|s| s.notice = Some(format!("Paciente {} eliminado", name)));
                    this.fetch();
                }
                Err(e) => this.list.update(|s| s.error = Some(e.user_message())),
            }
        });
    }

    // ------------------------------------------------------------ formulario

    /// Prepara el formulario: vacío para alta, o carga el paciente a editar
    pub fn open_form(&self, patient_id: Option<String>) {
        let Some(id) = patient_id else {
            self.form.set(PatientFormState::default());
            return;
        };
        self.form.set(PatientFormState {
            patient_id: Some(id.clone()),
            loading: true,
            ..PatientFormState::default()
        });
        let service = self.service.clone();
        let form = self.form.clone();
        spawn_local(async move {
            let result = service.get(&id).await;
            form.update(|f| {
                f.loading = false;
                match result {
                    Ok(patient) => f.input = PatientInput::from_patient(&patient),
                    Err(e) => f.errors = vec![e.user_message()],
                }
            });
        });
    }

    /// Edición de un campo (sin re-render: el input ya muestra el valor)
    pub fn set_field(&self, field: PatientField, value: &str) {
        self.form.update_silent(|f| field.set(&mut f.input, value));
    }

    /// Alta o edición. Devuelve true si se guardó.
    pub async fn save(&self) -> bool {
        let (patient_id, prepared) = self.form.with(|f| (f.patient_id.clone(), f.prepared_input()));
        let input = match prepared {
            Ok(input) => input,
            Err(errors) => {
                self.form.update(|f| f.errors = errors);
                return false;
            }
        };
        if !self.saving.begin() {
            return false;
        }
        self.form.update(|f| {
            f.saving = true;
            f.errors.clear();
        });

        let result = match &patient_id {
            Some(id) => self.service.update(id, &input).await,
            None => self.service.create(&input).await,
        };
        self.saving.finish();

        match result {
            Ok(patient) => {
                log::info!("✅ [PATIENTS] Paciente guardado: {}", patient.id);
                self.form.update_silent(|f| f.saving = false);
                self.list.update_silent(|s| s.notice = Some(format!("Paciente {} guardado", patient.full_name())));
                true
            }
            Err(e) => {
                self.form.update(|f| {
                    f.saving = false;
                    f.errors = vec![e.user_message()];
                });
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: usize, total: usize) -> PatientPage {
        let items = (0..items)
            .map(|i| Patient {
                id: i.to_string(),
                nombre: "Ana".into(),
                apellido: "Pérez".into(),
                documento: None,
                fecha_nacimiento: None,
                sexo: None,
                obra_social: None,
                nro_historia: None,
                estado: None,
                created_at: None,
            })
            .collect();
        PatientPage { items, total, page: 1, page_size: 20 }
    }

    #[test]
    fn list_query_carries_no_client_sort() {
        let state = PatientListState::new(20);
        // El orden lo decide el servidor; la consulta solo lleva búsqueda, estado y página
        assert_eq!(state.query.sort_key(), None);
        assert_eq!(state.query.page(), 1);
    }

    #[test]
    fn empty_reason_distinguishes_cases() {
        let mut state = PatientListState::new(20);
        assert_eq!(state.empty_reason(), None);

        state.page = Some(page(0, 0));
        assert_eq!(state.empty_reason(), Some(EmptyReason::NoData));

        state.query.set_search("zzz");
        assert_eq!(state.empty_reason(), Some(EmptyReason::NoMatches));

        state.page = Some(page(0, 45));
        assert_eq!(state.empty_reason(), Some(EmptyReason::PageOutOfRange));

        state.page = Some(page(3, 3));
        assert_eq!(state.empty_reason(), None);
    }

    #[test]
    fn optional_fields_clear_on_blank() {
        let mut input = PatientInput::default();
        PatientField::ObraSocial.set(&mut input, "OSDE");
        assert_eq!(input.obra_social.as_deref(), Some("OSDE"));
        PatientField::ObraSocial.set(&mut input, "  ");
        assert_eq!(input.obra_social, None);
        assert_eq!(PatientField::ObraSocial.value(&input), "");
    }

    #[test]
    fn prepared_input_trims_and_validates() {
        let mut form = PatientFormState::default();
        PatientField::Nombre.set(&mut form.input, " Ana ");
        PatientField::Apellido.set(&mut form.input, "Pérez");
        assert!(form.prepared_input().is_err());

        PatientField::Documento.set(&mut form.input, "30.123.456");
        let input = form.prepared_input().unwrap();
        assert_eq!(input.nombre, "Ana");
    }
}
