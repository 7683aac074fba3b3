// ============================================================================
// EPC VIEWMODEL - Editor de epicrisis
// ============================================================================
// Carga: GET epc -> (404 con paciente: open-or-create + redirect) -> contexto
// -> formulario resuelto por cadenas de fallback.
// Guardar y generar tienen cada uno su flag in-flight; nada se reintenta solo.
// ============================================================================

use std::collections::BTreeSet;
use wasm_bindgen_futures::spawn_local;
use crate::error::AppError;
use crate::models::epc::{EpcContext, EpcPatch, StaffMember};
use crate::routing::{navigate, open_in_new_tab, Route};
use crate::services::{ApiClient, EpcService};
use crate::state::fetch_state::{CancellationSlot, InFlight};
use crate::state::reactivity::ReactiveState;
use crate::utils::constants::EPC_ESTADO_FINALIZADA;
use crate::utils::fallback::{first_non_empty, source, Source};
use crate::utils::text::parse_datetime;

/// Campos editables de la EPC
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EpcField {
    FechaIngreso,
    FechaEgreso,
    Servicio,
    MedicoResponsable,
    MotivoInternacion,
    DiagnosticoPrincipal,
    Evolucion,
    IndicacionesAlta,
}

/// Cómo se edita cada campo
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Text,
    Multiline,
    Staff,
}

impl EpcField {
    pub const ALL: [EpcField; 8] = [
        EpcField::FechaIngreso,
        EpcField::FechaEgreso,
        EpcField::Servicio,
        EpcField::MedicoResponsable,
        EpcField::MotivoInternacion,
        EpcField::DiagnosticoPrincipal,
        EpcField::Evolucion,
        EpcField::IndicacionesAlta,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            EpcField::FechaIngreso => "fecha_ingreso",
            EpcField::FechaEgreso => "fecha_egreso",
            EpcField::Servicio => "servicio",
            EpcField::MedicoResponsable => "medico_responsable_id",
            EpcField::MotivoInternacion => "motivo_internacion",
            EpcField::DiagnosticoPrincipal => "diagnostico_principal",
            EpcField::Evolucion => "evolucion",
            EpcField::IndicacionesAlta => "indicaciones_alta",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EpcField::FechaIngreso => "Fecha de ingreso",
            EpcField::FechaEgreso => "Fecha de egreso",
            EpcField::Servicio => "Servicio",
            EpcField::MedicoResponsable => "Médico responsable",
            EpcField::MotivoInternacion => "Motivo de internación",
            EpcField::DiagnosticoPrincipal => "Diagnóstico principal",
            EpcField::Evolucion => "Evolución",
            EpcField::IndicacionesAlta => "Indicaciones de alta",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            EpcField::FechaIngreso | EpcField::FechaEgreso => FieldKind::Date,
            EpcField::Servicio => FieldKind::Text,
            EpcField::MedicoResponsable => FieldKind::Staff,
            _ => FieldKind::Multiline,
        }
    }

    /// Orden de precedencia de las fuentes de cada campo
    pub fn chain(&self) -> &'static [Source<EpcContext>] {
        match self {
            EpcField::FechaIngreso => FECHA_INGRESO,
            EpcField::FechaEgreso => FECHA_EGRESO,
            EpcField::Servicio => SERVICIO,
            EpcField::MedicoResponsable => MEDICO_RESPONSABLE,
            EpcField::MotivoInternacion => MOTIVO_INTERNACION,
            EpcField::DiagnosticoPrincipal => DIAGNOSTICO_PRINCIPAL,
            EpcField::Evolucion => EVOLUCION,
            EpcField::IndicacionesAlta => INDICACIONES_ALTA,
        }
    }
}

// ============================================================================
// CADENAS DE FALLBACK
// ============================================================================

const FECHA_INGRESO: &[Source<EpcContext>] = &[
    source("admission", |c: &EpcContext| c.admission.as_ref().and_then(|a| a.fecha_ingreso.clone())),
    source("epc", |c: &EpcContext| c.epc.fecha_ingreso.clone()),
    source("structured", |c: &EpcContext| c.structured().and_then(|s| s.fecha_ingreso.clone())),
];

const FECHA_EGRESO: &[Source<EpcContext>] = &[
    source("admission", |c: &EpcContext| c.admission.as_ref().and_then(|a| a.fecha_egreso.clone())),
    source("epc", |c: &EpcContext| c.epc.fecha_egreso.clone()),
    source("structured", |c: &EpcContext| c.structured().and_then(|s| s.fecha_egreso.clone())),
];

const SERVICIO: &[Source<EpcContext>] = &[
    source("admission", |c: &EpcContext| c.admission.as_ref().and_then(|a| a.servicio.clone())),
    source("epc", |c: &EpcContext| c.epc.servicio.clone()),
    source("structured", |c: &EpcContext| c.structured().and_then(|s| s.servicio.clone())),
];

const DIAGNOSTICO_PRINCIPAL: &[Source<EpcContext>] = &[
    source("epc", |c: &EpcContext| c.epc.diagnostico_principal.clone()),
    source("structured", |c: &EpcContext| c.structured().and_then(|s| s.diagnostico_principal.clone())),
    source("admission", |c: &EpcContext| c.admission.as_ref().and_then(|a| a.diagnostico_ingreso.clone())),
];

const MOTIVO_INTERNACION: &[Source<EpcContext>] = &[
    source("epc", |c: &EpcContext| c.epc.motivo_internacion.clone()),
    source("structured", |c: &EpcContext| c.structured().and_then(|s| s.motivo_internacion.clone())),
];

const EVOLUCION: &[Source<EpcContext>] = &[
    source("epc", |c: &EpcContext| c.epc.evolucion.clone()),
    source("structured", |c: &EpcContext| c.structured().and_then(|s| s.evolucion.clone())),
    source("generated_text", |c: &EpcContext| {
        c.generated.as_ref().and_then(|g| g.plain_text()).map(str::to_string)
    }),
];

const INDICACIONES_ALTA: &[Source<EpcContext>] = &[
    source("epc", |c: &EpcContext| c.epc.indicaciones_alta.clone()),
    source("structured", |c: &EpcContext| c.structured().and_then(|s| s.indicaciones_alta.clone())),
];

const MEDICO_RESPONSABLE: &[Source<EpcContext>] = &[
    source("epc", |c: &EpcContext| c.epc.medico_responsable_id.clone()),
    source("admission", |c: &EpcContext| c.admission.as_ref().and_then(|a| a.medico_responsable_id.clone())),
];

/// `<input type="date">` necesita `YYYY-MM-DD`
fn to_date_input(raw: &str) -> String {
    parse_datetime(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

// ============================================================================
// FORMULARIO
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpcForm {
    values: [String; 8],
}

impl EpcForm {
    fn index(field: EpcField) -> usize {
        EpcField::ALL.iter().position(|f| *f == field).unwrap_or(0)
    }

    pub fn get(&self, field: EpcField) -> &str {
        &self.values[Self::index(field)]
    }

    pub fn set(&mut self, field: EpcField, value: &str) {
        self.values[Self::index(field)] = value.to_string();
    }

    /// Resuelve cada campo con su cadena de fallback
    pub fn resolve(ctx: &EpcContext) -> Self {
        let mut form = EpcForm::default();
        for field in EpcField::ALL {
            if let Some(resolved) = first_non_empty(ctx, field.chain()) {
                log::debug!("🔗 [EPC] {} <- {}", field.key(), resolved.source);
                let value = match field.kind() {
                    FieldKind::Date => to_date_input(&resolved.value),
                    _ => resolved.value,
                };
                form.set(field, &value);
            }
        }
        form
    }

    /// Subconjunto editable para el PATCH; vacío = null
    pub fn to_patch(&self, estado: Option<&str>) -> EpcPatch {
        let value = |field: EpcField| Some(self.get(field).trim().to_string()).filter(|v| !v.is_empty());
        EpcPatch {
            fecha_ingreso: value(EpcField::FechaIngreso),
            fecha_egreso: value(EpcField::FechaEgreso),
            servicio: value(EpcField::Servicio),
            medico_responsable_id: value(EpcField::MedicoResponsable),
            motivo_internacion: value(EpcField::MotivoInternacion),
            diagnostico_principal: value(EpcField::DiagnosticoPrincipal),
            evolucion: value(EpcField::Evolucion),
            indicaciones_alta: value(EpcField::IndicacionesAlta),
            estado: estado.map(str::to_string),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpcEditorState {
    pub epc_id: Option<String>,
    pub context: Option<EpcContext>,
    pub form: EpcForm,
    /// Campos tocados por el usuario desde la última carga
    pub edited: BTreeSet<EpcField>,
    pub loading: bool,
    pub saving: bool,
    pub generating: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub finalized: bool,
}

impl EpcEditorState {
    pub fn staff(&self) -> &[StaffMember] {
        self.context.as_ref().map(|c| c.staff.as_slice()).unwrap_or(&[])
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.context.as_ref().map(|c| c.epc.patient_id.as_str())
    }

    /// Carga inicial: reemplaza todo el formulario
    pub fn apply_context(&mut self, ctx: EpcContext) {
        self.form = EpcForm::resolve(&ctx);
        self.finalized = ctx.epc.estado == EPC_ESTADO_FINALIZADA;
        self.context = Some(ctx);
        self.edited.clear();
        self.loading = false;
        self.error = None;
    }

    /// Tras generar: solo se pisan los campos vacíos o no editados
    pub fn refresh_from_context(&mut self, ctx: EpcContext) {
        let fresh = EpcForm::resolve(&ctx);
        for field in EpcField::ALL {
            if self.form.get(field).trim().is_empty() || !self.edited.contains(&field) {
                self.form.set(field, fresh.get(field));
            }
        }
        self.context = Some(ctx);
    }

    pub fn edit(&mut self, field: EpcField, value: &str) {
        self.form.set(field, value);
        self.edited.insert(field);
    }
}

/// Resultado del flujo de carga
#[derive(Debug)]
enum LoadOutcome {
    Loaded(EpcContext),
    /// La EPC no existía: se abrió una nueva para el paciente
    Redirect(String),
}

async fn load_flow(service: &EpcService, epc_id: &str, parent_patient_id: Option<&str>) -> Result<LoadOutcome, AppError> {
    match service.get(epc_id).await {
        Ok(_) => {}
        Err(e) if e.is_not_found() => {
            let Some(patient_id) = parent_patient_id else {
                return Err(e);
            };
            log::info!("📄 [EPC] EPC {} no existe, abriendo una para paciente {}", epc_id, patient_id);
            let opened = service.open(patient_id, None).await?;
            return Ok(LoadOutcome::Redirect(opened.id));
        }
        Err(e) => return Err(e),
    }
    let context = service.context(epc_id).await?;
    Ok(LoadOutcome::Loaded(context))
}

#[derive(Clone)]
pub struct EpcViewModel {
    service: EpcService,
    pub state: ReactiveState<EpcEditorState>,
    slot: CancellationSlot,
    saving: InFlight,
    generating: InFlight,
}

impl EpcViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            service: EpcService::new(api),
            state: ReactiveState::new(EpcEditorState::default()),
            slot: CancellationSlot::new(),
            saving: InFlight::new(),
            generating: InFlight::new(),
        }
    }

    pub fn load(&self, epc_id: &str, parent_patient_id: Option<String>) {
        let ticket = self.slot.issue();
        self.state.set(EpcEditorState {
            epc_id: Some(epc_id.to_string()),
            loading: true,
            ..EpcEditorState::default()
        });

        let service = self.service.clone();
        let state = self.state.clone();
        let slot = self.slot.clone();
        let epc_id = epc_id.to_string();
        spawn_local(async move {
            let result = load_flow(&service, &epc_id, parent_patient_id.as_deref()).await;
            if !slot.is_current(&ticket) {
                return;
            }
            match result {
                Ok(LoadOutcome::Loaded(ctx)) => state.update(|s| s.apply_context(ctx)),
                Ok(LoadOutcome::Redirect(new_id)) => {
                    navigate(&Route::Epc { id: new_id, patient_id: None }.path());
                }
                Err(e) => state.update(|s| {
                    s.loading = false;
                    s.error = Some(e.user_message());
                }),
            }
        });
    }

    pub fn edit(&self, field: EpcField, value: &str) {
        self.state.update_silent(|s| s.edit(field, value));
    }

    /// Guarda y finaliza. En error conserva lo editado.
    pub fn save(&self) {
        let Some(epc_id) = self.state.with(|s| s.epc_id.clone()) else {
            return;
        };
        if !self.saving.begin() {
            return;
        }
        let patch = self.state.with(|s| s.form.to_patch(Some(EPC_ESTADO_FINALIZADA)));
        self.state.update(|s| {
            s.saving = true;
            s.error = None;
            s.notice = None;
        });

        let this = self.clone();
        spawn_local(async move {
            let result = this.service.patch(&epc_id, &patch).await;
            this.saving.finish();
            match result {
                Ok(_) => {
                    log::info!("✅ [EPC] EPC {} finalizada", epc_id);
                    this.state.update_silent(|s| {
                        s.saving = false;
                        s.finalized = true;
                        s.edited.clear();
                    });
                    navigate(&Route::Patients.path());
                }
                Err(e) => this.state.update(|s| {
                    s.saving = false;
                    s.error = Some(e.user_message());
                }),
            }
        });
    }

    /// Generación IA; al terminar re-lee el contexto sin mostrar "cargando"
    pub fn generate(&self) {
        let Some(epc_id) = self.state.with(|s| s.epc_id.clone()) else {
            return;
        };
        if !self.generating.begin() {
            return;
        }
        self.state.update(|s| {
            s.generating = true;
            s.error = None;
            s.notice = None;
        });

        let this = self.clone();
        spawn_local(async move {
            let result = match this.service.generate(&epc_id).await {
                Ok(_) => this.service.context(&epc_id).await,
                Err(e) => Err(e),
            };
            this.generating.finish();
            this.state.update(|s| {
                s.generating = false;
                match result {
                    Ok(ctx) => {
                        s.refresh_from_context(ctx);
                        s.notice = Some("Contenido generado".to_string());
                    }
                    Err(e) => s.error = Some(e.user_message()),
                }
            });
        });
    }

    pub fn print(&self) {
        if let Some(epc_id) = self.state.with(|s| s.epc_id.clone()) {
            open_in_new_tab(&self.service.print_url(&epc_id));
        }
    }

    pub fn cancel(&self) {
        self.slot.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::epc::{Admission, Epc, GeneratedContent, GeneratedSections, StructuredContent};

    fn epc() -> Epc {
        serde_json::from_str(r#"{"id": "e1", "patient_id": "p1"}"#).unwrap()
    }

    fn ctx(epc: Epc, admission: Option<Admission>, generated: Option<GeneratedContent>) -> EpcContext {
        EpcContext { epc, patient: None, admission, generated, staff: Vec::new() }
    }

    fn structured(sections: GeneratedSections) -> Option<GeneratedContent> {
        Some(GeneratedContent::Structured(StructuredContent { structured: sections, model: None, generated_at: None }))
    }

    #[test]
    fn fecha_ingreso_prefers_admission_then_epc_then_structured() {
        let mut e = epc();
        e.fecha_ingreso = Some("2024-03-02".into());
        let admission = Admission { fecha_ingreso: Some("2024-03-01T08:30:00".into()), ..Admission::default() };
        let sections = GeneratedSections { fecha_ingreso: Some("2024-03-05".into()), ..GeneratedSections::default() };

        let form = EpcForm::resolve(&ctx(e.clone(), Some(admission), structured(sections.clone())));
        assert_eq!(form.get(EpcField::FechaIngreso), "2024-03-01");

        let form = EpcForm::resolve(&ctx(e, None, structured(sections.clone())));
        assert_eq!(form.get(EpcField::FechaIngreso), "2024-03-02");

        let form = EpcForm::resolve(&ctx(epc(), Some(Admission::default()), structured(sections)));
        assert_eq!(form.get(EpcField::FechaIngreso), "2024-03-05");
    }

    #[test]
    fn diagnostico_prefers_epc_then_structured_then_admission() {
        let admission = Admission { diagnostico_ingreso: Some("Fiebre".into()), ..Admission::default() };
        let form = EpcForm::resolve(&ctx(epc(), Some(admission.clone()), None));
        assert_eq!(form.get(EpcField::DiagnosticoPrincipal), "Fiebre");

        let sections = GeneratedSections { diagnostico_principal: Some("Neumonía".into()), ..GeneratedSections::default() };
        let form = EpcForm::resolve(&ctx(epc(), Some(admission), structured(sections)));
        assert_eq!(form.get(EpcField::DiagnosticoPrincipal), "Neumonía");
    }

    #[test]
    fn evolucion_falls_back_to_plain_generated_text() {
        let generated = Some(GeneratedContent::Plain("Evolucionó favorablemente".into()));
        let form = EpcForm::resolve(&ctx(epc(), None, generated));
        assert_eq!(form.get(EpcField::Evolucion), "Evolucionó favorablemente");
    }

    #[test]
    fn medico_responsable_falls_back_to_admission() {
        let admission = Admission { medico_responsable_id: Some("42".into()), ..Admission::default() };
        let form = EpcForm::resolve(&ctx(epc(), Some(admission), None));
        assert_eq!(form.get(EpcField::MedicoResponsable), "42");
    }

    #[test]
    fn patch_sends_blank_as_null_and_sets_estado() {
        let mut form = EpcForm::default();
        form.set(EpcField::Servicio, "Clínica médica");
        form.set(EpcField::Evolucion, "   ");
        let patch = form.to_patch(Some(EPC_ESTADO_FINALIZADA));
        assert_eq!(patch.servicio.as_deref(), Some("Clínica médica"));
        assert_eq!(patch.evolucion, None);
        assert_eq!(patch.estado.as_deref(), Some("finalizada"));
    }

    #[test]
    fn refresh_after_generate_keeps_user_edits() {
        let mut state = EpcEditorState::default();
        state.apply_context(ctx(epc(), None, None));
        state.edit(EpcField::Evolucion, "Texto del médico");

        let sections = GeneratedSections {
            evolucion: Some("Texto IA".into()),
            indicaciones_alta: Some("Reposo".into()),
            ..GeneratedSections::default()
        };
        state.refresh_from_context(ctx(epc(), None, structured(sections)));

        assert_eq!(state.form.get(EpcField::Evolucion), "Texto del médico");
        assert_eq!(state.form.get(EpcField::IndicacionesAlta), "Reposo");
    }

    #[test]
    fn finalized_estado_is_detected_on_load() {
        let mut e = epc();
        e.estado = "finalizada".into();
        let mut state = EpcEditorState::default();
        state.apply_context(ctx(e, None, None));
        assert!(state.finalized);
        assert!(state.edited.is_empty());
    }
}
