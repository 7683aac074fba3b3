// ============================================================================
// MONITORING VIEWMODEL - Salud del sistema, costos y feedback
// ============================================================================

use chrono::{Duration, NaiveDate};
use wasm_bindgen_futures::spawn_local;
use crate::error::AppError;
use crate::models::admin::{CostRow, HealthStatus};
use crate::models::feedback::{FeedbackTab, FeedbackTabKind};
use crate::services::{AdminService, ApiClient};
use crate::state::fetch_state::CancellationSlot;
use crate::state::list_state::{ListAction, ListViewState, SortDirection};
use crate::state::reactivity::ReactiveState;
use crate::viewmodels::remote_list::RemoteList;

/// Rango de fechas del dashboard de costos (`YYYY-MM-DD`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostRange {
    pub desde: String,
    pub hasta: String,
}

impl CostRange {
    /// Últimos 30 días incluyendo hoy
    pub fn last_30_days(today: NaiveDate) -> Self {
        Self {
            desde: (today - Duration::days(29)).format("%Y-%m-%d").to_string(),
            hasta: today.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let parse = |raw: &str| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
        match (parse(&self.desde), parse(&self.hasta)) {
            (Some(desde), Some(hasta)) if desde <= hasta => Ok(()),
            (Some(_), Some(_)) => Err("El rango es inválido: 'desde' es posterior a 'hasta'".to_string()),
            _ => Err("Ingrese fechas válidas".to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackState {
    pub active: FeedbackTabKind,
    pub tab: Option<FeedbackTab>,
    /// Pipeline de las pestañas tabulares
    pub query: ListViewState,
    pub loading: bool,
    pub error: Option<String>,
}

impl FeedbackState {
    fn new(page_size: usize) -> Self {
        Self {
            active: FeedbackTabKind::Resumen,
            tab: None,
            query: ListViewState::new(page_size),
            loading: false,
            error: None,
        }
    }
}

#[derive(Clone)]
pub struct MonitoringViewModel {
    service: AdminService,
    pub health: RemoteList<HealthStatus>,
    pub costs: RemoteList<CostRow>,
    pub cost_range: ReactiveState<CostRange>,
    pub feedback: ReactiveState<FeedbackState>,
    feedback_slot: CancellationSlot,
    page_size: usize,
}

impl MonitoringViewModel {
    pub fn new(api: ApiClient, page_size: usize, debounce_ms: u32) -> Self {
        let today = chrono::Utc::now().date_naive();
        Self {
            service: AdminService::new(api),
            health: RemoteList::new(ListViewState::new(page_size).sorted_by("servicio", SortDirection::Asc), debounce_ms),
            costs: RemoteList::new(ListViewState::new(page_size).sorted_by("fecha", SortDirection::Desc), debounce_ms),
            cost_range: ReactiveState::new(CostRange::last_30_days(today)),
            feedback: ReactiveState::new(FeedbackState::new(page_size)),
            feedback_slot: CancellationSlot::new(),
            page_size,
        }
    }

    pub fn load_health(&self) {
        let service = self.service.clone();
        self.health.load(move |signal| async move { service.health(signal.as_ref()).await });
    }

    pub fn set_cost_range(&self, change: impl FnOnce(&mut CostRange)) {
        self.cost_range.update_silent(change);
    }

    pub fn load_costs(&self) {
        let range = self.cost_range.get();
        if let Err(message) = range.validate() {
            self.costs.state().update(|s| s.error = Some(message));
            return;
        }
        let service = self.service.clone();
        self.costs.load(move |signal| async move {
            service.costs(&range.desde, &range.hasta, signal.as_ref()).await
        });
    }

    /// Cambia de pestaña y la carga; un fetch de la pestaña anterior se descarta
    pub fn select_feedback_tab(&self, kind: FeedbackTabKind) {
        let ticket = self.feedback_slot.issue();
        let page_size = self.page_size;
        self.feedback.update(|s| {
            s.active = kind;
            s.tab = None;
            s.loading = true;
            s.error = None;
            s.query = ListViewState::new(page_size);
        });

        let service = self.service.clone();
        let feedback = self.feedback.clone();
        let slot = self.feedback_slot.clone();
        spawn_local(async move {
            let result = service.feedback(kind, ticket.signal()).await;
            if !slot.is_current(&ticket) {
                return;
            }
            feedback.update(|s| {
                s.loading = false;
                match result {
                    Ok(tab) => s.tab = Some(tab),
                    Err(AppError::Cancelled) => {}
                    Err(e) => s.error = Some(e.user_message()),
                }
            });
        });
    }

    pub fn feedback_action(&self, action: ListAction) {
        self.feedback.update(|s| s.query.apply(action));
    }

    pub fn cancel(&self) {
        self.health.cancel();
        self.costs.cancel();
        self.feedback_slot.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn default_range_covers_thirty_days() {
        let range = CostRange::last_30_days(date("2024-03-31"));
        assert_eq!(range.desde, "2024-03-02");
        assert_eq!(range.hasta, "2024-03-31");
        assert!(range.validate().is_ok());
    }

    #[test]
    fn inverted_or_blank_range_is_rejected() {
        let range = CostRange { desde: "2024-04-01".into(), hasta: "2024-03-01".into() };
        assert!(range.validate().is_err());
        let range = CostRange { desde: String::new(), hasta: "2024-03-01".into() };
        assert!(range.validate().is_err());
    }
}
