// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod session_state;
pub mod list_state;
pub mod fetch_state;
pub mod debounce;
pub mod app_state;

pub use reactivity::ReactiveState;
pub use session_state::{Session, SessionStatus, SessionStore};
pub use list_state::{ListAction, ListViewState, SortDirection};
pub use fetch_state::{CancellationSlot, FetchTicket, InFlight};
pub use debounce::{DebouncedInput, Debouncer};
pub use app_state::AppState;
