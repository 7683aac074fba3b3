// Piezas de UI reutilizadas por todas las pantallas

pub mod form;
pub mod table;
pub mod modal;

pub use form::*;
pub use table::{render_pagination, render_records_table, render_remote_table, render_search_box, Dispatch, RowActions};
pub use modal::render_modal;
