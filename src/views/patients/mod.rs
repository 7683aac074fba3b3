pub mod list;
pub mod form;

pub use list::render_patient_list;
pub use form::render_patient_form;
