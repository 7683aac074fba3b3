pub mod shared;
pub mod layout;
pub mod login;
pub mod home;
pub mod error_page;
pub mod hce;
pub mod patients;
pub mod epc_editor;
pub mod snomed;
pub mod admin;

pub use layout::render_layout;
pub use login::render_login;
pub use home::render_home;
pub use error_page::{render_error_page, render_not_found};
pub use patients::{render_patient_form, render_patient_list};
pub use epc_editor::render_epc_editor;
pub use snomed::render_snomed;
