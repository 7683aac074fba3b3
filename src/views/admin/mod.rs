// Pantallas del área de administración (rol admin)

pub mod users;
pub mod tenants;
pub mod branding;
pub mod golden_rules;
pub mod health;
pub mod costs;
pub mod feedback;

pub use users::render_users;
pub use tenants::render_tenants;
pub use branding::render_branding;
pub use golden_rules::render_golden_rules;
pub use health::render_health;
pub use costs::render_costs;
pub use feedback::render_feedback;
