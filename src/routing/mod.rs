pub mod route;
pub mod guard;
pub mod navigation;

pub use route::{sidebar_links, Route};
pub use guard::{guard, post_login_target, public_only_guard, GuardDecision, PublicDecision};
pub use navigation::{current_route, navigate, open_in_new_tab};
