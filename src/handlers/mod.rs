pub mod admin;
pub mod api;
pub mod health;

pub use admin::{admin_handler, banner_handler, not_found_handler};
pub use api::{add_handler, list_handler, remove_handler, unsupported_method_handler};
pub use health::health_handler;
