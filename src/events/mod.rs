// Public API - what other modules can use
pub use handlers::{create_event, delete_event, get_event, list_events, update_event};
pub use models::EventModel;
pub use ownership::{is_owner, require_owner};

// Internal modules
mod handlers;
pub mod models;
mod ownership;
pub mod repository;
pub mod service;
pub mod types;
