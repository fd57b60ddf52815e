// Public API - what other modules can use
pub use handlers::{add_attendee, list_attendees, list_events_for_attendee, remove_attendee};
pub use models::AttendeeModel;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
