// Library crate for the event management API
// This file exposes the public API for integration tests

pub mod app;
pub mod attendee;
pub mod config;
pub mod database;
pub mod events;
pub mod extract;
pub mod session;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use app::{build_state, create_router};
pub use attendee::AttendeeModel;
pub use config::{Config, StorageBackend};
pub use events::EventModel;
pub use session::{AuthenticatedUser, TokenConfig};
pub use shared::{AppError, AppState};
pub use user::{password::PasswordHashing, UserResponse};
