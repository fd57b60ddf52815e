// Public API - what other modules can use
pub use models::{NewUser, UserModel};
pub use types::UserResponse;

// Internal modules
pub mod models;
pub mod password;
pub mod repository;
mod types;
