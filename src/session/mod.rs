// Public API - what other modules can use
pub use handlers::{login, register};
pub use middleware::jwt_auth;
pub use token::TokenConfig;
pub use types::{AuthenticatedUser, SessionClaims};

// Internal modules
mod handlers;
mod middleware;
pub mod service;
mod token;
pub mod types;
