use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::user::UserModel;

/// JWT claims structure containing session information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub sub: String,  // User id
    pub name: String, // Display name at the time of login
    pub iss: String,  // Also the user id, kept for client compatibility
    pub exp: usize,   // Expiration timestamp (standard JWT claim)
    pub iat: usize,   // Issued at timestamp (standard JWT claim)
}

/// Request payload for registering a new account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(chars, min = 8))]
    pub password: String,
    #[garde(length(chars, min = 4))]
    pub name: String,
}

/// Request payload for logging in
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(chars, min = 8))]
    pub password: String,
}

/// Response structure for the login endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
}

/// The caller resolved by the auth middleware, available to handlers as an extension
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<UserModel> for AuthenticatedUser {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}
