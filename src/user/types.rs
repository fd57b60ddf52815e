use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::models::UserModel;

/// Public view of a user, used by registration and attendee listings
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}
