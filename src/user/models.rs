use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct UserModel {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String, // Argon2 PHC string, never serialized
}

/// A user that has not been stored yet (the store assigns the id)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(email: &str, name: String, password_hash: String) -> Self {
        Self {
            email: normalize_email(email),
            name,
            password_hash,
        }
    }

    /// Attaches the store-assigned id
    pub fn into_model(self, id: i64) -> UserModel {
        UserModel {
            id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
        }
    }
}

/// Emails are compared case-insensitively, so they're stored lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
