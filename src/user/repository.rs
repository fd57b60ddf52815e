use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{normalize_email, NewUser, UserModel};
use crate::database::{bounded, is_unique_violation, store_error};
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    /// Stores a new user. Fails with `Conflict` when the email is already taken.
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError>;
    async fn get_user(&self, user_id: i64) -> Result<Option<UserModel>, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
}

fn duplicate_email() -> AppError {
    AppError::Conflict("Email is already registered".to_string())
}

#[derive(Default)]
struct UserTable {
    last_id: i64,
    rows: BTreeMap<i64, UserModel>,
}

/// In-memory implementation of UserRepository for development and testing
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current number of users in the repository
    pub async fn user_count(&self) -> usize {
        self.users.read().await.rows.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!(email = %user.email, "Creating user in memory");

        let mut users = self.users.write().await;
        if users.rows.values().any(|existing| existing.email == user.email) {
            warn!(email = %user.email, "Email already registered in memory");
            return Err(duplicate_email());
        }

        users.last_id += 1;
        let model = user.clone().into_model(users.last_id);
        users.rows.insert(model.id, model.clone());

        debug!(user_id = model.id, "User created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: i64) -> Result<Option<UserModel>, AppError> {
        let user = self.users.read().await.rows.get(&user_id).cloned();

        match &user {
            Some(u) => debug!(user_id, email = %u.email, "User found in memory"),
            None => debug!(user_id, "User not found in memory"),
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let email = normalize_email(email);
        let users = self.users.read().await;

        Ok(users
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}

/// PostgreSQL implementation of user repository.
/// Relies on a unique index on `users.email`.
pub struct PostgresUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!(email = %user.email, "Creating user in database");

        let query = sqlx::query_as::<_, UserModel>(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, email, name, password_hash",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool);

        match bounded(self.timeout, query).await {
            Ok(model) => {
                debug!(user_id = model.id, "User created successfully in database");
                Ok(model)
            }
            Err(e) if is_unique_violation(&e) => {
                warn!(email = %user.email, "Email already registered in database");
                Err(duplicate_email())
            }
            Err(e) => Err(store_error("Failed to create user in database", e)),
        }
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: i64) -> Result<Option<UserModel>, AppError> {
        let query = sqlx::query_as::<_, UserModel>(
            "SELECT id, email, name, password_hash FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool);

        bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to fetch user from database", e))
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let query = sqlx::query_as::<_, UserModel>(
            "SELECT id, email, name, password_hash FROM users WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool);

        bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to fetch user by email from database", e))
    }
}
