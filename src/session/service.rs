use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    token::TokenConfig,
    types::{AuthenticatedUser, LoginRequest, LoginResponse, RegisterRequest},
};
use crate::shared::{AppError, AppState};
use crate::user::{
    password::PasswordHashing, repository::UserRepository, NewUser, UserResponse,
};

/// Same message for unknown emails and wrong passwords, so registered emails don't leak
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Service for registration, login and token authentication
pub struct SessionService {
    users: Arc<dyn UserRepository + Send + Sync>,
    token_config: TokenConfig,
    password_hashing: PasswordHashing,
}

impl SessionService {
    pub fn new(
        users: Arc<dyn UserRepository + Send + Sync>,
        token_config: TokenConfig,
        password_hashing: PasswordHashing,
    ) -> Self {
        Self {
            users,
            token_config,
            password_hashing,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::clone(&state.user_repository),
            state.token_config.clone(),
            state.password_hashing.clone(),
        )
    }

    /// Registers a new account. The email must not be registered yet.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AppError> {
        info!("Registering new user");

        if self.users.get_user_by_email(&request.email).await?.is_some() {
            warn!("Registration rejected, email already registered");
            return Err(AppError::Conflict(
                "Email is already registered".to_string(),
            ));
        }

        let password_hash = self.hash_password(request.password).await?;
        let user = self
            .users
            .create_user(&NewUser::new(&request.email, request.name, password_hash))
            .await?;

        info!(user_id = user.id, "User registered successfully");
        Ok(user.into())
    }

    /// Checks credentials and issues a session token
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        info!("Login attempt");

        let user = match self.users.get_user_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                warn!("Login failed, no user with that email");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !self
            .verify_password(request.password, user.password_hash.clone())
            .await?
        {
            warn!(user_id = user.id, "Login failed, password mismatch");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.token_config.create_token(user.id, &user.name)?;

        info!(user_id = user.id, "Login successful, token issued");
        Ok(LoginResponse { token })
    }

    /// Resolves a bearer token to the user it was issued for
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.token_config.validate_token(token)?;

        let user_id: i64 = claims.sub.parse().map_err(|_| {
            warn!(subject = %claims.sub, "Token subject is not a user id");
            AppError::Unauthorized("Unauthorized access".to_string())
        })?;

        match self.users.get_user(user_id).await? {
            Some(user) => {
                info!(user_id, "Token resolved to user");
                Ok(user.into())
            }
            None => {
                warn!(user_id, "Token refers to a user that no longer exists");
                Err(AppError::Unauthorized("Unauthorized access".to_string()))
            }
        }
    }

    // Argon2 is deliberately slow, keep it off the async worker threads
    async fn hash_password(&self, raw_password: String) -> Result<String, AppError> {
        let hashing = self.password_hashing.clone();
        tokio::task::spawn_blocking(move || hashing.hash(&raw_password))
            .await
            .map_err(|e| {
                warn!(error = %e, "Password hashing task failed");
                AppError::Internal
            })?
    }

    async fn verify_password(
        &self,
        raw_password: String,
        stored_hash: String,
    ) -> Result<bool, AppError> {
        let hashing = self.password_hashing.clone();
        tokio::task::spawn_blocking(move || hashing.verify(&raw_password, &stored_hash))
            .await
            .map_err(|e| {
                warn!(error = %e, "Password verification task failed");
                AppError::Internal
            })
    }
}
