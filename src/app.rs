use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::attendee::{
    self,
    repository::{InMemoryAttendeeRepository, PostgresAttendeeRepository},
};
use crate::config::{Config, StorageBackend};
use crate::database;
use crate::events::{
    self,
    repository::{InMemoryEventRepository, PostgresEventRepository},
};
use crate::session::{self, TokenConfig};
use crate::shared::{AppError, AppState};
use crate::user::{
    password::PasswordHashing,
    repository::{InMemoryUserRepository, PostgresUserRepository},
};

/// Builds the application state for the configured storage backend
pub async fn build_state(config: &Config) -> Result<AppState, AppError> {
    let token_config = TokenConfig::from_config(config);
    let password_hashing = PasswordHashing::from_config(config)?;

    let state = match config.storage {
        StorageBackend::Postgres => {
            let pool = database::connect(config).await?;
            let timeout = config.db_query_timeout;

            AppState::new(
                Arc::new(PostgresUserRepository::new(pool.clone(), timeout)),
                Arc::new(PostgresEventRepository::new(pool.clone(), timeout)),
                Arc::new(PostgresAttendeeRepository::new(pool, timeout)),
                token_config,
                password_hashing,
            )
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage, data is lost on restart");

            let users = Arc::new(InMemoryUserRepository::new());
            let events = Arc::new(InMemoryEventRepository::new());
            let attendees = Arc::new(InMemoryAttendeeRepository::new(
                users.clone(),
                events.clone(),
            ));

            AppState::new(users, events, attendees, token_config, password_hashing)
        }
    };

    Ok(state)
}

/// Builds the full router: public reads and auth routes, plus the mutations
/// behind the JWT middleware, all under `/api/v1`
pub fn create_router(app_state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(session::register))
        .route("/auth/login", post(session::login))
        .route("/events", get(events::list_events))
        .route("/events/:event_id", get(events::get_event))
        .route("/events/:event_id/attendees", get(attendee::list_attendees))
        .route(
            "/attendees/:attendee_id/events",
            get(attendee::list_events_for_attendee),
        );

    let protected = Router::new()
        .route("/events", post(events::create_event))
        .route(
            "/events/:event_id",
            put(events::update_event).delete(events::delete_event),
        )
        .route(
            "/events/:event_id/attendees/:user_id",
            post(attendee::add_attendee).delete(attendee::remove_attendee),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            session::jwt_auth,
        ));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/v1", public.merge(protected))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
