use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::{info, instrument};

use super::{models::EventModel, service::EventService, types::EventRequest};
use crate::extract::{ParsedPath, ValidatedJson};
use crate::session::AuthenticatedUser;
use crate::shared::{AppError, AppState};

fn service(state: &AppState) -> EventService {
    EventService::from_state(state)
}

/// HTTP handler for listing all events
///
/// GET /events
#[instrument(name = "list_events", skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventModel>>, AppError> {
    let events = service(&state).list_events().await?;

    info!(event_count = events.len(), "Events listed successfully");

    Ok(Json(events))
}

/// HTTP handler for fetching a single event
///
/// GET /events/:event_id
#[instrument(name = "get_event", skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    ParsedPath(event_id): ParsedPath<i64>,
) -> Result<Json<EventModel>, AppError> {
    let event = service(&state).get_event(event_id).await?;
    Ok(Json(event))
}

/// HTTP handler for creating an event owned by the caller
///
/// POST /events
/// Requires authentication
#[instrument(name = "create_event", skip(state, user, request), fields(user_id = user.id))]
pub async fn create_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<EventRequest>,
) -> Result<(StatusCode, Json<EventModel>), AppError> {
    let event = service(&state).create_event(&user, request).await?;

    info!(event_id = event.id, "Event created");

    Ok((StatusCode::CREATED, Json(event)))
}

/// HTTP handler for replacing an event's details
///
/// PUT /events/:event_id
/// Requires authentication and ownership
#[instrument(name = "update_event", skip(state, user, request), fields(user_id = user.id))]
pub async fn update_event(
    State(state): State<AppState>,
    ParsedPath(event_id): ParsedPath<i64>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<EventRequest>,
) -> Result<Json<EventModel>, AppError> {
    let event = service(&state)
        .update_event(&user, event_id, request)
        .await?;
    Ok(Json(event))
}

/// HTTP handler for deleting an event
///
/// DELETE /events/:event_id
/// Requires authentication and ownership
#[instrument(name = "delete_event", skip(state, user), fields(user_id = user.id))]
pub async fn delete_event(
    State(state): State<AppState>,
    ParsedPath(event_id): ParsedPath<i64>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<StatusCode, AppError> {
    service(&state).delete_event(&user, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
