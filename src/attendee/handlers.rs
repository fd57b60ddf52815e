use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::{info, instrument};

use super::{models::AttendeeModel, service::AttendeeService};
use crate::events::EventModel;
use crate::extract::ParsedPath;
use crate::session::AuthenticatedUser;
use crate::shared::{AppError, AppState};
use crate::user::UserResponse;

/// HTTP handler for listing the users attending an event
///
/// GET /events/:event_id/attendees
#[instrument(name = "list_attendees", skip(state))]
pub async fn list_attendees(
    State(state): State<AppState>,
    ParsedPath(event_id): ParsedPath<i64>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = AttendeeService::from_state(&state)
        .list_attendees(event_id)
        .await?;
    Ok(Json(users))
}

/// HTTP handler for listing the events a user attends
///
/// GET /attendees/:attendee_id/events
#[instrument(name = "list_events_for_attendee", skip(state))]
pub async fn list_events_for_attendee(
    State(state): State<AppState>,
    ParsedPath(attendee_id): ParsedPath<i64>,
) -> Result<Json<Vec<EventModel>>, AppError> {
    let events = AttendeeService::from_state(&state)
        .list_events_for_attendee(attendee_id)
        .await?;
    Ok(Json(events))
}

/// HTTP handler for adding a user to an event's attendee list
///
/// POST /events/:event_id/attendees/:user_id
/// Requires authentication and event ownership
#[instrument(name = "add_attendee", skip(state, user), fields(caller_id = user.id))]
pub async fn add_attendee(
    State(state): State<AppState>,
    ParsedPath((event_id, user_id)): ParsedPath<(i64, i64)>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<(StatusCode, Json<AttendeeModel>), AppError> {
    let attendee = AttendeeService::from_state(&state)
        .add_attendee(&user, event_id, user_id)
        .await?;

    info!(attendee_id = attendee.id, "Attendee added");

    Ok((StatusCode::CREATED, Json(attendee)))
}

/// HTTP handler for removing a user from an event's attendee list
///
/// DELETE /events/:event_id/attendees/:user_id
/// Requires authentication and event ownership
#[instrument(name = "remove_attendee", skip(state, user), fields(caller_id = user.id))]
pub async fn remove_attendee(
    State(state): State<AppState>,
    ParsedPath((event_id, user_id)): ParsedPath<(i64, i64)>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<StatusCode, AppError> {
    AttendeeService::from_state(&state)
        .remove_attendee(&user, event_id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
