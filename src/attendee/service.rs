use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{models::AttendeeModel, repository::AttendeeRepository};
use crate::events::{repository::EventRepository, require_owner, EventModel};
use crate::session::AuthenticatedUser;
use crate::shared::{AppError, AppState};
use crate::user::{repository::UserRepository, UserResponse};

/// Service for attendee list management.
/// Every mutation goes through the event's ownership check.
pub struct AttendeeService {
    attendees: Arc<dyn AttendeeRepository + Send + Sync>,
    events: Arc<dyn EventRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
}

impl AttendeeService {
    pub fn new(
        attendees: Arc<dyn AttendeeRepository + Send + Sync>,
        events: Arc<dyn EventRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self {
            attendees,
            events,
            users,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::clone(&state.attendee_repository),
            Arc::clone(&state.event_repository),
            Arc::clone(&state.user_repository),
        )
    }

    async fn load_event(&self, event_id: i64) -> Result<EventModel, AppError> {
        self.events
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    /// Adds `user_id` to the event's attendee list. Only the event owner may do this.
    #[instrument(skip(self, caller), fields(caller_id = caller.id))]
    pub async fn add_attendee(
        &self,
        caller: &AuthenticatedUser,
        event_id: i64,
        user_id: i64,
    ) -> Result<AttendeeModel, AppError> {
        let event = self.load_event(event_id).await?;

        if self.users.get_user(user_id).await?.is_none() {
            warn!(user_id, "Attendee user does not exist");
            return Err(AppError::NotFound("User not found".to_string()));
        }

        require_owner(&event, caller, "add an attendee")?;

        if self.attendees.get_attendee(event_id, user_id).await?.is_some() {
            warn!("User is already attending this event");
            return Err(AppError::Conflict("Attendee already exists".to_string()));
        }

        // A concurrent add that slips past the lookup is still rejected by the store
        let attendee = self.attendees.add_attendee(event_id, user_id).await?;

        info!(attendee_id = attendee.id, "Attendee added successfully");
        Ok(attendee)
    }

    /// Removes `user_id` from the event's attendee list. Only the event owner may do this.
    #[instrument(skip(self, caller), fields(caller_id = caller.id))]
    pub async fn remove_attendee(
        &self,
        caller: &AuthenticatedUser,
        event_id: i64,
        user_id: i64,
    ) -> Result<(), AppError> {
        let event = self.load_event(event_id).await?;
        require_owner(&event, caller, "remove an attendee from this event")?;

        self.attendees.remove_attendee(event_id, user_id).await?;

        info!("Attendee removed successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_attendees(&self, event_id: i64) -> Result<Vec<UserResponse>, AppError> {
        let users = self.attendees.list_users_for_event(event_id).await?;
        debug!(user_count = users.len(), "Attendees retrieved");
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn list_events_for_attendee(
        &self,
        user_id: i64,
    ) -> Result<Vec<EventModel>, AppError> {
        let events = self.attendees.list_events_for_user(user_id).await?;
        debug!(event_count = events.len(), "Attended events retrieved");
        Ok(events)
    }
}
