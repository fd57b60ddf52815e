use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::EventModel, ownership::require_owner, repository::EventRepository,
    types::EventRequest,
};
use crate::attendee::repository::AttendeeRepository;
use crate::session::AuthenticatedUser;
use crate::shared::{AppError, AppState};

/// Service for event business logic
pub struct EventService {
    repository: Arc<dyn EventRepository + Send + Sync>,
    attendees: Arc<dyn AttendeeRepository + Send + Sync>,
}

impl EventService {
    pub fn new(
        repository: Arc<dyn EventRepository + Send + Sync>,
        attendees: Arc<dyn AttendeeRepository + Send + Sync>,
    ) -> Self {
        Self {
            repository,
            attendees,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::clone(&state.event_repository),
            Arc::clone(&state.attendee_repository),
        )
    }

    /// Creates an event owned by the caller
    #[instrument(skip(self, request), fields(owner_id = owner.id))]
    pub async fn create_event(
        &self,
        owner: &AuthenticatedUser,
        request: EventRequest,
    ) -> Result<EventModel, AppError> {
        let event = self
            .repository
            .create_event(&request.into_new_event(owner.id))
            .await?;

        info!(event_id = event.id, "Event created successfully");
        Ok(event)
    }

    #[instrument(skip(self))]
    pub async fn list_events(&self) -> Result<Vec<EventModel>, AppError> {
        let events = self.repository.list_events().await?;
        debug!(event_count = events.len(), "Events retrieved");
        Ok(events)
    }

    /// Gets an event, treating absence as `NotFound`
    #[instrument(skip(self))]
    pub async fn get_event(&self, event_id: i64) -> Result<EventModel, AppError> {
        self.repository
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    /// Replaces an event's details. Only the owner may do this.
    #[instrument(skip(self, request), fields(user_id = user.id))]
    pub async fn update_event(
        &self,
        user: &AuthenticatedUser,
        event_id: i64,
        request: EventRequest,
    ) -> Result<EventModel, AppError> {
        let existing = self.get_event(event_id).await?;
        require_owner(&existing, user, "update this event")?;

        let changes = EventModel {
            id: existing.id,
            owner_id: existing.owner_id,
            name: request.name,
            description: request.description,
            date: request.date,
            location: request.location,
        };
        let updated = self.repository.update_event(&changes).await?;

        info!(event_id, "Event updated successfully");
        Ok(updated)
    }

    /// Deletes an event and its attendee list. Only the owner may do this.
    #[instrument(skip(self), fields(user_id = user.id))]
    pub async fn delete_event(
        &self,
        user: &AuthenticatedUser,
        event_id: i64,
    ) -> Result<(), AppError> {
        let existing = self.get_event(event_id).await?;
        require_owner(&existing, user, "delete this event")?;

        let removed = self.attendees.remove_event_attendees(event_id).await?;
        self.repository.delete_event(event_id).await?;

        info!(event_id, removed_attendees = removed, "Event deleted successfully");
        Ok(())
    }
}
