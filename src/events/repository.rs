use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{EventModel, NewEvent};
use crate::database::{bounded, store_error};
use crate::shared::AppError;

/// Trait for event repository operations
#[async_trait]
pub trait EventRepository {
    async fn create_event(&self, event: &NewEvent) -> Result<EventModel, AppError>;
    async fn list_events(&self) -> Result<Vec<EventModel>, AppError>;
    async fn get_event(&self, event_id: i64) -> Result<Option<EventModel>, AppError>;

    /// Replaces name, description, date and location. The owner is left untouched.
    /// Fails with `NotFound` when no such event exists.
    async fn update_event(&self, event: &EventModel) -> Result<EventModel, AppError>;

    /// Fails with `NotFound` when no such event exists. Stores that hold the
    /// attendee table themselves remove the event's memberships with it.
    async fn delete_event(&self, event_id: i64) -> Result<(), AppError>;
}

fn event_not_found() -> AppError {
    AppError::NotFound("Event not found".to_string())
}

#[derive(Default)]
struct EventTable {
    last_id: i64,
    rows: BTreeMap<i64, EventModel>,
}

/// In-memory implementation of EventRepository for development and testing
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<EventTable>,
}

impl InMemoryEventRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    #[instrument(skip(self, event))]
    async fn create_event(&self, event: &NewEvent) -> Result<EventModel, AppError> {
        debug!(owner_id = event.owner_id, name = %event.name, "Creating event in memory");

        let mut events = self.events.write().await;
        events.last_id += 1;
        let model = event.clone().into_model(events.last_id);
        events.rows.insert(model.id, model.clone());

        debug!(event_id = model.id, "Event created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn list_events(&self) -> Result<Vec<EventModel>, AppError> {
        let events = self.events.read().await;
        let event_list: Vec<EventModel> = events.rows.values().cloned().collect();

        debug!(event_count = event_list.len(), "Events listed from memory");
        Ok(event_list)
    }

    #[instrument(skip(self))]
    async fn get_event(&self, event_id: i64) -> Result<Option<EventModel>, AppError> {
        let event = self.events.read().await.rows.get(&event_id).cloned();

        match &event {
            Some(e) => debug!(event_id, owner_id = e.owner_id, "Event found in memory"),
            None => debug!(event_id, "Event not found in memory"),
        }

        Ok(event)
    }

    #[instrument(skip(self, event), fields(event_id = event.id))]
    async fn update_event(&self, event: &EventModel) -> Result<EventModel, AppError> {
        let mut events = self.events.write().await;

        let stored = match events.rows.get_mut(&event.id) {
            Some(stored) => stored,
            None => {
                warn!("Event not found for update in memory");
                return Err(event_not_found());
            }
        };

        stored.name = event.name.clone();
        stored.description = event.description.clone();
        stored.date = event.date;
        stored.location = event.location.clone();

        debug!("Event updated successfully in memory");
        Ok(stored.clone())
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, event_id: i64) -> Result<(), AppError> {
        let mut events = self.events.write().await;
        if events.rows.remove(&event_id).is_none() {
            warn!(event_id, "Event not found for deletion in memory");
            return Err(event_not_found());
        }

        debug!(event_id, "Event deleted successfully from memory");
        Ok(())
    }
}

/// PostgreSQL implementation of event repository
pub struct PostgresEventRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    #[instrument(skip(self, event))]
    async fn create_event(&self, event: &NewEvent) -> Result<EventModel, AppError> {
        debug!(owner_id = event.owner_id, name = %event.name, "Creating event in database");

        let query = sqlx::query_as::<_, EventModel>(
            "INSERT INTO events (owner_id, name, description, date, location) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, owner_id, name, description, date, location",
        )
        .bind(event.owner_id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .fetch_one(&self.pool);

        let model = bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to create event in database", e))?;

        debug!(event_id = model.id, "Event created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn list_events(&self) -> Result<Vec<EventModel>, AppError> {
        let query = sqlx::query_as::<_, EventModel>(
            "SELECT id, owner_id, name, description, date, location FROM events ORDER BY id",
        )
        .fetch_all(&self.pool);

        bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to list events from database", e))
    }

    #[instrument(skip(self))]
    async fn get_event(&self, event_id: i64) -> Result<Option<EventModel>, AppError> {
        let query = sqlx::query_as::<_, EventModel>(
            "SELECT id, owner_id, name, description, date, location FROM events WHERE id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool);

        bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to fetch event from database", e))
    }

    #[instrument(skip(self, event), fields(event_id = event.id))]
    async fn update_event(&self, event: &EventModel) -> Result<EventModel, AppError> {
        let query = sqlx::query_as::<_, EventModel>(
            "UPDATE events SET name = $2, description = $3, date = $4, location = $5 \
             WHERE id = $1 \
             RETURNING id, owner_id, name, description, date, location",
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .fetch_optional(&self.pool);

        match bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to update event in database", e))?
        {
            Some(updated) => {
                debug!("Event updated successfully in database");
                Ok(updated)
            }
            None => {
                warn!("Event not found for update");
                Err(event_not_found())
            }
        }
    }

    /// Memberships added after the attendee list was cleared would block the
    /// delete on `attendees.event_id`, so they go in the same transaction
    #[instrument(skip(self))]
    async fn delete_event(&self, event_id: i64) -> Result<(), AppError> {
        let mut tx = bounded(self.timeout, self.pool.begin())
            .await
            .map_err(|e| store_error("Failed to start event deletion", e))?;

        let query = sqlx::query("DELETE FROM attendees WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx);
        bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to delete event attendees from database", e))?;

        let query = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&mut *tx);
        let result = bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to delete event from database", e))?;

        // Dropping the transaction rolls it back
        if result.rows_affected() == 0 {
            warn!(event_id, "Event not found for deletion");
            return Err(event_not_found());
        }

        bounded(self.timeout, tx.commit())
            .await
            .map_err(|e| store_error("Failed to commit event deletion", e))?;

        debug!(event_id, "Event deleted successfully from database");
        Ok(())
    }
}
