use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::AttendeeModel;
use crate::database::{bounded, is_unique_violation, store_error};
use crate::events::{repository::EventRepository, EventModel};
use crate::shared::AppError;
use crate::user::{repository::UserRepository, UserResponse};

/// Trait for attendee (event membership) repository operations
#[async_trait]
pub trait AttendeeRepository {
    /// Stores a membership. At most one row may exist per (event, user);
    /// a duplicate fails with `Conflict`.
    async fn add_attendee(&self, event_id: i64, user_id: i64) -> Result<AttendeeModel, AppError>;
    async fn get_attendee(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<AttendeeModel>, AppError>;
    async fn list_users_for_event(&self, event_id: i64) -> Result<Vec<UserResponse>, AppError>;
    async fn list_events_for_user(&self, user_id: i64) -> Result<Vec<EventModel>, AppError>;

    /// Removes a membership if present. Removing one that doesn't exist is not an error.
    async fn remove_attendee(&self, event_id: i64, user_id: i64) -> Result<(), AppError>;

    /// Removes every membership of an event, returning how many were removed
    async fn remove_event_attendees(&self, event_id: i64) -> Result<u64, AppError>;
}

fn duplicate_attendee() -> AppError {
    AppError::Conflict("Attendee already exists".to_string())
}

#[derive(Default)]
struct AttendeeTable {
    last_id: i64,
    rows: BTreeMap<i64, AttendeeModel>,
}

/// In-memory implementation of AttendeeRepository for development and testing.
/// Joins are resolved against the user and event repositories it is given.
pub struct InMemoryAttendeeRepository {
    attendees: RwLock<AttendeeTable>,
    users: Arc<dyn UserRepository + Send + Sync>,
    events: Arc<dyn EventRepository + Send + Sync>,
}

impl InMemoryAttendeeRepository {
    pub fn new(
        users: Arc<dyn UserRepository + Send + Sync>,
        events: Arc<dyn EventRepository + Send + Sync>,
    ) -> Self {
        Self {
            attendees: RwLock::new(AttendeeTable::default()),
            users,
            events,
        }
    }

    /// Number of stored memberships for one (event, user) pair
    pub async fn membership_count(&self, event_id: i64, user_id: i64) -> usize {
        self.attendees
            .read()
            .await
            .rows
            .values()
            .filter(|row| row.is_for(event_id, user_id))
            .count()
    }
}

#[async_trait]
impl AttendeeRepository for InMemoryAttendeeRepository {
    #[instrument(skip(self))]
    async fn add_attendee(&self, event_id: i64, user_id: i64) -> Result<AttendeeModel, AppError> {
        let mut attendees = self.attendees.write().await;

        // Check and insert under the same write lock, so concurrent adds can't both succeed
        if attendees.rows.values().any(|row| row.is_for(event_id, user_id)) {
            warn!("Attendee already exists in memory");
            return Err(duplicate_attendee());
        }

        attendees.last_id += 1;
        let attendee = AttendeeModel {
            id: attendees.last_id,
            event_id,
            user_id,
        };
        attendees.rows.insert(attendee.id, attendee.clone());

        debug!(attendee_id = attendee.id, "Attendee added in memory");
        Ok(attendee)
    }

    #[instrument(skip(self))]
    async fn get_attendee(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<AttendeeModel>, AppError> {
        let attendees = self.attendees.read().await;
        Ok(attendees
            .rows
            .values()
            .find(|row| row.is_for(event_id, user_id))
            .cloned())
    }

    #[instrument(skip(self))]
    async fn list_users_for_event(&self, event_id: i64) -> Result<Vec<UserResponse>, AppError> {
        // Memberships of a deleted event are not listed, like an inner join
        if self.events.get_event(event_id).await?.is_none() {
            debug!("Event not found, no attendees listed");
            return Ok(vec![]);
        }

        let user_ids: Vec<i64> = {
            let attendees = self.attendees.read().await;
            attendees
                .rows
                .values()
                .filter(|row| row.event_id == event_id)
                .map(|row| row.user_id)
                .collect()
        };

        let mut users = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            if let Some(user) = self.users.get_user(user_id).await? {
                users.push(user.into());
            }
        }

        debug!(user_count = users.len(), "Users for event listed from memory");
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn list_events_for_user(&self, user_id: i64) -> Result<Vec<EventModel>, AppError> {
        let event_ids: Vec<i64> = {
            let attendees = self.attendees.read().await;
            attendees
                .rows
                .values()
                .filter(|row| row.user_id == user_id)
                .map(|row| row.event_id)
                .collect()
        };

        // Memberships of deleted events are skipped, like an inner join would
        let mut events = Vec::with_capacity(event_ids.len());
        for event_id in event_ids {
            if let Some(event) = self.events.get_event(event_id).await? {
                events.push(event);
            }
        }

        debug!(event_count = events.len(), "Events for user listed from memory");
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn remove_attendee(&self, event_id: i64, user_id: i64) -> Result<(), AppError> {
        let mut attendees = self.attendees.write().await;
        let before = attendees.rows.len();
        attendees.rows.retain(|_, row| !row.is_for(event_id, user_id));

        debug!(
            removed = before - attendees.rows.len(),
            "Attendee removal finished in memory"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_event_attendees(&self, event_id: i64) -> Result<u64, AppError> {
        let mut attendees = self.attendees.write().await;
        let before = attendees.rows.len();
        attendees.rows.retain(|_, row| row.event_id != event_id);

        let removed = (before - attendees.rows.len()) as u64;
        debug!(removed, "Event attendees removed from memory");
        Ok(removed)
    }
}

/// PostgreSQL implementation of attendee repository.
/// Relies on a unique index on `attendees (event_id, user_id)`.
pub struct PostgresAttendeeRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresAttendeeRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl AttendeeRepository for PostgresAttendeeRepository {
    #[instrument(skip(self))]
    async fn add_attendee(&self, event_id: i64, user_id: i64) -> Result<AttendeeModel, AppError> {
        let query = sqlx::query_as::<_, AttendeeModel>(
            "INSERT INTO attendees (event_id, user_id) VALUES ($1, $2) \
             RETURNING id, event_id, user_id",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool);

        match bounded(self.timeout, query).await {
            Ok(attendee) => {
                debug!(attendee_id = attendee.id, "Attendee added in database");
                Ok(attendee)
            }
            Err(e) if is_unique_violation(&e) => {
                warn!("Attendee already exists in database");
                Err(duplicate_attendee())
            }
            Err(e) => Err(store_error("Failed to add attendee in database", e)),
        }
    }

    #[instrument(skip(self))]
    async fn get_attendee(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<AttendeeModel>, AppError> {
        let query = sqlx::query_as::<_, AttendeeModel>(
            "SELECT id, event_id, user_id FROM attendees WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool);

        bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to fetch attendee from database", e))
    }

    #[instrument(skip(self))]
    async fn list_users_for_event(&self, event_id: i64) -> Result<Vec<UserResponse>, AppError> {
        let query = sqlx::query_as::<_, UserResponse>(
            "SELECT u.id, u.email, u.name FROM users u \
             JOIN attendees a ON u.id = a.user_id \
             WHERE a.event_id = $1 \
             ORDER BY a.id",
        )
        .bind(event_id)
        .fetch_all(&self.pool);

        bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to list attendees for event", e))
    }

    #[instrument(skip(self))]
    async fn list_events_for_user(&self, user_id: i64) -> Result<Vec<EventModel>, AppError> {
        let query = sqlx::query_as::<_, EventModel>(
            "SELECT e.id, e.owner_id, e.name, e.description, e.date, e.location FROM events e \
             JOIN attendees a ON e.id = a.event_id \
             WHERE a.user_id = $1 \
             ORDER BY a.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool);

        bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to list events for attendee", e))
    }

    #[instrument(skip(self))]
    async fn remove_attendee(&self, event_id: i64, user_id: i64) -> Result<(), AppError> {
        let query = sqlx::query("DELETE FROM attendees WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool);

        let result = bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to remove attendee from database", e))?;

        debug!(
            removed = result.rows_affected(),
            "Attendee removal finished in database"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_event_attendees(&self, event_id: i64) -> Result<u64, AppError> {
        let query = sqlx::query("DELETE FROM attendees WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool);

        let result = bounded(self.timeout, query)
            .await
            .map_err(|e| store_error("Failed to remove event attendees from database", e))?;

        debug!(
            removed = result.rows_affected(),
            "Event attendees removed from database"
        );
        Ok(result.rows_affected())
    }
}
