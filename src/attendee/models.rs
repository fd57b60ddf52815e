use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for attendees table: one row per (event, user) membership
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct AttendeeModel {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
}

impl AttendeeModel {
    pub fn is_for(&self, event_id: i64, user_id: i64) -> bool {
        self.event_id == event_id && self.user_id == user_id
    }
}
