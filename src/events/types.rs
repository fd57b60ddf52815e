use chrono::NaiveDate;
use garde::Validate;
use serde::Deserialize;

use super::models::NewEvent;

/// Request payload for creating or replacing an event
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EventRequest {
    #[garde(length(chars, min = 3))]
    pub name: String,
    #[garde(length(chars, min = 10))]
    pub description: String,
    #[garde(skip)] // Deserializing already enforces YYYY-MM-DD
    pub date: NaiveDate,
    #[garde(length(chars, min = 1))]
    pub location: String,
}

impl EventRequest {
    pub fn into_new_event(self, owner_id: i64) -> NewEvent {
        NewEvent {
            owner_id,
            name: self.name,
            description: self.description,
            date: self.date,
            location: self.location,
        }
    }
}
