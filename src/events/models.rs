use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for events table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct EventModel {
    pub id: i64,
    pub owner_id: i64, // Set at creation, never changed
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
}

/// An event that has not been stored yet (the store assigns the id)
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
}

impl NewEvent {
    /// Attaches the store-assigned id
    pub fn into_model(self, id: i64) -> EventModel {
        EventModel {
            id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            date: self.date,
            location: self.location,
        }
    }
}
