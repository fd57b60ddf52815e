use tracing::warn;

use super::models::EventModel;
use crate::session::AuthenticatedUser;
use crate::shared::AppError;

/// The one ownership rule: only the user who created an event may change it
/// or manage its attendee list.
pub fn is_owner(event: &EventModel, user: &AuthenticatedUser) -> bool {
    event.owner_id == user.id
}

/// `is_owner`, turned into a `Forbidden` error naming the attempted action
pub fn require_owner(
    event: &EventModel,
    user: &AuthenticatedUser,
    action: &str,
) -> Result<(), AppError> {
    if is_owner(event, user) {
        return Ok(());
    }

    warn!(
        event_id = event.id,
        owner_id = event.owner_id,
        user_id = user.id,
        action,
        "Non-owner attempted to modify event"
    );
    Err(AppError::Forbidden(format!(
        "You are not authorized to {}",
        action
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event_owned_by(owner_id: i64) -> EventModel {
        EventModel {
            id: 1,
            owner_id,
            name: "Launch".to_string(),
            description: "Product launch event".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            location: "HQ".to_string(),
        }
    }

    fn user(id: i64) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            email: format!("user{}@x.com", id),
            name: format!("User {}", id),
        }
    }

    #[test]
    fn test_owner_is_owner() {
        assert!(is_owner(&event_owned_by(1), &user(1)));
        assert!(require_owner(&event_owned_by(1), &user(1), "update this event").is_ok());
    }

    #[test]
    fn test_other_user_is_forbidden() {
        assert!(!is_owner(&event_owned_by(1), &user(2)));

        match require_owner(&event_owned_by(1), &user(2), "delete this event") {
            Err(AppError::Forbidden(msg)) => {
                assert_eq!(msg, "You are not authorized to delete this event")
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }
}
