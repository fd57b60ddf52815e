#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::Router;
use std::sync::Arc;

use eventhub::{
    attendee::repository::InMemoryAttendeeRepository,
    create_router,
    events::repository::InMemoryEventRepository,
    user::repository::{InMemoryUserRepository, UserRepository},
    AppState, PasswordHashing, TokenConfig,
};

pub const TEST_SECRET: &str = "integration-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// A registered, logged-in user
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password: String,
    pub token: String,
}

pub struct TestSetup {
    pub app: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub events: Arc<InMemoryEventRepository>,
    pub attendees: Arc<InMemoryAttendeeRepository>,
    pub registered: Vec<TestUser>,
}

pub struct TestSetupBuilder {
    users: Vec<(String, String)>, // (email, name)
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { users: vec![] }
    }

    /// Users to register and log in through the API before the test starts
    pub fn with_users(mut self, users: Vec<(&str, &str)>) -> Self {
        self.users = users
            .into_iter()
            .map(|(email, name)| (email.to_string(), name.to_string()))
            .collect();
        self
    }

    pub fn with_alice_and_bob(self) -> Self {
        self.with_users(vec![("alice@example.com", "Alice"), ("bob@example.com", "Bobby")])
    }

    pub async fn build(self) -> TestSetup {
        let users = Arc::new(InMemoryUserRepository::new());
        let events = Arc::new(InMemoryEventRepository::new());
        let attendees = Arc::new(InMemoryAttendeeRepository::new(
            users.clone(),
            events.clone(),
        ));

        let app_state = AppState::new(
            users.clone(),
            events.clone(),
            attendees.clone(),
            TokenConfig::new(TEST_SECRET),
            // Cheap Argon2 parameters so the suite doesn't spend seconds hashing
            PasswordHashing::with_cost(1024, 1).unwrap(),
        );

        let mut setup = TestSetup {
            app: create_router(app_state),
            users,
            events,
            attendees,
            registered: vec![],
        };

        for (email, name) in self.users {
            let password = format!("{}-password", name.to_lowercase());
            let user = setup.register_and_login(&email, &name, &password).await;
            setup.registered.push(user);
        }

        setup
    }
}

impl TestSetup {
    /// Returns a registered user by name
    pub fn user(&self, name: &str) -> &TestUser {
        self.registered
            .iter()
            .find(|u| u.name == name)
            .unwrap_or_else(|| panic!("{} was not registered in this setup", name))
    }

    pub async fn user_count(&self) -> usize {
        self.users.user_count().await
    }

    /// Looks a user up in the store directly, bypassing the API
    pub async fn stored_user_id(&self, email: &str) -> Option<i64> {
        self.users
            .get_user_by_email(email)
            .await
            .unwrap()
            .map(|u| u.id)
    }
}
