#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::{TestSetup, TestUser};

/// Status and decoded JSON body of one API call (`Value::Null` for empty bodies)
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a request through the full router and decode the response
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    // ============================================================================
    // Auth Actions
    // ============================================================================

    pub async fn register(&self, email: &str, name: &str, password: &str) -> TestResponse {
        self.send(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": email, "name": name, "password": password })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Register then log in, asserting both succeed
    pub async fn register_and_login(&self, email: &str, name: &str, password: &str) -> TestUser {
        let registered = self.register(email, name, password).await;
        assert_eq!(
            registered.status,
            StatusCode::OK,
            "registration failed: {}",
            registered.body
        );

        let logged_in = self.login(email, password).await;
        assert_eq!(
            logged_in.status,
            StatusCode::OK,
            "login failed: {}",
            logged_in.body
        );

        TestUser {
            id: registered.body["id"].as_i64().unwrap(),
            email: email.to_string(),
            name: name.to_string(),
            password: password.to_string(),
            token: logged_in.body["token"].as_str().unwrap().to_string(),
        }
    }

    // ============================================================================
    // Event Actions
    // ============================================================================

    pub fn event_body(name: &str) -> Value {
        json!({
            "name": name,
            "description": "An event created by the integration suite",
            "date": "2025-01-01",
            "location": "Main hall",
        })
    }

    pub async fn create_event(&self, user: &TestUser, name: &str) -> TestResponse {
        self.send(
            "POST",
            "/api/v1/events",
            Some(&user.token),
            Some(Self::event_body(name)),
        )
        .await
    }

    /// Create an event and return its id, asserting success
    pub async fn create_event_id(&self, user: &TestUser, name: &str) -> i64 {
        let response = self.create_event(user, name).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }

    pub async fn get_event(&self, event_id: i64) -> TestResponse {
        self.send("GET", &format!("/api/v1/events/{}", event_id), None, None)
            .await
    }

    pub async fn list_events(&self) -> TestResponse {
        self.send("GET", "/api/v1/events", None, None).await
    }

    pub async fn update_event(&self, user: &TestUser, event_id: i64, name: &str) -> TestResponse {
        self.send(
            "PUT",
            &format!("/api/v1/events/{}", event_id),
            Some(&user.token),
            Some(Self::event_body(name)),
        )
        .await
    }

    pub async fn delete_event(&self, user: &TestUser, event_id: i64) -> TestResponse {
        self.send(
            "DELETE",
            &format!("/api/v1/events/{}", event_id),
            Some(&user.token),
            None,
        )
        .await
    }

    // ============================================================================
    // Attendee Actions
    // ============================================================================

    pub async fn add_attendee(&self, caller: &TestUser, event_id: i64, user_id: i64) -> TestResponse {
        self.send(
            "POST",
            &format!("/api/v1/events/{}/attendees/{}", event_id, user_id),
            Some(&caller.token),
            None,
        )
        .await
    }

    pub async fn remove_attendee(
        &self,
        caller: &TestUser,
        event_id: i64,
        user_id: i64,
    ) -> TestResponse {
        self.send(
            "DELETE",
            &format!("/api/v1/events/{}/attendees/{}", event_id, user_id),
            Some(&caller.token),
            None,
        )
        .await
    }

    pub async fn list_attendees(&self, event_id: i64) -> TestResponse {
        self.send(
            "GET",
            &format!("/api/v1/events/{}/attendees", event_id),
            None,
            None,
        )
        .await
    }

    pub async fn list_events_for_attendee(&self, user_id: i64) -> TestResponse {
        self.send(
            "GET",
            &format!("/api/v1/attendees/{}/events", user_id),
            None,
            None,
        )
        .await
    }
}
