//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::http::StatusCode;
use serde_json::Value;

use super::actions::TestResponse;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct ResponseAssertion {
    response: TestResponse,
}

impl ResponseAssertion {
    pub fn of(response: TestResponse) -> Self {
        Self { response }
    }

    /// Assert the status code, showing the body on failure
    pub fn has_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.response.status, expected,
            "unexpected status, body: {}",
            self.response.body
        );
        self
    }

    /// Assert the `{"error": ...}` body produced for every failure
    pub fn has_error(self, expected: &str) -> Self {
        assert_eq!(
            self.response.body["error"], expected,
            "unexpected error body: {}",
            self.response.body
        );
        self
    }

    pub fn has_field(self, field: &str, expected: Value) -> Self {
        assert_eq!(
            self.response.body[field], expected,
            "unexpected {} in body: {}",
            field, self.response.body
        );
        self
    }

    pub fn has_no_field(self, field: &str) -> Self {
        assert!(
            self.response.body.get(field).is_none(),
            "{} should not be in body: {}",
            field,
            self.response.body
        );
        self
    }

    /// Assert the body is a JSON array and return its elements
    pub fn list(self) -> Vec<Value> {
        self.response
            .body
            .as_array()
            .cloned()
            .unwrap_or_else(|| panic!("expected a JSON array, got {}", self.response.body))
    }

    pub fn body(self) -> Value {
        self.response.body
    }
}
