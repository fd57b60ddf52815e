use axum::http::StatusCode;
use serde_json::json;

mod utils;

use eventhub::TokenConfig;
use tower::ServiceExt; // for `oneshot`
use utils::*;

#[tokio::test]
async fn test_register_returns_user_without_password() {
    let setup = TestSetupBuilder::new().build().await;

    ResponseAssertion::of(
        setup
            .register("carol@example.com", "Carol", "carol-password")
            .await,
    )
    .has_status(StatusCode::OK)
    .has_field("email", json!("carol@example.com"))
    .has_field("name", json!("Carol"))
    .has_no_field("password")
    .has_no_field("password_hash");

    assert_eq!(setup.user_count().await, 1);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let setup = TestSetupBuilder::new().with_alice_and_bob().build().await;

    ResponseAssertion::of(
        setup
            .register("Alice@Example.com", "Alice Again", "another-password")
            .await,
    )
    .has_status(StatusCode::CONFLICT);

    assert_eq!(setup.user_count().await, 2);
}

#[tokio::test]
async fn test_register_validation() {
    let setup = TestSetupBuilder::new().build().await;

    ResponseAssertion::of(setup.register("not-an-email", "Carol", "carol-password").await)
        .has_status(StatusCode::BAD_REQUEST);
    ResponseAssertion::of(setup.register("carol@example.com", "Carol", "short").await)
        .has_status(StatusCode::BAD_REQUEST);
    ResponseAssertion::of(setup.register("carol@example.com", "Cal", "carol-password").await)
        .has_status(StatusCode::BAD_REQUEST);

    assert_eq!(setup.user_count().await, 0);
}

#[tokio::test]
async fn test_login_issues_working_token() {
    let setup = TestSetupBuilder::new().with_alice_and_bob().build().await;
    let alice = setup.user("Alice");

    let claims = TokenConfig::new(TEST_SECRET)
        .validate_token(&alice.token)
        .unwrap();
    assert_eq!(claims.sub, alice.id.to_string());
    assert_eq!(claims.name, "Alice");
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);

    ResponseAssertion::of(setup.create_event(alice, "Launch").await)
        .has_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let setup = TestSetupBuilder::new().with_alice_and_bob().build().await;
    let alice = setup.user("Alice");

    ResponseAssertion::of(setup.login("ALICE@example.com", &alice.password).await)
        .has_status(StatusCode::OK);
    assert_eq!(
        setup.stored_user_id("alice@example.com").await,
        Some(alice.id)
    );
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let setup = TestSetupBuilder::new().with_alice_and_bob().build().await;

    let wrong_password = ResponseAssertion::of(
        setup
            .login("alice@example.com", "definitely-wrong")
            .await,
    )
    .has_status(StatusCode::UNAUTHORIZED)
    .body();
    let unknown_email = ResponseAssertion::of(
        setup
            .login("nobody@example.com", "definitely-wrong")
            .await,
    )
    .has_status(StatusCode::UNAUTHORIZED)
    .body();

    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let setup = TestSetupBuilder::new().with_alice_and_bob().build().await;
    let alice = setup.user("Alice");

    let expired = TokenConfig::new(TEST_SECRET)
        .with_ttl(chrono::Duration::seconds(-60))
        .create_token(alice.id, &alice.name)
        .unwrap();

    let response = setup
        .send(
            "POST",
            "/api/v1/events",
            Some(&expired),
            Some(TestSetup::event_body("Launch")),
        )
        .await;
    ResponseAssertion::of(response)
        .has_status(StatusCode::UNAUTHORIZED)
        .has_error("Token invalid");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let setup = TestSetupBuilder::new().with_alice_and_bob().build().await;
    let alice = setup.user("Alice");

    let forged = TokenConfig::new("some-other-secret")
        .create_token(alice.id, &alice.name)
        .unwrap();

    ResponseAssertion::of(
        setup
            .send("DELETE", "/api/v1/events/1", Some(&forged), None)
            .await,
    )
    .has_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_or_unknown_user_is_rejected() {
    let setup = TestSetupBuilder::new().build().await;

    let orphan = TokenConfig::new(TEST_SECRET)
        .create_token(77, "Ghost")
        .unwrap();

    ResponseAssertion::of(
        setup
            .send(
                "POST",
                "/api/v1/events",
                Some(&orphan),
                Some(TestSetup::event_body("Launch")),
            )
            .await,
    )
    .has_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let setup = TestSetupBuilder::new().with_alice_and_bob().build().await;
    let alice = setup.user("Alice");

    let request = axum::http::Request::builder()
        .method("DELETE")
        .uri("/api/v1/events/1")
        .header("authorization", format!("Token {}", alice.token))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = setup.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
