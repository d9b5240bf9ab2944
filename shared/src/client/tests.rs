use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use super::mock::MockHttpClient;
use super::*;
use crate::error::{ApiErrorKind, GENERIC_SERVER_ERROR};
use crate::protocol::{GetProfileRequest, ListProductsRequest, LoginRequest};
use crate::session::tests::make_token;
use crate::storage::MemoryStore;

const PROFILE_URL: &str = "GET http://localhost:8080/api/user/profile";

fn client_with_token(http: &MockHttpClient) -> ApiClient<MockHttpClient, MemoryStore> {
    let store = MemoryStore::new();
    store.set(STORAGE_TOKEN_KEY, &make_token(json!({ "sub": "claire@maison-noir.com" })));
    ApiClient::new(http.clone(), store, AppConfig::default())
}

#[tokio::test]
async fn test_bearer_header_on_authenticated_requests() {
    let http = MockHttpClient::new();
    http.mock_response(
        PROFILE_URL,
        200,
        json!({ "name": "Claire", "email": "claire@maison-noir.com" }),
    );
    http.mock_response("GET http://localhost:8080/api/perfumes", 200, json!([]));
    let client = client_with_token(&http);

    client.send(&GetProfileRequest).await.unwrap();
    client.send(&ListProductsRequest).await.unwrap();

    let requests = http.requests.borrow();
    let auth = requests[0].header(HEADER_AUTHORIZATION).unwrap();
    assert!(auth.starts_with("Bearer "));
    assert!(requests[1].header(HEADER_AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_401_clears_token_and_fires_hook() {
    let http = MockHttpClient::new();
    http.mock_text(PROFILE_URL, 401, "");
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let client = client_with_token(&http).with_unauthorized_hook(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let err = client.send(&GetProfileRequest).await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Unauthorized);
    assert!(client.token().is_none());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_401_on_public_endpoint_keeps_session() {
    let http = MockHttpClient::new();
    http.mock_text("POST http://localhost:8080/api/auth/login", 401, "Bad credentials");
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let client = client_with_token(&http).with_unauthorized_hook(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let err = client
        .send(&LoginRequest {
            email: "a@b.c".into(),
            password: "secret".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Unauthorized);
    assert!(client.token().is_some());
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_offline_maps_to_generic_message() {
    let http = MockHttpClient::new();
    http.mock_offline(PROFILE_URL);
    let client = client_with_token(&http);

    let err = client.send(&GetProfileRequest).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Network);
    assert_eq!(err.user_message(), GENERIC_SERVER_ERROR);
    assert_eq!(err.spans()[0].detail.as_deref(), Some("/api/user/profile"));
}

#[tokio::test]
async fn test_backend_message_is_kept_for_4xx() {
    let http = MockHttpClient::new();
    http.mock_text(PROFILE_URL, 400, "Phone number is invalid");
    let client = client_with_token(&http);

    let err = client.send(&GetProfileRequest).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Rejected);
    assert_eq!(err.user_message(), "Phone number is invalid");
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let http = MockHttpClient::new();
    http.mock_text(PROFILE_URL, 200, "<html>");
    let client = client_with_token(&http);

    let err = client.send(&GetProfileRequest).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Decode);
}

#[tokio::test]
async fn test_queued_responses_then_last_sticks() {
    let http = MockHttpClient::new();
    http.mock_text(PROFILE_URL, 500, "");
    http.mock_response(PROFILE_URL, 200, json!({ "name": "C", "email": "c@x.y" }));
    let client = client_with_token(&http);

    assert!(client.send(&GetProfileRequest).await.is_err());
    assert!(client.send(&GetProfileRequest).await.is_ok());
    assert!(client.send(&GetProfileRequest).await.is_ok());
}

#[tokio::test]
async fn test_external_json_has_no_auth_header() {
    let http = MockHttpClient::new();
    http.mock_response("GET https://geo.example/reverse", 200, json!({ "ok": true }));
    let client = client_with_token(&http);

    let value: serde_json::Value = client
        .get_external_json("https://geo.example/reverse")
        .await
        .unwrap();
    assert_eq!(value["ok"], true);
    assert!(http.requests.borrow()[0].header(HEADER_AUTHORIZATION).is_none());
}
