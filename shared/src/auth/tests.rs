use serde_json::json;

use super::*;
use crate::STORAGE_TOKEN_KEY;
use crate::client::mock::MockHttpClient;
use crate::config::AppConfig;
use crate::error::{GENERIC_SERVER_ERROR, INVALID_CREDENTIALS};
use crate::session::Role;
use crate::session::tests::make_token;
use crate::storage::MemoryStore;

const LOGIN_URL: &str = "POST http://localhost:8080/api/auth/login";
const SIGNUP_URL: &str = "POST http://localhost:8080/api/auth/signup";
const FORGOT_URL: &str = "POST http://localhost:8080/api/auth/forgot-password";
const RESET_URL: &str = "POST http://localhost:8080/api/auth/reset-password";

fn setup() -> (MockHttpClient, MemoryStore, ApiClient<MockHttpClient, MemoryStore>) {
    let http = MockHttpClient::new();
    let store = MemoryStore::new();
    let client = ApiClient::new(http.clone(), store.clone(), AppConfig::default());
    (http, store, client)
}

fn login_form(password: &str) -> LoginForm {
    LoginForm {
        email: "claire@maison-noir.com".into(),
        password: password.into(),
    }
}

fn otp(code: &str) -> OtpInput {
    let mut input = OtpInput::new();
    input.paste(code);
    input
}

#[tokio::test]
async fn test_login_persists_token_and_decodes_user() {
    let (http, store, client) = setup();
    let token = make_token(json!({
        "sub": "claire@maison-noir.com",
        "name": "Claire Dubois",
        "role": "ADMIN"
    }));
    http.mock_response(LOGIN_URL, 200, json!({ "token": token }));

    let session = client.login(&login_form("s3cret!")).await.unwrap();

    assert_eq!(session.user.name, "Claire Dubois");
    assert_eq!(session.user.role, Role::Admin);
    assert_eq!(store.get(STORAGE_TOKEN_KEY), Some(token));

    let body: serde_json::Value =
        serde_json::from_str(http.requests.borrow()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "email": "claire@maison-noir.com", "password": "s3cret!" }));
}

#[tokio::test]
async fn test_login_bad_credentials() {
    let (http, store, client) = setup();
    http.mock_text(LOGIN_URL, 401, "");

    let err = client.login(&login_form("wrong")).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::InvalidCredentials);
    assert_eq!(err.user_message(), INVALID_CREDENTIALS);
    assert!(store.get(STORAGE_TOKEN_KEY).is_none());
}

#[tokio::test]
async fn test_login_network_failure_is_generic() {
    let (http, _store, client) = setup();
    http.mock_offline(LOGIN_URL);

    let err = client.login(&login_form("s3cret!")).await.unwrap_err();
    assert_eq!(err.user_message(), GENERIC_SERVER_ERROR);
}

#[tokio::test]
async fn test_login_with_undecodable_token_fails() {
    let (http, store, client) = setup();
    http.mock_response(LOGIN_URL, 200, json!({ "token": "opaque" }));

    assert!(client.login(&login_form("s3cret!")).await.is_err());
    assert!(store.get(STORAGE_TOKEN_KEY).is_none());
}

#[tokio::test]
async fn test_register_validates_before_network() {
    let (http, _store, client) = setup();
    let mut form = RegisterForm {
        name: "Claire".into(),
        email: "claire@maison-noir".into(),
        password: "abcdef".into(),
        confirm: "abcdef".into(),
    };

    let err = client.register(&form).await.unwrap_err();
    assert_eq!(err.user_message(), "Please enter a valid email address");

    form.email = "claire@maison-noir.com".into();
    form.password = "abc".into();
    form.confirm = "abc".into();
    let err = client.register(&form).await.unwrap_err();
    assert_eq!(err.user_message(), "Password must be at least 6 characters");

    form.password = "abcdef".into();
    form.confirm = "abcdeg".into();
    let err = client.register(&form).await.unwrap_err();
    assert_eq!(err.user_message(), "Passwords do not match");

    assert!(http.requests.borrow().is_empty());
}

#[tokio::test]
async fn test_register_surfaces_conflict_text() {
    let (http, _store, client) = setup();
    http.mock_text(SIGNUP_URL, 409, "Email already registered");
    let form = RegisterForm {
        name: "Claire".into(),
        email: "claire@maison-noir.com".into(),
        password: "abcdef".into(),
        confirm: "abcdef".into(),
    };

    let err = client.register(&form).await.unwrap_err();
    assert_eq!(err.user_message(), "Email already registered");
}

#[test]
fn test_oauth_callback_and_logout() {
    let (_http, store, client) = setup();
    let token = make_token(json!({ "sub": "g@maison-noir.com", "provider": "GOOGLE" }));

    let session = client.accept_oauth_token(&token).unwrap();
    assert!(!session.user.has_local_password());
    assert!(store.get(STORAGE_TOKEN_KEY).is_some());

    client.logout();
    assert!(store.get(STORAGE_TOKEN_KEY).is_none());
    assert!(Session::restore(&store).is_none());

    assert!(client.accept_oauth_token("  ").is_err());
}

#[test]
fn test_oauth_authorize_url() {
    let (_http, _store, client) = setup();
    assert_eq!(
        client.oauth_authorize_url(AuthProvider::Google).as_deref(),
        Some("http://localhost:8080/oauth2/authorization/google")
    );
    assert!(client.oauth_authorize_url(AuthProvider::Local).is_none());
}

#[tokio::test]
async fn test_forgot_password_sentinel() {
    let (http, _store, client) = setup();
    http.mock_text(FORGOT_URL, 200, "User not found");
    http.mock_text(FORGOT_URL, 200, OTP_SENT);

    let err = client.forgot_password("claire@maison-noir.com").await.unwrap_err();
    assert_eq!(err.user_message(), "User not found");
    assert!(client.forgot_password("claire@maison-noir.com").await.is_ok());
}

#[tokio::test]
async fn test_reset_rejects_short_otp_without_network() {
    let (http, _store, client) = setup();
    let form = ResetPasswordForm {
        email: "claire@maison-noir.com".into(),
        otp: otp("12345"),
        password: "newpass".into(),
        confirm: "newpass".into(),
    };

    let err = client.reset_password(&form).await.unwrap_err();
    assert_eq!(err.user_message(), "Please enter all 6 digits of the OTP");
    assert!(http.requests.borrow().is_empty());
}

#[tokio::test]
async fn test_reset_password_flow() {
    let (http, _store, client) = setup();
    http.mock_text(RESET_URL, 400, "OTP expired");
    http.mock_text(RESET_URL, 200, "Password reset successful");
    let form = ResetPasswordForm {
        email: "claire@maison-noir.com".into(),
        otp: otp("123456"),
        password: "newpass".into(),
        confirm: "newpass".into(),
    };

    let err = client.reset_password(&form).await.unwrap_err();
    assert_eq!(err.user_message(), INVALID_OTP);
    assert!(client.reset_password(&form).await.is_ok());

    let body: serde_json::Value =
        serde_json::from_str(http.requests.borrow()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({ "email": "claire@maison-noir.com", "otp": "123456", "password": "newpass" })
    );
}

#[test]
fn test_otp_focus_movement() {
    let mut input = OtpInput::new();
    assert_eq!(input.input(0, "4"), Some(1));
    assert_eq!(input.input(1, "x"), None);
    assert_eq!(input.digit(1), None);
    assert_eq!(input.backspace(1), Some(0));
    assert_eq!(input.input(0, ""), None);
    assert_eq!(input.digit(0), None);

    assert_eq!(input.input(5, "9"), None);
    assert_eq!(input.input(5, ""), Some(4));
    assert_eq!(OtpInput::move_right(5), None);
    assert_eq!(OtpInput::move_left(0), None);
}

#[test]
fn test_otp_paste() {
    let mut input = OtpInput::new();
    assert_eq!(input.paste("12-34 56 7"), 5);
    assert_eq!(input.code(), "123456");
    assert!(input.is_complete());

    input.clear();
    assert_eq!(input.input(2, "789"), Some(5));
    assert_eq!(input.code(), "789");
    assert!(!input.is_complete());
}

#[test]
fn test_resend_countdown() {
    let mut countdown = ResendCountdown::start(2);
    assert!(!countdown.can_resend());
    assert!(countdown.tick());
    assert!(!countdown.tick());
    assert!(countdown.can_resend());
    assert!(!countdown.tick());
    assert_eq!(countdown.remaining(), 0);
}

#[test]
fn test_email_shapes() {
    assert!(is_valid_email("a@b.co"));
    assert!(is_valid_email(" claire@maison-noir.com "));
    assert!(!is_valid_email("claire@"));
    assert!(!is_valid_email("@x.com"));
    assert!(!is_valid_email("a b@x.com"));
    assert!(!is_valid_email("a@b@c.com"));
}
