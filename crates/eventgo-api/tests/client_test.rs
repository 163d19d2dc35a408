#![allow(clippy::unwrap_used)]
// Integration tests for `EventGoClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eventgo_api::{BearerToken, Error, EventGoClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, EventGoClient) {
    let server = MockServer::start().await;
    let client = EventGoClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn token() -> BearerToken {
    BearerToken::new("staff-token")
}

// ── Check-in tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_check_in_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/events/42/checkin/"))
        .and(header("authorization", "Bearer staff-token"))
        .and(body_json(json!({ "qr_code": "TICKET-ABC123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Check-in thành công",
            "order_id": 77,
            "attendee_name": "Nguyen Van A"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.check_in(42, "TICKET-ABC123", &token()).await.unwrap();

    assert!(!resp.is_already_checked_in());
    assert_eq!(resp.order_id, Some(77));
    assert_eq!(resp.attendee_name.as_deref(), Some("Nguyen Van A"));
}

#[tokio::test]
async fn test_check_in_already_redeemed() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/events/42/checkin/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Vé đã được check-in trước đó",
            "attendee_name": "Nguyen Van A",
            "checkin_time": "2024-01-01T10:00:00Z"
        })))
        .mount(&server)
        .await;

    let resp = client.check_in(42, "TICKET-ABC123", &token()).await.unwrap();

    assert!(resp.is_already_checked_in());
    assert_eq!(
        resp.checkin_time.map(|t| t.to_rfc3339()),
        Some("2024-01-01T10:00:00+00:00".to_owned())
    );
}

#[tokio::test]
async fn test_check_in_bad_request_keeps_backend_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/events/42/checkin/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Vé chưa được thanh toán" })),
        )
        .mount(&server)
        .await;

    let result = client.check_in(42, "QR_1_2", &token()).await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Vé chưa được thanh toán");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_check_in_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/events/42/checkin/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Không tìm thấy vé với mã QR này cho sự kiện"
        })))
        .mount(&server)
        .await;

    let err = client.check_in(42, "NOPE", &token()).await.unwrap_err();

    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_check_in_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/events/42/checkin/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid token." })),
        )
        .mount(&server)
        .await;

    let err = client.check_in(42, "TICKET-ABC123", &token()).await.unwrap_err();

    assert!(err.is_auth_expired(), "expected auth error, got: {err:?}");
    assert!(err.to_string().contains("Invalid token."));
}

#[tokio::test]
async fn test_check_in_server_error_is_transient() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/events/42/checkin/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client.check_in(42, "TICKET-ABC123", &token()).await.unwrap_err();

    assert!(err.is_transient());
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_check_in_timeout() {
    let server = MockServer::start().await;
    let transport = TransportConfig::default().with_timeout(Duration::from_millis(100));
    let client = EventGoClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    Mock::given(method("POST"))
        .and(path("/events/42/checkin/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client.check_in(42, "TICKET-ABC123", &token()).await.unwrap_err();

    assert!(matches!(err, Error::Timeout { .. }), "got: {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_check_in_garbled_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/events/42/checkin/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.check_in(42, "TICKET-ABC123", &token()).await.unwrap_err();

    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let server = MockServer::start().await;
    let client =
        EventGoClient::from_reqwest(&format!("{}/api", server.uri()), reqwest::Client::new())
            .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/events/7/checkin/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Check-in thành công",
            "order_id": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.check_in(7, "QR_1_1", &token()).await.unwrap();
    assert_eq!(resp.order_id, Some(1));
}

// ── Auth tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .and(body_json(json!({ "username": "organizer", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token",
            "token_type": "Bearer",
            "expires_in": 36000
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter2".to_string().into();
    let token = client.login("organizer", &secret).await.unwrap();

    assert_eq!(token.expose(), "fresh-token");
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Sai tên đăng nhập" })),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("organizer", &secret).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("Sai tên đăng nhập"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

// ── Event tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_event_detail() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/events/42/detail/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "Rock Night",
            "date": "2024-01-01T12:00:00Z",
            "status": "upcoming",
            "location": "Hà Nội",
            "ticket_limit": 500
        })))
        .mount(&server)
        .await;

    let event = client.event_detail(42, None).await.unwrap();

    assert_eq!(event.id, 42);
    assert_eq!(event.name.as_deref(), Some("Rock Night"));
    assert_eq!(event.status, "upcoming");
}
