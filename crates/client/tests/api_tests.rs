//! Endpoint tests: session lifecycle, account operations, OAuth, admin queries

use nextstep_client::types::{AuthTokens, RegisterRequest};
use nextstep_client::{ClientError, FileStore, Locale, MemoryStore, NextStepClient};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SLOT_ID: &str = "0d8c7a8e-0a44-4a52-9e34-6f8e6a7d3b21";

fn user_json() -> Value {
    json!({
        "id": "6f1c2a52-4c1e-4b8e-9b59-0d6f2f1f0a11",
        "email": "anna@example.com",
        "firstName": "Anna",
        "lastName": "Kowalska",
        "phone": "+48123456789",
        "role": "ADMIN",
        "isAdmin": true,
        "emailNotificationsEnabled": false,
        "createdAt": "2026-01-10T12:00:00Z"
    })
}

fn tokens_json(access: &str) -> Value {
    json!({
        "accessToken": access,
        "refreshToken": "refresh-1",
        "expiresIn": 900
    })
}

fn signed_in_client(server: &MockServer) -> NextStepClient {
    let client = NextStepClient::new(server.uri()).unwrap();
    client
        .tokens()
        .save(&AuthTokens {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_in: 900,
        })
        .unwrap();
    client
}

#[tokio::test]
async fn test_login_stores_tokens_and_loads_profile() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "anna@example.com", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokens_json("access-1")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = NextStepClient::new(mock_server.uri()).unwrap();
    let user = client.login("anna@example.com", "secret").await.unwrap();

    assert!(user.is_admin);
    assert_eq!(user.nickname, None);
    assert!(client.has_session());
    assert_eq!(client.tokens().refresh_token().as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_login_failure_keeps_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "UNAUTHORIZED",
            "message": "Nieprawidłowy email lub hasło"
        })))
        .mount(&mock_server)
        .await;

    // A rejected login never triggers a refresh
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokens_json("x")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = NextStepClient::new(mock_server.uri()).unwrap();
    let err = client.login("anna@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 401, .. }));
    assert_eq!(err.to_string(), "Nieprawidłowy email lub hasło");
    assert!(!client.has_session());
}

#[tokio::test]
async fn test_auth_failure_without_message_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "code": "BAD_REQUEST" })))
        .mount(&mock_server)
        .await;

    let client = NextStepClient::new(mock_server.uri()).unwrap();
    let err = client.forgot_password("anna@example.com").await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "HTTP 400");
}

#[tokio::test]
async fn test_auth_failure_with_non_json_body_uses_fixed_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = NextStepClient::new(mock_server.uri()).unwrap();
    let request = RegisterRequest {
        email: "anna@example.com".to_string(),
        password: "secret".to_string(),
        first_name: "Anna".to_string(),
        last_name: "Kowalska".to_string(),
        phone: "+48123456789".to_string(),
    };

    let err = client.register(&request).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "Wystąpił błąd");

    // Unmatched requests get an empty 404, which is not JSON either
    client.set_locale(Locale::En);
    let err = client.forgot_password("anna@example.com").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), Locale::En.messages().unreadable);
}

#[tokio::test]
async fn test_verify_email_encodes_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify-email"))
        .and(query_param("token", "abc+/= def"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Email zweryfikowany"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = NextStepClient::new(mock_server.uri()).unwrap();
    let response = client.verify_email("abc+/= def").await.unwrap();
    assert_eq!(response.message, "Email zweryfikowany");
}

#[tokio::test]
async fn test_restore_session_without_tokens() {
    let mock_server = MockServer::start().await;
    let client = NextStepClient::new(mock_server.uri()).unwrap();

    assert!(client.restore_session().await.unwrap().is_none());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_restore_session_rejected_clears_tokens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let expired = Arc::new(AtomicUsize::new(0));
    let counter = expired.clone();
    let client = NextStepClient::builder()
        .base_url(mock_server.uri())
        .on_session_expired(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();
    client
        .tokens()
        .save(&AuthTokens {
            access_token: "stale".to_string(),
            refresh_token: "stale-refresh".to_string(),
            expires_in: 900,
        })
        .unwrap();

    assert!(client.restore_session().await.unwrap().is_none());
    assert!(!client.has_session());
    assert_eq!(expired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_logout_is_local() {
    let mock_server = MockServer::start().await;
    let client = signed_in_client(&mock_server);

    client.logout().unwrap();

    assert!(!client.has_session());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_account_drops_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/user/me"))
        .and(body_json(json!({ "password": "secret" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    client.delete_account("secret").await.unwrap();

    assert!(!client.has_session());
}

#[tokio::test]
async fn test_delete_account_failure_keeps_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/user/me"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Nieprawidłowe hasło"
        })))
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let err = client.delete_account("wrong").await.unwrap_err();

    assert_eq!(err.to_string(), "Nieprawidłowe hasło");
    assert!(client.has_session());
}

#[tokio::test]
async fn test_change_locale_sync_failure_is_ignored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/user/me/language"))
        .and(header("accept-language", "en"))
        .and(body_json(json!({ "language": "en" })))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    client.change_locale(Locale::En).await;

    assert_eq!(client.locale(), Locale::En);
}

#[tokio::test]
async fn test_change_locale_signed_out_stays_local() {
    let mock_server = MockServer::start().await;
    let client = NextStepClient::new(mock_server.uri()).unwrap();

    client.change_locale(Locale::Es).await;

    assert_eq!(client.locale(), Locale::Es);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_complete_oauth_returns_saved_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .and(header("authorization", "Bearer oauth-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = NextStepClient::new(mock_server.uri()).unwrap();
    client.redirects().save("/my-reservations").unwrap();

    let (user, redirect) = client
        .complete_oauth(
            "https://booking.example.com/oauth-callback?accessToken=oauth-access&refreshToken=oauth-refresh&expiresIn=900",
        )
        .await
        .unwrap();

    assert_eq!(user.email, "anna@example.com");
    assert_eq!(redirect.as_deref(), Some("/my-reservations"));
    assert_eq!(client.redirects().consume().unwrap(), None);
    assert_eq!(
        client.tokens().refresh_token().as_deref(),
        Some("oauth-refresh")
    );
}

#[tokio::test]
async fn test_tokens_persist_across_clients() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    let first = NextStepClient::builder()
        .base_url(mock_server.uri())
        .token_storage(Arc::new(FileStore::open(&file).unwrap()))
        .build()
        .unwrap();
    first
        .tokens()
        .save(&AuthTokens {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_in: 900,
        })
        .unwrap();

    let second = NextStepClient::builder()
        .base_url(mock_server.uri())
        .token_storage(Arc::new(FileStore::open(&file).unwrap()))
        .session_storage(Arc::new(MemoryStore::new()))
        .build()
        .unwrap();

    assert!(second.has_session());
    assert_eq!(second.tokens().access_token().as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_block_slot_sends_reason_as_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/api/admin/slots/{SLOT_ID}/block")))
        .and(query_param("reason", "brak instruktora"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let slot_id: Uuid = SLOT_ID.parse().unwrap();
    client
        .block_slot(slot_id, Some("brak instruktora"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_activity_logs_paging() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/activity-logs"))
        .and(query_param("page", "2"))
        .and(query_param("size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": SLOT_ID,
            "userFullName": "Anna Kowalska",
            "userEmail": "anna@example.com",
            "actionType": "RESERVATION_CREATED",
            "slotDate": "2026-03-04",
            "slotStartTime": "10:00:00",
            "slotEndTime": "12:00:00",
            "createdAt": "2026-03-01T09:30:00Z"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let logs = client.activity_logs(2, 20).await.unwrap();

    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action_type, "RESERVATION_CREATED");
    assert_eq!(logs[0].event_title, None);
}

#[tokio::test]
async fn test_admin_forbidden_for_regular_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let err = client.all_users().await.unwrap_err();

    assert!(matches!(err, ClientError::Forbidden(_)));
    assert_eq!(err.to_string(), Locale::Pl.messages().forbidden);
}
