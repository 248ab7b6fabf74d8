//! Integration tests for the Firebase auth client against a mock Identity
//! Toolkit server.

use fdbk_core::auth::{AuthService, FirebaseAuth, Session, SessionCache};
use fdbk_core::error::ServiceErrorKind;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn account_body(uid: &str, email: &str, name: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "kind": "identitytoolkit#VerifyPasswordResponse",
        "localId": uid,
        "email": email,
        "idToken": format!("id-{uid}"),
        "refreshToken": format!("refresh-{uid}"),
        "expiresIn": "3600",
    });
    if let Some(name) = name {
        body["displayName"] = json!(name);
    }
    body
}

fn error_body(message: &str) -> serde_json::Value {
    json!({"error": {"code": 400, "message": message, "errors": []}})
}

fn client(server: &MockServer, home: &TempDir) -> FirebaseAuth {
    FirebaseAuth::new(
        "test-key",
        server.uri(),
        server.uri(),
        Some(SessionCache::at(home.path().join("session.json"))),
    )
}

#[tokio::test]
async fn test_sign_in_publishes_and_persists_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "email": "ana@x.com",
            "password": "123456",
            "returnSecureToken": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body(
            "uid-ana",
            "ana@x.com",
            Some("Ana"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let auth = client(&server, &home);
    let mut sub = auth.subscribe();
    assert_eq!(sub.next().await, Some(None));

    let session = auth.sign_in("ana@x.com", "123456").await.unwrap();
    assert_eq!(session.uid, "uid-ana");
    assert_eq!(session.display_name.as_deref(), Some("Ana"));
    assert!(!session.is_expired());

    let notified = sub.next().await.unwrap().unwrap();
    assert_eq!(notified.uid, "uid-ana");

    let cached = SessionCache::at(home.path().join("session.json"))
        .load()
        .unwrap()
        .unwrap();
    assert_eq!(cached, session);
}

#[tokio::test]
async fn test_sign_in_maps_credential_errors() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(error_body("INVALID_LOGIN_CREDENTIALS")),
        )
        .mount(&server)
        .await;

    let auth = client(&server, &home);
    let err = auth.sign_in("ana@x.com", "wrong-pass").await.unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::InvalidCredential);
    assert!(auth.current_session().is_none());
    assert!(!home.path().join("session.json").exists());
}

#[tokio::test]
async fn test_register_then_set_display_name() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(account_body("uid-new", "ana@x.com", None)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:update"))
        .and(body_partial_json(json!({
            "idToken": "id-uid-new",
            "displayName": "Ana",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-new",
            "email": "ana@x.com",
            "displayName": "Ana",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = client(&server, &home);
    let mut sub = auth.subscribe();
    assert_eq!(sub.next().await, Some(None));

    let created = auth.create_account("ana@x.com", "123456").await.unwrap();
    assert_eq!(created.display_name, None);
    assert_eq!(sub.next().await.unwrap().unwrap().uid, "uid-new");

    let named = auth.set_display_name(&created, "Ana").await.unwrap();
    assert_eq!(named.display_name.as_deref(), Some("Ana"));
    assert_eq!(named.id_token, "id-uid-new");
    assert_eq!(
        auth.current_session().unwrap().display_name.as_deref(),
        Some("Ana")
    );
}

#[tokio::test]
async fn test_register_rejected_when_email_exists() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body("EMAIL_EXISTS")))
        .mount(&server)
        .await;

    let auth = client(&server, &home);
    let err = auth.create_account("ana@x.com", "123456").await.unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::Rejected);
    assert_eq!(err.message, "EMAIL_EXISTS");
}

#[tokio::test]
async fn test_cached_session_restored_and_sign_out_clears_it() {
    let home = TempDir::new().unwrap();
    let cache = SessionCache::at(home.path().join("session.json"));
    let stored = Session {
        uid: "uid-cached".to_string(),
        email: Some("joao@x.com".to_string()),
        display_name: Some("João".to_string()),
        id_token: "id-cached".to_string(),
        refresh_token: "refresh-cached".to_string(),
        expires_at_ms: u64::MAX,
    };
    cache.save(&stored).unwrap();

    let auth = FirebaseAuth::new("k", "http://127.0.0.1:9", "http://127.0.0.1:9", Some(cache));
    let mut sub = auth.subscribe();
    assert_eq!(sub.next().await, Some(Some(stored)));
    assert_eq!(auth.id_token().await.unwrap().as_deref(), Some("id-cached"));

    auth.sign_out().await.unwrap();
    assert_eq!(sub.next().await, Some(None));
    assert!(!home.path().join("session.json").exists());
    assert_eq!(auth.id_token().await.unwrap(), None);
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let cache = SessionCache::at(home.path().join("session.json"));
    cache
        .save(&Session {
            uid: "uid-1".to_string(),
            email: None,
            display_name: None,
            id_token: "stale".to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_at_ms: 0,
        })
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .and(query_param("key", "test-key"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id_token": "fresh",
            "refresh_token": "refresh-2",
            "expires_in": "3600",
            "user_id": "uid-1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = FirebaseAuth::new("test-key", server.uri(), server.uri(), Some(cache.clone()));
    assert_eq!(auth.id_token().await.unwrap().as_deref(), Some("fresh"));
    // Second call uses the refreshed token without another request.
    assert_eq!(auth.id_token().await.unwrap().as_deref(), Some("fresh"));

    let saved = cache.load().unwrap().unwrap();
    assert_eq!(saved.refresh_token, "refresh-2");
}

#[tokio::test]
async fn test_rejected_refresh_signs_out() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let cache = SessionCache::at(home.path().join("session.json"));
    cache
        .save(&Session {
            uid: "uid-1".to_string(),
            email: None,
            display_name: None,
            id_token: "stale".to_string(),
            refresh_token: "revoked".to_string(),
            expires_at_ms: 0,
        })
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body("TOKEN_EXPIRED")))
        .mount(&server)
        .await;

    let auth = FirebaseAuth::new("test-key", server.uri(), server.uri(), Some(cache.clone()));
    let err = auth.id_token().await.unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::InvalidCredential);
    assert!(auth.current_session().is_none());
    assert!(cache.load().unwrap().is_none());
}
