//! `fdbk login` / `fdbk logout` against a mock Identity Toolkit server.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[tokio::test]
async fn test_login_persists_session() {
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
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-ana",
            "email": "ana@x.com",
            "displayName": "Ana",
            "idToken": "id-ana",
            "refreshToken": "refresh-ana",
            "expiresIn": "3600",
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("fdbk")
        .env("FDBK_HOME", home.path())
        .env("FDBK_FIREBASE_API_KEY", "test-key")
        .env("FDBK_AUTH_BASE_URL", server.uri())
        .args(["login", "--email", "ana@x.com"])
        .write_stdin("123456\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as Ana"));

    let stored = fs::read_to_string(home.path().join("session.json")).unwrap();
    assert!(stored.contains("uid-ana"));
}

#[tokio::test]
async fn test_login_failure_reports_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "INVALID_LOGIN_CREDENTIALS" }
        })))
        .mount(&server)
        .await;

    cargo_bin_cmd!("fdbk")
        .env("FDBK_HOME", home.path())
        .env("FDBK_FIREBASE_API_KEY", "test-key")
        .env("FDBK_AUTH_BASE_URL", server.uri())
        .args(["login", "--email", "ana@x.com"])
        .write_stdin("wrong-password\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Sign-in failed"));

    assert!(!home.path().join("session.json").exists());
}

#[test]
fn test_login_validates_before_calling_service() {
    let home = TempDir::new().unwrap();

    cargo_bin_cmd!("fdbk")
        .env("FDBK_HOME", home.path())
        .env("FDBK_FIREBASE_API_KEY", "test-key")
        .env("FDBK_AUTH_BASE_URL", "http://127.0.0.1:9")
        .args(["login", "--email", "not-an-email"])
        .write_stdin("123\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("E-mail inválido"))
        .stderr(predicate::str::contains("Mínimo 6 caracteres"));
}

#[test]
fn test_logout_clears_session() {
    let home = TempDir::new().unwrap();
    let session = home.path().join("session.json");
    fs::write(
        &session,
        json!({
            "uid": "uid-ana",
            "id_token": "id-ana",
            "refresh_token": "refresh-ana",
            "expires_at_ms": u64::MAX,
        })
        .to_string(),
    )
    .unwrap();

    cargo_bin_cmd!("fdbk")
        .env("FDBK_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out."));
    assert!(!session.exists());

    cargo_bin_cmd!("fdbk")
        .env("FDBK_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in."));
}
