//! `fdbk list` against a mock Firestore server.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLECTION_PATH: &str = "/v1/projects/demo/databases/(default)/documents/feedbacks";

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn write_session(home: &Path) {
    fs::write(
        home.join("session.json"),
        json!({
            "uid": "uid-ana",
            "email": "ana@x.com",
            "id_token": "id-ana",
            "refresh_token": "refresh-ana",
            "expires_at_ms": u64::MAX,
        })
        .to_string(),
    )
    .unwrap();
}

fn document(id: &str, name: &str, comment: &str, rating: i64, day: u32) -> serde_json::Value {
    json!({
        "name": format!("projects/demo/databases/(default)/documents/feedbacks/{id}"),
        "fields": {
            "userName": { "stringValue": name },
            "comment": { "stringValue": comment },
            "rating": { "integerValue": rating.to_string() },
            "createdAt": { "timestampValue": format!("2024-05-{day:02}T12:00:00Z") },
        }
    })
}

async fn mount_seven(server: &MockServer) {
    let documents: Vec<_> = (1..=7)
        .map(|i| {
            document(
                &format!("f{i}"),
                &format!("Pessoa {i}"),
                &format!("comentário {i}"),
                i64::from(i % 5 + 1),
                i,
            )
        })
        .collect();
    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .and(header("authorization", "Bearer id-ana"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "documents": documents })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_prints_first_page() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    write_session(home.path());
    let server = MockServer::start().await;
    mount_seven(&server).await;

    cargo_bin_cmd!("fdbk")
        .env("FDBK_HOME", home.path())
        .env("FDBK_FIREBASE_API_KEY", "test-key")
        .env("FDBK_FIREBASE_PROJECT_ID", "demo")
        .env("FDBK_FIRESTORE_BASE_URL", server.uri())
        .args(["list", "--order", "rating-desc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Comentário"))
        .stdout(predicate::str::contains("Pessoa 4"))
        .stdout(predicate::str::contains("Página 1 de 2"));
}

#[tokio::test]
async fn test_list_search_and_page() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    write_session(home.path());
    let server = MockServer::start().await;
    mount_seven(&server).await;

    cargo_bin_cmd!("fdbk")
        .env("FDBK_HOME", home.path())
        .env("FDBK_FIREBASE_API_KEY", "test-key")
        .env("FDBK_FIREBASE_PROJECT_ID", "demo")
        .env("FDBK_FIRESTORE_BASE_URL", server.uri())
        .args(["list", "--page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Página 2 de 2"));

    cargo_bin_cmd!("fdbk")
        .env("FDBK_HOME", home.path())
        .env("FDBK_FIREBASE_API_KEY", "test-key")
        .env("FDBK_FIREBASE_PROJECT_ID", "demo")
        .env("FDBK_FIRESTORE_BASE_URL", server.uri())
        .args(["list", "--search", "ninguém"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhum feedback encontrado."))
        .stdout(predicate::str::contains("Página 1 de 1"));

    cargo_bin_cmd!("fdbk")
        .env("FDBK_HOME", home.path())
        .env("FDBK_FIREBASE_API_KEY", "test-key")
        .env("FDBK_FIREBASE_PROJECT_ID", "demo")
        .env("FDBK_FIRESTORE_BASE_URL", server.uri())
        .args(["list", "--page", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Page 3 does not exist"));
}

#[test]
fn test_list_requires_session() {
    let home = TempDir::new().unwrap();

    cargo_bin_cmd!("fdbk")
        .env("FDBK_HOME", home.path())
        .env("FDBK_FIREBASE_API_KEY", "test-key")
        .env("FDBK_FIREBASE_PROJECT_ID", "demo")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}
