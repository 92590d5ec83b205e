use std::path::{Path, PathBuf};
use std::sync::Arc;

use chipledger_api::app::services::AppServices;
use chipledger_api::config::AppConfig;
use chipledger_infra::{LedgerStore, StoreError};
use chipledger_wallet::LedgerState;
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(data_dir: &Path) -> Self {
        Self::spawn_with(config_in(data_dir)).await
    }

    async fn spawn_with(config: AppConfig) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        Self::serve(chipledger_api::app::build_app(&config)).await
    }

    async fn serve(app: axum::Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = reqwest::get(self.url(path)).await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = reqwest::Client::new()
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn config_in(dir: &Path) -> AppConfig {
    AppConfig {
        addr: "127.0.0.1:0".parse().unwrap(),
        data_file: data_file(dir),
        static_dir: Some(dir.join("public")),
        starting_balance: 1000,
    }
}

fn data_file(dir: &Path) -> PathBuf {
    dir.join("balances.json")
}

fn assert_error(status: StatusCode, body: &Value, code: &str) {
    assert_eq!(status, StatusCode::BAD_REQUEST, "body={body}");
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], code, "body={body}");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn health_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(dir.path()).await;

    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn profile_creates_player_with_starting_balance() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(dir.path()).await;

    let (status, body) = srv.get("/api/profile?username=%20alice%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "username": "alice", "balance": 1000 }));

    // Creation is persisted immediately.
    let saved: Value =
        serde_json::from_str(&std::fs::read_to_string(data_file(dir.path())).unwrap()).unwrap();
    assert_eq!(saved["players"]["alice"]["balance"], 1000);
    assert_eq!(saved["players"]["alice"]["history"], json!([]));
}

#[tokio::test]
async fn profile_requires_username() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(dir.path()).await;

    let (status, body) = srv.get("/api/profile").await;
    assert_error(status, &body, "INVALID_USERNAME");

    let (status, body) = srv.get("/api/profile?username=%20%20").await;
    assert_error(status, &body, "INVALID_USERNAME");
}

#[tokio::test]
async fn repeated_username_query_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(dir.path()).await;

    for path in [
        "/api/profile?username=a&username=b",
        "/api/admin/user-detail?username=a&username=b",
    ] {
        let res = reqwest::get(srv.url(path)).await.unwrap();
        let status = res.status();
        let content_type = res
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"), "{path}: {content_type}");
        let body: Value = res.json().await.unwrap();
        assert_error(status, &body, "INVALID_USERNAME");
    }

    let (_, users) = srv.get("/api/admin/users").await;
    assert_eq!(users["users"], json!([]));
}

#[tokio::test]
async fn charge_and_payout_move_the_balance() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(dir.path()).await;

    let (status, body) = srv
        .post("/api/game/charge", json!({ "username": "bob", "game": "slots", "amount": 100 }))
        .await;
    assert_eq!(status, StatusCode::OK, "body={body}");
    assert_eq!(body, json!({ "ok": true, "balance": 900 }));

    // Numeric strings are floored.
    let (status, body) = srv
        .post(
            "/api/game/payout",
            json!({ "username": "bob", "game": "slots", "amount": "250.9", "desc": "jackpot" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body={body}");
    assert_eq!(body["balance"], 1150);

    let (_, detail) = srv.get("/api/admin/user-detail?username=bob").await;
    let history = detail["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["game"], "slots");
    assert_eq!(history[0]["delta"], -100);
    assert_eq!(history[0]["desc"], "slots charge");
    assert_eq!(history[1]["delta"], 250);
    assert_eq!(history[1]["desc"], "jackpot");
    assert!(history[0]["ts"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn charge_never_overdraws() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(dir.path()).await;

    let (status, body) = srv
        .post("/api/game/charge", json!({ "username": "carol", "game": "poker", "amount": 1001 }))
        .await;
    assert_error(status, &body, "INSUFFICIENT_FUNDS");
    assert_eq!(body["message"], "Wager exceeds current balance.");

    // The player was still created, untouched.
    let (_, detail) = srv.get("/api/admin/user-detail?username=carol").await;
    assert_eq!(detail["balance"], 1000);
    assert_eq!(detail["history"], json!([]));

    let (status, body) = srv
        .post("/api/game/charge", json!({ "username": "carol", "game": "poker", "amount": 1000 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 0);
}

#[tokio::test]
async fn wager_validation_order_and_messages() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(dir.path()).await;

    let (status, body) = srv.post("/api/game/charge", json!({ "game": "", "amount": -1 })).await;
    assert_error(status, &body, "INVALID_USERNAME");

    let (status, body) = srv
        .post("/api/game/charge", json!({ "username": "dan", "game": "  ", "amount": -1 }))
        .await;
    assert_error(status, &body, "INVALID_GAME");

    let (status, body) = srv
        .post("/api/game/charge", json!({ "username": "dan", "game": "dice", "amount": 0.5 }))
        .await;
    assert_error(status, &body, "INVALID_AMOUNT");
    assert_eq!(body["message"], "Charge amount must be a positive integer.");

    let (status, body) = srv
        .post("/api/game/payout", json!({ "username": "dan", "game": "dice", "amount": "lots" }))
        .await;
    assert_error(status, &body, "INVALID_AMOUNT");
    assert_eq!(body["message"], "Payout amount must be a positive integer.");

    // Validation failures before the lookup never create the player.
    let (_, users) = srv.get("/api/admin/users").await;
    assert_eq!(users, json!({ "ok": true, "users": [] }));
}

#[tokio::test]
async fn save_profile_overwrites_balance() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(dir.path()).await;

    let (status, body) = srv
        .post("/api/profile/save", json!({ "username": "erin", "balance": 420 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (_, detail) = srv.get("/api/admin/user-detail?username=erin").await;
    assert_eq!(detail["balance"], 420);
    assert_eq!(detail["history"][0]["game"], "manual-save");
    assert_eq!(detail["history"][0]["delta"], 0);
    assert_eq!(detail["history"][0]["desc"], "session save");

    let (status, body) = srv
        .post("/api/profile/save", json!({ "username": "erin", "balance": -3 }))
        .await;
    assert_error(status, &body, "INVALID_BALANCE");

    let (status, body) = srv.post("/api/profile/save", json!({ "username": "erin" })).await;
    assert_error(status, &body, "INVALID_BALANCE");
}

#[tokio::test]
async fn admin_set_balance_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(dir.path()).await;

    let (status, body) = srv
        .post("/api/admin/set-balance", json!({ "username": "fay", "balance": 50, "note": " comp " }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "balance": 50 }));

    srv.get("/api/profile?username=gus").await;

    let (_, users) = srv.get("/api/admin/users").await;
    assert_eq!(
        users["users"],
        json!([
            { "username": "fay", "balance": 50 },
            { "username": "gus", "balance": 1000 },
        ])
    );

    let (_, detail) = srv.get("/api/admin/user-detail?username=fay").await;
    assert_eq!(detail["username"], "fay");
    assert_eq!(detail["history"][0]["game"], "admin-adjust");
    assert_eq!(detail["history"][0]["delta"], -950);
    assert_eq!(detail["history"][0]["desc"], "comp");

    let (status, body) = srv.post("/api/admin/delete-user", json!({ "username": "fay" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    // Deleting an unknown player is still ok.
    let (status, body) = srv.post("/api/admin/delete-user", json!({ "username": "fay" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (_, users) = srv.get("/api/admin/users").await;
    assert_eq!(users["users"], json!([{ "username": "gus", "balance": 1000 }]));

    let (status, body) = srv.post("/api/admin/delete-user", json!({})).await;
    assert_error(status, &body, "INVALID_USERNAME");
}

#[tokio::test]
async fn balances_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let srv = TestServer::spawn(dir.path()).await;
        srv.post("/api/game/charge", json!({ "username": "hal", "game": "slots", "amount": 300 }))
            .await;
    }

    let srv = TestServer::spawn(dir.path()).await;
    let (_, body) = srv.get("/api/profile?username=hal").await;
    assert_eq!(body["balance"], 700);
}

#[tokio::test]
async fn body_parsing_is_lenient_but_rejects_broken_json() {
    let dir = tempfile::tempdir().unwrap();
    let srv = TestServer::spawn(dir.path()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/game/charge"))
        .header("content-type", "application/json")
        .body("{\"username\": ")
        .send()
        .await
        .unwrap();
    let status = res.status();
    let body: Value = res.json().await.unwrap();
    assert_error(status, &body, "INVALID_JSON");

    // No body at all reads as an empty object.
    let res = client.post(srv.url("/api/profile/save")).send().await.unwrap();
    let status = res.status();
    let body: Value = res.json().await.unwrap();
    assert_error(status, &body, "INVALID_USERNAME");

    // A JSON array is not an object, so it reads as empty too.
    let (status, body) = srv.post("/api/admin/set-balance", json!([1, 2, 3])).await;
    assert_error(status, &body, "INVALID_USERNAME");
}

#[tokio::test]
async fn static_files_and_cors() {
    let dir = tempfile::tempdir().unwrap();
    let public = dir.path().join("public");
    std::fs::create_dir_all(&public).unwrap();
    std::fs::write(public.join("index.html"), "<h1>casino</h1>").unwrap();

    let srv = TestServer::spawn(dir.path()).await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/index.html")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "<h1>casino</h1>");

    let res = client
        .get(srv.url("/api/admin/users"))
        .header("origin", "http://games.example")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn custom_starting_balance_applies_to_new_players() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.starting_balance = 25;
    config.static_dir = None;

    let srv = TestServer::spawn_with(config).await;
    let (_, body) = srv.get("/api/profile?username=ivy").await;
    assert_eq!(body["balance"], 25);
}

/// Store whose every save fails, as with a read-only disk.
struct ReadOnlyStore;

impl LedgerStore for ReadOnlyStore {
    fn load(&self) -> Result<Option<LedgerState>, StoreError> {
        Ok(None)
    }

    fn save(&self, _state: &LedgerState) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

#[tokio::test]
async fn save_failures_do_not_fail_requests() {
    let store: Arc<dyn LedgerStore> = Arc::new(ReadOnlyStore);
    let services = Arc::new(AppServices::new(store, 1000));
    let srv = TestServer::serve(chipledger_api::app::router(services, None)).await;

    let (status, body) = srv
        .post("/api/game/payout", json!({ "username": "jo", "game": "slots", "amount": 5 }))
        .await;
    assert_eq!(status, StatusCode::OK, "body={body}");
    assert_eq!(body, json!({ "ok": true, "balance": 1005 }));

    let (_, body) = srv.get("/api/profile?username=jo").await;
    assert_eq!(body["balance"], 1005);
}
