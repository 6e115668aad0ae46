use std::net::SocketAddr;
use std::sync::Arc;
use stockwise_gateway::{build_router, AppState};
use stockwise_license::{LicenseConfig, MemoryStore, SignatureEngine};

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
///
/// Each test gets its own store and its own rate-limit window.
async fn spawn_test_server() -> String {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        SignatureEngine::new(b"gateway-test-secret"),
        LicenseConfig::default(),
    );
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

fn issue_body() -> serde_json::Value {
    serde_json::json!({
        "clientName": "Acme Warehousing",
        "clientEmail": "ops@acme.example",
        "clientCompany": "Acme Inc",
        "licenseType": "enterprise"
    })
}

async fn issue_as_superadmin(client: &reqwest::Client, base: &str) -> serde_json::Value {
    let resp = client
        .post(format!("{base}/api/v1/license/issue"))
        .header("x-actor-id", "root")
        .header("x-actor-role", "superadmin")
        .json(&issue_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

// ── Issuance boundary ────────────────────────────────────────────

#[tokio::test]
async fn issue_without_actor_is_forbidden() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/api/v1/license/issue"))
        .json(&issue_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn issue_as_staff_is_forbidden() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/api/v1/license/issue"))
        .header("x-actor-id", "user-7")
        .header("x-actor-role", "staff")
        .json(&issue_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn issue_returns_signed_record() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let record = issue_as_superadmin(&client, &base).await;

    let key = record["licenseKey"].as_str().unwrap();
    assert!(key.starts_with("ENT-"));
    assert_eq!(record["licenseType"], "enterprise");
    assert_eq!(record["features"]["whiteLabel"], true);
    assert!(!record["signature"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn issue_rejects_bad_request() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/api/v1/license/issue"))
        .header("x-actor-id", "root")
        .header("x-actor-role", "superadmin")
        .json(&serde_json::json!({
            "clientName": "",
            "clientEmail": "ops@acme.example",
            "licenseType": "basic"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

// ── Validation surface ───────────────────────────────────────────

#[tokio::test]
async fn heartbeat_with_no_license_is_invalid() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{base}/api/v1/license/heartbeat"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], false);
    assert_eq!(body["reason"], "No active license");
}

#[tokio::test]
async fn heartbeat_bypassed_for_superadmin() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .get(format!("{base}/api/v1/license/heartbeat"))
        .header("x-actor-id", "root")
        .header("x-actor-role", "superadmin")
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn revalidate_unknown_key_reports_not_found() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/api/v1/license/revalidate"))
        .json(&serde_json::json!({ "licenseKey": "PRO-FFFFFFFF-0-0000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], false);
    assert_eq!(body["error"], "License not found");
}

#[tokio::test]
async fn full_activation_flow() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let record = issue_as_superadmin(&client, &base).await;
    let key = record["licenseKey"].as_str().unwrap();

    let resp = client
        .post(format!("{base}/api/v1/license/activate"))
        .header("x-actor-id", "root")
        .header("x-actor-role", "superadmin")
        .json(&serde_json::json!({ "licenseKey": key }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let overview: serde_json::Value = reqwest::get(format!("{base}/api/v1/license/current"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(overview["active"], true);
    assert_eq!(overview["license"]["licenseType"], "enterprise");
    assert_eq!(overview["license"]["clientName"], "Acme Warehousing");

    let heartbeat: serde_json::Value = reqwest::get(format!("{base}/api/v1/license/heartbeat"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(heartbeat["valid"], true);

    let revalidation: serde_json::Value = client
        .post(format!("{base}/api/v1/license/revalidate"))
        .json(&serde_json::json!({ "licenseKey": key }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(revalidation["valid"], true);
}

#[tokio::test]
async fn activate_unknown_key_is_404() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/api/v1/license/activate"))
        .header("x-actor-id", "root")
        .header("x-actor-role", "superadmin")
        .json(&serde_json::json!({ "licenseKey": "BAS-00000000-0-0000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn current_with_no_license_is_inactive() {
    let base = spawn_test_server().await;
    let overview: serde_json::Value = reqwest::get(format!("{base}/api/v1/license/current"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(overview["active"], false);
    assert!(overview.get("license").is_none());
}

// ── Rate limiting ────────────────────────────────────────────────

#[tokio::test]
async fn revalidate_is_rate_limited_per_address() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let body = serde_json::json!({ "licenseKey": "PRO-FFFFFFFF-0-0000" });

    for i in 0..10 {
        let resp = client
            .post(format!("{base}/api/v1/license/revalidate"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "request {} should pass", i + 1);
    }

    let resp = client
        .post(format!("{base}/api/v1/license/revalidate"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 429);
}

#[tokio::test]
async fn rate_limit_does_not_apply_to_heartbeat() {
    let base = spawn_test_server().await;
    for _ in 0..15 {
        let resp = reqwest::get(format!("{base}/api/v1/license/heartbeat"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{base}/api/v1/license/nonexistent"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
