//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the demo and dashboard endpoints using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port.

use rushslayer::api::{create_app, DashboardState};
use rushslayer::config::DashboardConfig;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> Router {
    let mut config = DashboardConfig::default();
    config.server.submission_latency_ms = 0;
    create_app(DashboardState::new(config, Some(2024)))
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>, token: Option<&str>) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    Reply { status, headers, body }
}

async fn login(app: &Router) -> String {
    let reply = send(
        app,
        "POST",
        "/api/auth/login",
        Some(r#"{"email":"admin@rushslayer.com","password":"admin123"}"#),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.json()["token"].as_str().unwrap().to_string()
}

// ============================================================================
// Demo endpoints
// ============================================================================

#[tokio::test]
async fn test_info_endpoints_return_200() {
    let app = test_app();
    for uri in [
        "/api/auth/login",
        "/api/auth/logout",
        "/api/feedback",
        "/api/analytics/export",
        "/health",
    ] {
        let reply = send(&app, "GET", uri, None, None).await;
        assert_eq!(reply.status, StatusCode::OK, "GET {uri}");
        assert!(reply.json().is_object(), "GET {uri} is not a JSON object");
    }
}

#[tokio::test]
async fn test_login_success() {
    let app = test_app();
    let reply = send(
        &app,
        "POST",
        "/api/auth/login",
        Some(r#"{"email":"admin@rushslayer.com","password":"admin123"}"#),
        None,
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    let v = reply.json();
    assert_eq!(v["success"], true);
    assert!(!v["token"].as_str().unwrap().is_empty());
    assert_eq!(v["expiresIn"], "24h");
    assert_eq!(
        v["user"],
        json!({
            "id": "admin_001",
            "email": "admin@rushslayer.com",
            "name": "Admin User",
            "role": "administrator",
        })
    );
}

#[tokio::test]
async fn test_login_failures() {
    let app = test_app();

    let reply = send(
        &app,
        "POST",
        "/api/auth/login",
        Some(r#"{"email":"admin@rushslayer.com","password":"wrong"}"#),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.json(), json!({"error": "Invalid credentials"}));

    let reply = send(&app, "POST", "/api/auth/login", Some(r#"{"email":"admin@rushslayer.com"}"#), None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json(), json!({"error": "Email and password are required"}));

    let reply = send(&app, "POST", "/api/auth/login", Some("{not json"), None).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json(), json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn test_logout_always_succeeds_and_revokes() {
    let app = test_app();
    let token = login(&app).await;

    let reply = send(&app, "POST", "/api/auth/logout", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.json(),
        json!({"success": true, "message": "Logged out successfully"})
    );

    let reply = send(&app, "GET", "/api/dashboard/overview", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, "POST", "/api/auth/logout", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_feedback_validation() {
    let app = test_app();

    let reply = send(
        &app,
        "POST",
        "/api/feedback",
        Some(r#"{"name":"Asha","phone":"","location":"Hebbal Flyover","feedbackText":"Long queues"}"#),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let v = reply.json();
    assert_eq!(v, json!({"error": "All fields are required"}));
    assert!(v.get("referenceId").is_none());

    let reply = send(
        &app,
        "POST",
        "/api/feedback",
        Some(r#"{"name":"Asha","phone":"98450","location":"Hebbal Flyover","feedbackText":"Long queues"}"#),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let v = reply.json();
    assert_eq!(v["success"], true);
    assert_eq!(v["message"], "Feedback submitted successfully");
    let reference = v["referenceId"].as_str().unwrap();
    let digits = reference.strip_prefix("FB-").unwrap();
    assert!(!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_csv_export() {
    let app = test_app();
    let reply = send(
        &app,
        "POST",
        "/api/analytics/export",
        Some(r#"{"timeRange":"24h","format":"csv"}"#),
        None,
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.headers.get(header::CONTENT_TYPE).unwrap(), "text/csv");
    let disposition = reply
        .headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"traffic-analytics-24h-"));
    assert!(disposition.ends_with(".csv\""));

    let text = reply.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Timestamp,Congestion Level,Average Speed,Vehicle Count,AQI,Node"
    );
    assert_eq!(lines.len(), 25);
    assert!(lines[1..].iter().all(|l| l.ends_with(",All Nodes")));
}

#[tokio::test]
async fn test_json_export_and_range_validation() {
    let app = test_app();
    let reply = send(
        &app,
        "POST",
        "/api/analytics/export",
        Some(r#"{"timeRange":"7d","format":"xml","includeNodes":["MG Road Junction"]}"#),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let v = reply.json();
    assert_eq!(v["success"], true);
    assert_eq!(v["metadata"]["timeRange"], "7d");
    assert_eq!(v["metadata"]["recordCount"], 28);
    assert_eq!(v["data"][0]["node"], "MG Road Junction");

    let reply = send(
        &app,
        "POST",
        "/api/analytics/export",
        Some(r#"{"timeRange":"1y","format":"csv"}"#),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_body_is_json_413() {
    let app = test_app();
    let padding = "x".repeat(128 * 1024);
    let body = format!(r#"{{"name":"{padding}","phone":"1","location":"MG Road","feedbackText":"long"}}"#);

    let reply = send(&app, "POST", "/api/feedback", Some(&body), None).await;
    assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(reply.json(), json!({"error": "Request body too large"}));

    let token = login(&app).await;
    let reply = send(&app, "POST", "/api/dashboard/overrides", Some(&body), Some(&token)).await;
    assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(reply.json()["error"], "Request body too large");
}

#[tokio::test]
async fn test_demo_bodies_parse_without_content_type() {
    let app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/analytics/export")
        .body(Body::from(r#"{"timeRange":"30d","format":null}"#))
        .unwrap();
    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let v: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["metadata"]["recordCount"], 30);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"email":"admin@rushslayer.com","password":"admin123"}"#))
        .unwrap();
    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let reply = send(&app, "POST", "/api/analytics/export", Some(r#"{"timeRange":"24h","#), None).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json(), json!({"error": "Failed to export analytics data"}));
}

// ============================================================================
// Dashboard endpoints
// ============================================================================

#[tokio::test]
async fn test_dashboard_rejects_bad_tokens() {
    let app = test_app();
    for token in [None, Some("session_1_abcdefghi"), Some("garbage")] {
        let reply = send(&app, "GET", "/api/dashboard/alerts", None, token).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{token:?}");
        assert!(reply.json()["error"].is_string());
    }
}

#[tokio::test]
async fn test_dashboard_overview() {
    let app = test_app();
    let token = login(&app).await;

    let reply = send(&app, "GET", "/api/dashboard/overview", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.headers.get("cache-control").unwrap(), "no-store");

    let v = reply.json();
    assert_eq!(v["meta"]["version"], "1");
    let nodes = v["data"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 6);
    for node in nodes {
        assert_eq!(node["lanes"].as_array().unwrap().len(), 4);
        assert!(node["averageQueueLength"].is_u64());
        assert!(node["aqiCategory"].is_string());
    }

    let reply = send(
        &app,
        "POST",
        "/api/dashboard/overview/simulator",
        Some(r#"{"enabled":false}"#),
        Some(&token),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = send(&app, "GET", "/api/dashboard/overview", None, Some(&token)).await;
    assert_eq!(reply.json()["data"]["simulatorEnabled"], false);
}

#[tokio::test]
async fn test_dashboard_alert_resolution() {
    let app = test_app();
    let token = login(&app).await;

    let reply = send(&app, "GET", "/api/dashboard/alerts", None, Some(&token)).await;
    let v = reply.json();
    let active = v["data"]["active"].as_array().unwrap();
    assert_eq!(active.len(), 2);
    let id = active[0]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/dashboard/alerts/{id}/resolve");
    let reply = send(&app, "POST", &uri, None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["data"]["status"], "resolved");

    let reply = send(&app, "GET", "/api/dashboard/alerts", None, Some(&token)).await;
    let v = reply.json();
    assert_eq!(v["data"]["active"].as_array().unwrap().len(), 1);
    assert_eq!(v["data"]["recentlyResolved"][0]["id"], id.as_str());

    let reply = send(&app, "POST", "/api/dashboard/alerts/alert_0_zzzzz/resolve", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_override_submission() {
    let app = test_app();
    let token = login(&app).await;

    let reply = send(
        &app,
        "POST",
        "/api/dashboard/overrides",
        Some(r#"{"node":"MG Road Junction","lane":"North","signalPhase":"Green","duration":45}"#),
        Some(&token),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let v = reply.json();
    assert_eq!(v["data"]["status"], "active");
    assert_eq!(v["data"]["user"], "Admin User");
    let id = v["data"]["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("override_"));
    assert_eq!(v["data"]["signalPhase"], "Green");

    let reply = send(
        &app,
        "POST",
        "/api/dashboard/overrides",
        Some(r#"{"node":"MG Road Junction","lane":"North","signalPhase":"Green","duration":301}"#),
        Some(&token),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(&app, "GET", "/api/dashboard/overrides", None, Some(&token)).await;
    let v = reply.json();
    let active: Vec<&str> = v["data"]["active"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert!(active.contains(&id.as_str()));
    assert!(v["data"]["history"]
        .as_array()
        .unwrap()
        .iter()
        .any(|o| o["id"] == "override_001" && o["status"] == "completed"));
    assert_eq!(v["data"]["durationBounds"], json!({"min": 10, "max": 300}));
}

#[tokio::test]
async fn test_dashboard_panel_lifecycle() {
    let app = test_app();
    let token = login(&app).await;

    let reply = send(&app, "POST", "/api/dashboard/panels/alerts/unmount", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    let v = reply.json();
    assert_eq!(v["data"]["mounted"], false);
    assert_eq!(v["data"]["events"][0]["event"], "panel_unmounted");
    assert_eq!(v["data"]["events"][0]["cancelled_timers"], 2);

    let reply = send(&app, "GET", "/api/dashboard/alerts", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = send(&app, "POST", "/api/dashboard/panels/alerts/mount", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = send(&app, "GET", "/api/dashboard/alerts", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, "POST", "/api/dashboard/panels/sidebar/mount", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_analytics_and_feedback() {
    let app = test_app();
    let token = login(&app).await;

    let reply = send(&app, "GET", "/api/dashboard/analytics?timeRange=30d", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    let v = reply.json();
    assert_eq!(v["data"]["series"].as_array().unwrap().len(), 30);
    assert_eq!(v["data"]["nodeCongestion"].as_array().unwrap().len(), 6);
    assert!(v["data"]["summary"]["avgCongestion"].is_u64());

    let reply = send(&app, "GET", "/api/dashboard/analytics?timeRange=1y", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    send(
        &app,
        "POST",
        "/api/feedback",
        Some(r#"{"name":"Ravi","phone":"1","location":"Whitefield Main Road","feedbackText":"Good"}"#),
        None,
    )
    .await;
    let reply = send(&app, "GET", "/api/dashboard/feedback", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    let v = reply.json();
    assert_eq!(v["data"][0]["location"], "Whitefield Main Road");
    assert_eq!(v["data"][0]["status"], "submitted");
    assert_eq!(v["data"][0]["processed"], false);
}
