//! Tests for the `/loglevel` endpoint.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

use rotalog::admin::{setup_admin_router, AdminServer, AdminState};
use rotalog::{LevelGate, Severity};

async fn call(gate: &Arc<LevelGate>, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let router = setup_admin_router(AdminState::new(gate.clone()));
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
}

fn json_request(method: Method, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/loglevel")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_get_current_level() {
    let gate = Arc::new(LevelGate::new(Severity::Info));
    let request = Request::get("/loglevel").body(Body::empty()).unwrap();
    let (status, body) = call(&gate, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["level"], "info");
}

#[tokio::test]
async fn test_set_every_level_case_insensitive() {
    let gate = Arc::new(LevelGate::new(Severity::Debug));
    for (name, expected) in [
        ("DEBUG", Severity::Debug),
        ("Info", Severity::Info),
        ("warn", Severity::Warn),
        ("eRRor", Severity::Error),
        ("FATAL", Severity::Fatal),
    ] {
        let request = json_request(Method::PUT, &format!(r#"{{"level":"{name}"}}"#));
        let (status, body) = call(&gate, request).await;
        assert_eq!(status, StatusCode::OK, "setting {name}");
        assert_eq!(body["level"], expected.as_str());
        assert_eq!(gate.current_level(), expected);
    }
}

#[tokio::test]
async fn test_unknown_level_rejected() {
    let gate = Arc::new(LevelGate::new(Severity::Warn));
    for body in [r#"{"level":"verbose"}"#, r#"{"level":""}"#, r#"{}"#, "garbage"] {
        let (status, response) = call(&gate, json_request(Method::PUT, body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert!(response["error"].is_string());
        assert_eq!(gate.current_level(), Severity::Warn);
    }
}

#[tokio::test]
async fn test_post_form_and_query() {
    let gate = Arc::new(LevelGate::new(Severity::Debug));

    let form = Request::builder()
        .method(Method::POST)
        .uri("/loglevel")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("level=error"))
        .unwrap();
    let (status, _) = call(&gate, form).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gate.current_level(), Severity::Error);

    let query = Request::builder()
        .method(Method::PUT)
        .uri("/loglevel?level=info")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&gate, query).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["level"], "info");
    assert_eq!(gate.current_level(), Severity::Info);
}

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let gate = Arc::new(LevelGate::new(Severity::Debug));
    let request = Request::delete("/loglevel").body(Body::empty()).unwrap();
    let (status, _) = call(&gate, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let request = Request::get("/other").body(Body::empty()).unwrap();
    let (status, _) = call(&gate, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_served_over_tcp() {
    let gate = Arc::new(LevelGate::new(Severity::Debug));
    let server = AdminServer::bind("127.0.0.1:0", AdminState::new(gate.clone()))
        .await
        .unwrap();
    let handle = server.spawn();
    let url = format!("http://{}/loglevel", handle.local_addr());

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .put(&url)
        .json(&serde_json::json!({ "level": "warn" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(gate.current_level(), Severity::Warn);

    let body: serde_json::Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["level"], "warn");

    let res = client
        .put(&url)
        .json(&serde_json::json!({ "level": "loud" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(gate.current_level(), Severity::Warn);

    handle.shutdown().await.unwrap();
}
