//! End-to-end tests of the dev server routes.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use dm_upgrade::{Board, Status};
use dm_upgrade_config::BoardFile;
use dm_upgrade_ui::{router, AppState};
use serde_json::Value;
use tower::ServiceExt;

fn app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::from_file(&BoardFile::default()));
    (router(state.clone()), state)
}

fn form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_put(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_str(&body_string(resp).await).unwrap()
}

#[tokio::test]
async fn index_renders_the_board() {
    let (app, _) = app();
    let resp = app.oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-cache");

    let html = body_string(resp).await;
    assert!(html.contains("DM version upgrades"));
    assert!(html.contains("Or any dm client"));
}

#[tokio::test]
async fn form_edit_replaces_field_and_redirects() {
    let (app, state) = app();

    let resp = app
        .clone()
        .oneshot(form("/versions/snapshot", "version=3"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");
    assert_eq!(state.board().await.snapshot().version, 3);

    let html = body_string(app.oneshot(get("/")).await.unwrap()).await;
    assert_eq!(html.matches("data-status=\"outdated\"").count(), 4);
}

#[tokio::test]
async fn form_edit_of_one_service_keeps_the_others() {
    let (app, state) = app();
    let before = state.board().await;

    let resp = app
        .oneshot(form("/versions/services/1", "version=7"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let after = state.board().await;
    assert_eq!(after.services()[1].version, 7);
    assert_eq!(after.services()[0], before.services()[0]);
    assert_eq!(after.services()[2], before.services()[2]);
    assert_eq!(after.services()[3], before.services()[3]);
}

#[tokio::test]
async fn invalid_form_input_is_refused_silently() {
    let (app, state) = app();

    for text in ["abc", "3abc", "", "1.5"] {
        let body = format!("version={text}");
        let resp = app
            .clone()
            .oneshot(form("/versions/database", &body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }
    assert_eq!(state.board().await, Board::default());
}

#[tokio::test]
async fn form_edit_of_unknown_service_is_not_found() {
    let (app, state) = app();
    let resp = app
        .oneshot(form("/versions/services/9", "version=2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.board().await, Board::default());
}

#[tokio::test]
async fn api_board_report() {
    let (app, _) = app();
    let resp = app.oneshot(get("/api/board")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["all_ok"], true);
    assert_eq!(json["entities"].as_array().unwrap().len(), 6);
    assert_eq!(json["entities"][1]["role"], "snapshot");
}

#[tokio::test]
async fn api_put_accepts_numbers_and_text() {
    let (app, _) = app();

    let resp = app
        .clone()
        .oneshot(json_put("/api/snapshot", r#"{"version": 2}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(json_put("/api/database", r#"{"version": " 5 "}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["snapshot_version"], 2);
    assert_eq!(json["entities"][0]["version"], 5);
    assert_eq!(json["entities"][0]["status"], Status::Inconsistent.to_string());
    assert!(json["entities"][0]["message"]
        .as_str()
        .unwrap()
        .contains("DM does not know about it"));
}

#[tokio::test]
async fn api_put_rejects_bad_input() {
    let (app, state) = app();

    let resp = app
        .clone()
        .oneshot(json_put("/api/services/0", r#"{"version": "two"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "'two' is not a whole number");

    let resp = app
        .oneshot(json_put("/api/services/4", r#"{"version": 1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(state.board().await, Board::default());
}

#[tokio::test]
async fn form_without_version_field_redirects() {
    let (app, state) = app();

    for uri in ["/versions/database", "/versions/snapshot", "/versions/services/0"] {
        let resp = app.clone().oneshot(form(uri, "")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(resp.headers()[header::LOCATION], "/");
    }
    assert_eq!(state.board().await, Board::default());
}

#[tokio::test]
async fn api_put_refuses_every_bad_json_shape() {
    let (app, state) = app();

    let cases = [
        (r#"{"version": 2.5}"#, "'2.5' is not a whole number"),
        (r#"{"version": true}"#, "'true' is not a whole number"),
        (r#"{}"#, "schema version must not be empty"),
        (r#"{"version": null}"#, "schema version must not be empty"),
    ];
    for (body, message) in cases {
        let resp = app
            .clone()
            .oneshot(json_put("/api/snapshot", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert_eq!(body_json(resp).await["error"], message, "{body}");
    }

    let resp = app
        .clone()
        .oneshot(json_put("/api/database", r#"{"version": 99999999999999999999}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(resp).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("out of range for a schema version"));

    assert_eq!(state.board().await, Board::default());
}

#[tokio::test]
async fn api_errors_are_always_json() {
    let (app, _) = app();

    let resp = app
        .clone()
        .oneshot(json_put("/api/database", "{not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());

    let resp = app
        .clone()
        .oneshot(json_put("/api/services/abc", r#"{"version": 1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());

    let resp = app
        .oneshot(form("/versions/services/abc", "version=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());
}
