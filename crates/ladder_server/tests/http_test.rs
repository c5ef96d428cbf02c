//! Tests for the HTTP routes.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use ladder_server::{MatchEngine, MemoryStore, router};

fn app() -> Router {
    router(Arc::new(MatchEngine::new(MemoryStore::new())))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body read failed")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).expect("body is JSON");
    (status, body)
}

async fn post(app: &Router, uri: &str, form: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("valid request");
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    send(app, request).await
}

async fn seed(app: &Router) {
    let (status, _) = post(app, "/register_player", "name=alice&pw_hash=aaaa0001").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(app, "/register_player", "name=bob&pw_hash=bbbb0002").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = post(
        app,
        "/create_match",
        "player_1_name=alice&pw_hash=aaaa0001&player_2_name=bob",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "match_id": 1}));
}

#[tokio::test]
async fn test_register_player() {
    let app = app();
    let (status, body) = post(&app, "/register_player", "name=alice&pw_hash=0badc0de").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = post(&app, "/register_player", "name=alice&pw_hash=0badc0de").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"status": "error", "why": "player alice already exists"}));
}

#[tokio::test]
async fn test_uppercase_hash_is_accepted() {
    let app = app();
    let (status, _) = post(&app, "/register_player", "name=alice&pw_hash=0BADC0DE").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(&app, "/register_player", "name=bob&pw_hash=bbbb0002").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(
        &app,
        "/create_match",
        "player_1_name=alice&pw_hash=0badc0de&player_2_name=bob",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_validation_errors() {
    let app = app();

    let (status, body) = post(&app, "/register_player", "name=alice").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "error", "why": "invalid pw_hash: missing"}));

    let (status, body) = post(&app, "/register_player", "name=alice&pw_hash=xyz").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["why"], "invalid pw_hash: invalid pw hash");

    let (status, body) = post(
        &app,
        "/register_player",
        "name=abcdefghijklmnopq&pw_hash=0badc0de",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["why"], "invalid name: name too long");

    let (status, body) = post(
        &app,
        "/apply_move",
        "name=alice&pw_hash=aaaa0001&position=9&match_id=1",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _) = post(
        &app,
        "/match_state",
        "name=alice&pw_hash=aaaa0001&match_id=0",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_game_over_http() {
    let app = app();
    seed(&app).await;

    let moves = [("alice", "aaaa0001", 0), ("bob", "bbbb0002", 3)];
    for (name, pw_hash, position) in moves {
        let form = format!("name={name}&pw_hash={pw_hash}&position={position}&match_id=1");
        let (status, body) = post(&app, "/apply_move", &form).await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (status, body) = post(
        &app,
        "/match_state",
        "name=bob&pw_hash=bbbb0002&match_id=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "turn": "alice", "board": 1 | (1 << 12)}));

    let (status, body) = post(
        &app,
        "/apply_move",
        "name=bob&pw_hash=bbbb0002&position=4&match_id=1",
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["why"], "not your turn");

    let (status, body) = post(
        &app,
        "/apply_move",
        "name=alice&pw_hash=aaaa0001&position=3&match_id=1",
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["why"], "field 3 has already been set");
}

#[tokio::test]
async fn test_auth_and_not_found() {
    let app = app();
    seed(&app).await;

    let (status, body) = post(
        &app,
        "/match_state",
        "name=alice&pw_hash=00000000&match_id=1",
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["why"], "player alice cannot be authenticated");

    let (status, body) = post(
        &app,
        "/match_state",
        "name=alice&pw_hash=aaaa0001&match_id=7",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["why"], "no such match");

    let (status, body) = post(
        &app,
        "/create_match",
        "player_1_name=alice&pw_hash=aaaa0001&player_2_name=carol",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["why"], "player carol does not exist");

    let (status, body) = post(
        &app,
        "/create_match",
        "player_1_name=alice&pw_hash=aaaa0001&player_2_name=alice",
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["why"], "please play against someone else");
}

#[tokio::test]
async fn test_leaderboard() {
    let app = app();
    seed(&app).await;

    let (status, body) = get(&app, "/leaderboard/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "ok", "scores": [{"name": "alice", "score": 0}]})
    );

    let (status, body) = get(&app, "/leaderboard/10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scores"].as_array().map(Vec::len), Some(2));

    let (status, _) = get(&app, "/leaderboard/many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
