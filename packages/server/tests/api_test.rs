use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{app_for, create_test_app, get, json_body, post_json, test_config, VOCAB};

#[tokio::test]
async fn test_health_root() {
    let (app, _dir) = create_test_app().await;

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cards"], 3);
    assert_eq!(body["assistant"], "disabled");
}

#[tokio::test]
async fn test_health_live() {
    let (app, _dir) = create_test_app().await;

    let response = get(&app, "/health/live").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _dir) = create_test_app().await;

    let response = get(&app, "/api/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_next_card_draws_from_due_cards() {
    let (app, _dir) = create_test_app().await;

    let response = get(&app, "/api/cards/next").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["tick"], 1);
    assert_eq!(body["data"]["policy"], "frequency");
    assert!(body["data"]["card"]["id"].is_u64());
}

#[tokio::test]
async fn test_easy_response_masters_card_and_persists() {
    let (app, dir) = create_test_app().await;

    let next = json_body(get(&app, "/api/cards/next").await).await;
    let id = next["data"]["card"]["id"].as_u64().unwrap();

    let response = post_json(
        &app,
        &format!("/api/cards/{id}/response"),
        json!({ "verdict": "easy" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["cardId"], id);
    assert_eq!(body["data"]["proficiency"], 2);
    assert_eq!(body["data"]["persisted"], true);
    assert_eq!(body["data"]["next"]["tick"], 2);

    assert!(dir.path().join("state").join("vocab_progress.json").exists());

    let stats = json_body(get(&app, "/api/stats").await).await;
    assert_eq!(stats["data"]["total"], 3);
    assert_eq!(stats["data"]["mastered"], 1);
    assert_eq!(stats["data"]["percentage"], 33);
}

#[tokio::test]
async fn test_hard_response_enters_active_pool() {
    let (app, _dir) = create_test_app().await;

    let response = post_json(&app, "/api/cards/1/response", json!({ "verdict": "Hard" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["proficiency"], 0);
    assert_eq!(body["data"]["next"]["policy"], "overflow");
    assert_eq!(body["data"]["next"]["cardId"], 1);
    assert_eq!(body["data"]["nextCard"]["id"], 1);
}

#[tokio::test]
async fn test_unknown_card_is_404() {
    let (app, _dir) = create_test_app().await;

    let response = post_json(&app, "/api/cards/999/response", json!({ "verdict": "easy" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_verdict_is_400() {
    let (app, _dir) = create_test_app().await;

    let response = post_json(&app, "/api/cards/0/response", json!({ "verdict": "maybe" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_and_browse_cards() {
    let (app, _dir) = create_test_app().await;

    let list = json_body(get(&app, "/api/cards").await).await;
    let cards = list["data"].as_array().unwrap();
    assert_eq!(cards.len(), 3);

    let first = json_body(get(&app, "/api/cards/browse").await).await;
    assert!(first["data"]["id"].is_u64());

    let response = get(&app, "/api/cards/browse?direction=sideways").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_review_after_easy() {
    let (app, _dir) = create_test_app().await;

    let empty = json_body(get(&app, "/api/review").await).await;
    assert!(empty["data"].is_null());

    post_json(&app, "/api/cards/2/response", json!({ "verdict": "easy" })).await;

    let body = json_body(get(&app, "/api/review?direction=current").await).await;
    assert_eq!(body["data"]["card"]["id"], 2);
    assert_eq!(body["data"]["position"], 1);
    assert_eq!(body["data"]["total"], 1);

    let wrapped = json_body(get(&app, "/api/review?direction=next").await).await;
    assert_eq!(wrapped["data"]["card"]["id"], 2);
}

#[tokio::test]
async fn test_goal_reached_and_continue() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir, VOCAB);
    config.daily_goal = 1;
    let app = app_for(&config).await;

    let body = json_body(
        post_json(&app, "/api/cards/0/response", json!({ "verdict": "easy" })).await,
    )
    .await;
    assert_eq!(body["data"]["goalReached"], true);
    assert!(body["data"]["encouragement"].is_string());

    let stats = json_body(post_json(&app, "/api/goal/continue", json!({})).await).await;
    assert_eq!(stats["data"]["remainingToday"], 1);
}

#[tokio::test]
async fn test_browse_applies_daily_rollover() {
    let (app, dir) = create_test_app().await;
    let state_dir = dir.path().join("state");

    post_json(&app, "/api/cards/0/response", json!({ "verdict": "easy" })).await;
    std::fs::write(state_dir.join("last_reset.txt"), "2020-01-01T08:00:00+00:00").unwrap();

    let response = get(&app, "/api/cards/browse?direction=backward").await;
    assert_eq!(response.status(), StatusCode::OK);

    let marker = std::fs::read_to_string(state_dir.join("last_reset.txt")).unwrap();
    assert!(!marker.starts_with("2020-01-01"));

    let saved: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(state_dir.join("vocab_progress.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(saved["remainingToday"], 50);
}

#[tokio::test]
async fn test_restart_restores_progress() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir, VOCAB);

    {
        let app = app_for(&config).await;
        post_json(&app, "/api/cards/1/response", json!({ "verdict": "easy" })).await;
        post_json(&app, "/api/cards/2/response", json!({ "verdict": "medium" })).await;
    }

    let app = app_for(&config).await;
    let stats = json_body(get(&app, "/api/stats").await).await;
    assert_eq!(stats["data"]["mastered"], 1);
    assert_eq!(stats["data"]["activePoolSize"], 1);
}

#[tokio::test]
async fn test_empty_vocabulary_serves_no_card() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir, "[]");
    let app = app_for(&config).await;

    let body = json_body(get(&app, "/api/cards/next").await).await;
    assert_eq!(body["data"]["policy"], "fallback");
    assert!(body["data"]["card"].is_null());
    assert_eq!(body["data"]["events"][0]["type"], "poolEmpty");
}

#[tokio::test]
async fn test_assistant_chat_without_key_is_503() {
    let (app, _dir) = create_test_app().await;

    let response = post_json(&app, "/api/assistant/chat", json!({ "message": "ciao" })).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = post_json(&app, "/api/assistant/chat", json!({ "message": "   " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let history = json_body(get(&app, "/api/assistant/history").await).await;
    assert_eq!(history["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_example_without_key_is_503() {
    let (app, _dir) = create_test_app().await;

    let response = post_json(&app, "/api/cards/0/example", json!({})).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = post_json(&app, "/api/cards/42/example", json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
