use axum::http::StatusCode;
use kqa_api::middleware::rate_limit::START_BURST_SIZE;
use serde_json::json;

use crate::common::{StubImages, StubQuestions, drafts, test_app};

#[tokio::test]
async fn test_create_session_shows_categories() {
    let (client, state) = test_app(StubQuestions::default(), StubImages::default());

    let response = client.post("/sessions").await;
    assert_eq!(response.status, StatusCode::CREATED);

    let body = response.json();
    assert!(body["session_id"].is_string());
    assert_eq!(body["view"]["view"], "category_selection");
    assert_eq!(body["view"]["categories"].as_array().unwrap().len(), 15);
    assert_eq!(state.sessions.len().await, 1);
}

#[tokio::test]
async fn test_get_session() {
    let (client, _) = test_app(StubQuestions::default(), StubImages::default());
    let id = client.create_session().await;

    let response = client.get(&format!("/sessions/{id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["view"], "category_selection");
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let (client, _) = test_app(StubQuestions::default(), StubImages::default());
    let missing = "550e8400-e29b-41d4-a716-446655440000";

    let response = client.get(&format!("/sessions/{missing}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "Session not found");

    let response = client.post(&format!("/sessions/{missing}/next")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = client.delete(&format!("/sessions/{missing}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_session_id_is_400() {
    let (client, _) = test_app(StubQuestions::default(), StubImages::default());

    let response = client.get("/sessions/not-a-uuid").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_session() {
    let (client, state) = test_app(StubQuestions::default(), StubImages::default());
    let id = client.create_session().await;

    let response = client.delete(&format!("/sessions/{id}")).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(state.sessions.is_empty().await);

    let response = client.get(&format!("/sessions/{id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_returns_loading_view() {
    let (client, _) = test_app(StubQuestions::returning(drafts(2)), StubImages::default());
    let id = client.create_session().await;

    let response = client
        .post_json(&format!("/sessions/{id}/start"), &json!({ "category": "birds" }))
        .await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    let view = response.json();
    // Questions are fetched in the background
    assert_eq!(view["view"], "loading");
    assert_eq!(view["category"]["category"], "birds");
    assert_eq!(view["category"]["name"], "Birds");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_start_view_is_loading_even_with_instant_questions() {
    let (client, _) = test_app(StubQuestions::returning(drafts(2)), StubImages::default());

    for _ in 0..5 {
        let id = client.create_session().await;
        let response = client
            .post_json(&format!("/sessions/{id}/start"), &json!({ "category": "flags" }))
            .await;

        assert_eq!(response.status, StatusCode::ACCEPTED);
        assert_eq!(response.json()["view"], "loading");
        client.wait_for_view(&id, "quiz").await;
    }
}

#[tokio::test]
async fn test_start_unknown_category_is_rejected() {
    let (client, _) = test_app(StubQuestions::default(), StubImages::default());
    let id = client.create_session().await;

    let response = client
        .post_json(&format!("/sessions/{id}/start"), &json!({ "category": "dinosaurs" }))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let view = client.get(&format!("/sessions/{id}")).await.json();
    assert_eq!(view["view"], "category_selection");
}

#[tokio::test]
async fn test_operations_in_wrong_state_conflict() {
    let (client, _) = test_app(StubQuestions::default(), StubImages::default());
    let id = client.create_session().await;

    let response = client.post(&format!("/sessions/{id}/next")).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = client.answer(&id, "Anything").await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = client.get(&format!("/sessions/{id}/image")).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_start_is_rate_limited() {
    let (client, _) = test_app(StubQuestions::default(), StubImages::default());
    let id = client.create_session().await;

    let mut statuses = Vec::new();
    for _ in 0..=START_BURST_SIZE {
        let response = client
            .post_json(&format!("/sessions/{id}/start"), &json!({ "category": "flags" }))
            .await;
        statuses.push(response.status);
    }

    assert_eq!(statuses[0], StatusCode::ACCEPTED);
    assert!(
        statuses[1..statuses.len() - 1]
            .iter()
            .all(|status| *status == StatusCode::CONFLICT),
        "Starting twice should conflict: {statuses:?}"
    );
    assert_eq!(statuses.last(), Some(&StatusCode::TOO_MANY_REQUESTS));
}
