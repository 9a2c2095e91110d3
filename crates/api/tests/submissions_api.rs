//! Integration tests for the worker submission endpoints
//! (`/processed_message`, `/error_message`).

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, test_config, test_state};
use relay_core::types::{Resolution, ResultPayload};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: processed message is acknowledged and stored
// ---------------------------------------------------------------------------

#[tokio::test]
async fn processed_message_is_stored() {
    let state = test_state(test_config());
    let app = common::build_test_app(state.clone());

    let response = post_json(
        app,
        "/processed_message",
        json!({"key": "abc", "output": [{"named_entities": []}]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Processed data stored successfully.");

    assert_eq!(
        state.store.take("abc").await.unwrap(),
        Some(Resolution::Processed(ResultPayload::Structured(
            json!([{"named_entities": []}])
        )))
    );
}

// ---------------------------------------------------------------------------
// Test: error message is acknowledged and stored
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_message_is_stored() {
    let state = test_state(test_config());
    let app = common::build_test_app(state.clone());

    let response = post_json(
        app,
        "/error_message",
        json!({"key": "abc", "error": "Processing exception occurred."}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Error stored.");

    assert_eq!(
        state.store.take("abc").await.unwrap(),
        Some(Resolution::Failed("Processing exception occurred.".into()))
    );
}

// ---------------------------------------------------------------------------
// Test: empty key is rejected with 400 and nothing is stored
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_key_is_rejected() {
    let state = test_state(test_config());
    let app = common::build_test_app(state.clone());

    let response = post_json(app, "/error_message", json!({"key": "", "error": "x"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(state.store.pending_resolutions().await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: null output is rejected with 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn null_output_is_rejected() {
    let state = test_state(test_config());
    let app = common::build_test_app(state.clone());

    let response = post_json(app, "/processed_message", json!({"key": "abc", "output": null})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.store.take("abc").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: body missing a required field is rejected by the extractor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_field_is_rejected() {
    let state = test_state(test_config());
    let app = common::build_test_app(state.clone());

    let response = post_json(app, "/processed_message", json!({"key": "abc"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    assert_eq!(state.store.pending_resolutions().await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: result then error for one key -- the error wins
// ---------------------------------------------------------------------------

#[tokio::test]
async fn later_error_overwrites_result() {
    let state = test_state(test_config());
    let app = common::build_test_app(state.clone());

    let first = post_json(
        app.clone(),
        "/processed_message",
        json!({"key": "key", "output": "A"}),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(app, "/error_message", json!({"key": "key", "error": "err"})).await;
    assert_eq!(second.status(), StatusCode::OK);

    assert_eq!(
        state.store.take("key").await.unwrap(),
        Some(Resolution::Failed("err".into()))
    );
    assert_eq!(state.store.pending_resolutions().await.unwrap(), 0);
}
