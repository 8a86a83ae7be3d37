//! HTTP API behavior via `tower::ServiceExt::oneshot`.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{multipart_audio_body, MockResponder, MockSpeaker, MockTranscriber};
use serde_json::Value;
use skald_server::session::SessionStore;
use skald_server::{app, AppState};
use skald_voice::Capabilities;
use std::sync::Arc;
use tower::ServiceExt;

fn state_with(capabilities: Capabilities) -> AppState {
    AppState::new(capabilities, Arc::new(SessionStore::default()))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = app(state_with(common::no_capabilities()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn llm_query_returns_the_response_text() {
    let capabilities = Capabilities {
        responder: Some(MockResponder::ok("forty-two")),
        ..Capabilities::default()
    };
    let app = app(state_with(capabilities));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/llm/query")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text":"the answer?"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["response"], "forty-two");
}

#[tokio::test]
async fn llm_query_without_responder_is_503() {
    let app = app(state_with(common::no_capabilities()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/llm/query")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text":"anyone home?"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn llm_query_with_blank_text_is_400() {
    let capabilities = Capabilities {
        responder: Some(MockResponder::ok("unused")),
        ..Capabilities::default()
    };
    let app = app(state_with(capabilities));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/llm/query")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text":"  "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tts_returns_an_audio_url() {
    let capabilities = Capabilities {
        speaker: Some(MockSpeaker::ok("https://audio.example/tts.wav")),
        ..Capabilities::default()
    };
    let app = app(state_with(capabilities));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text":"read this aloud"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["audio_url"], "https://audio.example/tts.wav");
}

#[tokio::test]
async fn transcribe_file_round_trips_the_upload() {
    let capabilities = Capabilities {
        transcriber: Some(MockTranscriber::ok("spoken words")),
        ..Capabilities::default()
    };
    let app = app(state_with(capabilities));

    let boundary = "test-boundary-7";
    let body = multipart_audio_body(boundary, b"pcm bytes");
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/transcribe/file")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["transcript"], "spoken words");
}

#[tokio::test]
async fn tts_echo_transcribes_then_speaks() {
    let capabilities = Capabilities {
        transcriber: Some(MockTranscriber::ok("echo me")),
        speaker: Some(MockSpeaker::ok("https://audio.example/echo.wav")),
        ..Capabilities::default()
    };
    let app = app(state_with(capabilities));

    let boundary = "test-boundary-8";
    let body = multipart_audio_body(boundary, b"pcm bytes");
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tts/echo")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["transcript"], "echo me");
    assert_eq!(json["audio_url"], "https://audio.example/echo.wav");
}

#[tokio::test]
async fn agent_chat_returns_a_complete_result() {
    let capabilities = Capabilities {
        transcriber: Some(MockTranscriber::ok("hello agent")),
        responder: Some(MockResponder::ok("hello caller")),
        speaker: Some(MockSpeaker::ok("https://audio.example/turn.wav")),
        realtime: None,
    };
    let app = app(state_with(capabilities));

    let boundary = "test-boundary-9";
    let body = multipart_audio_body(boundary, b"pcm bytes");
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/agent/chat/session-1")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["query"], "hello agent");
    assert_eq!(json["response"], "hello caller");
    assert_eq!(json["audio_url"], "https://audio.example/turn.wav");
    assert_eq!(json["degraded"], false);
}

#[tokio::test]
async fn agent_chat_never_fails_even_without_providers() {
    let app = app(state_with(common::no_capabilities()));

    let boundary = "test-boundary-10";
    let body = multipart_audio_body(boundary, b"pcm bytes");
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/agent/chat/session-1")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    // Degraded, but still 200 with a structurally complete body.
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["degraded"], true);
    assert!(!json["response"].as_str().unwrap().is_empty());
    assert!(!json["audio_url"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn agent_chat_with_malformed_body_is_a_degraded_result_not_an_error() {
    let app = app(state_with(common::no_capabilities()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/agent/chat/session-1")
                .header(
                    header::CONTENT_TYPE,
                    "multipart/form-data; boundary=never-appears",
                )
                .body(Body::from("this is not multipart at all"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["degraded"], true);
    assert!(!json["audio_url"].as_str().unwrap().is_empty());
}
