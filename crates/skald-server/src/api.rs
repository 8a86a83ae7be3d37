//! One-shot API handlers: text-to-speech, transcription, echo, and direct
//! LLM queries.
//!
//! Unlike `/agent/chat`, these endpoints surface provider problems as
//! structured errors: 503 when a capability is not configured, 502 when the
//! provider fails, 400 for unusable input.

use crate::AppState;
use axum::{
    extract::{Extension, Multipart},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use skald_voice::VoiceError;
use std::sync::Arc;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("capability unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("provider failure: {0}")]
    BadGateway(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<VoiceError> for ApiError {
    fn from(e: VoiceError) -> Self {
        ApiError::BadGateway(e.to_string())
    }
}

/// Multipart form field carrying the uploaded audio clip.
const AUDIO_FIELD: &str = "audioFile";

/// Extracts the `audioFile` field from a multipart upload.
pub(crate) async fn read_audio_field(multipart: &mut Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read audio field: {e}")))?;
        return Ok(bytes.to_vec());
    }
    Err(ApiError::BadRequest(format!(
        "missing multipart field '{AUDIO_FIELD}'"
    )))
}

/// Request body for `POST /tts`.
#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(rename = "voiceId")]
    pub voice_id: Option<String>,
}

/// Response body for `POST /tts`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsResponse {
    pub audio_url: String,
}

/// Handler for `POST /tts` — synthesizes the given text.
pub async fn tts_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<TtsRequest>,
) -> Result<Json<TtsResponse>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }
    let speaker = state
        .capabilities
        .speaker
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("speech synthesis is not configured".to_string()))?;

    let audio_url = speaker
        .speak(&payload.text, payload.voice_id.as_deref())
        .await?;
    Ok(Json(TtsResponse { audio_url }))
}

/// Response body for `POST /transcribe/file`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub transcript: String,
}

/// Handler for `POST /transcribe/file` — transcribes an uploaded clip.
pub async fn transcribe_file_handler(
    Extension(state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let audio = read_audio_field(&mut multipart).await?;
    if audio.is_empty() {
        return Err(ApiError::BadRequest("audio file is empty".to_string()));
    }
    let transcriber = state
        .capabilities
        .transcriber
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("transcription is not configured".to_string()))?;

    let transcript = transcriber.transcribe(&audio).await?;
    Ok(Json(TranscriptionResponse { transcript }))
}

/// Response body for `POST /tts/echo`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsEchoResponse {
    pub audio_url: String,
    pub transcript: String,
}

/// Handler for `POST /tts/echo` — transcribes an uploaded clip and speaks
/// the transcript back.
pub async fn tts_echo_handler(
    Extension(state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<TtsEchoResponse>, ApiError> {
    let audio = read_audio_field(&mut multipart).await?;
    if audio.is_empty() {
        return Err(ApiError::BadRequest("audio file is empty".to_string()));
    }
    let transcriber = state
        .capabilities
        .transcriber
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("transcription is not configured".to_string()))?;
    let speaker = state
        .capabilities
        .speaker
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("speech synthesis is not configured".to_string()))?;

    let transcript = transcriber.transcribe(&audio).await?;
    let audio_url = speaker.speak(&transcript, None).await?;
    Ok(Json(TtsEchoResponse {
        audio_url,
        transcript,
    }))
}

/// Request body for `POST /llm/query`.
#[derive(Debug, Deserialize)]
pub struct LlmQueryRequest {
    pub text: String,
}

/// Response body for `POST /llm/query`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LlmQueryResponse {
    pub response: String,
}

/// Handler for `POST /llm/query` — a direct, session-less LLM call.
pub async fn llm_query_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<LlmQueryRequest>,
) -> Result<Json<LlmQueryResponse>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }
    let responder = state
        .capabilities
        .responder
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("response generation is not configured".to_string()))?;

    let response = responder.respond(&payload.text).await?;
    Ok(Json(LlmQueryResponse { response }))
}
