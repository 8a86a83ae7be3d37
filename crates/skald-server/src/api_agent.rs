//! Agent conversation handler.

use crate::api::read_audio_field;
use crate::AppState;
use axum::{
    extract::{Extension, Multipart, Path},
    Json,
};
use skald_types::PipelineResult;
use std::sync::Arc;
use tracing::warn;

/// Handler for `POST /agent/chat/{sessionId}` — one full agent turn.
///
/// This endpoint never fails: any problem, including an unreadable request
/// body, is converted into a degraded [`PipelineResult`] so the caller
/// always receives a complete, speakable response. The transport maps the
/// `degraded` flag to whatever status policy it wants; here it is always
/// 200.
pub async fn agent_chat_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Json<PipelineResult> {
    let audio = match read_audio_field(&mut multipart).await {
        Ok(audio) => audio,
        Err(e) => {
            warn!(%session_id, "unreadable agent chat request: {e}");
            return Json(state.pipeline.general_failure().await);
        }
    };

    Json(state.pipeline.run_agent_turn(&session_id, &audio).await)
}
