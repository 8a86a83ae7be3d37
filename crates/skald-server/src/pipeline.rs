//! The one-shot conversation pipeline: transcribe, update context,
//! respond, speak.
//!
//! Every stage has independent failure containment. A failed stage degrades
//! only its own contribution; the pipeline never errors out and always
//! returns a structurally complete [`PipelineResult`] with non-empty
//! `response` and `audio_url`. The one hard prerequisite is transcription:
//! without text nothing downstream can run, so an STT failure short-circuits
//! with zero calls to the responder or speaker.

use crate::fallback;
use crate::session::SessionStore;
use skald_types::{FallbackKind, PipelineResult, Role};
use skald_voice::{Capabilities, Responder, Speaker, Transcriber, VoiceError};
use std::sync::Arc;
use tracing::warn;

/// Query placeholder returned when transcription fails.
const TRANSCRIPTION_FAILED_QUERY: &str = "Audio transcription failed";

pub struct AgentPipeline {
    transcriber: Option<Arc<dyn Transcriber>>,
    responder: Option<Arc<dyn Responder>>,
    speaker: Option<Arc<dyn Speaker>>,
    sessions: Arc<SessionStore>,
}

impl AgentPipeline {
    pub fn new(capabilities: &Capabilities, sessions: Arc<SessionStore>) -> Self {
        Self {
            transcriber: capabilities.transcriber.clone(),
            responder: capabilities.responder.clone(),
            speaker: capabilities.speaker.clone(),
            sessions,
        }
    }

    /// Runs one full agent turn: audio in, spoken reply out.
    pub async fn run_agent_turn(&self, session_id: &str, audio: &[u8]) -> PipelineResult {
        // Stage 1: transcribe. Hard prerequisite — fail fast, nothing
        // downstream is called.
        let query = match self.transcribe(audio).await {
            Ok(text) => text,
            Err(e) => {
                warn!(%session_id, "transcription failed, returning degraded result: {e}");
                return self.degraded_result(
                    TRANSCRIPTION_FAILED_QUERY.to_string(),
                    FallbackKind::SttError,
                ).await;
            }
        };

        // Stage 2: context update. Best-effort; if session bookkeeping is
        // unavailable, fall back to a single-turn context.
        self.sessions.append_turn(session_id, Role::User, &query);
        let context = match self.sessions.render_context(session_id) {
            Some(context) if !context.is_empty() => context,
            _ => {
                warn!(%session_id, "session context unavailable, using single-turn context");
                format!("User: {query}\n")
            }
        };

        // Stage 3: respond. A failure substitutes the fallback message and
        // the conversation continues in degraded mode.
        let (response, llm_degraded) = match self.respond(&context).await {
            Ok(text) => (text, false),
            Err(e) => {
                warn!(%session_id, "response generation failed, substituting fallback: {e}");
                (fallback::message_for(FallbackKind::LlmError).to_string(), true)
            }
        };

        // Whatever was produced — real or fallback — becomes the assistant
        // turn, so the transcript stays coherent across degraded turns.
        self.sessions
            .append_turn(session_id, Role::Assistant, &response);

        // Stage 4: speak. The textual response is unaffected by TTS failure.
        let (audio_url, tts_degraded) = match self.speak(&response).await {
            Ok(url) => (url, false),
            Err(e) => {
                warn!(%session_id, "speech synthesis failed, using error voice: {e}");
                (self.error_voice(FallbackKind::TtsError).await, true)
            }
        };

        PipelineResult {
            query,
            response,
            audio_url,
            degraded: llm_degraded || tts_degraded,
        }
    }

    /// Builds the degraded result for a failure not attributable to a
    /// single stage. The transport calls this when it cannot even hand the
    /// pipeline a request body; the caller still receives a complete,
    /// speakable response.
    pub async fn general_failure(&self) -> PipelineResult {
        self.degraded_result(
            TRANSCRIPTION_FAILED_QUERY.to_string(),
            FallbackKind::GeneralError,
        )
        .await
    }

    async fn degraded_result(&self, query: String, kind: FallbackKind) -> PipelineResult {
        PipelineResult {
            query,
            response: fallback::message_for(kind).to_string(),
            audio_url: self.error_voice(kind).await,
            degraded: true,
        }
    }

    /// Synthesizes the fallback message for `kind`, falling through to the
    /// static emergency clip when no speaker is available or synthesis
    /// fails. Never fails; always returns a non-empty URL.
    pub async fn error_voice(&self, kind: FallbackKind) -> String {
        if let Some(speaker) = &self.speaker {
            match speaker.speak(fallback::message_for(kind), None).await {
                Ok(url) if !url.is_empty() => return url,
                Ok(_) => warn!("error voice synthesis returned empty URL"),
                Err(e) => warn!("error voice synthesis failed: {e}"),
            }
        }
        fallback::emergency_audio_url()
    }

    async fn transcribe(&self, audio: &[u8]) -> Result<String, VoiceError> {
        match &self.transcriber {
            Some(transcriber) => transcriber.transcribe(audio).await,
            None => Err(VoiceError::Stt("no transcriber configured".to_string())),
        }
    }

    async fn respond(&self, context: &str) -> Result<String, VoiceError> {
        match &self.responder {
            Some(responder) => responder.respond(context).await,
            None => Err(VoiceError::Llm("no responder configured".to_string())),
        }
    }

    async fn speak(&self, text: &str) -> Result<String, VoiceError> {
        match &self.speaker {
            Some(speaker) => speaker.speak(text, None).await,
            None => Err(VoiceError::Tts("no speaker configured".to_string())),
        }
    }
}
