//! Provider capabilities for the skald voice-agent platform.
//!
//! The orchestration core depends on four small capability interfaces —
//! batch transcription, response generation, speech synthesis, and a
//! realtime transcription socket — and never on vendor request/response
//! shapes. Concrete adapters for AssemblyAI, Gemini, and Murf live in this
//! crate behind those interfaces.
//!
//! Capability negotiation happens at construction time: an adapter whose
//! configuration is incomplete fails to construct, and
//! [`Capabilities::from_config`] records the capability as absent rather
//! than handing out a handle that must be probed on every call.

pub mod assemblyai;
pub mod config;
pub mod error;
pub mod gemini;
pub mod murf;
pub mod realtime;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub use config::ProviderConfig;
pub use error::VoiceError;
pub use realtime::{AudioSink, EventStream, RealtimeSocket, RealtimeTranscriber};

/// Converts recorded audio into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribes a complete audio clip.
    ///
    /// Fails with [`VoiceError::Stt`] when the input is empty or the
    /// provider produces no text.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, VoiceError>;
}

/// Generates an assistant reply from a rendered conversation context.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Fails with [`VoiceError::Llm`] when the context is blank or the
    /// provider produces no text.
    async fn respond(&self, context: &str) -> Result<String, VoiceError>;
}

/// Renders text to speech, returning a URL for the generated audio.
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Fails with [`VoiceError::Tts`] when the text is blank or the
    /// provider returns no audio.
    async fn speak(&self, text: &str, voice: Option<&str>) -> Result<String, VoiceError>;
}

/// The set of provider capabilities available to the server.
///
/// Each field is `None` when the corresponding adapter could not be
/// constructed (missing API key, invalid configuration). An absent
/// capability fails the dependent pipeline stage the same way an
/// unreachable provider does.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub responder: Option<Arc<dyn Responder>>,
    pub speaker: Option<Arc<dyn Speaker>>,
    pub realtime: Option<Arc<dyn RealtimeTranscriber>>,
}

impl Capabilities {
    /// Negotiates capabilities from provider configuration.
    ///
    /// Adapters that fail to construct are logged and left absent; the
    /// server starts regardless and degrades the affected operations.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let transcriber: Option<Arc<dyn Transcriber>> =
            match assemblyai::AssemblyAiTranscriber::new(config) {
                Ok(adapter) => Some(Arc::new(adapter)),
                Err(e) => {
                    warn!("transcription capability disabled: {e}");
                    None
                }
            };

        let responder: Option<Arc<dyn Responder>> = match gemini::GeminiResponder::new(config) {
            Ok(adapter) => Some(Arc::new(adapter)),
            Err(e) => {
                warn!("response generation capability disabled: {e}");
                None
            }
        };

        let speaker: Option<Arc<dyn Speaker>> = match murf::MurfSpeaker::new(config) {
            Ok(adapter) => Some(Arc::new(adapter)),
            Err(e) => {
                warn!("speech synthesis capability disabled: {e}");
                None
            }
        };

        let realtime: Option<Arc<dyn RealtimeTranscriber>> =
            match realtime::AssemblyAiRealtime::new(config) {
                Ok(adapter) => Some(Arc::new(adapter)),
                Err(e) => {
                    warn!("realtime transcription capability disabled: {e}");
                    None
                }
            };

        info!(
            stt = transcriber.is_some(),
            llm = responder.is_some(),
            tts = speaker.is_some(),
            realtime = realtime.is_some(),
            "provider capabilities negotiated"
        );

        Self {
            transcriber,
            responder,
            speaker,
            realtime,
        }
    }
}
