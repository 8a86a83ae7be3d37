//! Shared data types for the skald voice-agent platform.
//!
//! These are the plain serde shapes exchanged between the provider layer,
//! the conversation pipeline, and the transport: conversation turns, the
//! structured pipeline result, fallback classification, and the transcript
//! events emitted by a realtime transcription socket.

use serde::{Deserialize, Serialize};

/// Attribution of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used when rendering a transcript into an LLM prompt.
    pub fn prompt_label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One message in a conversation. Immutable once appended to a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// The structured outcome of one agent conversation turn.
///
/// Always structurally complete: every field is populated even when one or
/// more pipeline stages substituted fallback content, in which case
/// `degraded` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// The user's transcribed query (or a placeholder when STT failed).
    pub query: String,
    /// The assistant's textual reply (real or fallback).
    pub response: String,
    /// URL of the spoken reply audio. May be a `data:` URL for the canned
    /// emergency clip.
    pub audio_url: String,
    /// True when at least one stage fell back instead of using a live
    /// provider result.
    pub degraded: bool,
}

/// Classification of a pipeline stage failure, used to select fallback
/// content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    SttError,
    LlmError,
    TtsError,
    GeneralError,
}

impl FallbackKind {
    /// All defined kinds, in declaration order.
    pub const ALL: [FallbackKind; 4] = [
        FallbackKind::SttError,
        FallbackKind::LlmError,
        FallbackKind::TtsError,
        FallbackKind::GeneralError,
    ];
}

/// A transcript event received from the provider realtime socket.
///
/// The wire shape is a JSON object tagged by `type`. Payloads that do not
/// match any known variant are not errors; [`TranscriptEvent::parse`]
/// returns `None` and callers skip them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptEvent {
    /// An in-progress hypothesis for the current utterance.
    Partial { text: String },
    /// A finalized transcript segment.
    Final { text: String },
    /// A turn-level transcript. `end_of_turn` marks utterance completion,
    /// the trigger for generating an assistant reply.
    Turn { text: String, end_of_turn: bool },
}

impl TranscriptEvent {
    /// Parses a raw realtime payload. Unrecognized or malformed payloads
    /// yield `None`.
    pub fn parse(payload: &str) -> Option<Self> {
        serde_json::from_str(payload).ok()
    }
}
