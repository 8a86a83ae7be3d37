//! Static fallback content for degraded pipeline stages.
//!
//! A pure lookup table: a human-readable apology per failure kind, plus one
//! pre-rendered emergency audio clip used when speech synthesis itself
//! cannot run. Total over every [`FallbackKind`]; no side effects, no
//! failure modes.

use skald_types::FallbackKind;
use std::sync::OnceLock;

/// A short silent WAV clip (8 kHz mono s16le), base64-encoded. Served as
/// the spoken reply of last resort when no synthesizer is reachable.
const EMERGENCY_AUDIO_B64: &str = "\
UklGRkQDAABXQVZFZm10IBAAAAABAAEAQB8AAIA+AAACABAAZGF0YSADAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA==";

/// Human-readable fallback message for a failed stage.
pub fn message_for(kind: FallbackKind) -> &'static str {
    match kind {
        FallbackKind::SttError => {
            "I'm having trouble hearing you right now. Please try speaking again."
        }
        FallbackKind::LlmError => {
            "I'm having trouble thinking of a response right now. Please try again in a moment."
        }
        FallbackKind::TtsError => {
            "I generated a response but couldn't convert it to speech. Please read it instead."
        }
        FallbackKind::GeneralError => {
            "Something went wrong on my end. Please try again in a moment."
        }
    }
}

/// The decoded emergency audio clip.
pub fn emergency_audio() -> &'static [u8] {
    static AUDIO: OnceLock<Vec<u8>> = OnceLock::new();
    AUDIO.get_or_init(|| {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(EMERGENCY_AUDIO_B64)
            .unwrap_or_default()
    })
}

/// The emergency clip as a playable `data:` URL, for callers that expect an
/// `audio_url` field.
pub fn emergency_audio_url() -> String {
    format!("data:audio/wav;base64,{}", EMERGENCY_AUDIO_B64)
}
