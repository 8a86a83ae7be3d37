use serde::Deserialize;
use std::fmt;

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_assemblyai_base_url() -> String {
    "https://api.assemblyai.com".to_string()
}

fn default_realtime_url() -> String {
    "wss://streaming.assemblyai.com/v3/ws?sample_rate=16000".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_murf_base_url() -> String {
    "https://api.murf.ai".to_string()
}

fn default_murf_voice_id() -> String {
    "en-US-natalie".to_string()
}

/// Configuration for the external STT/LLM/TTS providers.
///
/// An empty API key means the corresponding capability is disabled; the
/// adapter constructor rejects it and [`crate::Capabilities::from_config`]
/// records the capability as absent.
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    /// AssemblyAI API key (batch and realtime transcription).
    #[serde(default)]
    pub assemblyai_api_key: String,

    /// Gemini API key (response generation).
    #[serde(default)]
    pub gemini_api_key: String,

    /// Murf API key (speech synthesis).
    #[serde(default)]
    pub murf_api_key: String,

    /// Per-request timeout applied to the provider HTTP clients.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_assemblyai_base_url")]
    pub assemblyai_base_url: String,

    /// Provider realtime transcription socket URL.
    #[serde(default = "default_realtime_url")]
    pub realtime_url: String,

    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_murf_base_url")]
    pub murf_base_url: String,

    /// Voice used when a TTS request does not name one.
    #[serde(default = "default_murf_voice_id")]
    pub murf_voice_id: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            assemblyai_api_key: String::new(),
            gemini_api_key: String::new(),
            murf_api_key: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            assemblyai_base_url: default_assemblyai_base_url(),
            realtime_url: default_realtime_url(),
            gemini_base_url: default_gemini_base_url(),
            gemini_model: default_gemini_model(),
            murf_base_url: default_murf_base_url(),
            murf_voice_id: default_murf_voice_id(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: &str) -> &'static str {
            if key.is_empty() {
                "[UNSET]"
            } else {
                "[REDACTED]"
            }
        }

        f.debug_struct("ProviderConfig")
            .field("assemblyai_api_key", &redact(&self.assemblyai_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("murf_api_key", &redact(&self.murf_api_key))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("assemblyai_base_url", &self.assemblyai_base_url)
            .field("realtime_url", &self.realtime_url)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("murf_base_url", &self.murf_base_url)
            .field("murf_voice_id", &self.murf_voice_id)
            .finish()
    }
}
