use crate::config::ProviderConfig;
use crate::error::VoiceError;
use crate::Speaker;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Maximum text input size for TTS (64 KiB). Prevents resource exhaustion
/// from oversized synthesis requests.
const MAX_TTS_INPUT_BYTES: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct GenerateSpeechResponse {
    #[serde(rename = "audioFile", default)]
    audio_file: String,
}

/// Speech synthesis via the Murf HTTP API. Returns a URL to the generated
/// audio file rather than raw audio bytes.
#[derive(Debug, Clone)]
pub struct MurfSpeaker {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    default_voice_id: String,
}

impl MurfSpeaker {
    pub fn new(config: &ProviderConfig) -> Result<Self, VoiceError> {
        if config.murf_api_key.is_empty() {
            return Err(VoiceError::Config("murf_api_key is not set".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VoiceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.murf_api_key.clone(),
            base_url: config.murf_base_url.trim_end_matches('/').to_string(),
            default_voice_id: config.murf_voice_id.clone(),
        })
    }
}

#[async_trait]
impl Speaker for MurfSpeaker {
    async fn speak(&self, text: &str, voice: Option<&str>) -> Result<String, VoiceError> {
        if text.trim().is_empty() {
            return Err(VoiceError::Tts("empty text input".to_string()));
        }
        if text.len() > MAX_TTS_INPUT_BYTES {
            return Err(VoiceError::Tts(format!(
                "text exceeds maximum size: {} bytes (limit: {} bytes)",
                text.len(),
                MAX_TTS_INPUT_BYTES
            )));
        }

        let voice_id = voice.unwrap_or(&self.default_voice_id);
        let body = serde_json::json!({
            "text": text,
            "voiceId": voice_id,
        });

        let response = self
            .client
            .post(format!("{}/v1/speech/generate", self.base_url))
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VoiceError::Tts(format!("synthesis request failed: {e}")))?
            .error_for_status()
            .map_err(|e| VoiceError::Tts(format!("synthesis request rejected: {e}")))?;

        let body: GenerateSpeechResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Tts(format!("invalid synthesis response: {e}")))?;

        if body.audio_file.is_empty() {
            return Err(VoiceError::Tts("provider returned no audio".to_string()));
        }
        Ok(body.audio_file)
    }
}
