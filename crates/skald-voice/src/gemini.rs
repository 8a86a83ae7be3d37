use crate::config::ProviderConfig;
use crate::error::VoiceError;
use crate::Responder;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Maximum prompt size (128 KiB). A rendered conversation context beyond
/// this is almost certainly a bug upstream.
const MAX_PROMPT_BYTES: usize = 128 * 1024;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Response generation via the Gemini `generateContent` HTTP API.
#[derive(Debug, Clone)]
pub struct GeminiResponder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiResponder {
    pub fn new(config: &ProviderConfig) -> Result<Self, VoiceError> {
        if config.gemini_api_key.is_empty() {
            return Err(VoiceError::Config("gemini_api_key is not set".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VoiceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
        })
    }
}

#[async_trait]
impl Responder for GeminiResponder {
    async fn respond(&self, context: &str) -> Result<String, VoiceError> {
        if context.trim().is_empty() {
            return Err(VoiceError::Llm("empty prompt".to_string()));
        }
        if context.len() > MAX_PROMPT_BYTES {
            return Err(VoiceError::Llm(format!(
                "prompt exceeds maximum size: {} bytes (limit: {} bytes)",
                context.len(),
                MAX_PROMPT_BYTES
            )));
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": context }] }]
        });

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VoiceError::Llm(format!("generate request failed: {e}")))?
            .error_for_status()
            .map_err(|e| VoiceError::Llm(format!("generate request rejected: {e}")))?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Llm(format!("invalid generate response: {e}")))?;

        let text = body
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(VoiceError::Llm("provider returned no text".to_string()));
        }
        Ok(text)
    }
}
