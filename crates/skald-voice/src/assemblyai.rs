use crate::config::ProviderConfig;
use crate::error::VoiceError;
use crate::Transcriber;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Maximum audio input size for STT (25 MiB). Prevents OOM from oversized
/// payloads.
const MAX_STT_INPUT_BYTES: usize = 25 * 1024 * 1024;

/// Interval between transcript status polls.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum number of status polls before giving up on a transcript job.
const MAX_POLLS: u32 = 240;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptJob {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptStatus {
    status: String,
    text: Option<String>,
    error: Option<String>,
}

/// Batch transcription via the AssemblyAI HTTP API: upload the audio,
/// create a transcript job, poll until it completes.
#[derive(Debug, Clone)]
pub struct AssemblyAiTranscriber {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AssemblyAiTranscriber {
    pub fn new(config: &ProviderConfig) -> Result<Self, VoiceError> {
        if config.assemblyai_api_key.is_empty() {
            return Err(VoiceError::Config(
                "assemblyai_api_key is not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VoiceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.assemblyai_api_key.clone(),
            base_url: config.assemblyai_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn upload(&self, audio: &[u8]) -> Result<String, VoiceError> {
        let response = self
            .client
            .post(format!("{}/v2/upload", self.base_url))
            .header("authorization", &self.api_key)
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| VoiceError::Stt(format!("upload request failed: {e}")))?
            .error_for_status()
            .map_err(|e| VoiceError::Stt(format!("upload rejected: {e}")))?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Stt(format!("invalid upload response: {e}")))?;
        Ok(body.upload_url)
    }

    async fn create_job(&self, audio_url: &str) -> Result<String, VoiceError> {
        let response = self
            .client
            .post(format!("{}/v2/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&serde_json::json!({ "audio_url": audio_url }))
            .send()
            .await
            .map_err(|e| VoiceError::Stt(format!("transcript request failed: {e}")))?
            .error_for_status()
            .map_err(|e| VoiceError::Stt(format!("transcript request rejected: {e}")))?;

        let job: TranscriptJob = response
            .json()
            .await
            .map_err(|e| VoiceError::Stt(format!("invalid transcript response: {e}")))?;
        Ok(job.id)
    }

    async fn poll_job(&self, id: &str) -> Result<String, VoiceError> {
        for _ in 0..MAX_POLLS {
            let status: TranscriptStatus = self
                .client
                .get(format!("{}/v2/transcript/{}", self.base_url, id))
                .header("authorization", &self.api_key)
                .send()
                .await
                .map_err(|e| VoiceError::Stt(format!("status poll failed: {e}")))?
                .json()
                .await
                .map_err(|e| VoiceError::Stt(format!("invalid status response: {e}")))?;

            match status.status.as_str() {
                "completed" => {
                    let text = status.text.unwrap_or_default();
                    if text.trim().is_empty() {
                        return Err(VoiceError::Stt("provider returned no text".to_string()));
                    }
                    return Ok(text);
                }
                "error" => {
                    return Err(VoiceError::Stt(
                        status
                            .error
                            .unwrap_or_else(|| "transcription failed".to_string()),
                    ));
                }
                _ => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }

        Err(VoiceError::Stt(format!(
            "transcript job {id} did not complete after {MAX_POLLS} polls"
        )))
    }
}

#[async_trait]
impl Transcriber for AssemblyAiTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, VoiceError> {
        if audio.is_empty() {
            return Err(VoiceError::Stt("empty audio input".to_string()));
        }
        if audio.len() > MAX_STT_INPUT_BYTES {
            return Err(VoiceError::Stt(format!(
                "audio data exceeds maximum size: {} bytes (limit: {} bytes)",
                audio.len(),
                MAX_STT_INPUT_BYTES
            )));
        }

        let audio_url = self.upload(audio).await?;
        let job_id = self.create_job(&audio_url).await?;
        self.poll_job(&job_id).await
    }
}
