use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("STT error: {0}")]
    Stt(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("realtime transcription error: {0}")]
    Realtime(String),
}
