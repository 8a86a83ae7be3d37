//! Realtime transcription socket abstraction.
//!
//! The streaming relay needs both halves of a duplex provider socket in
//! separate tasks: one pushing audio frames, one draining transcript
//! payloads. [`RealtimeTranscriber::connect`] therefore hands back a
//! pre-split [`RealtimeSocket`] instead of a single handle.

use crate::config::ProviderConfig;
use crate::error::VoiceError;
use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of a realtime socket: audio frames in.
#[async_trait]
pub trait AudioSink: Send {
    /// Forwards one audio frame verbatim to the provider.
    async fn send(&mut self, frame: &[u8]) -> Result<(), VoiceError>;

    /// Closes the provider-facing socket. Best-effort and idempotent:
    /// closing an already-closed socket is not an error.
    async fn close(&mut self);
}

/// Read half of a realtime socket: raw transcript payloads out.
///
/// Payloads are returned unparsed; classifying them as transcript events
/// (and skipping unrecognized ones) is the caller's concern.
#[async_trait]
pub trait EventStream: Send {
    /// The next text payload, `None` once the socket has closed, or an
    /// error on an unrecoverable receive failure.
    async fn next(&mut self) -> Option<Result<String, VoiceError>>;
}

/// A connected realtime transcription session, split for concurrent use.
pub struct RealtimeSocket {
    pub sink: Box<dyn AudioSink>,
    pub events: Box<dyn EventStream>,
}

/// Establishes realtime transcription sessions.
#[async_trait]
pub trait RealtimeTranscriber: Send + Sync {
    async fn connect(&self) -> Result<RealtimeSocket, VoiceError>;
}

/// Realtime transcription over the AssemblyAI streaming WebSocket.
#[derive(Debug, Clone)]
pub struct AssemblyAiRealtime {
    url: String,
    api_key: String,
}

impl AssemblyAiRealtime {
    pub fn new(config: &ProviderConfig) -> Result<Self, VoiceError> {
        if config.assemblyai_api_key.is_empty() {
            return Err(VoiceError::Config(
                "assemblyai_api_key is not set".to_string(),
            ));
        }
        Ok(Self {
            url: config.realtime_url.clone(),
            api_key: config.assemblyai_api_key.clone(),
        })
    }
}

#[async_trait]
impl RealtimeTranscriber for AssemblyAiRealtime {
    async fn connect(&self) -> Result<RealtimeSocket, VoiceError> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| VoiceError::Realtime(format!("invalid realtime URL: {e}")))?;
        let auth = HeaderValue::from_str(&self.api_key)
            .map_err(|e| VoiceError::Realtime(format!("invalid API key header: {e}")))?;
        request.headers_mut().insert("Authorization", auth);

        let (stream, _) = connect_async(request)
            .await
            .map_err(|e| VoiceError::Realtime(format!("connection failed: {e}")))?;
        let (sink, stream) = stream.split();

        Ok(RealtimeSocket {
            sink: Box::new(WsAudioSink { sink, closed: false }),
            events: Box::new(WsEventStream { stream }),
        })
    }
}

struct WsAudioSink {
    sink: SplitSink<WsStream, Message>,
    closed: bool,
}

#[async_trait]
impl AudioSink for WsAudioSink {
    async fn send(&mut self, frame: &[u8]) -> Result<(), VoiceError> {
        if self.closed {
            return Err(VoiceError::Realtime("socket already closed".to_string()));
        }
        self.sink
            .send(Message::Binary(frame.to_vec().into()))
            .await
            .map_err(|e| VoiceError::Realtime(format!("audio send failed: {e}")))
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.sink.send(Message::Close(None)).await {
            debug!("realtime socket close failed (already closed?): {e}");
        }
    }
}

struct WsEventStream {
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl EventStream for WsEventStream {
    async fn next(&mut self) -> Option<Result<String, VoiceError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(payload)) => return Some(Ok(payload.to_string())),
                Ok(Message::Close(_)) => return None,
                // Binary frames, pings and pongs carry no transcript data.
                Ok(_) => continue,
                Err(e) => {
                    return Some(Err(VoiceError::Realtime(format!("receive failed: {e}"))))
                }
            }
        }
    }
}
