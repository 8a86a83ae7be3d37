//! Shared test doubles for the provider capabilities.
#![allow(dead_code)]

use async_trait::async_trait;
use skald_voice::realtime::{AudioSink, EventStream, RealtimeSocket, RealtimeTranscriber};
use skald_voice::{Capabilities, Responder, Speaker, Transcriber, VoiceError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub struct MockTranscriber {
    reply: Option<String>,
    pub calls: AtomicUsize,
}

impl MockTranscriber {
    pub fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, VoiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if audio.is_empty() {
            return Err(VoiceError::Stt("empty audio input".to_string()));
        }
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(VoiceError::Stt("mock transcriber failure".to_string())),
        }
    }
}

pub struct MockResponder {
    reply: Option<String>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub contexts: Mutex<Vec<String>>,
}

impl MockResponder {
    pub fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            delay: None,
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_contexts(&self) -> Vec<String> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(&self, context: &str) -> Result<String, VoiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().unwrap().push(context.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(VoiceError::Llm("mock responder failure".to_string())),
        }
    }
}

pub struct MockSpeaker {
    reply: Option<String>,
    pub calls: AtomicUsize,
}

impl MockSpeaker {
    pub fn ok(url: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(url.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Speaker for MockSpeaker {
    async fn speak(&self, text: &str, _voice: Option<&str>) -> Result<String, VoiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.trim().is_empty() {
            return Err(VoiceError::Tts("empty text input".to_string()));
        }
        match &self.reply {
            Some(url) => Ok(url.clone()),
            None => Err(VoiceError::Tts("mock speaker failure".to_string())),
        }
    }
}

/// Capabilities with no providers configured at all.
pub fn no_capabilities() -> Capabilities {
    Capabilities::default()
}

/// A realtime transcriber that hands out one pre-wired session.
///
/// Audio frames sent by the relay arrive on `frames_rx`; payloads pushed
/// into `events_tx` are what the relay receives from the "provider";
/// `closes` counts provider-socket closes.
pub struct MockRealtime {
    session: Mutex<Option<RealtimeSocket>>,
}

pub struct MockRealtimeHandles {
    pub frames_rx: mpsc::Receiver<Vec<u8>>,
    pub events_tx: mpsc::Sender<String>,
    pub closes: Arc<AtomicUsize>,
}

impl MockRealtime {
    pub fn new() -> (Arc<Self>, MockRealtimeHandles) {
        let (frames_tx, frames_rx) = mpsc::channel(64);
        let (events_tx, events_rx) = mpsc::channel(64);
        let closes = Arc::new(AtomicUsize::new(0));

        let socket = RealtimeSocket {
            sink: Box::new(MockSink {
                frames_tx,
                closes: closes.clone(),
            }),
            events: Box::new(MockEvents { events_rx }),
        };

        (
            Arc::new(Self {
                session: Mutex::new(Some(socket)),
            }),
            MockRealtimeHandles {
                frames_rx,
                events_tx,
                closes,
            },
        )
    }
}

#[async_trait]
impl RealtimeTranscriber for MockRealtime {
    async fn connect(&self) -> Result<RealtimeSocket, VoiceError> {
        self.session
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| VoiceError::Realtime("mock session already taken".to_string()))
    }
}

struct MockSink {
    frames_tx: mpsc::Sender<Vec<u8>>,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl AudioSink for MockSink {
    async fn send(&mut self, frame: &[u8]) -> Result<(), VoiceError> {
        self.frames_tx
            .send(frame.to_vec())
            .await
            .map_err(|_| VoiceError::Realtime("mock sink dropped".to_string()))
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

struct MockEvents {
    events_rx: mpsc::Receiver<String>,
}

#[async_trait]
impl EventStream for MockEvents {
    async fn next(&mut self) -> Option<Result<String, VoiceError>> {
        self.events_rx.recv().await.map(Ok)
    }
}

/// A realtime transcriber whose connection attempt always fails.
pub struct FailingRealtime;

#[async_trait]
impl RealtimeTranscriber for FailingRealtime {
    async fn connect(&self) -> Result<RealtimeSocket, VoiceError> {
        Err(VoiceError::Realtime("mock connection refused".to_string()))
    }
}

/// Builds a `multipart/form-data` body with a single `audioFile` field.
pub fn multipart_audio_body(boundary: &str, audio: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"audioFile\"; filename=\"clip.wav\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
    body.extend_from_slice(audio);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
