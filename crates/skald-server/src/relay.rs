//! The realtime streaming relay.
//!
//! Bridges one caller-facing WebSocket to one provider-facing realtime
//! transcription socket. After connecting, two tasks run concurrently for
//! the lifetime of the session:
//!
//! - the inbound relay forwards caller audio frames verbatim to the
//!   provider sink (an empty frame is a no-op);
//! - the event relay parses provider payloads as transcript events and
//!   fans them back to the caller, spawning a responder call on turn
//!   completion so continued audio relay is never blocked on the LLM.
//!
//! Either task terminating — caller disconnect, provider close, or an
//! unrecoverable receive error — cancels the other and tears down the
//! provider socket best-effort.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use skald_types::TranscriptEvent;
use skald_voice::{RealtimeTranscriber, Responder};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Capacity of the caller-facing send queue. Beyond this the caller is too
/// slow and events are dropped.
const SEND_QUEUE_CAPACITY: usize = 256;

/// Events sent to the caller over the WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    PartialTranscript { transcript: String },
    FinalTranscript { transcript: String },
    TurnReply { text: String },
    Error { message: String },
}

/// Queues an event for the caller. Serialization failures and a full queue
/// are logged, never propagated.
fn queue_event(tx: &mpsc::Sender<String>, event: RelayEvent) {
    match serde_json::to_string(&event) {
        Ok(json) => {
            if let Err(e) = tx.try_send(json) {
                warn!("dropping relay event for slow caller: {e}");
            }
        }
        Err(e) => warn!("failed to serialize relay event: {e}"),
    }
}

/// Runs one streaming session over an upgraded caller socket.
pub async fn run_relay(
    socket: WebSocket,
    realtime: Option<Arc<dyn RealtimeTranscriber>>,
    responder: Option<Arc<dyn Responder>>,
) {
    let (mut caller_tx, mut caller_rx) = socket.split();

    // Connecting: establish the provider-facing socket. Failure surfaces a
    // connection error to the caller and ends the session.
    let connected = match &realtime {
        Some(realtime) => realtime.connect().await,
        None => Err(skald_voice::VoiceError::Realtime(
            "realtime transcription is not configured".to_string(),
        )),
    };
    let socket_halves = match connected {
        Ok(halves) => halves,
        Err(e) => {
            warn!("realtime connection failed: {e}");
            let event = RelayEvent::Error {
                message: format!("transcription connection failed: {e}"),
            };
            if let Ok(json) = serde_json::to_string(&event) {
                let _ = caller_tx.send(Message::Text(json.into())).await;
            }
            let _ = caller_tx.close().await;
            return;
        }
    };
    let (mut sink, mut events) = (socket_halves.sink, socket_halves.events);

    info!("streaming relay connected");

    // Caller-facing sends go through a bounded queue drained by one task,
    // so both relay activities can emit without owning the socket.
    let (tx, mut rx) = mpsc::channel::<String>(SEND_QUEUE_CAPACITY);
    let send_task = tokio::spawn(async move {
        while let Some(json) = rx.recv().await {
            if caller_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound relay: caller audio frames to the provider sink.
    let mut inbound_task = tokio::spawn(async move {
        while let Some(Ok(message)) = caller_rx.next().await {
            match message {
                Message::Binary(frame) => {
                    // An empty frame is a keepalive no-op, not an error.
                    if frame.is_empty() {
                        continue;
                    }
                    if let Err(e) = sink.send(&frame).await {
                        warn!("audio forward failed, ending inbound relay: {e}");
                        break;
                    }
                }
                Message::Close(_) => break,
                // Text frames and pings carry no audio.
                _ => {}
            }
        }
        // Idempotent, best-effort: closing an already-closed provider
        // socket is not an error.
        sink.close().await;
    });

    // Event relay: provider payloads to the caller, with turn-completion
    // triggering a concurrent responder call.
    let event_tx = tx.clone();
    let mut event_task = tokio::spawn(async move {
        while let Some(received) = events.next().await {
            let payload = match received {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("realtime receive failed, ending event relay: {e}");
                    break;
                }
            };
            let Some(event) = TranscriptEvent::parse(&payload) else {
                debug!("skipping unrecognized realtime payload");
                continue;
            };
            match event {
                TranscriptEvent::Partial { text } => {
                    queue_event(&event_tx, RelayEvent::PartialTranscript { transcript: text });
                }
                TranscriptEvent::Final { text } => {
                    queue_event(&event_tx, RelayEvent::FinalTranscript { transcript: text });
                }
                TranscriptEvent::Turn { text, end_of_turn } if end_of_turn => {
                    let Some(responder) = responder.clone() else {
                        warn!("turn completed but no responder configured, dropping turn");
                        continue;
                    };
                    // The responder call must not block continued audio
                    // relay for the next utterance.
                    let reply_tx = event_tx.clone();
                    tokio::spawn(async move {
                        match responder.respond(&text).await {
                            Ok(reply) => {
                                queue_event(&reply_tx, RelayEvent::TurnReply { text: reply });
                            }
                            Err(e) => warn!("turn reply failed, dropping turn: {e}"),
                        }
                    });
                }
                TranscriptEvent::Turn { .. } => {}
            }
        }
    });

    // Closing: whichever activity ends first cancels the other.
    tokio::select! {
        _ = &mut inbound_task => {
            debug!("inbound relay ended, cancelling event relay");
            event_task.abort();
        }
        _ = &mut event_task => {
            debug!("event relay ended, cancelling inbound relay");
            inbound_task.abort();
        }
    }

    send_task.abort();
    info!("streaming relay closed");
}
