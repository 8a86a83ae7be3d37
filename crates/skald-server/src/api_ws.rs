//! WebSocket API handler for the realtime streaming relay.

use crate::relay;
use crate::AppState;
use axum::{
    extract::{Extension, WebSocketUpgrade},
    response::IntoResponse,
};
use std::sync::Arc;

/// Handler for `GET /ws` — upgrades to the streaming transcription relay.
///
/// Inbound messages are raw binary audio frames; outbound messages are the
/// JSON events of [`relay::RelayEvent`].
pub async fn ws_handler(
    Extension(state): Extension<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let realtime = state.capabilities.realtime.clone();
    let responder = state.capabilities.responder.clone();
    ws.on_upgrade(move |socket| relay::run_relay(socket, realtime, responder))
}
