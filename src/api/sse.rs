//! Server-Sent Events for calculator observers

use crate::calculator::DisplayPayload;
use crate::runtime::SessionEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert a session's broadcast channel to an SSE stream.
///
/// The stream opens with an `init` event carrying `initial` and ends after
/// the session closes.
pub fn sse_stream(
    initial: DisplayPayload,
    broadcast_rx: tokio::sync::broadcast::Receiver<SessionEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move {
        Ok(to_axum_event(
            "init",
            json!({ "type": "init", "payload": initial }),
        ))
    });

    let updates = BroadcastStream::new(broadcast_rx)
        .filter_map(|result| result.ok()) // Skip lagged messages
        .take_while(|event| !matches!(event, SessionEvent::Closed))
        .map(|event| Ok(session_event_to_axum(event)));

    Sse::new(init.chain(updates)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn session_event_to_axum(event: SessionEvent) -> Event {
    let (event_type, data) = match event {
        SessionEvent::Render { payload } => (
            "render",
            json!({ "type": "render", "payload": payload }),
        ),
        SessionEvent::Expired { payload } => (
            "expired",
            json!({ "type": "expired", "payload": payload }),
        ),
        SessionEvent::DeliveryFailed { message } => (
            "delivery_failed",
            json!({ "type": "delivery_failed", "message": message }),
        ),
        SessionEvent::Closed => ("closed", json!({ "type": "closed" })),
    };

    to_axum_event(event_type, data)
}

fn to_axum_event(event_type: &str, data: serde_json::Value) -> Event {
    Event::default().event(event_type).data(data.to_string())
}
