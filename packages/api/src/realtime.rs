//! Server-sent events framing for realtime notifications.

use futures_util::{Stream, StreamExt};
use gig_core::Notification;

use crate::gateway::Connection;

/// Helper to format a notification for SSE.
pub fn format_sse_event(notification: &Notification) -> String {
    let json = serde_json::to_string(notification).unwrap_or_else(|_| "{}".to_string());
    format!("data: {}\n\n", json)
}

/// A connection as a stream of ready-to-write SSE frames.
pub fn sse_stream(connection: Connection) -> impl Stream<Item = String> + Send + 'static {
    connection
        .into_stream()
        .map(|notification| format_sse_event(&notification))
}
