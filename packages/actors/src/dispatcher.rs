//! Routes committed lifecycle events to the recipients' live connections.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use gig_core::{MarketEvent, Notification, UserId};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::registry::SessionRegistry;
use crate::sink::PushError;

/// Outcome of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub recipient: UserId,
    pub delivered: usize,
    pub failed: usize,
}

/// Turns events into notifications and pushes them to every connection
/// the recipient has open.
///
/// Delivery is best effort. An event whose recipient has no connection is
/// dropped. A failing connection is logged and skipped. Nothing here ever
/// reaches back into the coordinator.
#[derive(Clone)]
pub struct NotificationDispatcher {
    registry: Arc<SessionRegistry>,
}

impl NotificationDispatcher {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Recipient and payload for an event.
    pub fn route(event: &MarketEvent) -> (UserId, Notification) {
        match event {
            MarketEvent::BidReceived {
                gig_owner_id,
                gig_title,
                bidder_name,
                ..
            } => (
                gig_owner_id.clone(),
                Notification::BidReceived {
                    gig_title: gig_title.clone(),
                    bidder_name: bidder_name.clone(),
                },
            ),
            MarketEvent::Hired {
                freelancer_id,
                gig_title,
                ..
            } => (
                freelancer_id.clone(),
                Notification::Hired {
                    gig_title: gig_title.clone(),
                },
            ),
            MarketEvent::BidRejected {
                freelancer_id,
                gig_title,
                ..
            } => (
                freelancer_id.clone(),
                Notification::BidRejected {
                    gig_title: gig_title.clone(),
                },
            ),
        }
    }

    /// Push one event to its recipient.
    pub fn dispatch(&self, event: &MarketEvent) -> DispatchReport {
        let (recipient, notification) = Self::route(event);
        let connections = self.registry.connections_for(&recipient);

        let mut report = DispatchReport {
            recipient,
            delivered: 0,
            failed: 0,
        };

        if connections.is_empty() {
            tracing::debug!(
                "No connection for {}, dropping {} notification",
                report.recipient,
                notification.kind()
            );
            return report;
        }

        for connection in connections {
            // A panicking sink counts as a failed push.
            let pushed = panic::catch_unwind(AssertUnwindSafe(|| connection.push(&notification)))
                .unwrap_or_else(|_| Err(PushError::Transport("sink panicked".into())));
            match pushed {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        "Failed to push {} to {} ({}): {}",
                        notification.kind(),
                        report.recipient,
                        connection.id(),
                        e
                    );
                }
            }
        }

        report
    }

    /// Consume events until the channel closes.
    pub fn spawn(self, mut events: broadcast::Receiver<MarketEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        tracing::debug!("Dispatching: {}", event.description());
                        self.dispatch(&event);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Notification dispatcher lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event stream closed, stopping notification dispatcher");
                        break;
                    }
                }
            }
        })
    }
}
