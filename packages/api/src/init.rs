//! Server initialization for the marketplace.

use std::sync::Arc;
use std::time::Duration;

use actors::{Coordinator, CoordinatorOptions, NotificationDispatcher, SessionRegistry, start_coordinator};
use db::{DbError, Store};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::MarketplaceConfig;
use crate::gateway::ConnectionGateway;

const DISPATCHER_DRAIN: Duration = Duration::from_millis(500);

/// Errors raised while bringing the marketplace up.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Invalid configuration for {var}: {reason}")]
    Config { var: &'static str, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Failed to start coordinator: {0}")]
    Coordinator(String),
}

/// A running marketplace: coordinator, realtime gateway and their tasks.
pub struct Marketplace {
    pub coordinator: Coordinator,
    pub gateway: ConnectionGateway,
    pub registry: Arc<SessionRegistry>,
    pub store: Store,
    coordinator_task: JoinHandle<()>,
    dispatcher_task: JoinHandle<()>,
}

impl Marketplace {
    /// Stop the coordinator, then give the dispatcher a moment to flush
    /// events that were already published.
    pub async fn shutdown(self) {
        tracing::info!("Shutting down marketplace");
        let Marketplace {
            coordinator,
            coordinator_task,
            mut dispatcher_task,
            ..
        } = self;

        coordinator.shutdown();
        if let Err(e) = coordinator_task.await {
            tracing::warn!("Coordinator task ended abnormally: {}", e);
        }
        drop(coordinator);

        // Other coordinator clones keep the event channel open, so the
        // dispatcher may never see it close on its own.
        if tokio::time::timeout(DISPATCHER_DRAIN, &mut dispatcher_task)
            .await
            .is_err()
        {
            dispatcher_task.abort();
        }
        tracing::info!("Marketplace stopped");
    }
}

/// Initialize the marketplace.
///
/// This should be called once at server startup before handling requests.
pub async fn init_marketplace(config: MarketplaceConfig) -> Result<Marketplace, InitError> {
    tracing::info!("Initializing marketplace...");

    let db = db::init(config.db.clone()).await?;
    let store = Store::new(db);

    let options = CoordinatorOptions {
        event_capacity: config.event_capacity,
        notify_rejections: config.notify_rejections,
        idle_gig_ttl: config.idle_gig_ttl,
        ..CoordinatorOptions::default()
    };
    let (coordinator, coordinator_task) = start_coordinator(store.clone(), options)
        .await
        .map_err(|e| InitError::Coordinator(e.to_string()))?;

    let registry = Arc::new(SessionRegistry::new());
    let dispatcher_task =
        NotificationDispatcher::new(registry.clone()).spawn(coordinator.subscribe());
    let gateway = ConnectionGateway::new(registry.clone(), config.connection_buffer);

    tracing::info!("Marketplace initialized");
    Ok(Marketplace {
        coordinator,
        gateway,
        registry,
        store,
        coordinator_task,
        dispatcher_task,
    })
}
