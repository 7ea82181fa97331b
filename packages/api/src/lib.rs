//! Bootstrap and realtime surface for the gig marketplace.
//!
//! This crate wires the pieces together for a server process:
//! - Configuration from the environment
//! - Database, coordinator and dispatcher startup
//! - The connection gateway clients attach to for notifications
//! - SSE framing for HTTP transports

mod config;
mod gateway;
mod init;
mod realtime;

pub use config::MarketplaceConfig;
pub use gateway::{Connection, ConnectionGateway};
pub use init::{InitError, Marketplace, init_marketplace};
pub use realtime::{format_sse_event, sse_stream};

// Re-export core types for convenience
pub use gig_core::{
    Bid, BidId, BidStatus, ErrorKind, Gig, GigId, GigStatus, MarketError, MarketEvent,
    MarketResult, Notification, UserId, UserProfile,
};
