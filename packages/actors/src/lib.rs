//! Actor system for the gig lifecycle.
//!
//! This crate provides the Ractor-based lifecycle coordinator and the
//! realtime notification path.
//!
//! # Architecture
//!
//! - `CoordinatorActor` - Routes requests to one actor per gig
//! - `GigActor` - Serializes every check and write for a single gig
//! - `NotificationDispatcher` - Turns committed events into pushes
//! - `SessionRegistry` - Live connections per identity
//!
//! # Usage
//!
//! ```ignore
//! use actors::{CoordinatorOptions, start_coordinator};
//!
//! let (coordinator, _handle) = start_coordinator(store, CoordinatorOptions::default()).await?;
//! let gig = coordinator.create_gig(owner, "Logo design", "Vector logo", 500.0).await?;
//! let bid = coordinator.place_bid(gig.id, freelancer, "I can do this", 400.0).await?;
//! ```

mod coordinator;
mod dispatcher;
mod gig_actor;
mod handle;
mod messages;
pub mod registry;
mod sink;

pub use coordinator::CoordinatorActor;
pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use gig_actor::GigActor;
pub use handle::{Coordinator, CoordinatorOptions, start_coordinator};
pub use messages::{CoordinatorMessage, GigMessage};
pub use registry::SessionRegistry;
pub use sink::{ChannelSink, ConnectionHandle, ConnectionId, NotificationSink, PushError};
