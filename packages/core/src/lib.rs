//! Core domain types for the gig marketplace.
//!
//! This crate contains shared types used across all packages:
//! - Gig and GigStatus for posted work
//! - Bid and BidStatus for offers on a gig
//! - Events emitted by the lifecycle coordinator
//! - The realtime notification wire contract
//! - Client-side view reconciliation

mod bid;
mod error;
mod events;
mod gig;
mod notification;
mod user;
mod validate;
mod view;

pub use bid::{Bid, BidId, BidStatus};
pub use error::{ErrorKind, MarketError, MarketResult};
pub use events::MarketEvent;
pub use gig::{Gig, GigId, GigStatus};
pub use notification::Notification;
pub use user::{UserId, UserProfile};
pub use view::GigView;
