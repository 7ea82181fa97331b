//! Client-side view of a gig with explicit reconciliation.
//!
//! Notifications can arrive before a read reflects the new state, and a
//! client may patch its own copy optimistically after a hire call. Both are
//! advisory: the next authoritative fetch always replaces whatever the view
//! believed.

use crate::{Gig, GigStatus, Notification};

/// A client's cached copy of one gig.
#[derive(Debug, Clone, Default)]
pub struct GigView {
    authoritative: Option<Gig>,
    optimistic_status: Option<GigStatus>,
    stale: bool,
}

impl GigView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of a read from the server.
    ///
    /// Clears any optimistic overlay and the stale flag.
    pub fn apply_fetch(&mut self, gig: Gig) {
        self.authoritative = Some(gig);
        self.optimistic_status = None;
        self.stale = false;
    }

    /// Assume a hire call succeeded before the server confirms it.
    pub fn apply_optimistic_hire(&mut self) {
        self.optimistic_status = Some(GigStatus::Assigned);
        self.stale = true;
    }

    /// A notification arrived; cached state can no longer be trusted.
    pub fn on_notification(&mut self, _notification: &Notification) {
        self.stale = true;
    }

    /// Whether the view should be re-fetched.
    pub fn needs_refresh(&self) -> bool {
        self.stale || self.authoritative.is_none()
    }

    /// Status to display: the optimistic overlay if any, else the last fetch.
    pub fn status(&self) -> Option<GigStatus> {
        self.optimistic_status
            .or_else(|| self.authoritative.as_ref().map(|gig| gig.status))
    }

    pub fn gig(&self) -> Option<&Gig> {
        self.authoritative.as_ref()
    }

    pub fn is_optimistic(&self) -> bool {
        self.optimistic_status.is_some()
    }
}
