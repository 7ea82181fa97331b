//! Public entry point to the lifecycle coordinator.

use std::time::Duration;

use db::Store;
use gig_core::{Bid, BidId, Gig, GigId, GigStatus, MarketError, MarketEvent, MarketResult, UserId};
use ractor::{Actor, ActorRef, RpcReplyPort};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::coordinator::{CoordinatorActor, RouterArgs};
use crate::messages::CoordinatorMessage;

/// Tuning for [`start_coordinator`].
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
    /// Emit `BidRejected` events for the losing bids of a hire.
    pub notify_rejections: bool,
    /// Stop a gig actor after this long without requests.
    pub idle_gig_ttl: Duration,
    /// How often idle gig actors are looked for.
    pub tick_interval: Duration,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            event_capacity: 1024,
            notify_rejections: true,
            idle_gig_ttl: Duration::from_secs(300),
            tick_interval: Duration::from_secs(30),
        }
    }
}

/// Cloneable handle to the lifecycle coordinator.
///
/// All state-changing operations on an existing gig go through the gig's
/// actor, so checks and writes for one gig never interleave. Reads go
/// straight to the store.
#[derive(Clone)]
pub struct Coordinator {
    actor: ActorRef<CoordinatorMessage>,
    store: Store,
    event_tx: broadcast::Sender<MarketEvent>,
}

/// Start the coordinator over `store`.
pub async fn start_coordinator(
    store: Store,
    options: CoordinatorOptions,
) -> Result<(Coordinator, JoinHandle<()>), ractor::SpawnErr> {
    let (event_tx, _) = broadcast::channel(options.event_capacity.max(1));

    let args = RouterArgs {
        store: store.clone(),
        event_tx: event_tx.clone(),
        notify_rejections: options.notify_rejections,
        idle_ttl: options.idle_gig_ttl,
        tick_interval: options.tick_interval,
    };

    let (actor, handle) = Actor::spawn(None, CoordinatorActor, args).await?;

    Ok((
        Coordinator {
            actor,
            store,
            event_tx,
        },
        handle,
    ))
}

impl Coordinator {
    /// Post a new gig. It starts `open`.
    pub async fn create_gig(
        &self,
        owner_id: UserId,
        title: &str,
        description: &str,
        budget: f64,
    ) -> MarketResult<Gig> {
        let gig = Gig::new(owner_id, title, description, budget)?;
        let gig = self.store.gigs.create(&gig).await?;
        tracing::info!("Gig {} posted by {}", gig.id, gig.owner_id);
        Ok(gig)
    }

    /// Place a bid on an open gig.
    pub async fn place_bid(
        &self,
        gig_id: GigId,
        freelancer_id: UserId,
        message: &str,
        price: f64,
    ) -> MarketResult<Bid> {
        self.request(|reply| CoordinatorMessage::PlaceBid {
            gig_id,
            freelancer_id,
            message: message.to_string(),
            price,
            reply,
        })
        .await?
    }

    /// Hire a pending bid. Only the gig owner may do this.
    ///
    /// On success the gig is `assigned`, the bid is `hired` and every other
    /// bid that was pending is `rejected`. Returns the updated gig.
    pub async fn hire_bid(&self, bid_id: BidId, requester_id: UserId) -> MarketResult<Gig> {
        // Only used to find the gig's actor; the actor re-reads the bid.
        let bid = self
            .store
            .bids
            .find(bid_id)
            .await?
            .ok_or_else(|| MarketError::NotFound(format!("Bid not found: {}", bid_id)))?;

        self.request(|reply| CoordinatorMessage::HireBid {
            gig_id: bid.gig_id,
            bid_id,
            requester_id,
            reply,
        })
        .await?
    }

    /// Bids on a gig in the order they were placed. Owner only.
    pub async fn list_bids_for_gig(
        &self,
        gig_id: GigId,
        requester_id: &UserId,
    ) -> MarketResult<Vec<Bid>> {
        let gig = self.get_gig(gig_id).await?;
        if !gig.is_owned_by(requester_id) {
            return Err(MarketError::Authorization(format!(
                "Only the owner of gig {} can see its bids",
                gig_id
            )));
        }
        Ok(self.store.bids.list_by_gig(gig_id).await?)
    }

    pub async fn get_gig(&self, gig_id: GigId) -> MarketResult<Gig> {
        Ok(self.store.gigs.get(gig_id).await?)
    }

    /// Gigs still accepting bids, newest first.
    pub async fn list_open_gigs(&self) -> MarketResult<Vec<Gig>> {
        Ok(self.store.gigs.list_by_status(GigStatus::Open).await?)
    }

    /// Gigs posted by `owner_id`, newest first.
    pub async fn gigs_for_owner(&self, owner_id: &UserId) -> MarketResult<Vec<Gig>> {
        Ok(self.store.gigs.list_by_owner(owner_id).await?)
    }

    /// Bids placed by `freelancer_id`, oldest first.
    pub async fn bids_for_freelancer(&self, freelancer_id: &UserId) -> MarketResult<Vec<Bid>> {
        Ok(self.store.bids.list_by_freelancer(freelancer_id).await?)
    }

    /// Bids on any gig posted by `owner_id`, oldest first.
    pub async fn received_bids(&self, owner_id: &UserId) -> MarketResult<Vec<Bid>> {
        Ok(self.store.bids.list_for_owner(owner_id).await?)
    }

    /// Subscribe to committed lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.event_tx.subscribe()
    }

    /// Number of gig actors currently running.
    pub async fn active_gigs(&self) -> MarketResult<usize> {
        self.request(|reply| CoordinatorMessage::ActiveGigs { reply })
            .await
    }

    /// Stop the coordinator and its gig actors.
    pub fn shutdown(&self) {
        let _ = self.actor.send_message(CoordinatorMessage::Shutdown);
    }

    async fn request<T, F>(&self, build: F) -> MarketResult<T>
    where
        T: Send + 'static,
        F: FnOnce(RpcReplyPort<T>) -> CoordinatorMessage,
    {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor
            .send_message(build(tx.into()))
            .map_err(|_| MarketError::Unavailable("coordinator is not running".into()))?;
        rx.await
            .map_err(|_| MarketError::Unavailable("coordinator dropped the request".into()))
    }
}
