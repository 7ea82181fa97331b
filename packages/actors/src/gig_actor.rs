//! Gig actor: the single writer for one gig and its bids.

use chrono::Utc;
use db::Store;
use gig_core::{Bid, BidId, Gig, GigId, GigStatus, MarketError, MarketEvent, MarketResult, UserId};
use ractor::{Actor, ActorProcessingErr, ActorRef};
use tokio::sync::broadcast;

use crate::messages::{CoordinatorMessage, GigMessage};

/// Everything a gig actor needs to start.
pub struct GigActorArgs {
    pub gig_id: GigId,
    pub store: Store,
    pub event_tx: broadcast::Sender<MarketEvent>,
    pub coordinator: Option<ActorRef<CoordinatorMessage>>,
    /// Emit `BidRejected` for the losing bids of a hire.
    pub notify_rejections: bool,
}

/// State for the gig actor.
pub struct GigActorState {
    gig_id: GigId,
    store: Store,
    event_tx: broadcast::Sender<MarketEvent>,
    coordinator: Option<ActorRef<CoordinatorMessage>>,
    notify_rejections: bool,
}

impl GigActorState {
    fn new(args: GigActorArgs) -> Self {
        Self {
            gig_id: args.gig_id,
            store: args.store,
            event_tx: args.event_tx,
            coordinator: args.coordinator,
            notify_rejections: args.notify_rejections,
        }
    }

    /// Publish a committed event. Having no subscriber is not an error.
    fn broadcast(&self, event: MarketEvent) {
        tracing::debug!("Event: {}", event.description());
        let _ = self.event_tx.send(event);
    }

    async fn load_gig(&self) -> MarketResult<Gig> {
        self.store
            .gigs
            .find(self.gig_id)
            .await?
            .ok_or_else(|| MarketError::NotFound(format!("Gig not found: {}", self.gig_id)))
    }

    async fn place_bid(
        &self,
        freelancer_id: UserId,
        message: String,
        price: f64,
    ) -> MarketResult<Bid> {
        let gig = self.load_gig().await?;
        if !gig.is_open() {
            return Err(MarketError::Conflict(format!(
                "Gig {} is no longer accepting bids",
                gig.id
            )));
        }

        let bid = Bid::new(gig.id, freelancer_id, &message, price)?;
        let bid = self.store.bids.create(&bid).await?;

        let bidder_name = match self.store.profiles.display_name(&bid.freelancer_id).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(
                    "Failed to resolve display name for {}: {}",
                    bid.freelancer_id,
                    e
                );
                bid.freelancer_id.to_string()
            }
        };

        tracing::info!("Bid {} placed on gig {} by {}", bid.id, gig.id, bid.freelancer_id);

        self.broadcast(MarketEvent::BidReceived {
            gig_id: gig.id,
            bid_id: bid.id,
            freelancer_id: bid.freelancer_id.clone(),
            gig_owner_id: gig.owner_id.clone(),
            gig_title: gig.title.clone(),
            bidder_name,
            timestamp: Utc::now(),
        });

        Ok(bid)
    }

    async fn hire(&self, bid_id: BidId, requester_id: UserId) -> MarketResult<Gig> {
        let not_found = || MarketError::NotFound(format!("Bid not found: {}", bid_id));

        let bid = self.store.bids.find(bid_id).await?.ok_or_else(not_found)?;
        if bid.gig_id != self.gig_id {
            return Err(not_found());
        }

        let gig = self.load_gig().await?;
        if !gig.is_owned_by(&requester_id) {
            return Err(MarketError::Authorization(format!(
                "Only the owner of gig {} can hire for it",
                gig.id
            )));
        }
        if !gig.is_open() {
            return Err(MarketError::Conflict(format!("Gig {} is already assigned", gig.id)));
        }
        if !bid.is_pending() {
            return Err(MarketError::Conflict(format!(
                "Bid {} is already {}",
                bid.id,
                bid.status.as_str()
            )));
        }
        if bid.freelancer_id == gig.owner_id {
            return Err(MarketError::Validation(
                "A gig owner cannot hire their own bid".into(),
            ));
        }

        let outcome = self.store.bids.hire(gig.id, bid.id).await?;
        // Committed. Nothing fallible runs between here and the events.
        let gig = Gig {
            status: GigStatus::Assigned,
            ..gig
        };
        let now = Utc::now();

        tracing::info!(
            "Hired {} for gig {} ({} other bids rejected)",
            outcome.hired.freelancer_id,
            gig.id,
            outcome.rejected.len()
        );

        self.broadcast(MarketEvent::Hired {
            gig_id: gig.id,
            bid_id: outcome.hired.id,
            freelancer_id: outcome.hired.freelancer_id.clone(),
            gig_owner_id: gig.owner_id.clone(),
            gig_title: gig.title.clone(),
            timestamp: now,
        });

        if self.notify_rejections {
            for rejected in &outcome.rejected {
                self.broadcast(MarketEvent::BidRejected {
                    gig_id: gig.id,
                    bid_id: rejected.id,
                    freelancer_id: rejected.freelancer_id.clone(),
                    gig_owner_id: gig.owner_id.clone(),
                    gig_title: gig.title.clone(),
                    timestamp: now,
                });
            }
        }

        Ok(gig)
    }
}

/// Actor owning all writes for one gig.
///
/// Messages are handled one at a time, so two requests against the same gig
/// never interleave between their precondition check and their write.
/// Requests against different gigs run in different actors and proceed
/// independently. A gig actor never answers a request with an actor error;
/// failures go back to the caller through the reply port.
pub struct GigActor;

impl Actor for GigActor {
    type Msg = GigMessage;
    type State = GigActorState;
    type Arguments = GigActorArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::debug!("Starting gig actor: {}", args.gig_id);
        Ok(GigActorState::new(args))
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            GigMessage::PlaceBid {
                freelancer_id,
                message,
                price,
                reply,
            } => {
                let result = state.place_bid(freelancer_id, message, price).await;
                if let Err(ref e) = result {
                    tracing::debug!("Bid on gig {} refused: {}", state.gig_id, e);
                }
                let _ = reply.send(result);
            }

            GigMessage::HireBid {
                bid_id,
                requester_id,
                reply,
            } => {
                let result = state.hire(bid_id, requester_id).await;
                match result {
                    Ok(_) => {
                        if let Some(ref coordinator) = state.coordinator {
                            let _ = coordinator.send_message(CoordinatorMessage::GigClosed {
                                gig_id: state.gig_id,
                            });
                        }
                    }
                    Err(ref e) => {
                        tracing::debug!("Hire on gig {} refused: {}", state.gig_id, e);
                    }
                }
                let _ = reply.send(result);
            }

            GigMessage::Shutdown => {
                tracing::debug!("Stopping gig actor: {}", state.gig_id);
                myself.stop(None);
            }
        }

        Ok(())
    }
}
