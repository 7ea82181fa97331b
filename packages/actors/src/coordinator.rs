//! Router actor: owns the gig actors and forwards requests to them.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use db::Store;
use gig_core::{GigId, MarketError, MarketEvent};
use ractor::{Actor, ActorProcessingErr, ActorRef, MessagingErr, SupervisionEvent};
use tokio::sync::broadcast;

use crate::gig_actor::{GigActor, GigActorArgs};
use crate::messages::{CoordinatorMessage, GigMessage};

/// Arguments for the router actor.
pub struct RouterArgs {
    pub store: Store,
    pub event_tx: broadcast::Sender<MarketEvent>,
    pub notify_rejections: bool,
    /// Gig actors with no routed request for this long are stopped.
    pub idle_ttl: Duration,
    /// How often to look for idle gig actors.
    pub tick_interval: Duration,
}

struct GigEntry {
    actor: ActorRef<GigMessage>,
    last_routed: Instant,
    /// A `Shutdown` has been sent; new requests wait for the actor to exit.
    retiring: bool,
    parked: Vec<GigMessage>,
}

/// State for the router actor.
pub struct RouterState {
    gigs: HashMap<GigId, GigEntry>,
    store: Store,
    event_tx: broadcast::Sender<MarketEvent>,
    notify_rejections: bool,
    idle_ttl: Duration,
}

impl RouterState {
    fn new(args: RouterArgs) -> Self {
        Self {
            gigs: HashMap::new(),
            store: args.store,
            event_tx: args.event_tx,
            notify_rejections: args.notify_rejections,
            idle_ttl: args.idle_ttl,
        }
    }

    fn active_count(&self) -> usize {
        self.gigs.values().filter(|entry| !entry.retiring).count()
    }
}

async fn spawn_gig_actor(
    myself: &ActorRef<CoordinatorMessage>,
    state: &RouterState,
    gig_id: GigId,
) -> Result<ActorRef<GigMessage>, ActorProcessingErr> {
    let args = GigActorArgs {
        gig_id,
        store: state.store.clone(),
        event_tx: state.event_tx.clone(),
        coordinator: Some(myself.clone()),
        notify_rejections: state.notify_rejections,
    };

    let (actor, _handle) = Actor::spawn_linked(None, GigActor, args, myself.get_cell())
        .await
        .map_err(|e| ActorProcessingErr::from(format!("Failed to spawn gig actor: {}", e)))?;

    Ok(actor)
}

/// Hand a request to the actor for `gig_id`, starting one if needed.
///
/// Requests for a gig whose actor is shutting down are parked and replayed
/// on a fresh actor once the old one has exited, so at most one actor ever
/// processes requests for a gig.
async fn route(
    myself: &ActorRef<CoordinatorMessage>,
    state: &mut RouterState,
    gig_id: GigId,
    message: GigMessage,
) {
    let message = if let Some(entry) = state.gigs.get_mut(&gig_id) {
        if entry.retiring {
            entry.parked.push(message);
            return;
        }
        entry.last_routed = Instant::now();
        match entry.actor.send_message(message) {
            Ok(()) => return,
            // The actor died before its supervision event reached us.
            Err(MessagingErr::SendErr(message)) => message,
            Err(e) => {
                tracing::error!("Failed to route to gig {}: {}", gig_id, e);
                return;
            }
        }
    } else {
        message
    };
    state.gigs.remove(&gig_id);

    match spawn_gig_actor(myself, state, gig_id).await {
        Ok(actor) => {
            if let Err(e) = actor.send_message(message) {
                tracing::error!("New gig actor for {} rejected a message: {}", gig_id, e);
                if let MessagingErr::SendErr(message) = e {
                    message.fail(MarketError::Unavailable("gig actor unavailable".into()));
                }
                return;
            }
            state.gigs.insert(
                gig_id,
                GigEntry {
                    actor,
                    last_routed: Instant::now(),
                    retiring: false,
                    parked: Vec::new(),
                },
            );
        }
        Err(e) => {
            tracing::error!("{}", e);
            message.fail(MarketError::Unavailable("gig actor unavailable".into()));
        }
    }
}

/// Ask the actor for `gig_id` to stop once its queue drains.
fn retire(state: &mut RouterState, gig_id: GigId) {
    if let Some(entry) = state.gigs.get_mut(&gig_id)
        && !entry.retiring
    {
        entry.retiring = true;
        if entry.actor.send_message(GigMessage::Shutdown).is_err() {
            // Already gone; the supervision event will clean up.
            tracing::debug!("Gig actor for {} already stopped", gig_id);
        }
    }
}

/// Routes lifecycle requests to one [`GigActor`] per gig.
///
/// The router never touches the store itself, so a slow gig never delays
/// requests for other gigs. Gig actors are started on first use and retired
/// after a hire or after sitting idle.
pub struct CoordinatorActor;

impl Actor for CoordinatorActor {
    type Msg = CoordinatorMessage;
    type State = RouterState;
    type Arguments = RouterArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting lifecycle coordinator");

        // Start periodic tick
        let myself_clone = myself.clone();
        let tick_interval = args.tick_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            loop {
                interval.tick().await;
                if myself_clone.send_message(CoordinatorMessage::Tick).is_err() {
                    break;
                }
            }
        });

        Ok(RouterState::new(args))
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            CoordinatorMessage::PlaceBid {
                gig_id,
                freelancer_id,
                message,
                price,
                reply,
            } => {
                let message = GigMessage::PlaceBid {
                    freelancer_id,
                    message,
                    price,
                    reply,
                };
                route(&myself, state, gig_id, message).await;
            }

            CoordinatorMessage::HireBid {
                gig_id,
                bid_id,
                requester_id,
                reply,
            } => {
                let message = GigMessage::HireBid {
                    bid_id,
                    requester_id,
                    reply,
                };
                route(&myself, state, gig_id, message).await;
            }

            CoordinatorMessage::GigClosed { gig_id } => {
                tracing::debug!("Gig {} closed, retiring its actor", gig_id);
                retire(state, gig_id);
            }

            CoordinatorMessage::ActiveGigs { reply } => {
                let _ = reply.send(state.active_count());
            }

            CoordinatorMessage::Shutdown => {
                tracing::info!("Shutting down lifecycle coordinator");
                for (_, entry) in state.gigs.drain() {
                    let _ = entry.actor.send_message(GigMessage::Shutdown);
                    for parked in entry.parked {
                        parked.fail(MarketError::Unavailable("coordinator shutting down".into()));
                    }
                }
                myself.stop(None);
            }

            CoordinatorMessage::Tick => {
                let idle: Vec<GigId> = state
                    .gigs
                    .iter()
                    .filter(|(_, entry)| {
                        !entry.retiring && entry.last_routed.elapsed() >= state.idle_ttl
                    })
                    .map(|(gig_id, _)| *gig_id)
                    .collect();

                if !idle.is_empty() {
                    tracing::debug!("Retiring {} idle gig actors", idle.len());
                }
                for gig_id in idle {
                    retire(state, gig_id);
                }
            }
        }

        Ok(())
    }

    async fn handle_supervisor_evt(
        &self,
        myself: ActorRef<Self::Msg>,
        message: SupervisionEvent,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let cell = match message {
            SupervisionEvent::ActorTerminated(cell, _, _) => cell,
            SupervisionEvent::ActorFailed(cell, err) => {
                tracing::warn!("Gig actor {} failed: {}", cell.get_id(), err);
                cell
            }
            _ => return Ok(()),
        };

        let Some(gig_id) = state
            .gigs
            .iter()
            .find(|(_, entry)| entry.actor.get_id() == cell.get_id())
            .map(|(gig_id, _)| *gig_id)
        else {
            return Ok(());
        };

        if let Some(entry) = state.gigs.remove(&gig_id) {
            if !entry.retiring {
                tracing::warn!("Gig actor for {} stopped unexpectedly", gig_id);
            }
            for parked in entry.parked {
                route(&myself, state, gig_id, parked).await;
            }
        }

        Ok(())
    }
}
