#![allow(clippy::disallowed_methods)]

mod common;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use actors::{
    ChannelSink, ConnectionHandle, CoordinatorOptions, NotificationDispatcher, NotificationSink,
    PushError, SessionRegistry,
};
use gig_core::{Notification, UserId, UserProfile};
use tokio::sync::mpsc;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

struct DeadSink;

impl NotificationSink for DeadSink {
    fn push(&self, _notification: &Notification) -> Result<(), PushError> {
        Err(PushError::Transport("connection reset".into()))
    }
}

fn connect(registry: &SessionRegistry, user: &str) -> mpsc::Receiver<Notification> {
    let (sink, rx) = ChannelSink::channel(16);
    registry.register(&UserId::from(user), ConnectionHandle::from_sink(sink));
    rx
}

async fn next(rx: &mut mpsc::Receiver<Notification>) -> Notification {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for notification")
        .expect("connection closed")
}

#[tokio::test]
async fn test_parties_are_notified() -> Result<(), Box<dyn Error>> {
    let (coordinator, store) = common::setup(CoordinatorOptions::default()).await?;
    let registry = Arc::new(SessionRegistry::new());
    NotificationDispatcher::new(registry.clone()).spawn(coordinator.subscribe());

    store
        .profiles
        .upsert(&UserProfile::new(UserId::from("f1"), "Asha"))
        .await?;

    let mut owner_tab = connect(&registry, "owner");
    let mut owner_phone = connect(&registry, "owner");
    let mut winner = connect(&registry, "f1");
    let mut loser = connect(&registry, "f2");

    let gig = common::post_gig(&coordinator, "owner", "Logo design").await;
    let hired = coordinator
        .place_bid(gig.id, UserId::from("f1"), "Two days", 400.0)
        .await?;
    coordinator
        .place_bid(gig.id, UserId::from("f2"), "One day", 450.0)
        .await?;

    for rx in [&mut owner_tab, &mut owner_phone] {
        assert_eq!(
            next(rx).await,
            Notification::BidReceived {
                gig_title: "Logo design".into(),
                bidder_name: "Asha".into(),
            }
        );
        // No profile: the raw identity stands in for the name.
        assert_eq!(
            next(rx).await,
            Notification::BidReceived {
                gig_title: "Logo design".into(),
                bidder_name: "f2".into(),
            }
        );
    }

    coordinator.hire_bid(hired.id, UserId::from("owner")).await?;

    assert_eq!(
        next(&mut winner).await,
        Notification::Hired {
            gig_title: "Logo design".into()
        }
    );
    assert_eq!(
        next(&mut loser).await,
        Notification::BidRejected {
            gig_title: "Logo design".into()
        }
    );

    Ok(())
}

#[tokio::test]
async fn test_rejection_notices_can_be_disabled() -> Result<(), Box<dyn Error>> {
    let options = CoordinatorOptions {
        notify_rejections: false,
        ..CoordinatorOptions::default()
    };
    let (coordinator, _store) = common::setup(options).await?;
    let registry = Arc::new(SessionRegistry::new());
    NotificationDispatcher::new(registry.clone()).spawn(coordinator.subscribe());

    let mut winner = connect(&registry, "f1");
    let mut loser = connect(&registry, "f2");

    let gig = common::post_gig(&coordinator, "owner", "Copywriting").await;
    let bid = coordinator
        .place_bid(gig.id, UserId::from("f1"), "Ready", 100.0)
        .await?;
    coordinator
        .place_bid(gig.id, UserId::from("f2"), "Ready", 90.0)
        .await?;
    coordinator.hire_bid(bid.id, UserId::from("owner")).await?;

    assert_eq!(next(&mut winner).await.kind(), "hired");
    assert!(
        timeout(Duration::from_millis(200), loser.recv())
            .await
            .is_err()
    );

    Ok(())
}

#[tokio::test]
async fn test_delivery_failures_do_not_affect_operations() -> Result<(), Box<dyn Error>> {
    let (coordinator, _store) = common::setup(CoordinatorOptions::default()).await?;
    let registry = Arc::new(SessionRegistry::new());
    NotificationDispatcher::new(registry.clone()).spawn(coordinator.subscribe());

    registry.register(&UserId::from("owner"), ConnectionHandle::from_sink(DeadSink));
    let mut healthy = connect(&registry, "owner");

    let gig = common::post_gig(&coordinator, "owner", "Translation").await;
    let bid = coordinator
        .place_bid(gig.id, UserId::from("offline-freelancer"), "Fluent", 70.0)
        .await?;
    assert_eq!(next(&mut healthy).await.kind(), "bid_received");

    // The freelancer has no connection at all; the hire still succeeds.
    let assigned = coordinator.hire_bid(bid.id, UserId::from("owner")).await?;
    assert!(!assigned.is_open());

    Ok(())
}

#[tokio::test]
async fn test_disconnected_identity_receives_nothing() -> Result<(), Box<dyn Error>> {
    let (coordinator, _store) = common::setup(CoordinatorOptions::default()).await?;
    let registry = Arc::new(SessionRegistry::new());
    NotificationDispatcher::new(registry.clone()).spawn(coordinator.subscribe());

    let owner = UserId::from("owner");
    let (sink, mut rx) = ChannelSink::channel(16);
    let handle = ConnectionHandle::from_sink(sink);
    registry.register(&owner, handle.clone());
    registry.deregister(&owner, handle.id());

    let gig = common::post_gig(&coordinator, "owner", "Podcast edit").await;
    coordinator
        .place_bid(gig.id, UserId::from("f1"), "Sure", 40.0)
        .await?;

    assert!(
        timeout(Duration::from_millis(200), rx.recv())
            .await
            .is_err()
    );

    Ok(())
}

#[tokio::test]
async fn test_missed_notification_is_recovered_by_fetch() -> Result<(), Box<dyn Error>> {
    let (coordinator, _store) = common::setup(CoordinatorOptions::default()).await?;
    let registry = Arc::new(SessionRegistry::new());
    NotificationDispatcher::new(registry.clone()).spawn(coordinator.subscribe());

    let owner = UserId::from("owner");
    let gig = common::post_gig(&coordinator, "owner", "Bookkeeping").await;
    let bid = coordinator
        .place_bid(gig.id, UserId::from("f1"), "Certified", 120.0)
        .await?;

    // Events dispatch in order, so once this arrives the first bid's
    // notification has already been dropped.
    let mut observer = connect(&registry, "observer");
    let marker = common::post_gig(&coordinator, "observer", "Marker").await;
    coordinator
        .place_bid(marker.id, UserId::from("f2"), "Ping", 1.0)
        .await?;
    next(&mut observer).await;

    // Connecting afterwards does not replay anything.
    let mut late = connect(&registry, "owner");
    assert!(
        timeout(Duration::from_millis(200), late.recv())
            .await
            .is_err()
    );

    let bids = coordinator.list_bids_for_gig(gig.id, &owner).await?;
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].id, bid.id);
    assert_eq!(bids[0].status, gig_core::BidStatus::Pending);

    Ok(())
}
