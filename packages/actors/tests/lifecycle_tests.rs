#![allow(clippy::disallowed_methods)]

mod common;

use std::error::Error;
use std::time::Duration;

use actors::CoordinatorOptions;
use futures_util::future::join_all;
use gig_core::{BidId, BidStatus, ErrorKind, GigId, GigStatus, UserId};

#[tokio::test]
async fn test_bid_and_hire_flow() -> Result<(), Box<dyn Error>> {
    let (coordinator, _store) = common::setup(CoordinatorOptions::default()).await?;
    let owner = UserId::from("owner");
    let gig = common::post_gig(&coordinator, "owner", "Logo design").await;
    assert_eq!(gig.status, GigStatus::Open);

    let first = coordinator
        .place_bid(gig.id, UserId::from("f1"), "Two days", 400.0)
        .await?;
    let second = coordinator
        .place_bid(gig.id, UserId::from("f2"), "One day", 450.0)
        .await?;
    let third = coordinator
        .place_bid(gig.id, UserId::from("f3"), "Three days", 300.0)
        .await?;
    assert_eq!(first.status, BidStatus::Pending);

    let listed = coordinator.list_bids_for_gig(gig.id, &owner).await?;
    let ids: Vec<_> = listed.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);

    let assigned = coordinator.hire_bid(second.id, owner.clone()).await?;
    assert_eq!(assigned.id, gig.id);
    assert_eq!(assigned.status, GigStatus::Assigned);

    let after = coordinator.list_bids_for_gig(gig.id, &owner).await?;
    let statuses: Vec<_> = after.iter().map(|b| b.status).collect();
    assert_eq!(
        statuses,
        vec![BidStatus::Rejected, BidStatus::Hired, BidStatus::Rejected]
    );

    assert!(coordinator.list_open_gigs().await?.is_empty());
    assert_eq!(coordinator.gigs_for_owner(&owner).await?.len(), 1);
    assert_eq!(coordinator.received_bids(&owner).await?.len(), 3);
    assert_eq!(
        coordinator
            .bids_for_freelancer(&UserId::from("f2"))
            .await?[0]
            .status,
        BidStatus::Hired
    );

    Ok(())
}

#[tokio::test]
async fn test_assigned_gig_is_frozen() -> Result<(), Box<dyn Error>> {
    let (coordinator, _store) = common::setup(CoordinatorOptions::default()).await?;
    let owner = UserId::from("owner");
    let gig = common::post_gig(&coordinator, "owner", "Landing page").await;

    let winner = coordinator
        .place_bid(gig.id, UserId::from("f1"), "Ready", 400.0)
        .await?;
    let loser = coordinator
        .place_bid(gig.id, UserId::from("f2"), "Ready too", 420.0)
        .await?;
    coordinator.hire_bid(winner.id, owner.clone()).await?;

    let again = coordinator.hire_bid(loser.id, owner.clone()).await.unwrap_err();
    assert_eq!(again.kind(), ErrorKind::Conflict);

    let rehire = coordinator.hire_bid(winner.id, owner.clone()).await.unwrap_err();
    assert_eq!(rehire.kind(), ErrorKind::Conflict);

    let late = coordinator
        .place_bid(gig.id, UserId::from("f3"), "Too late?", 100.0)
        .await
        .unwrap_err();
    assert_eq!(late.kind(), ErrorKind::Conflict);

    let bids = coordinator.list_bids_for_gig(gig.id, &owner).await?;
    assert_eq!(bids.len(), 2);
    assert_eq!(
        bids.iter().filter(|b| b.status == BidStatus::Hired).count(),
        1
    );

    Ok(())
}

#[tokio::test]
async fn test_rejects_bad_requests() -> Result<(), Box<dyn Error>> {
    let (coordinator, _store) = common::setup(CoordinatorOptions::default()).await?;
    let owner = UserId::from("owner");
    let gig = common::post_gig(&coordinator, "owner", "Copywriting").await;

    let blank = coordinator
        .create_gig(owner.clone(), "   ", "desc", 10.0)
        .await
        .unwrap_err();
    assert_eq!(blank.kind(), ErrorKind::Validation);

    let zero = coordinator
        .place_bid(gig.id, UserId::from("f1"), "Free!", 0.0)
        .await
        .unwrap_err();
    assert_eq!(zero.kind(), ErrorKind::Validation);

    let empty = coordinator
        .place_bid(gig.id, UserId::from("f1"), "", 50.0)
        .await
        .unwrap_err();
    assert_eq!(empty.kind(), ErrorKind::Validation);

    let nowhere = coordinator
        .place_bid(GigId::new(), UserId::from("f1"), "Hello", 50.0)
        .await
        .unwrap_err();
    assert_eq!(nowhere.kind(), ErrorKind::NotFound);

    let ghost = coordinator
        .hire_bid(BidId::new(), owner.clone())
        .await
        .unwrap_err();
    assert_eq!(ghost.kind(), ErrorKind::NotFound);

    let bid = coordinator
        .place_bid(gig.id, UserId::from("f1"), "Hello", 50.0)
        .await?;

    let stranger = coordinator
        .hire_bid(bid.id, UserId::from("f2"))
        .await
        .unwrap_err();
    assert_eq!(stranger.kind(), ErrorKind::Authorization);

    let peek = coordinator
        .list_bids_for_gig(gig.id, &UserId::from("f1"))
        .await
        .unwrap_err();
    assert_eq!(peek.kind(), ErrorKind::Authorization);

    let own = coordinator
        .place_bid(gig.id, owner.clone(), "My own bid", 20.0)
        .await?;
    let self_hire = coordinator.hire_bid(own.id, owner.clone()).await.unwrap_err();
    assert_eq!(self_hire.kind(), ErrorKind::Validation);

    // Nothing above changed the gig or its bids.
    assert_eq!(coordinator.get_gig(gig.id).await?.status, GigStatus::Open);
    let bids = coordinator.list_bids_for_gig(gig.id, &owner).await?;
    assert_eq!(bids.len(), 2);
    assert!(bids.iter().all(|b| b.status == BidStatus::Pending));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_hires_pick_one_winner() -> Result<(), Box<dyn Error>> {
    let (coordinator, _store) = common::setup(CoordinatorOptions::default()).await?;
    let owner = UserId::from("owner");
    let gig = common::post_gig(&coordinator, "owner", "Mobile app").await;

    let mut bids = Vec::new();
    for i in 0..5 {
        let bid = coordinator
            .place_bid(gig.id, UserId::from(format!("f{i}").as_str()), "Pick me", 100.0 + i as f64)
            .await?;
        bids.push(bid);
    }

    let results = join_all(
        bids.iter()
            .map(|bid| coordinator.hire_bid(bid.id, owner.clone())),
    )
    .await;

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.kind() == ErrorKind::Conflict)
    );

    let stored = coordinator.list_bids_for_gig(gig.id, &owner).await?;
    assert_eq!(
        stored.iter().filter(|b| b.status == BidStatus::Hired).count(),
        1
    );
    assert_eq!(
        stored.iter().filter(|b| b.status == BidStatus::Rejected).count(),
        4
    );

    Ok(())
}

#[tokio::test]
async fn test_concurrent_bids_on_many_gigs() -> Result<(), Box<dyn Error>> {
    let (coordinator, _store) = common::setup(CoordinatorOptions::default()).await?;
    let owner = UserId::from("owner");

    let mut gigs = Vec::new();
    for i in 0..4 {
        gigs.push(common::post_gig(&coordinator, "owner", &format!("Gig {i}")).await);
    }

    let handle = &coordinator;
    let requests = gigs.iter().flat_map(|gig| {
        (0..3).map(move |i| {
            handle.place_bid(
                gig.id,
                UserId::from(format!("f{i}").as_str()),
                "Available",
                50.0,
            )
        })
    });
    let results = join_all(requests).await;
    assert!(results.iter().all(|r| r.is_ok()));

    for gig in &gigs {
        assert_eq!(coordinator.list_bids_for_gig(gig.id, &owner).await?.len(), 3);
    }
    assert_eq!(coordinator.active_gigs().await?, 4);

    Ok(())
}

#[tokio::test]
async fn test_gig_actor_retires_after_hire() -> Result<(), Box<dyn Error>> {
    let (coordinator, _store) = common::setup(CoordinatorOptions::default()).await?;
    let owner = UserId::from("owner");
    let gig = common::post_gig(&coordinator, "owner", "Data entry").await;

    let bid = coordinator
        .place_bid(gig.id, UserId::from("f1"), "On it", 80.0)
        .await?;
    assert_eq!(coordinator.active_gigs().await?, 1);

    coordinator.hire_bid(bid.id, owner).await?;
    assert_eq!(coordinator.active_gigs().await?, 0);

    // Requests for a closed gig still get an answer.
    let late = coordinator
        .place_bid(gig.id, UserId::from("f2"), "Still open?", 60.0)
        .await
        .unwrap_err();
    assert_eq!(late.kind(), ErrorKind::Conflict);

    Ok(())
}

#[tokio::test]
async fn test_idle_gig_actors_are_stopped() -> Result<(), Box<dyn Error>> {
    let options = CoordinatorOptions {
        idle_gig_ttl: Duration::from_millis(10),
        tick_interval: Duration::from_millis(20),
        ..CoordinatorOptions::default()
    };
    let (coordinator, _store) = common::setup(options).await?;
    let gig = common::post_gig(&coordinator, "owner", "Translation").await;

    coordinator
        .place_bid(gig.id, UserId::from("f1"), "Fluent", 70.0)
        .await?;

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(coordinator.active_gigs().await?, 0);

    coordinator
        .place_bid(gig.id, UserId::from("f2"), "Also fluent", 65.0)
        .await?;
    assert_eq!(
        coordinator
            .list_bids_for_gig(gig.id, &UserId::from("owner"))
            .await?
            .len(),
        2
    );

    Ok(())
}

#[tokio::test]
async fn test_shutdown_makes_coordinator_unavailable() -> Result<(), Box<dyn Error>> {
    let (coordinator, _store) = common::setup(CoordinatorOptions::default()).await?;
    let gig = common::post_gig(&coordinator, "owner", "Illustration").await;

    coordinator.shutdown();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = coordinator
        .place_bid(gig.id, UserId::from("f1"), "Hi", 10.0)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);

    Ok(())
}

#[tokio::test]
async fn test_bid_racing_a_hire_never_stays_pending() -> Result<(), Box<dyn Error>> {
    let (coordinator, _store) = common::setup(CoordinatorOptions::default()).await?;
    let owner = UserId::from("owner");

    for round in 0..10 {
        let gig = common::post_gig(&coordinator, "owner", &format!("Race {round}")).await;
        let winner = coordinator
            .place_bid(gig.id, UserId::from("f1"), "First in", 100.0)
            .await?;

        let (hired, late) = tokio::join!(
            coordinator.hire_bid(winner.id, owner.clone()),
            coordinator.place_bid(gig.id, UserId::from("f2"), "Just in time?", 90.0),
        );
        assert_eq!(hired?.status, GigStatus::Assigned);

        let stored = coordinator.list_bids_for_gig(gig.id, &owner).await?;
        match late {
            // Landed before the hire, so the hire rejected it.
            Ok(bid) => {
                let bid = stored.iter().find(|b| b.id == bid.id).unwrap();
                assert_eq!(bid.status, BidStatus::Rejected);
                assert_eq!(stored.len(), 2);
            }
            Err(e) => {
                assert_eq!(e.kind(), ErrorKind::Conflict);
                assert_eq!(stored.len(), 1);
            }
        }
        assert!(stored.iter().all(|b| b.status != BidStatus::Pending));
        assert_eq!(
            stored.iter().filter(|b| b.status == BidStatus::Hired).count(),
            1
        );
    }

    Ok(())
}
