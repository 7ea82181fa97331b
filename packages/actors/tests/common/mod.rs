#![allow(dead_code)]

use std::error::Error;

use actors::{Coordinator, CoordinatorOptions, start_coordinator};
use db::{DbConfig, Store};
use gig_core::{Gig, UserId};

/// A coordinator over a fresh in-memory database.
pub async fn setup(options: CoordinatorOptions) -> Result<(Coordinator, Store), Box<dyn Error>> {
    let db = db::init(DbConfig::memory()).await?;
    let store = Store::new(db);
    let (coordinator, _handle) = start_coordinator(store.clone(), options).await?;
    Ok((coordinator, store))
}

pub async fn post_gig(coordinator: &Coordinator, owner: &str, title: &str) -> Gig {
    coordinator
        .create_gig(UserId::from(owner), title, "Details to follow", 500.0)
        .await
        .unwrap()
}
