//! Shared fixtures for the cross-crate tests.

use chrono::{DateTime, TimeZone, Utc};
use domains::{ForumSnapshot, User, UserId};
use services::{ForumStore, ManualClock};
use std::sync::Arc;
use storage_adapters::seed::demo_snapshot;

/// 2025-01-15 12:00 UTC, after Trevor's demo ban has run out.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn demo() -> ForumSnapshot {
    demo_snapshot().unwrap_or_default()
}

/// The demo forum loaded into a store driven by a manual clock.
pub fn demo_store() -> (ForumStore, Arc<ManualClock>) {
    store_from(demo())
}

pub fn store_from(snapshot: ForumSnapshot) -> (ForumStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    (ForumStore::from_snapshot(snapshot, clock.clone()), clock)
}

/// Looks a user up in the store; panics in tests when the id is unknown.
pub fn actor(store: &ForumStore, id: &str) -> User {
    match store.get_user(&UserId::from(id)) {
        Ok(user) => user.clone(),
        Err(e) => panic!("fixture user {id}: {e}"),
    }
}

pub fn michael(store: &ForumStore) -> User {
    actor(store, "user1")
}

pub fn franklin(store: &ForumStore) -> User {
    actor(store, "user2")
}

pub fn trevor(store: &ForumStore) -> User {
    actor(store, "user3")
}

pub fn lester(store: &ForumStore) -> User {
    actor(store, "user4")
}
