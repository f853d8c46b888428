//! # Core Traits (Ports)
//!
//! Adapters implement these to plug persistence, sessions and time into the
//! forum store.

use crate::ids::{CategoryId, ServerId, ThreadId};
use crate::models::{Category, ForumSnapshot, Server, Thread, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "testing")]
use mockall::automock;

/// A single accepted mutation, as handed to the persistence adapter.
///
/// Threads are saved as a whole aggregate, posts and likes included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "entity", rename_all = "camelCase")]
pub enum Change {
    ServerSaved(Server),
    ServerRemoved(ServerId),
    CategorySaved(Category),
    CategoryRemoved(CategoryId),
    ThreadSaved(Thread),
    ThreadRemoved(ThreadId),
    UserSaved(User),
}

/// Persistence contract. The store never waits on `persist`.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait ForumRepository: Send + Sync {
    /// Loads every entity at startup.
    async fn load_all(&self) -> anyhow::Result<ForumSnapshot>;

    /// Applies one change. Best-effort; failures are logged by the caller.
    async fn persist(&self, change: Change) -> anyhow::Result<()>;
}

/// Who is acting. Consulted before permission-checked calls.
#[cfg_attr(feature = "testing", automock)]
pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
}

/// Time source for `createdAt`/`updatedAt` stamps.
#[cfg_attr(feature = "testing", automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
