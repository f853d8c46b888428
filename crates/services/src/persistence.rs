//! Fire-and-forget persistence.
//!
//! The store pushes every accepted [`Change`] into an unbounded channel and
//! moves on; a background task drains the channel into the repository.

use domains::{Change, ForumRepository};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Sending half held by the store.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: UnboundedSender<Change>,
}

impl Outbox {
    pub fn channel() -> (Self, UnboundedReceiver<Change>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Never blocks. A closed channel only loses durability, not the mutation.
    pub fn emit(&self, change: Change) {
        if self.tx.send(change).is_err() {
            tracing::warn!("persistence worker stopped; change dropped");
        }
    }
}

/// Drains `rx` into `repo` until every [`Outbox`] is dropped.
pub fn spawn_persistence(
    repo: Arc<dyn ForumRepository>,
    mut rx: UnboundedReceiver<Change>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(change) = rx.recv().await {
            let label = change_label(&change);
            if let Err(e) = repo.persist(change).await {
                tracing::warn!(change = label, error = %e, "failed to persist change");
            }
        }
        tracing::debug!("persistence worker finished");
    })
}

fn change_label(change: &Change) -> &'static str {
    match change {
        Change::ServerSaved(_) => "server_saved",
        Change::ServerRemoved(_) => "server_removed",
        Change::CategorySaved(_) => "category_saved",
        Change::CategoryRemoved(_) => "category_removed",
        Change::ThreadSaved(_) => "thread_saved",
        Change::ThreadRemoved(_) => "thread_removed",
        Change::UserSaved(_) => "user_saved",
    }
}
