//! In-memory [`ForumRepository`] backed by [`DashMap`].

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{
    Category, CategoryId, Change, ForumRepository, ForumSnapshot, Server, ServerId, Thread,
    ThreadId, User, UserId,
};
use std::hash::Hash;

#[derive(Debug, Default)]
pub struct MemoryRepository {
    servers: DashMap<ServerId, Server>,
    categories: DashMap<CategoryId, Category>,
    threads: DashMap<ThreadId, Thread>,
    users: DashMap<UserId, User>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the maps, e.g. with [`crate::seed::demo_snapshot`].
    pub fn with_snapshot(snapshot: ForumSnapshot) -> Self {
        let repo = Self::new();
        for server in snapshot.servers {
            repo.servers.insert(server.id.clone(), server);
        }
        for category in snapshot.categories {
            repo.categories.insert(category.id.clone(), category);
        }
        for thread in snapshot.threads {
            repo.threads.insert(thread.id.clone(), thread);
        }
        for user in snapshot.users {
            repo.users.insert(user.id.clone(), user);
        }
        repo
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }
}

/// Values ordered by key so loads are deterministic.
fn sorted_values<K: Ord + Hash + Eq + Clone, V: Clone>(map: &DashMap<K, V>) -> Vec<V> {
    let mut entries: Vec<(K, V)> = map
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter().map(|(_, v)| v).collect()
}

#[async_trait]
impl ForumRepository for MemoryRepository {
    async fn load_all(&self) -> anyhow::Result<ForumSnapshot> {
        Ok(ForumSnapshot {
            servers: sorted_values(&self.servers),
            categories: sorted_values(&self.categories),
            threads: sorted_values(&self.threads),
            users: sorted_values(&self.users),
        })
    }

    async fn persist(&self, change: Change) -> anyhow::Result<()> {
        match change {
            Change::ServerSaved(server) => {
                self.servers.insert(server.id.clone(), server);
            }
            Change::ServerRemoved(id) => {
                self.servers.remove(&id);
            }
            Change::CategorySaved(category) => {
                self.categories.insert(category.id.clone(), category);
            }
            Change::CategoryRemoved(id) => {
                self.categories.remove(&id);
            }
            Change::ThreadSaved(thread) => {
                self.threads.insert(thread.id.clone(), thread);
            }
            Change::ThreadRemoved(id) => {
                self.threads.remove(&id);
            }
            Change::UserSaved(user) => {
                self.users.insert(user.id.clone(), user);
            }
        }
        Ok(())
    }
}
