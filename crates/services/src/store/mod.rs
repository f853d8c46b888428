//! # Entity Store
//!
//! [`ForumStore`] owns every server, category, thread and user and is the
//! single source of truth. Mutations are synchronous and atomic: each one runs
//! all of its checks before the first write, so a rejected intent leaves the
//! store untouched.
//!
//! Posts live inside their thread; `post_threads` is a secondary index that
//! lets post-level operations find the owning thread without a scan.

mod posts;
mod structure;
mod threads;
mod users;

pub use posts::PostRemoval;

use crate::aggregate::{self, by_activity};
use crate::guard::{self, DeletionCheck};
use crate::moderation;
use crate::persistence::Outbox;
use crate::search::{self, SearchRequest};
use chrono::{DateTime, Duration, Utc};
use domains::{
    Category, CategoryId, Change, Clock, EntityKind, ForumError, ForumSnapshot, Post, PostId,
    Result, Server, ServerId, SessionProvider, Thread, ThreadId, User, UserId,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Tunables that are not part of the data.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Length of a ban issued without an explicit end date.
    pub ban_duration: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            ban_duration: Duration::days(30),
        }
    }
}

pub struct ForumStore {
    servers: BTreeMap<ServerId, Server>,
    categories: BTreeMap<CategoryId, Category>,
    threads: BTreeMap<ThreadId, Thread>,
    post_threads: HashMap<PostId, ThreadId>,
    users: BTreeMap<UserId, User>,
    clock: Arc<dyn Clock>,
    outbox: Option<Outbox>,
    options: StoreOptions,
}

impl ForumStore {
    /// Creates an empty store.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            servers: BTreeMap::new(),
            categories: BTreeMap::new(),
            threads: BTreeMap::new(),
            post_threads: HashMap::new(),
            users: BTreeMap::new(),
            clock,
            outbox: None,
            options: StoreOptions::default(),
        }
    }

    /// Builds a store from persisted data, repairing what can be repaired.
    ///
    /// Categories without a server and threads without posts or without a
    /// category are dropped. Posts are ordered by creation time, reply and
    /// like counters are re-derived and every category is recomputed.
    pub fn from_snapshot(snapshot: ForumSnapshot, clock: Arc<dyn Clock>) -> Self {
        let mut store = Self::new(clock);

        for server in snapshot.servers {
            store.servers.insert(server.id.clone(), server);
        }

        for category in snapshot.categories {
            if !store.servers.contains_key(&category.server_id) {
                tracing::warn!(
                    category_id = %category.id,
                    server_id = %category.server_id,
                    "dropping category with unknown server"
                );
                continue;
            }
            store.categories.insert(category.id.clone(), category);
        }

        for mut thread in snapshot.threads {
            if thread.posts.is_empty() {
                tracing::warn!(thread_id = %thread.id, "dropping thread without posts");
                continue;
            }
            if !store.categories.contains_key(&thread.category_id) {
                tracing::warn!(
                    thread_id = %thread.id,
                    category_id = %thread.category_id,
                    "dropping thread with unknown category"
                );
                continue;
            }
            thread.posts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            for post in &mut thread.posts {
                post.like_count = post.liked_by.len();
                store.post_threads.insert(post.id.clone(), thread.id.clone());
            }
            moderation::refresh_reply_state(&mut thread);
            store.threads.insert(thread.id.clone(), thread);
        }

        for user in snapshot.users {
            store.users.insert(user.id.clone(), user);
        }

        let ids: Vec<CategoryId> = store.categories.keys().cloned().collect();
        for id in &ids {
            store.apply_stats(id);
        }

        tracing::info!(
            servers = store.servers.len(),
            categories = store.categories.len(),
            threads = store.threads.len(),
            posts = store.post_threads.len(),
            users = store.users.len(),
            "forum store loaded"
        );
        store
    }

    /// Routes every accepted mutation to `outbox`.
    pub fn with_outbox(mut self, outbox: Outbox) -> Self {
        self.outbox = Some(outbox);
        self
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Copies the current state, e.g. for a full export.
    pub fn snapshot(&self) -> ForumSnapshot {
        ForumSnapshot {
            servers: self.servers.values().cloned().collect(),
            categories: self.categories.values().cloned().collect(),
            threads: self.threads.values().cloned().collect(),
            users: self.users.values().cloned().collect(),
        }
    }

    // ── Read accessors ──────────────────────────────────────────────────────

    pub fn get_server(&self, id: &ServerId) -> Result<&Server> {
        self.servers
            .get(id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Server, id))
    }

    pub fn list_servers(&self) -> Vec<&Server> {
        self.servers.values().collect()
    }

    pub fn get_category(&self, id: &CategoryId) -> Result<&Category> {
        self.categories
            .get(id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Category, id))
    }

    pub fn list_categories(&self) -> Vec<&Category> {
        self.categories.values().collect()
    }

    pub fn list_categories_for_server(&self, server_id: &ServerId) -> Result<Vec<&Category>> {
        self.get_server(server_id)?;
        Ok(self
            .categories
            .values()
            .filter(|c| &c.server_id == server_id)
            .collect())
    }

    pub fn get_thread(&self, id: &ThreadId) -> Result<&Thread> {
        self.threads
            .get(id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Thread, id))
    }

    pub fn list_threads(&self) -> Vec<&Thread> {
        self.threads.values().collect()
    }

    /// Important threads first, then most recently active.
    pub fn list_threads_in_category(&self, category_id: &CategoryId) -> Result<Vec<&Thread>> {
        self.get_category(category_id)?;
        let mut threads: Vec<&Thread> = self
            .threads
            .values()
            .filter(|t| &t.category_id == category_id)
            .collect();
        threads.sort_by(|a, b| {
            b.is_important
                .cmp(&a.is_important)
                .then_with(|| by_activity(b, a))
        });
        Ok(threads)
    }

    /// Returns the post together with its owning thread.
    pub fn get_post(&self, id: &PostId) -> Result<(&Thread, &Post)> {
        let (thread_id, index) = self.locate_post(id)?;
        let thread = self.get_thread(&thread_id)?;
        Ok((thread, &thread.posts[index]))
    }

    pub fn get_user(&self, id: &UserId) -> Result<&User> {
        self.users
            .get(id)
            .ok_or_else(|| ForumError::not_found(EntityKind::User, id))
    }

    pub fn list_users(&self) -> Vec<&User> {
        self.users.values().collect()
    }

    /// The store's record of whoever `session` has signed in.
    pub fn session_actor(&self, session: &dyn SessionProvider) -> Result<User> {
        let user = session.current_user().ok_or_else(|| {
            tracing::warn!("permission denied: nobody signed in");
            ForumError::permission_denied("sign in required")
        })?;
        self.resolve_actor(&user)
    }

    pub fn search_threads(&self, request: &SearchRequest) -> Vec<&Thread> {
        search::search_threads(self.threads.values(), request)
    }

    pub fn search_users(&self, query: &str) -> Vec<&User> {
        search::search_users(self.users.values(), query)
    }

    pub fn can_delete_server(&self, id: &ServerId) -> DeletionCheck {
        guard::can_delete_server(id, self.categories.values())
    }

    pub fn can_delete_category(&self, id: &CategoryId) -> DeletionCheck {
        guard::can_delete_category(id, self.threads.values())
    }

    // ── Aggregation ─────────────────────────────────────────────────────────

    /// Recomputes one category's counters and last-thread pointer.
    pub fn recompute_category(&mut self, id: &CategoryId) -> Result<&Category> {
        self.get_category(id)?;
        if self.apply_stats(id) {
            self.emit_category(id);
        }
        self.get_category(id)
    }

    /// Recomputes every category. Returns how many changed.
    pub fn recompute_all(&mut self) -> usize {
        let ids: Vec<CategoryId> = self.categories.keys().cloned().collect();
        let mut changed = 0;
        for id in &ids {
            if self.apply_stats(id) {
                self.emit_category(id);
                changed += 1;
            }
        }
        changed
    }

    /// Writes fresh stats; returns whether they differed from the cached ones.
    fn apply_stats(&mut self, id: &CategoryId) -> bool {
        let stats = aggregate::summarize(id, self.threads.values());
        match self.categories.get_mut(id) {
            Some(category) if category.stats != stats => {
                tracing::debug!(
                    category_id = %id,
                    threads = stats.threads_count,
                    posts = stats.posts_count,
                    "category stats recomputed"
                );
                category.stats = stats;
                true
            }
            _ => false,
        }
    }

    fn emit_category(&self, id: &CategoryId) {
        if let Some(category) = self.categories.get(id) {
            self.emit(Change::CategorySaved(category.clone()));
        }
    }

    /// Called after every thread or post mutation scoped to `id`.
    fn after_content_change(&mut self, id: &CategoryId) {
        if self.apply_stats(id) {
            self.emit_category(id);
        }
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn emit(&self, change: Change) {
        if let Some(outbox) = &self.outbox {
            outbox.emit(change);
        }
    }

    /// Re-reads `actor` from the store so bans and role changes apply to
    /// handles cloned before them.
    fn resolve_actor(&self, actor: &User) -> Result<User> {
        match self.users.get(&actor.id) {
            Some(user) => Ok(user.clone()),
            None => {
                tracing::warn!(user_id = %actor.id, "permission denied: unknown user");
                Err(ForumError::permission_denied("unknown user"))
            }
        }
    }

    fn thread_mut(&mut self, id: &ThreadId) -> Result<&mut Thread> {
        self.threads
            .get_mut(id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Thread, id))
    }

    fn user_mut(&mut self, id: &UserId) -> Result<&mut User> {
        self.users
            .get_mut(id)
            .ok_or_else(|| ForumError::not_found(EntityKind::User, id))
    }

    fn locate_post(&self, id: &PostId) -> Result<(ThreadId, usize)> {
        let not_found = || ForumError::not_found(EntityKind::Post, id);
        let thread_id = self.post_threads.get(id).ok_or_else(not_found)?;
        let index = self
            .threads
            .get(thread_id)
            .and_then(|t| t.post_index(id))
            .ok_or_else(not_found)?;
        Ok((thread_id.clone(), index))
    }

    fn save_thread(&self, id: &ThreadId) {
        if let Some(thread) = self.threads.get(id) {
            self.emit(Change::ThreadSaved(thread.clone()));
        }
    }
}
