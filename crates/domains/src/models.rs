//! # Domain Models
//!
//! The forum hierarchy is Server → Category → Thread → Post. Ownership runs
//! strictly downward; author references are weak snapshots of a [`User`].

use crate::ids::{CategoryId, PostId, ServerId, ThreadId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A top-level community (e.g. "Roleplay Hub").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: ServerId,
    pub name: String,
    pub description: String,
}

/// The most recently active thread of a category, projected for listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastThread {
    pub id: ThreadId,
    pub title: String,
    pub author_name: String,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate counters of a category. Always derived from its threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryStats {
    pub threads_count: usize,
    pub posts_count: usize,
    pub last_thread: Option<LastThread>,
}

/// A board inside a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    /// Name of the icon the presentation layer renders next to the category.
    pub icon: Option<String>,
    pub server_id: ServerId,
    /// Recomputed by the store after every thread or post change.
    #[serde(flatten)]
    pub stats: CategoryStats,
}

/// Weak reference to a user, captured when content is authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    pub id: UserId,
    pub username: String,
}

/// The fundamental unit of conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author: AuthorRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Always equal to `liked_by.len()`.
    #[serde(default)]
    pub like_count: usize,
    #[serde(default)]
    pub liked_by: BTreeSet<UserId>,
}

impl Post {
    pub fn is_liked_by(&self, user_id: &UserId) -> bool {
        self.liked_by.contains(user_id)
    }
}

/// Badge shown for a thread, by precedence Important > Locked > Resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadBadge {
    Important,
    Locked,
    Resolved,
    Open,
}

/// A discussion inside a category. `posts[0]` is the original post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: ThreadId,
    pub title: String,
    pub author: AuthorRef,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub posts: Vec<Post>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub view_count: u64,
    /// Always `posts.len() - 1`.
    #[serde(default)]
    pub reply_count: usize,
    pub last_reply_at: Option<DateTime<Utc>>,
    pub last_reply_by: Option<AuthorRef>,
}

impl Thread {
    pub fn original_post(&self) -> Option<&Post> {
        self.posts.first()
    }

    /// Timestamp used to rank threads by activity.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_reply_at.unwrap_or(self.created_at)
    }

    pub fn post_index(&self, post_id: &PostId) -> Option<usize> {
        self.posts.iter().position(|p| &p.id == post_id)
    }

    pub fn badge(&self) -> ThreadBadge {
        if self.is_important {
            ThreadBadge::Important
        } else if self.is_locked {
            ThreadBadge::Locked
        } else if self.is_resolved {
            ThreadBadge::Resolved
        } else {
            ThreadBadge::Open
        }
    }
}

/// A forum member. Only ban and role state is mutated by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_banned: bool,
    pub ban_end_date: Option<DateTime<Utc>>,
}

impl User {
    pub fn author_ref(&self) -> AuthorRef {
        AuthorRef {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }

    /// A ban without an end date never expires.
    pub fn is_banned_at(&self, now: DateTime<Utc>) -> bool {
        self.is_banned && self.ban_end_date.map_or(true, |end| end > now)
    }
}

// ── Mutation inputs ──────────────────────────────────────────────────────────

/// Input for creating a server.
#[derive(Debug, Clone, Deserialize)]
pub struct NewServer {
    pub name: String,
    pub description: String,
}

/// Shallow patch of a server; `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Input for creating a category under an existing server.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub server_id: ServerId,
}

/// Shallow patch of a category. The owning server cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the icon.
    pub icon: Option<Option<String>>,
}

/// Input for opening a thread: its title and the original post's content.
#[derive(Debug, Clone, Deserialize)]
pub struct NewThread {
    pub title: String,
    pub content: String,
}

/// Everything loaded from persistence at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumSnapshot {
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Threads carry their posts in creation order.
    #[serde(default)]
    pub threads: Vec<Thread>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl ForumSnapshot {
    pub fn posts(&self) -> impl Iterator<Item = (&ThreadId, &Post)> {
        self.threads
            .iter()
            .flat_map(|t| t.posts.iter().map(move |p| (&t.id, p)))
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
            && self.categories.is_empty()
            && self.threads.is_empty()
            && self.users.is_empty()
    }
}
