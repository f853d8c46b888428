//! # Referential Guard
//!
//! Hierarchy deletion rules and ownership-based permission checks. Every
//! function here is pure; the store calls them before touching state.

use chrono::{DateTime, Utc};
use domains::{
    Category, CategoryId, ChildCount, EntityKind, ForumError, Post, Result, ServerId, Thread, User,
};

/// Outcome of asking whether a parent entity may be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionCheck {
    pub kind: EntityKind,
    pub id: String,
    pub children: ChildCount,
}

impl DeletionCheck {
    pub fn is_allowed(&self) -> bool {
        self.children.count == 0
    }

    pub fn blocking(&self) -> usize {
        self.children.count
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_allowed() {
            Ok(())
        } else {
            tracing::warn!(
                kind = %self.kind,
                id = %self.id,
                blocking = self.children.count,
                "deletion blocked by dependent children"
            );
            Err(ForumError::DeletionBlocked {
                kind: self.kind,
                id: self.id,
                children: self.children,
            })
        }
    }
}

/// A server may be deleted only once it owns no categories.
pub fn can_delete_server<'a>(
    server_id: &ServerId,
    categories: impl IntoIterator<Item = &'a Category>,
) -> DeletionCheck {
    let count = categories
        .into_iter()
        .filter(|c| &c.server_id == server_id)
        .count();
    DeletionCheck {
        kind: EntityKind::Server,
        id: server_id.to_string(),
        children: ChildCount { kind: EntityKind::Category, count },
    }
}

/// A category may be deleted only once it owns no threads.
pub fn can_delete_category<'a>(
    category_id: &CategoryId,
    threads: impl IntoIterator<Item = &'a Thread>,
) -> DeletionCheck {
    let count = threads
        .into_iter()
        .filter(|t| &t.category_id == category_id)
        .count();
    DeletionCheck {
        kind: EntityKind::Category,
        id: category_id.to_string(),
        children: ChildCount { kind: EntityKind::Thread, count },
    }
}

pub fn can_edit_thread(user: &User, thread: &Thread) -> bool {
    user.is_admin || user.id == thread.author.id
}

/// Locking is an admin power regardless of authorship.
pub fn can_lock_thread(user: &User) -> bool {
    user.is_admin
}

/// Important and resolved are moderation flags, set from the admin panel.
pub fn can_moderate_thread(user: &User) -> bool {
    user.is_admin
}

/// The original post is never edited through the post path.
pub fn can_edit_post(user: &User, post: &Post, is_original_post: bool) -> bool {
    !is_original_post && (user.is_admin || user.id == post.author.id)
}

pub fn can_delete_post(user: &User, post: &Post, is_original_post: bool) -> bool {
    can_edit_post(user, post, is_original_post)
}

/// Servers, categories and user roles are managed by admins only.
pub fn can_manage_forum(user: &User) -> bool {
    user.is_admin
}

/// Users under an active ban cannot open threads or reply.
pub fn can_contribute(user: &User, now: DateTime<Utc>) -> bool {
    !user.is_banned_at(now)
}

pub(crate) fn require(allowed: bool, reason: &str) -> Result<()> {
    if allowed {
        Ok(())
    } else {
        tracing::warn!(reason, "permission denied");
        Err(ForumError::permission_denied(reason))
    }
}
