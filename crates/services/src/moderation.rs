//! # Moderation State Machine
//!
//! Thread flags, the per-post like ledger and reply quoting. These functions
//! mutate a single aggregate in place; permission checks live in the store.

use domains::{Post, Thread, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three independent boolean flags of a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadFlag {
    Locked,
    Important,
    Resolved,
}

impl fmt::Display for ThreadFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThreadFlag::Locked => "locked",
            ThreadFlag::Important => "important",
            ThreadFlag::Resolved => "resolved",
        })
    }
}

/// Flips one flag and returns its new value. Other flags are untouched.
pub fn toggle_flag(thread: &mut Thread, flag: ThreadFlag) -> bool {
    let slot = match flag {
        ThreadFlag::Locked => &mut thread.is_locked,
        ThreadFlag::Important => &mut thread.is_important,
        ThreadFlag::Resolved => &mut thread.is_resolved,
    };
    *slot = !*slot;
    *slot
}

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
    /// Whether the user likes the post after the toggle.
    pub liked: bool,
    pub like_count: usize,
}

/// Adds or removes `user_id` from the post's like ledger.
///
/// Calling it twice with the same user restores the original ledger.
pub fn toggle_like(post: &mut Post, user_id: &UserId) -> LikeOutcome {
    let liked = if post.liked_by.remove(user_id) {
        false
    } else {
        post.liked_by.insert(user_id.clone());
        true
    };
    post.like_count = post.liked_by.len();
    LikeOutcome {
        liked,
        like_count: post.like_count,
    }
}

/// Re-derives `reply_count` and the last-reply pointer from the post list.
pub fn refresh_reply_state(thread: &mut Thread) {
    thread.reply_count = thread.posts.len().saturating_sub(1);
    if let Some(last) = thread.posts.last() {
        thread.last_reply_at = Some(last.created_at);
        thread.last_reply_by = Some(last.author.clone());
    }
}

/// Formats `content` as a block quote attributed to `author_username`, ready
/// to prefix a new reply draft.
pub fn prepare_reply(content: &str, author_username: &str) -> String {
    let quoted = content
        .split('\n')
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("> **{author_username} wrote:**\n{quoted}\n\n")
}
