//! Replies, post edits, deletions and the like ledger.

use super::ForumStore;
use crate::guard::{self, require};
use crate::ids::generate_id;
use crate::moderation::{self, LikeOutcome};
use crate::validation;
use domains::{EntityKind, ForumError, Post, PostId, Result, Thread, ThreadId, User};
use std::collections::BTreeSet;

/// What a post deletion actually removed.
#[derive(Debug, Clone, PartialEq)]
pub enum PostRemoval {
    /// A reply was removed from its thread.
    Reply(Post),
    /// The original post was targeted, so the whole thread went with it.
    Thread(Thread),
}

impl ForumStore {
    /// Appends a reply. Non-admins are turned away from locked threads.
    pub fn add_post(&mut self, actor: &User, thread_id: &ThreadId, content: &str) -> Result<Post> {
        let actor = self.resolve_actor(actor)?;
        let now = self.now();
        require(guard::can_contribute(&actor, now), "banned users cannot reply")?;
        let thread = self.get_thread(thread_id)?;
        if thread.is_locked && !actor.is_admin {
            tracing::warn!(thread_id = %thread_id, actor = %actor.id, "reply rejected: thread locked");
            return Err(ForumError::ThreadLocked(thread_id.clone()));
        }
        validation::POST_CONTENT.check(content)?;

        // Posts stay ordered by creation time even if the clock steps back.
        let created_at = thread
            .posts
            .last()
            .map_or(now, |last| now.max(last.created_at));
        let post = Post {
            id: PostId::new(generate_id(EntityKind::Post, now)),
            author: actor.author_ref(),
            content: content.trim().to_string(),
            created_at,
            updated_at: None,
            like_count: 0,
            liked_by: BTreeSet::new(),
        };

        let thread = self.thread_mut(thread_id)?;
        thread.posts.push(post.clone());
        moderation::refresh_reply_state(thread);
        let category_id = thread.category_id.clone();
        self.post_threads.insert(post.id.clone(), thread_id.clone());

        self.save_thread(thread_id);
        self.after_content_change(&category_id);
        tracing::info!(post_id = %post.id, thread_id = %thread_id, author = %actor.id, "reply added");
        Ok(post)
    }

    /// Rewrites a reply's content. The original post is out of reach here.
    pub fn edit_post(&mut self, actor: &User, post_id: &PostId, content: &str) -> Result<Post> {
        let actor = self.resolve_actor(actor)?;
        let (thread_id, index) = self.locate_post(post_id)?;
        let thread = self.get_thread(&thread_id)?;
        let reason = if index == 0 {
            "the original post is changed through the thread, not the post editor"
        } else {
            "only the author or an administrator can edit this post"
        };
        require(guard::can_edit_post(&actor, &thread.posts[index], index == 0), reason)?;
        validation::POST_CONTENT.check(content)?;

        let now = self.now();
        let updated = self.rewrite_post(&thread_id, post_id, content, now)?;
        tracing::info!(post_id = %post_id, thread_id = %thread_id, "post edited");
        Ok(updated)
    }

    /// Admin-only rewrite of a thread's original post.
    pub fn edit_opening_post(
        &mut self,
        actor: &User,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<Post> {
        let actor = self.resolve_actor(actor)?;
        let op_id = self
            .get_thread(thread_id)?
            .original_post()
            .map(|p| p.id.clone())
            .ok_or_else(|| ForumError::not_found(EntityKind::Thread, thread_id))?;
        require(
            actor.is_admin,
            "only administrators can rewrite an original post",
        )?;
        validation::THREAD_CONTENT.check(content)?;

        let now = self.now();
        let updated = self.rewrite_post(thread_id, &op_id, content, now)?;
        tracing::info!(post_id = %updated.id, thread_id = %thread_id, "original post rewritten");
        Ok(updated)
    }

    fn rewrite_post(
        &mut self,
        thread_id: &ThreadId,
        post_id: &PostId,
        content: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Post> {
        let thread = self.thread_mut(thread_id)?;
        let post = thread
            .posts
            .iter_mut()
            .find(|p| &p.id == post_id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Post, post_id))?;
        post.content = content.trim().to_string();
        post.updated_at = Some(now);
        let updated = post.clone();
        let category_id = thread.category_id.clone();

        self.save_thread(thread_id);
        self.after_content_change(&category_id);
        Ok(updated)
    }

    /// Deletes a post.
    ///
    /// Targeting the original post deletes the whole thread for admins and is
    /// refused for everyone else.
    pub fn delete_post(&mut self, actor: &User, post_id: &PostId) -> Result<PostRemoval> {
        let actor = self.resolve_actor(actor)?;
        let (thread_id, index) = self.locate_post(post_id)?;
        if index == 0 {
            require(
                actor.is_admin,
                "the original post cannot be deleted on its own; delete the thread instead",
            )?;
            return self
                .remove_thread(&thread_id, &actor)
                .map(PostRemoval::Thread);
        }

        let thread = self.get_thread(&thread_id)?;
        require(
            guard::can_delete_post(&actor, &thread.posts[index], false),
            "only the author or an administrator can delete this post",
        )?;

        let thread = self.thread_mut(&thread_id)?;
        let post = thread.posts.remove(index);
        moderation::refresh_reply_state(thread);
        let category_id = thread.category_id.clone();
        self.post_threads.remove(post_id);

        self.save_thread(&thread_id);
        self.after_content_change(&category_id);
        tracing::info!(post_id = %post_id, thread_id = %thread_id, actor = %actor.id, "post deleted");
        Ok(PostRemoval::Reply(post))
    }

    /// Likes the post for `actor`, or takes an existing like back.
    pub fn toggle_like(&mut self, actor: &User, post_id: &PostId) -> Result<LikeOutcome> {
        let actor = self.resolve_actor(actor)?;
        let (thread_id, index) = self.locate_post(post_id)?;
        let thread = self.thread_mut(&thread_id)?;
        let outcome = moderation::toggle_like(&mut thread.posts[index], &actor.id);
        self.save_thread(&thread_id);
        tracing::debug!(post_id = %post_id, user = %actor.id, liked = outcome.liked, "like toggled");
        Ok(outcome)
    }
}
