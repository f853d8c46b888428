//! Thread lifecycle and moderation flags.

use super::ForumStore;
use crate::guard::{self, require};
use crate::ids::generate_id;
use crate::moderation::{self, ThreadFlag};
use crate::validation;
use domains::{
    CategoryId, Change, EntityKind, ForumError, NewThread, Post, PostId, Result, Thread, ThreadId, User,
};
use std::collections::BTreeSet;

impl ForumStore {
    /// Opens a thread with its original post.
    pub fn create_thread(
        &mut self,
        actor: &User,
        category_id: &CategoryId,
        input: NewThread,
    ) -> Result<Thread> {
        let actor = self.resolve_actor(actor)?;
        let now = self.now();
        require(guard::can_contribute(&actor, now), "banned users cannot open threads")?;
        validation::THREAD_TITLE.check(&input.title)?;
        validation::THREAD_CONTENT.check(&input.content)?;
        self.get_category(category_id)?;

        let author = actor.author_ref();
        let original_post = Post {
            id: PostId::new(generate_id(EntityKind::Post, now)),
            author: author.clone(),
            content: input.content.trim().to_string(),
            created_at: now,
            updated_at: None,
            like_count: 0,
            liked_by: BTreeSet::new(),
        };
        let thread = Thread {
            id: ThreadId::new(generate_id(EntityKind::Thread, now)),
            title: input.title.trim().to_string(),
            author: author.clone(),
            category_id: category_id.clone(),
            created_at: now,
            updated_at: None,
            posts: vec![original_post],
            is_locked: false,
            is_important: false,
            is_resolved: false,
            view_count: 0,
            reply_count: 0,
            last_reply_at: Some(now),
            last_reply_by: Some(author),
        };

        self.post_threads
            .insert(thread.posts[0].id.clone(), thread.id.clone());
        self.threads.insert(thread.id.clone(), thread.clone());
        self.save_thread(&thread.id);
        self.after_content_change(category_id);
        tracing::info!(
            thread_id = %thread.id,
            category_id = %category_id,
            author = %actor.id,
            "thread created"
        );
        Ok(thread)
    }

    /// Retitles a thread. Author or admin; a lock does not prevent it.
    pub fn edit_thread(&mut self, actor: &User, id: &ThreadId, title: &str) -> Result<Thread> {
        let actor = self.resolve_actor(actor)?;
        let thread = self.get_thread(id)?;
        require(
            guard::can_edit_thread(&actor, thread),
            "only the author or an administrator can edit this thread",
        )?;
        validation::THREAD_TITLE.check(title)?;

        let now = self.now();
        let thread = self.thread_mut(id)?;
        thread.title = title.trim().to_string();
        thread.updated_at = Some(now);
        let updated = thread.clone();

        self.save_thread(id);
        self.after_content_change(&updated.category_id);
        tracing::info!(thread_id = %id, "thread retitled");
        Ok(updated)
    }

    /// Removes a thread and every post in it.
    pub fn delete_thread(&mut self, actor: &User, id: &ThreadId) -> Result<Thread> {
        let actor = self.resolve_actor(actor)?;
        let thread = self.get_thread(id)?;
        require(
            guard::can_edit_thread(&actor, thread),
            "only the author or an administrator can delete this thread",
        )?;
        self.remove_thread(id, &actor)
    }

    /// Unchecked removal shared by thread deletion and OP deletion.
    pub(super) fn remove_thread(&mut self, id: &ThreadId, actor: &User) -> Result<Thread> {
        let thread = self
            .threads
            .remove(id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Thread, id))?;
        for post in &thread.posts {
            self.post_threads.remove(&post.id);
        }
        self.emit(Change::ThreadRemoved(id.clone()));
        self.after_content_change(&thread.category_id);
        tracing::info!(
            thread_id = %id,
            posts = thread.posts.len(),
            actor = %actor.id,
            "thread deleted"
        );
        Ok(thread)
    }

    /// Admin only. Returns the new lock state.
    pub fn toggle_lock(&mut self, actor: &User, id: &ThreadId) -> Result<bool> {
        self.toggle_flag(actor, id, ThreadFlag::Locked)
    }

    /// Admin only. Returns the new state.
    pub fn toggle_important(&mut self, actor: &User, id: &ThreadId) -> Result<bool> {
        self.toggle_flag(actor, id, ThreadFlag::Important)
    }

    /// Admin only. Returns the new state.
    pub fn toggle_resolved(&mut self, actor: &User, id: &ThreadId) -> Result<bool> {
        self.toggle_flag(actor, id, ThreadFlag::Resolved)
    }

    pub fn toggle_flag(&mut self, actor: &User, id: &ThreadId, flag: ThreadFlag) -> Result<bool> {
        let actor = self.resolve_actor(actor)?;
        self.get_thread(id)?;
        match flag {
            ThreadFlag::Locked => require(
                guard::can_lock_thread(&actor),
                "only administrators can lock or unlock threads",
            )?,
            ThreadFlag::Important | ThreadFlag::Resolved => require(
                guard::can_moderate_thread(&actor),
                "only administrators can mark threads important or resolved",
            )?,
        }

        let value = moderation::toggle_flag(self.thread_mut(id)?, flag);
        self.save_thread(id);
        tracing::info!(thread_id = %id, %flag, value, actor = %actor.id, "thread flag toggled");
        Ok(value)
    }

    /// Counts one view. Returns the new total.
    pub fn record_view(&mut self, id: &ThreadId) -> Result<u64> {
        let thread = self.thread_mut(id)?;
        thread.view_count += 1;
        let views = thread.view_count;
        self.save_thread(id);
        Ok(views)
    }
}
