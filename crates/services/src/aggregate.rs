//! # Aggregation Engine
//!
//! Derives a category's counters and "last activity" pointer from its
//! threads. The store calls [`summarize`] after every thread or post change;
//! nothing else writes [`CategoryStats`].

use domains::{CategoryId, CategoryStats, LastThread, Thread};
use std::cmp::Ordering;

/// Orders threads by activity; on equal timestamps the lower id ranks higher.
pub fn by_activity(a: &Thread, b: &Thread) -> Ordering {
    a.last_activity()
        .cmp(&b.last_activity())
        .then_with(|| b.id.cmp(&a.id))
}

pub fn summarize<'a>(
    category_id: &CategoryId,
    threads: impl IntoIterator<Item = &'a Thread>,
) -> CategoryStats {
    let mut stats = CategoryStats::default();
    let mut latest: Option<&Thread> = None;

    for thread in threads.into_iter().filter(|t| &t.category_id == category_id) {
        stats.threads_count += 1;
        stats.posts_count += thread.posts.len();
        latest = match latest {
            Some(current) if by_activity(thread, current) != Ordering::Greater => Some(current),
            _ => Some(thread),
        };
    }

    stats.last_thread = latest.map(|t| LastThread {
        id: t.id.clone(),
        title: t.title.clone(),
        author_name: t.author.username.clone(),
        timestamp: t.last_activity(),
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use domains::{AuthorRef, Post, PostId, ThreadId, UserId};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 5, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn thread(id: &str, category: &str, posts: usize, created: i64, last_reply: Option<i64>) -> Thread {
        let author = AuthorRef { id: UserId::from("user1"), username: "MichaelDeSanta".into() };
        let posts = (0..posts)
            .map(|i| Post {
                id: PostId::new(format!("{id}-p{i}")),
                author: author.clone(),
                content: "content long enough".into(),
                created_at: at(created + i as i64),
                updated_at: None,
                like_count: 0,
                liked_by: Default::default(),
            })
            .collect::<Vec<_>>();
        Thread {
            id: ThreadId::from(id),
            title: format!("Thread {id}"),
            author,
            category_id: CategoryId::from(category),
            created_at: at(created),
            updated_at: None,
            reply_count: posts.len().saturating_sub(1),
            posts,
            is_locked: false,
            is_important: false,
            is_resolved: false,
            view_count: 0,
            last_reply_at: last_reply.map(at),
            last_reply_by: None,
        }
    }

    #[test]
    fn counts_threads_and_posts_of_one_category() {
        let threads = vec![
            thread("thread1", "general-s1", 3, 0, Some(15)),
            thread("thread2", "general-s1", 2, 60, Some(70)),
            thread("thread3", "crews-s1", 1, 120, None),
        ];
        let stats = summarize(&CategoryId::from("general-s1"), &threads);
        assert_eq!(stats.threads_count, 2);
        assert_eq!(stats.posts_count, 5);
        let last = stats.last_thread.unwrap();
        assert_eq!(last.id, ThreadId::from("thread2"));
        assert_eq!(last.timestamp, at(70));
        assert_eq!(last.author_name, "MichaelDeSanta");
    }

    #[test]
    fn late_reply_beats_newer_thread() {
        let threads = vec![
            thread("old", "general-s1", 2, 0, Some(500)),
            thread("new", "general-s1", 1, 100, None),
        ];
        let stats = summarize(&CategoryId::from("general-s1"), &threads);
        assert_eq!(stats.last_thread.unwrap().id, ThreadId::from("old"));
    }

    #[test]
    fn timestamp_ties_break_by_lowest_id() {
        let threads = vec![
            thread("thread-b", "general-s1", 1, 10, None),
            thread("thread-a", "general-s1", 1, 10, None),
            thread("thread-c", "general-s1", 1, 10, None),
        ];
        let stats = summarize(&CategoryId::from("general-s1"), &threads);
        assert_eq!(stats.last_thread.unwrap().id, ThreadId::from("thread-a"));
    }

    #[test]
    fn empty_category_has_no_last_thread() {
        let stats = summarize(&CategoryId::from("support-s1"), std::iter::empty());
        assert_eq!(stats, CategoryStats::default());
    }
}
