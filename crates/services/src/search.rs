//! # Search/Filter Engine
//!
//! Linear, case-insensitive substring search over threads and users.
//!
//! The call sites deliberately differ: the search page and the moderation
//! view match the title or any post and show nothing for a blank query,
//! while the thread-management table matches the title or the first post and
//! shows everything for a blank query.

use domains::{Thread, User};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which post contents participate in a text match (the title always does).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchScope {
    AllPosts,
    FirstPost,
}

/// What a blank (empty or whitespace-only) query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyQuery {
    NoResults,
    ShowAll,
}

/// Thread status predicate, ANDed after the text filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Locked,
    Unlocked,
    Important,
    NotImportant,
    Resolved,
    Unresolved,
}

impl StatusFilter {
    pub fn matches(self, thread: &Thread) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Locked => thread.is_locked,
            StatusFilter::Unlocked => !thread.is_locked,
            StatusFilter::Important => thread.is_important,
            StatusFilter::NotImportant => !thread.is_important,
            StatusFilter::Resolved => thread.is_resolved,
            StatusFilter::Unresolved => !thread.is_resolved,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Locked => "locked",
            StatusFilter::Unlocked => "unlocked",
            StatusFilter::Important => "important",
            StatusFilter::NotImportant => "not-important",
            StatusFilter::Resolved => "resolved",
            StatusFilter::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "locked" => Ok(StatusFilter::Locked),
            "unlocked" => Ok(StatusFilter::Unlocked),
            "important" => Ok(StatusFilter::Important),
            "not-important" => Ok(StatusFilter::NotImportant),
            "resolved" => Ok(StatusFilter::Resolved),
            "unresolved" => Ok(StatusFilter::Unresolved),
            other => Err(format!("unknown status filter '{other}'")),
        }
    }
}

/// A fully specified thread search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub scope: SearchScope,
    pub on_empty: EmptyQuery,
    pub status: StatusFilter,
}

impl SearchRequest {
    /// Standalone search page: title or any post; blank shows nothing.
    pub fn search_page(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            scope: SearchScope::AllPosts,
            on_empty: EmptyQuery::NoResults,
            status: StatusFilter::All,
        }
    }

    /// Content moderation view: title or any post; blank shows nothing.
    pub fn moderation(query: impl Into<String>) -> Self {
        Self::search_page(query)
    }

    /// Admin thread table: title or first post; blank shows everything.
    pub fn thread_management(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            scope: SearchScope::FirstPost,
            on_empty: EmptyQuery::ShowAll,
            status: StatusFilter::All,
        }
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    fn matches_text(&self, needle: &str, thread: &Thread) -> bool {
        if thread.title.to_lowercase().contains(needle) {
            return true;
        }
        match self.scope {
            SearchScope::AllPosts => thread
                .posts
                .iter()
                .any(|p| p.content.to_lowercase().contains(needle)),
            SearchScope::FirstPost => thread
                .original_post()
                .is_some_and(|p| p.content.to_lowercase().contains(needle)),
        }
    }
}

/// Runs `request` over `threads`, preserving their order.
pub fn search_threads<'a>(
    threads: impl IntoIterator<Item = &'a Thread>,
    request: &SearchRequest,
) -> Vec<&'a Thread> {
    let trimmed = request.query.trim();
    if trimmed.is_empty() && request.on_empty == EmptyQuery::NoResults {
        return Vec::new();
    }
    // Only the management table trims; the other call sites match the raw query.
    let needle = match request.on_empty {
        EmptyQuery::NoResults => request.query.to_lowercase(),
        EmptyQuery::ShowAll => trimmed.to_lowercase(),
    };
    threads
        .into_iter()
        .filter(|t| needle.is_empty() || request.matches_text(&needle, t))
        .filter(|t| request.status.matches(t))
        .collect()
}

/// Admin user table: username or email; blank shows everyone.
pub fn search_users<'a>(users: impl IntoIterator<Item = &'a User>, query: &str) -> Vec<&'a User> {
    let needle = query.trim().to_lowercase();
    users
        .into_iter()
        .filter(|u| {
            needle.is_empty()
                || u.username.to_lowercase().contains(&needle)
                || u
                    .email
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use domains::{AuthorRef, CategoryId, Post, PostId, ThreadId, UserId};

    fn thread(id: &str, title: &str, contents: &[&str]) -> Thread {
        let author = AuthorRef { id: UserId::from("user2"), username: "FranklinClinton".into() };
        let created = Utc.with_ymd_and_hms(2023, 5, 3, 14, 0, 0).unwrap();
        Thread {
            id: ThreadId::from(id),
            title: title.into(),
            author: author.clone(),
            category_id: CategoryId::from("crews-s1"),
            created_at: created,
            updated_at: None,
            posts: contents
                .iter()
                .enumerate()
                .map(|(i, c)| Post {
                    id: PostId::new(format!("{id}-{i}")),
                    author: author.clone(),
                    content: (*c).into(),
                    created_at: created,
                    updated_at: None,
                    like_count: 0,
                    liked_by: Default::default(),
                })
                .collect(),
            is_locked: false,
            is_important: false,
            is_resolved: false,
            view_count: 0,
            reply_count: contents.len().saturating_sub(1),
            last_reply_at: None,
            last_reply_by: None,
        }
    }

    fn corpus() -> Vec<Thread> {
        vec![
            thread("thread1", "New Player Guide & FAQ", &["Any tips?", "Grind contact missions or HEISTS."]),
            thread("thread2", "Best Armored Vehicles", &["Kuruma still good?"]),
            thread("thread3", "Looking for Heist Crew (PS5)", &["Need 2 more."]),
        ]
    }

    fn ids(found: Vec<&Thread>) -> Vec<&str> {
        found.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn moderation_scope_checks_every_post() {
        let threads = corpus();
        let found = search_threads(&threads, &SearchRequest::moderation("heist"));
        assert_eq!(ids(found), vec!["thread1", "thread3"]);
    }

    #[test]
    fn management_scope_checks_only_first_post() {
        let threads = corpus();
        let found = search_threads(&threads, &SearchRequest::thread_management("heist"));
        assert_eq!(ids(found), vec!["thread3"]);
        let found = search_threads(&threads, &SearchRequest::thread_management("KURUMA"));
        assert_eq!(ids(found), vec!["thread2"]);
    }

    #[test]
    fn blank_query_differs_by_call_site() {
        let threads = corpus();
        assert!(search_threads(&threads, &SearchRequest::search_page("   ")).is_empty());
        assert_eq!(search_threads(&threads, &SearchRequest::thread_management("")).len(), 3);
    }

    #[test]
    fn surrounding_whitespace_only_trimmed_for_management() {
        let threads = corpus();
        assert!(search_threads(&threads, &SearchRequest::search_page("(ps5) ")).is_empty());
        assert_eq!(
            ids(search_threads(&threads, &SearchRequest::thread_management("(ps5) "))),
            vec!["thread3"]
        );
        assert_eq!(
            ids(search_threads(&threads, &SearchRequest::moderation(" heist"))),
            vec!["thread1", "thread3"]
        );
    }

    #[test]
    fn status_filter_is_anded_after_text() {
        let mut threads = corpus();
        threads[2].is_locked = true;
        let request = SearchRequest::moderation("heist").with_status(StatusFilter::Locked);
        assert_eq!(ids(search_threads(&threads, &request)), vec!["thread3"]);
        let request = SearchRequest::thread_management("").with_status(StatusFilter::Unlocked);
        assert_eq!(ids(search_threads(&threads, &request)), vec!["thread1", "thread2"]);
    }

    #[test]
    fn status_filter_parses_kebab_case() {
        assert_eq!("not-important".parse::<StatusFilter>(), Ok(StatusFilter::NotImportant));
        assert_eq!(StatusFilter::Unresolved.to_string(), "unresolved");
        assert!("pinned".parse::<StatusFilter>().is_err());
        assert_eq!(
            serde_json::to_string(&StatusFilter::NotImportant).unwrap(),
            "\"not-important\""
        );
    }

    #[test]
    fn users_match_name_or_email() {
        let users = vec![
            User {
                id: UserId::from("user1"),
                username: "MichaelDeSanta".into(),
                email: Some("michael@example.com".into()),
                is_admin: true,
                is_banned: false,
                ban_end_date: None,
            },
            User {
                id: UserId::from("user4"),
                username: "LesterCrest".into(),
                email: None,
                is_admin: false,
                is_banned: false,
                ban_end_date: None,
            },
        ];
        assert_eq!(search_users(&users, "MICHAEL@").len(), 1);
        assert_eq!(search_users(&users, "crest").len(), 1);
        assert_eq!(search_users(&users, " ").len(), 2);
    }
}
