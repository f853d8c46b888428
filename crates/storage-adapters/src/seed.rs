//! The demo forum: two servers, eight categories, five threads, four users.
//!
//! Category counters are left at zero; `ForumStore::from_snapshot`
//! recomputes them on load.

use chrono::{DateTime, Utc};
use domains::{
    AuthorRef, Category, CategoryId, CategoryStats, ForumSnapshot, Post, PostId, Server, ServerId,
    Thread, ThreadId, User, UserId,
};
use std::collections::BTreeSet;

fn at(timestamp: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(timestamp)?.with_timezone(&Utc))
}

fn user(id: &str, username: &str) -> User {
    User {
        id: UserId::from(id),
        username: username.into(),
        email: Some(format!("{}@example.com", username_stem(username))),
        is_admin: false,
        is_banned: false,
        ban_end_date: None,
    }
}

/// "MichaelDeSanta" -> "michael"
fn username_stem(username: &str) -> String {
    let mut stem = String::new();
    for (i, c) in username.char_indices() {
        if i > 0 && c.is_uppercase() {
            break;
        }
        stem.extend(c.to_lowercase());
    }
    stem
}

fn category(id: &str, server: &str, name: &str, description: &str, icon: &str) -> Category {
    Category {
        id: CategoryId::from(id),
        name: name.into(),
        description: description.into(),
        icon: Some(icon.into()),
        server_id: ServerId::from(server),
        stats: CategoryStats::default(),
    }
}

fn post(id: &str, author: &User, content: &str, created_at: &str) -> anyhow::Result<Post> {
    Ok(Post {
        id: PostId::from(id),
        author: author.author_ref(),
        content: content.into(),
        created_at: at(created_at)?,
        updated_at: None,
        like_count: 0,
        liked_by: BTreeSet::new(),
    })
}

struct ThreadSeed<'a> {
    id: &'a str,
    title: &'a str,
    author: &'a User,
    category: &'a str,
    created_at: &'a str,
    views: u64,
}

fn thread(seed: ThreadSeed<'_>, posts: Vec<Post>) -> anyhow::Result<Thread> {
    let last = posts.last();
    let last_reply_at = last.map(|p| p.created_at);
    let last_reply_by: Option<AuthorRef> = last.map(|p| p.author.clone());
    Ok(Thread {
        id: ThreadId::from(seed.id),
        title: seed.title.into(),
        author: seed.author.author_ref(),
        category_id: CategoryId::from(seed.category),
        created_at: at(seed.created_at)?,
        updated_at: None,
        reply_count: posts.len().saturating_sub(1),
        posts,
        is_locked: false,
        is_important: false,
        is_resolved: false,
        view_count: seed.views,
        last_reply_at,
        last_reply_by,
    })
}

pub fn demo_snapshot() -> anyhow::Result<ForumSnapshot> {
    let michael = User {
        is_admin: true,
        ..user("user1", "MichaelDeSanta")
    };
    let franklin = user("user2", "FranklinClinton");
    let trevor = User {
        is_banned: true,
        ban_end_date: Some(at("2024-12-31T23:59:59Z")?),
        ..user("user3", "TrevorPhilips")
    };
    let lester = user("user4", "LesterCrest");

    let servers = vec![
        Server {
            id: ServerId::from("server1"),
            name: "Main GTA5 Server".into(),
            description: "The primary server for all GTA V discussions.".into(),
        },
        Server {
            id: ServerId::from("server2"),
            name: "Roleplay Hub".into(),
            description: "Dedicated to GTA V roleplaying communities.".into(),
        },
    ];

    let categories = vec![
        category("announcements-s1", "server1", "Announcements", "Official news and announcements.", "ShieldCheck"),
        category("general-s1", "server1", "General Discussion", "Talk about anything GTA 5 related.", "MessageSquare"),
        category("gameplay-s1", "server1", "Gameplay & Strategy", "Discuss missions, heists, vehicles, and tactics.", "Code"),
        category("crews-s1", "server1", "Crews & Recruitment", "Find a crew or recruit members for your own.", "Users"),
        category("support-s1", "server1", "Technical Support", "Get help with game issues or site problems.", "HelpCircle"),
        category("offtopic-s1", "server1", "Off-Topic", "Discuss anything not related to GTA 5.", "Briefcase"),
        category("rp-general-s2", "server2", "RP General Chat", "General discussions for the Roleplay Hub server.", "MessageSquare"),
        category("rp-rules-s2", "server2", "RP Server Rules", "Rules specific to the Roleplay Hub.", "ShieldCheck"),
    ];

    let guide = thread(
        ThreadSeed {
            id: "thread1",
            title: "New Player Guide & FAQ",
            author: &michael,
            category: "general-s1",
            created_at: "2023-05-01T09:00:00Z",
            views: 1250,
        },
        vec![
            post("post1-1", &franklin, "Hey everyone, just started playing GTA Online. Any tips for beginners?", "2023-05-01T10:00:00Z")?,
            post("post1-2", &michael, "Welcome! Best tip: grind contact missions or heists to make money fast. Don't trust anyone with a jetpack.", "2023-05-01T10:05:00Z")?,
            post("post1-3", &lester, "I can help with heists. Add me: LesterCrest. We'll make some serious paper.", "2023-05-01T10:15:00Z")?,
        ],
    )?;
    let vehicles = thread(
        ThreadSeed {
            id: "thread2",
            title: "Best Armored Vehicles for Missions?",
            author: &michael,
            category: "gameplay-s1",
            created_at: "2023-05-02T11:30:00Z",
            views: 875,
        },
        vec![
            post("post2-1", &michael, "What's the best armored vehicle for missions these days? Kuruma still good?", "2023-05-02T12:00:00Z")?,
            post("post2-2", &franklin, "Kuruma is solid for PVE. For PVP, maybe Insurgent Pick-Up Custom or Nightshark.", "2023-05-02T12:10:00Z")?,
        ],
    )?;
    let crew = thread(
        ThreadSeed {
            id: "thread3",
            title: "Looking for Heist Crew (PS5)",
            author: &franklin,
            category: "crews-s1",
            created_at: "2023-05-03T14:00:00Z",
            views: 300,
        },
        vec![post("post3-1", &franklin, "Need 2 more for Pacific Standard. Mics required. Add FranklinClinton.", "2023-05-03T14:00:00Z")?],
    )?;
    let rules = thread(
        ThreadSeed {
            id: "thread4",
            title: "Site Rules and Guidelines Update",
            author: &michael,
            category: "announcements-s1",
            created_at: "2023-04-28T10:00:00Z",
            views: 5000,
        },
        vec![post("post4-1", &michael, "Please review the updated community guidelines. TL;DR: Be excellent to each other.", "2023-04-28T10:00:00Z")?],
    )?;
    let intro = thread(
        ThreadSeed {
            id: "thread5",
            title: "RP Server Introduction",
            author: &michael,
            category: "rp-general-s2",
            created_at: "2023-06-01T10:00:00Z",
            views: 100,
        },
        vec![post("post5-1", &michael, "Welcome to the RP Hub!", "2023-06-01T10:00:00Z")?],
    )?;

    let threads = vec![
        Thread { is_important: true, ..guide },
        Thread { is_resolved: true, ..vehicles },
        crew,
        Thread { is_important: true, is_locked: true, ..rules },
        Thread { is_important: true, ..intro },
    ];

    Ok(ForumSnapshot {
        servers,
        categories,
        threads,
        users: vec![michael, franklin, trevor, lester],
    })
}
