use auth_adapters::StaticSession;
use clap::{Subcommand, ValueEnum};
use domains::{SessionProvider, Thread, ThreadId, User, UserId};
use services::{ForumStore, SearchRequest, StatusFilter, ThreadFlag};

#[derive(Subcommand)]
pub enum Commands {
    /// Servers and categories with their counters
    Summary,

    /// Show a thread with all of its posts (counts as a view)
    Thread { id: String },

    /// Search threads by title and post content
    Search {
        query: String,

        /// locked, unlocked, important, not-important, resolved, unresolved
        #[arg(long, default_value = "all")]
        status: StatusFilter,

        #[arg(long, value_enum, default_value = "page")]
        scope: Scope,
    },

    /// List users, optionally filtered by username or email
    Users { query: Option<String> },

    /// Toggle the lock on a thread
    Lock {
        thread_id: String,
        #[arg(long = "as", value_name = "USER_ID")]
        actor: String,
    },

    /// Toggle the important flag on a thread
    Important {
        thread_id: String,
        #[arg(long = "as", value_name = "USER_ID")]
        actor: String,
    },

    /// Toggle the resolved flag on a thread
    Resolve {
        thread_id: String,
        #[arg(long = "as", value_name = "USER_ID")]
        actor: String,
    },

    /// Ban a user for the configured duration
    Ban {
        user_id: String,
        #[arg(long = "as", value_name = "ADMIN_ID")]
        actor: String,
    },

    /// Lift a user's ban
    Unban {
        user_id: String,
        #[arg(long = "as", value_name = "ADMIN_ID")]
        actor: String,
    },
}

/// Which search surface to emulate.
#[derive(Clone, Copy, ValueEnum)]
pub enum Scope {
    /// Title or any post; blank query finds nothing
    Page,
    /// Same matching as the search page
    Moderation,
    /// Title or first post; blank query lists everything
    Management,
}

impl Scope {
    fn request(self, query: String) -> SearchRequest {
        match self {
            Scope::Page => SearchRequest::search_page(query),
            Scope::Moderation => SearchRequest::moderation(query),
            Scope::Management => SearchRequest::thread_management(query),
        }
    }
}

pub fn run(store: &mut ForumStore, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Summary => summary(store),
        Commands::Thread { id } => show_thread(store, &ThreadId::from(id)),
        Commands::Search { query, status, scope } => {
            let request = scope.request(query).with_status(status);
            let found = store.search_threads(&request);
            if found.is_empty() {
                println!("no threads found");
            }
            for thread in found {
                print_thread_line(thread);
            }
            Ok(())
        }
        Commands::Users { query } => {
            for user in store.search_users(query.as_deref().unwrap_or_default()) {
                print_user_line(user);
            }
            Ok(())
        }
        Commands::Lock { thread_id, actor } => {
            let session = session_for(store, &actor);
            toggle(store, &session, &thread_id, ThreadFlag::Locked)
        }
        Commands::Important { thread_id, actor } => {
            let session = session_for(store, &actor);
            toggle(store, &session, &thread_id, ThreadFlag::Important)
        }
        Commands::Resolve { thread_id, actor } => {
            let session = session_for(store, &actor);
            toggle(store, &session, &thread_id, ThreadFlag::Resolved)
        }
        Commands::Ban { user_id, actor } => {
            let session = session_for(store, &actor);
            let actor = store.session_actor(&session)?;
            let user = store.ban_user(&actor, &UserId::from(user_id))?;
            print_user_line(&user);
            Ok(())
        }
        Commands::Unban { user_id, actor } => {
            let session = session_for(store, &actor);
            let actor = store.session_actor(&session)?;
            let user = store.unban_user(&actor, &UserId::from(user_id))?;
            print_user_line(&user);
            Ok(())
        }
    }
}

/// Signs `--as` in for this invocation. An unknown id leaves the session
/// anonymous, which the store then refuses.
fn session_for(store: &ForumStore, user_id: &str) -> StaticSession {
    match store.get_user(&UserId::from(user_id)) {
        Ok(user) => StaticSession::signed_in(user.clone()),
        Err(_) => {
            tracing::warn!(user_id, "unknown --as user");
            StaticSession::anonymous()
        }
    }
}

fn toggle(
    store: &mut ForumStore,
    session: &dyn SessionProvider,
    thread_id: &str,
    flag: ThreadFlag,
) -> anyhow::Result<()> {
    let actor = store.session_actor(session)?;
    let id = ThreadId::from(thread_id);
    let now_set = store.toggle_flag(&actor, &id, flag)?;
    println!("{id}: {flag} = {now_set}");
    Ok(())
}

fn summary(store: &ForumStore) -> anyhow::Result<()> {
    for server in store.list_servers() {
        println!("{} ({})", server.name, server.id);
        for category in store.list_categories_for_server(&server.id)? {
            let stats = &category.stats;
            let last = stats
                .last_thread
                .as_ref()
                .map(|t| format!("last: \"{}\" by {} at {}", t.title, t.author_name, t.timestamp))
                .unwrap_or_else(|| "no threads yet".into());
            println!(
                "  {:<24} {:>3} threads {:>4} posts  {}",
                category.name, stats.threads_count, stats.posts_count, last
            );
        }
    }
    Ok(())
}

fn show_thread(store: &mut ForumStore, id: &ThreadId) -> anyhow::Result<()> {
    store.record_view(id)?;
    let thread = store.get_thread(id)?;
    print_thread_line(thread);
    for (index, post) in thread.posts.iter().enumerate() {
        let edited = if post.updated_at.is_some() { " (edited)" } else { "" };
        println!(
            "\n#{} {} at {}{} [{} likes]",
            index + 1,
            post.author.username,
            post.created_at,
            edited,
            post.like_count
        );
        println!("{}", post.content);
    }
    Ok(())
}

fn print_thread_line(thread: &Thread) {
    println!(
        "{:<12} [{:?}] {} by {} ({} replies, {} views)",
        thread.id.as_str(),
        thread.badge(),
        thread.title,
        thread.author.username,
        thread.reply_count,
        thread.view_count
    );
}

fn print_user_line(user: &User) {
    let role = if user.is_admin { "admin" } else { "member" };
    let ban = match (user.is_banned, user.ban_end_date) {
        (false, _) => String::new(),
        (true, Some(end)) => format!(" banned until {end}"),
        (true, None) => " banned".into(),
    };
    println!(
        "{:<8} {:<18} {:<24} {}{}",
        user.id.as_str(),
        user.username,
        user.email.as_deref().unwrap_or("-"),
        role,
        ban
    );
}
