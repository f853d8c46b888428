//! # rp-forum
//!
//! Operator console: loads the forum from the configured backend, runs one
//! command against the store and waits for the resulting changes to be
//! persisted.

mod commands;
mod telemetry;

use anyhow::Context;
use chrono::Duration;
use clap::Parser;
use configs::{Settings, StorageBackend};
use domains::{Change, ForumRepository, ForumSnapshot};
use services::{spawn_persistence, ForumStore, Outbox, StoreOptions, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;
use storage_adapters::{seed, JsonFileRepository, MemoryRepository};

#[derive(Parser)]
#[command(name = "rp-forum", version, about = "Operator console for the roleplay forum")]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Directory holding default.toml / local.toml
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load_dir(&cli.config_dir).context("loading settings")?;
    telemetry::init(&settings.log)?;

    let repo = open_repository(&settings)?;
    let snapshot = load_or_seed(repo.as_ref(), settings.storage.seed_if_empty).await?;

    let (outbox, rx) = Outbox::channel();
    let worker = spawn_persistence(repo.clone(), rx);
    let options = StoreOptions {
        ban_duration: Duration::days(i64::from(settings.moderation.ban_duration_days)),
    };
    let mut store = ForumStore::from_snapshot(snapshot, Arc::new(SystemClock::new()))
        .with_options(options)
        .with_outbox(outbox);

    let outcome = commands::run(&mut store, cli.command);

    // Dropping the store closes the outbox so the worker can drain and exit.
    drop(store);
    worker.await.context("persistence worker panicked")?;
    outcome
}

fn open_repository(settings: &Settings) -> anyhow::Result<Arc<dyn ForumRepository>> {
    Ok(match settings.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryRepository::new()),
        StorageBackend::JsonFile => {
            let path = settings
                .storage
                .path
                .clone()
                .context("storage.path is required for the json-file backend")?;
            Arc::new(JsonFileRepository::new(path))
        }
    })
}

async fn load_or_seed(
    repo: &dyn ForumRepository,
    seed_if_empty: bool,
) -> anyhow::Result<ForumSnapshot> {
    let snapshot = repo.load_all().await.context("loading forum data")?;
    if !snapshot.is_empty() || !seed_if_empty {
        return Ok(snapshot);
    }

    tracing::info!("storage is empty, loading demo forum");
    // Round-trip through the store so category counters are stored filled in.
    let demo = ForumStore::from_snapshot(seed::demo_snapshot()?, Arc::new(SystemClock::new()))
        .snapshot();
    let changes = demo
        .servers
        .iter()
        .cloned()
        .map(Change::ServerSaved)
        .chain(demo.categories.iter().cloned().map(Change::CategorySaved))
        .chain(demo.threads.iter().cloned().map(Change::ThreadSaved))
        .chain(demo.users.iter().cloned().map(Change::UserSaved));
    for change in changes {
        repo.persist(change).await.context("seeding storage")?;
    }
    Ok(demo)
}
