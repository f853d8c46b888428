//! Writes the demo forum to a JSON snapshot file.

use anyhow::{bail, Context};
use clap::Parser;
use configs::Settings;
use domains::ForumRepository;
use services::{ForumStore, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;
use storage_adapters::{seed, JsonFileRepository};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seed", about = "Write the demo forum to a snapshot file")]
struct Args {
    /// Target file; defaults to storage.path from the settings
    #[arg(long)]
    out: Option<PathBuf>,

    /// Replace a snapshot that already holds data
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::load().context("loading settings")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = args
        .out
        .or(settings.storage.path)
        .context("no output path given and storage.path is unset")?;
    let repo = JsonFileRepository::new(&path);

    let existing = repo.load_all().await.context("reading existing snapshot")?;
    if !existing.is_empty() {
        if !args.force {
            bail!("{} already holds forum data; pass --force to replace it", path.display());
        }
        tracing::warn!(
            path = %path.display(),
            threads = existing.threads.len(),
            users = existing.users.len(),
            "replacing existing forum data"
        );
    }

    // Round-trip through the store so category counters are filled in.
    let store = ForumStore::from_snapshot(seed::demo_snapshot()?, Arc::new(SystemClock::new()));
    let snapshot = store.snapshot();
    repo.write_snapshot(&snapshot).await?;

    println!(
        "wrote {} servers, {} categories, {} threads, {} users to {}",
        snapshot.servers.len(),
        snapshot.categories.len(),
        snapshot.threads.len(),
        snapshot.users.len(),
        path.display()
    );
    Ok(())
}
