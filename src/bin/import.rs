use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use wikigraph::db::Db;
use wikigraph::export::import_snapshot;
use wikigraph::{Config, Snapshot};

#[derive(Parser, Debug)]
#[command(name = "import")]
#[command(about = "Import a fetched snapshot into the relational store")]
struct Args {
    /// Override the configured snapshot input path
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Override the configured database path
    #[arg(short, long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();
    let config = Config::load()?;
    let snapshot_path = args
        .snapshot
        .unwrap_or_else(|| config.snapshot_path().to_path_buf());
    let db_path = args.db.unwrap_or_else(|| config.db_path().to_path_buf());

    log::info!("Loading snapshot from {}", snapshot_path.display());
    let snapshot = Snapshot::load(&snapshot_path)?;
    log::info!("Loaded {} top-level entries", snapshot.len());

    let db = Db::new(&db_path);
    let report = import_snapshot(&db, &snapshot, &config.languages.preference).await?;

    log::info!(
        "Import complete: {} entities, {} triples ({} dropped as referential gaps)",
        report.entities,
        report.triples_inserted,
        report.triples_dropped
    );

    Ok(())
}
