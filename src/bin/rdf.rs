use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use wikigraph::export::export_snapshot;
use wikigraph::{Config, Snapshot};

#[derive(Parser, Debug)]
#[command(name = "rdf")]
#[command(about = "Export a fetched snapshot as N-Triples statements")]
struct Args {
    /// Override the configured snapshot input path
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Override the configured RDF output path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();
    let config = Config::load()?;
    let snapshot_path = args
        .snapshot
        .unwrap_or_else(|| config.snapshot_path().to_path_buf());
    let output_path = args
        .output
        .unwrap_or_else(|| config.rdf_output_path().to_path_buf());

    log::info!("Loading snapshot from {}", snapshot_path.display());
    let snapshot = Snapshot::load(&snapshot_path)?;

    log::info!("Writing N-Triples to {}", output_path.display());
    let file = File::create(&output_path)?;
    let mut writer = BufWriter::new(file);
    let statements = export_snapshot(&snapshot, &config.languages.preference, &mut writer)?;
    writer.flush()?;

    log::info!("RDF export complete: {} statements", statements);

    Ok(())
}
