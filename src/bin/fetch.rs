use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use wikigraph::crawl::Crawler;
use wikigraph::transport::EntityClient;
use wikigraph::Config;

#[derive(Parser, Debug)]
#[command(name = "fetch")]
#[command(about = "Discover a connected entity set by BFS and download its snapshot")]
struct Args {
    /// Override the configured target entity count
    #[arg(short, long)]
    target: Option<usize>,

    /// Override the configured snapshot output path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();
    let config = Config::load()?;
    let target = args.target.unwrap_or(config.crawl.target_count);
    let output = args
        .output
        .unwrap_or_else(|| config.snapshot_path().to_path_buf());

    log::info!(
        "Step 1: discovering entity ids from {} seeds (target {})",
        config.crawl.seeds.len(),
        target
    );
    let client = EntityClient::from_config(&config.crawl)?;
    let crawler = Crawler::new(client, config.request_delay());
    let ids = crawler.discover(&config.crawl.seeds, target).await;
    log::info!("collected {} entity ids", ids.len());

    log::info!("Step 2: downloading {} entity records", ids.len());
    let snapshot = crawler.fetch_all(&ids).await;
    log::info!("downloaded {} of {} records", snapshot.len(), ids.len());

    log::info!("Step 3: writing snapshot to {}", output.display());
    snapshot.save(&output)?;
    log::info!("Fetch complete");

    Ok(())
}
