use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub languages: LanguagesConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub rdf: RdfConfig,
}

/// Crawl and transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Seed entity ids the BFS frontier starts from.
    #[serde(default = "default_seeds")]
    pub seeds: Vec<String>,
    /// Number of entity ids to collect before the frontier stops.
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    #[serde(default = "default_entity_data_base_url")]
    pub entity_data_base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause between consecutive requests, to be polite to the remote service.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

/// Language preference order for labels and descriptions
#[derive(Debug, Clone, Deserialize)]
pub struct LanguagesConfig {
    #[serde(default = "default_preference")]
    pub preference: Vec<String>,
}

/// Relational store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

/// RDF sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RdfConfig {
    #[serde(default = "default_rdf_output_path")]
    pub output_path: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seeds: default_seeds(),
            target_count: default_target_count(),
            entity_data_base_url: default_entity_data_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            preference: default_preference(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for RdfConfig {
    fn default() -> Self {
        Self {
            output_path: default_rdf_output_path(),
        }
    }
}

fn default_seeds() -> Vec<String> {
    ["Q5", "Q114", "Q2", "Q30", "Q148", "Q76", "Q142", "Q183", "Q6256", "Q43229"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_target_count() -> usize {
    500
}

fn default_entity_data_base_url() -> String {
    "https://www.wikidata.org/wiki/Special:EntityData".to_string()
}

fn default_user_agent() -> String {
    "wikigraph-experiment/0.1".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_request_delay_ms() -> u64 {
    100
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("wikidata_entities.json")
}

fn default_preference() -> Vec<String> {
    ["zh", "zh-cn", "zh-hans", "en"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("wikigraph.db")
}

fn default_rdf_output_path() -> PathBuf {
    PathBuf::from("wikigraph.nt")
}

impl Config {
    /// Load configuration from file
    ///
    /// Looks for the config file in this order:
    /// 1. Path specified in WIKIGRAPH_CONFIG environment variable
    /// 2. ./config.toml in current directory (optional; defaults apply when absent)
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("WIKIGRAPH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config = if config_path.exists() {
            let config_str = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
            toml::from_str(&config_str)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            Config::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.crawl.seeds.is_empty() {
            anyhow::bail!("crawl.seeds must contain at least one entity id");
        }
        if self.crawl.target_count == 0 {
            anyhow::bail!("crawl.target_count must be greater than 0");
        }
        if self.crawl.timeout_secs == 0 {
            anyhow::bail!("crawl.timeout_secs must be greater than 0");
        }
        if self.languages.preference.is_empty() {
            anyhow::bail!("languages.preference must contain at least one language code");
        }
        Ok(())
    }

    /// Pause applied between consecutive fetches
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.crawl.request_delay_ms)
    }

    /// Get snapshot file path
    pub fn snapshot_path(&self) -> &Path {
        &self.crawl.snapshot_path
    }

    /// Get database path
    pub fn db_path(&self) -> &Path {
        &self.database.db_path
    }

    /// Get RDF output path
    pub fn rdf_output_path(&self) -> &Path {
        &self.rdf.output_path
    }
}
