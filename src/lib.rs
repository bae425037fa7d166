pub mod config;
pub mod error;
pub mod model;
pub mod lang;
pub mod normalize;
pub mod transport;
pub mod crawl;
pub mod snapshot;
pub mod db;
pub mod export;

pub use config::Config;
pub use error::{Result, WikigraphError};
pub use model::{NormalizedEntity, RawEntityRecord, Triple, TripleObject};
pub use snapshot::Snapshot;
