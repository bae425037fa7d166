//! The persisted crawl artifact: requested id -> verbatim upstream envelope.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, WikigraphError};
use crate::model::{EntityId, RawEntityRecord};

/// Snapshot of fetched entity data, written once at the end of the fetch
/// phase and read-only thereafter. Both exporters consume it independently.
///
/// The file mirrors the upstream API envelope: top-level keys are the
/// requested entity ids, each value an object carrying an `entities` mapping
/// of entity id to record. Unknown fields are preserved verbatim.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: Map<String, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the full envelope fetched for one requested id.
    pub fn insert(&mut self, id: EntityId, envelope: Value) {
        self.entries.insert(id, envelope);
    }

    /// Number of requested ids present (not the number of contained records).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a snapshot file written by [`Snapshot::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&text)?;
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            _ => Err(WikigraphError::MalformedSnapshot(format!(
                "expected a top-level object in {}",
                path.as_ref().display()
            ))),
        }
    }

    /// Write the snapshot as pretty-printed UTF-8 JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(&Value::Object(self.entries.clone()))?;
        fs::write(path, text)?;
        Ok(())
    }

    /// All contained entity records in snapshot iteration order.
    ///
    /// Envelopes without an `entities` object and records that are not
    /// objects are skipped, not errors.
    pub fn entities(&self) -> Vec<(EntityId, RawEntityRecord)> {
        let mut out = Vec::new();
        for envelope in self.entries.values() {
            let Some(entities) = envelope.get("entities").and_then(Value::as_object) else {
                continue;
            };
            for (id, raw) in entities {
                if let Ok(record) = serde_json::from_value::<RawEntityRecord>(raw.clone()) {
                    out.push((id.clone(), record));
                }
            }
        }
        out
    }
}
