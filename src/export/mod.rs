//! Snapshot consumers: the relational store and the N-Triples sink.
//!
//! Each exporter re-runs normalization over the snapshot independently. The
//! relational path is strict (referential filter, canonical literals); the
//! RDF path is permissive (no filter, amount-only literals). The divergence
//! is a deliberate per-sink policy.

pub mod rdf;
pub mod relational;

pub use rdf::export_snapshot;
pub use relational::{import_snapshot, ImportReport};
