//! BFS frontier discovery and snapshot fetching over the entity graph.

use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use crate::error::Result;
use crate::model::{EntityId, RawEntityRecord};
use crate::snapshot::Snapshot;

/// Capability to fetch the upstream envelope for one entity id.
///
/// Any error (non-2xx status, timeout, malformed body) is a per-id failure;
/// callers skip the id and continue.
pub trait FetchEntity {
    fn fetch(&self, id: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// Sequential crawler: one request at a time, fixed pause between requests.
///
/// Requests are never overlapped; each decision to enqueue a new id depends
/// on having fully processed the previous response, which keeps BFS order
/// deterministic modulo network results.
pub struct Crawler<F> {
    fetcher: F,
    delay: Duration,
}

impl<F: FetchEntity> Crawler<F> {
    pub fn new(fetcher: F, delay: Duration) -> Self {
        Self { fetcher, delay }
    }

    /// Expand a seed set into at most `target` entity ids by following
    /// entity-reference claims breadth-first.
    ///
    /// Seeds form a prefix of the result. Ids whose fetch fails are skipped
    /// without retry. When the reachable graph is smaller than `target` the
    /// result is simply shorter; that is not an error.
    pub async fn discover(&self, seeds: &[EntityId], target: usize) -> Vec<EntityId> {
        let mut visited: HashSet<EntityId> = seeds.iter().cloned().collect();
        let mut queue: VecDeque<EntityId> = seeds.iter().cloned().collect();
        let mut collected: Vec<EntityId> = seeds.to_vec();

        while collected.len() < target {
            let Some(current) = queue.pop_front() else {
                break;
            };

            match self.fetcher.fetch(&current).await {
                Ok(envelope) => {
                    match record_from_envelope(&envelope, &current) {
                        Some(record) => scan_for_links(
                            &record,
                            target,
                            &mut visited,
                            &mut queue,
                            &mut collected,
                        ),
                        None => log::warn!("no usable record for {current}, skipping"),
                    }
                    log::debug!(
                        "expanded {current}: {} collected, {} queued",
                        collected.len(),
                        queue.len()
                    );
                }
                Err(err) => log::warn!("fetch failed for {current}, skipping: {err}"),
            }

            self.pause().await;
        }

        collected.truncate(target);
        collected
    }

    /// Fetch the full envelope for every id in order. Ids that fail are
    /// absent from the result; progress is logged every 50 ids.
    pub async fn fetch_all(&self, ids: &[EntityId]) -> Snapshot {
        let mut snapshot = Snapshot::new();

        for (index, id) in ids.iter().enumerate() {
            match self.fetcher.fetch(id).await {
                Ok(envelope) => {
                    snapshot.insert(id.clone(), envelope);
                }
                Err(err) => log::warn!("fetch failed for {id}, skipping: {err}"),
            }
            if index % 50 == 0 {
                log::info!("[{}/{}] downloaded", index, ids.len());
            }
            self.pause().await;
        }

        snapshot
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

fn record_from_envelope(envelope: &Value, id: &str) -> Option<RawEntityRecord> {
    let raw = envelope.get("entities")?.get(id)?;
    serde_json::from_value(raw.clone()).ok()
}

/// Scan every claim of every property in document order; any datavalue whose
/// payload is an object carrying an `id` field is an entity reference.
///
/// Discovery deliberately ignores the snaktype filter used by normalization:
/// an `id` in the payload is a link worth following either way. Stops the
/// instant `collected` reaches `target`.
fn scan_for_links(
    record: &RawEntityRecord,
    target: usize,
    visited: &mut HashSet<EntityId>,
    queue: &mut VecDeque<EntityId>,
    collected: &mut Vec<EntityId>,
) {
    for (_pid, claims) in record.property_claims() {
        for claim in &claims {
            let Some(datavalue) = &claim.mainsnak.datavalue else {
                continue;
            };
            let Some(linked) = datavalue.value.get("id").and_then(Value::as_str) else {
                continue;
            };
            if visited.insert(linked.to_string()) {
                queue.push_back(linked.to_string());
                collected.push(linked.to_string());
                if collected.len() >= target {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WikigraphError;
    use serde_json::json;
    use std::collections::HashMap;

    /// Serves canned envelopes from memory; missing ids fail like the network.
    struct MockFetcher {
        responses: HashMap<String, Value>,
    }

    impl MockFetcher {
        fn new(entries: Vec<(&str, Value)>) -> Self {
            Self {
                responses: entries
                    .into_iter()
                    .map(|(id, v)| (id.to_string(), v))
                    .collect(),
            }
        }
    }

    impl FetchEntity for MockFetcher {
        async fn fetch(&self, id: &str) -> Result<Value> {
            self.responses
                .get(id)
                .cloned()
                .ok_or_else(|| WikigraphError::Config(format!("no response for {id}")))
        }
    }

    fn envelope_with_refs(id: &str, refs: &[&str]) -> Value {
        let claims: Vec<Value> = refs
            .iter()
            .map(|target| {
                json!({"mainsnak": {"snaktype": "value",
                    "datavalue": {"type": "wikibase-entityid", "value": {"id": target}}}})
            })
            .collect();
        json!({"entities": {id: {"claims": {"P31": claims}}}})
    }

    fn crawler(entries: Vec<(&str, Value)>) -> Crawler<MockFetcher> {
        Crawler::new(MockFetcher::new(entries), Duration::ZERO)
    }

    fn ids(list: &[&str]) -> Vec<EntityId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_discover_stops_at_target() {
        let crawler = crawler(vec![
            ("Q5", envelope_with_refs("Q5", &["Q6", "Q7", "Q8", "Q9"])),
        ]);
        let found = crawler.discover(&ids(&["Q5"]), 3).await;
        assert_eq!(found, ids(&["Q5", "Q6", "Q7"]));
    }

    #[tokio::test]
    async fn test_discover_is_breadth_first() {
        // Q5's own references (Q6, Q7) must all precede Q6's references (Q8).
        let crawler = crawler(vec![
            ("Q5", envelope_with_refs("Q5", &["Q6", "Q7"])),
            ("Q6", envelope_with_refs("Q6", &["Q8"])),
            ("Q7", envelope_with_refs("Q7", &[])),
        ]);
        let found = crawler.discover(&ids(&["Q5"]), 4).await;
        assert_eq!(found, ids(&["Q5", "Q6", "Q7", "Q8"]));
    }

    #[tokio::test]
    async fn test_discover_returns_seeds_as_prefix() {
        let crawler = crawler(vec![
            ("Q1", envelope_with_refs("Q1", &["Q10"])),
            ("Q2", envelope_with_refs("Q2", &["Q20"])),
        ]);
        let found = crawler.discover(&ids(&["Q1", "Q2"]), 4).await;
        assert_eq!(found[..2], ids(&["Q1", "Q2"]));
        assert_eq!(found, ids(&["Q1", "Q2", "Q10", "Q20"]));
    }

    #[tokio::test]
    async fn test_discover_truncates_when_seeds_exceed_target() {
        let crawler = crawler(vec![]);
        let found = crawler.discover(&ids(&["Q1", "Q2", "Q3"]), 2).await;
        assert_eq!(found, ids(&["Q1", "Q2"]));
    }

    #[tokio::test]
    async fn test_discover_short_result_when_graph_exhausted() {
        let crawler = crawler(vec![
            ("Q5", envelope_with_refs("Q5", &["Q6"])),
            ("Q6", envelope_with_refs("Q6", &[])),
        ]);
        let found = crawler.discover(&ids(&["Q5"]), 100).await;
        assert_eq!(found, ids(&["Q5", "Q6"]));
    }

    #[tokio::test]
    async fn test_discover_skips_failed_fetches() {
        // Q6 has no canned response; the crawl continues through Q7.
        let crawler = crawler(vec![
            ("Q5", envelope_with_refs("Q5", &["Q6", "Q7"])),
            ("Q7", envelope_with_refs("Q7", &["Q8"])),
        ]);
        let found = crawler.discover(&ids(&["Q5"]), 4).await;
        assert_eq!(found, ids(&["Q5", "Q6", "Q7", "Q8"]));
    }

    #[tokio::test]
    async fn test_discover_does_not_revisit_known_ids() {
        let crawler = crawler(vec![
            ("Q5", envelope_with_refs("Q5", &["Q6", "Q5", "Q6"])),
            ("Q6", envelope_with_refs("Q6", &["Q5"])),
        ]);
        let found = crawler.discover(&ids(&["Q5"]), 10).await;
        assert_eq!(found, ids(&["Q5", "Q6"]));
    }

    #[tokio::test]
    async fn test_discover_follows_links_regardless_of_snaktype() {
        let envelope = json!({"entities": {"Q5": {"claims": {"P1": [
            {"mainsnak": {"snaktype": "somevalue",
                "datavalue": {"type": "wikibase-entityid", "value": {"id": "Q6"}}}}
        ]}}}});
        let crawler = crawler(vec![("Q5", envelope), ("Q6", envelope_with_refs("Q6", &[]))]);
        let found = crawler.discover(&ids(&["Q5"]), 2).await;
        assert_eq!(found, ids(&["Q5", "Q6"]));
    }

    #[tokio::test]
    async fn test_fetch_all_omits_failed_ids() {
        let crawler = crawler(vec![
            ("Q5", envelope_with_refs("Q5", &[])),
            ("Q7", envelope_with_refs("Q7", &[])),
        ]);
        let snapshot = crawler.fetch_all(&ids(&["Q5", "Q6", "Q7"])).await;
        assert_eq!(snapshot.len(), 2);
        let contained: Vec<_> = snapshot.entities().into_iter().map(|(id, _)| id).collect();
        assert_eq!(contained, ids(&["Q5", "Q7"]));
    }
}
