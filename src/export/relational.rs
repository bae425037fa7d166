//! Relational export: normalized entities and triples into SQLite.

use std::collections::{HashMap, HashSet};

use rusqlite::{params, Connection};

use crate::db::Db;
use crate::error::Result;
use crate::model::{NormalizedEntity, Triple, TripleObject};
use crate::normalize::normalize;
use crate::snapshot::Snapshot;

/// Two tables: entity keyed by id, triple with an auto row id and FKs from
/// subject and object-entity columns back to entity. The triple table has no
/// uniqueness constraint; re-runs append duplicate rows by design.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS entity (
    id TEXT PRIMARY KEY,
    label TEXT,
    description TEXT
);
CREATE TABLE IF NOT EXISTS triple (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id TEXT REFERENCES entity(id),
    predicate_id TEXT,
    object_entity_id TEXT REFERENCES entity(id),
    object_literal TEXT,
    object_type TEXT
);
";

/// Outcome of one import run. `triples_dropped` counts referential gaps:
/// entity-object triples whose target was never fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub entities: usize,
    pub triples_inserted: usize,
    pub triples_dropped: usize,
}

/// Normalize the whole snapshot and write it to the store in one transaction.
///
/// Entity inserts use insert-or-ignore so a re-run is idempotent on the
/// entity table. Triples are filtered against the committed entity id set
/// (re-read after the entity insert) before insertion: literals always pass,
/// entity objects must reference a committed id. Any failure rolls back
/// everything written in this run.
pub async fn import_snapshot(
    db: &Db,
    snapshot: &Snapshot,
    preference: &[String],
) -> Result<ImportReport> {
    let (entities, triples) = normalize_snapshot(snapshot, preference);
    log::info!(
        "normalized {} entities and {} triples",
        entities.len(),
        triples.len()
    );

    let report = db
        .with_connection(move |conn| write_run(conn, &entities, &triples))
        .await?;

    log::info!(
        "import complete: {} entities, {} triples inserted, {} dropped (referential gaps)",
        report.entities,
        report.triples_inserted,
        report.triples_dropped
    );
    Ok(report)
}

/// Collapse the snapshot into one entity row per id plus the full triple
/// list. Duplicate observations of an id keep the last label/description in
/// iteration order; triples are not deduplicated here.
pub fn normalize_snapshot(
    snapshot: &Snapshot,
    preference: &[String],
) -> (Vec<NormalizedEntity>, Vec<Triple>) {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entities: Vec<NormalizedEntity> = Vec::new();
    let mut triples: Vec<Triple> = Vec::new();

    for (id, record) in snapshot.entities() {
        let (entity, mut claim_triples) = normalize(&id, &record, preference);
        match index.get(&id) {
            Some(&slot) => entities[slot] = entity,
            None => {
                index.insert(id, entities.len());
                entities.push(entity);
            }
        }
        triples.append(&mut claim_triples);
    }

    (entities, triples)
}

fn write_run(
    conn: &mut Connection,
    entities: &[NormalizedEntity],
    triples: &[Triple],
) -> Result<ImportReport> {
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA)?;

    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO entity (id, label, description) VALUES (?1, ?2, ?3)",
        )?;
        for entity in entities {
            stmt.execute(params![entity.id, entity.label, entity.description])?;
        }
    }

    // Post-insert ground truth: the committed id set, not the in-memory one.
    let committed: HashSet<String> = {
        let mut stmt = tx.prepare("SELECT id FROM entity")?;
        let ids = stmt.query_map([], |row| row.get::<_, String>(0))?;
        ids.collect::<std::result::Result<_, rusqlite::Error>>()?
    };

    let mut inserted = 0usize;
    let mut dropped = 0usize;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO triple (subject_id, predicate_id, object_entity_id, object_literal, object_type) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for triple in triples {
            let (object_entity, object_literal) = match &triple.object {
                TripleObject::Entity(target) => {
                    if !committed.contains(target) {
                        dropped += 1;
                        continue;
                    }
                    (Some(target.as_str()), None)
                }
                TripleObject::Literal(text) => (None, Some(text.as_str())),
            };
            stmt.execute(params![
                triple.subject,
                triple.predicate,
                object_entity,
                object_literal,
                triple.object.type_tag(),
            ])?;
            inserted += 1;
        }
    }

    tx.commit()?;
    Ok(ImportReport {
        entities: entities.len(),
        triples_inserted: inserted,
        triples_dropped: dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn entity_ref_claim(target: &str) -> serde_json::Value {
        json!({"mainsnak": {"snaktype": "value",
            "datavalue": {"type": "wikibase-entityid", "value": {"id": target}}}})
    }

    fn string_claim(text: &str) -> serde_json::Value {
        json!({"mainsnak": {"snaktype": "value",
            "datavalue": {"type": "string", "value": text}}})
    }

    /// Snapshot with Q1 (referencing Q2, the unfetched Q99, and one literal)
    /// and Q2.
    fn test_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            "Q1".into(),
            json!({"entities": {"Q1": {
                "labels": {"en": {"value": "one"}},
                "descriptions": {"en": {"value": "first"}},
                "claims": {
                    "P1": [entity_ref_claim("Q2"), entity_ref_claim("Q99")],
                    "P2": [string_claim("lit")]
                }
            }}}),
        );
        snapshot.insert(
            "Q2".into(),
            json!({"entities": {"Q2": {"labels": {"en": {"value": "two"}}, "claims": {}}}}),
        );
        snapshot
    }

    fn prefs() -> Vec<String> {
        vec!["zh".into(), "en".into()]
    }

    fn count(conn: &Connection, sql: &str) -> i64 {
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[tokio::test]
    async fn test_referential_filter_drops_dangling_references() {
        let temp_dir = TempDir::new().unwrap();
        let db = Db::new(temp_dir.path().join("test.db"));

        let report = import_snapshot(&db, &test_snapshot(), &prefs())
            .await
            .unwrap();
        assert_eq!(report.entities, 2);
        assert_eq!(report.triples_inserted, 2);
        assert_eq!(report.triples_dropped, 1);

        let conn = db.open_connection().unwrap();
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM entity"), 2);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM triple"), 2);
        assert_eq!(
            count(
                &conn,
                "SELECT COUNT(*) FROM triple WHERE object_entity_id = 'Q99'"
            ),
            0
        );
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent_on_entities_and_duplicates_triples() {
        let temp_dir = TempDir::new().unwrap();
        let db = Db::new(temp_dir.path().join("test.db"));
        let snapshot = test_snapshot();

        import_snapshot(&db, &snapshot, &prefs()).await.unwrap();
        import_snapshot(&db, &snapshot, &prefs()).await.unwrap();

        let conn = db.open_connection().unwrap();
        // Entities collide on the primary key and are ignored.
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM entity"), 2);
        // The triple table has no uniqueness constraint, so the second run
        // appends exact duplicates of every kept triple.
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM triple"), 4);
    }

    #[tokio::test]
    async fn test_entity_rows_carry_label_and_description() {
        let temp_dir = TempDir::new().unwrap();
        let db = Db::new(temp_dir.path().join("test.db"));
        import_snapshot(&db, &test_snapshot(), &prefs())
            .await
            .unwrap();

        let conn = db.open_connection().unwrap();
        let (label, description): (String, String) = conn
            .query_row(
                "SELECT label, description FROM entity WHERE id = 'Q1'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(label, "one");
        assert_eq!(description, "first");
    }

    #[tokio::test]
    async fn test_literal_triples_store_canonical_text() {
        let temp_dir = TempDir::new().unwrap();
        let db = Db::new(temp_dir.path().join("test.db"));
        import_snapshot(&db, &test_snapshot(), &prefs())
            .await
            .unwrap();

        let conn = db.open_connection().unwrap();
        let (literal, object_type): (String, String) = conn
            .query_row(
                "SELECT object_literal, object_type FROM triple WHERE predicate_id = 'P2'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(literal, "lit");
        assert_eq!(object_type, "literal");
    }

    #[test]
    fn test_normalize_snapshot_last_observation_wins() {
        // The same id observed twice (reachable via two envelopes): the later
        // label wins, one entity row remains, triples from both survive.
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            "Q1".into(),
            json!({"entities": {"Q7": {
                "labels": {"en": {"value": "old"}},
                "claims": {"P2": [string_claim("a")]}
            }}}),
        );
        snapshot.insert(
            "Q2".into(),
            json!({"entities": {"Q7": {
                "labels": {"en": {"value": "new"}},
                "claims": {"P2": [string_claim("b")]}
            }}}),
        );

        let (entities, triples) = normalize_snapshot(&snapshot, &prefs());
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].label, "new");
        assert_eq!(triples.len(), 2);
    }
}
