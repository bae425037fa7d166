//! Claim normalization: raw records to (entity row, triples).

use serde_json::Value;

use crate::lang::resolve_preferred;
use crate::model::{NormalizedEntity, RawEntityRecord, Triple, TripleObject};

/// How a structured datavalue is rendered into literal text.
///
/// The two sinks intentionally diverge: the relational store keeps the full
/// structured payload as canonical JSON text, while the RDF sink keeps only
/// the `amount` sub-field of structured payloads. This is a per-sink policy,
/// not an accident to unify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralForm {
    /// Full canonical form: bare text for string payloads, JSON text otherwise.
    Canonical,
    /// `amount` sub-field of structured payloads; empty when absent.
    Amount,
}

/// Normalize one entity record into its entity row and triple list.
///
/// The display label falls back to the entity id when no localized label
/// resolves. Triples use the relational (canonical) literal form; duplicate
/// claims yield duplicate triples, deduplication is left to the sinks.
pub fn normalize(
    id: &str,
    record: &RawEntityRecord,
    preference: &[String],
) -> (NormalizedEntity, Vec<Triple>) {
    let label = resolve_preferred(&record.labels, preference);
    let description = resolve_preferred(&record.descriptions, preference);

    let entity = NormalizedEntity {
        id: id.to_string(),
        label: if label.is_empty() { id.to_string() } else { label },
        description,
    };

    (entity, claim_triples(id, record, LiteralForm::Canonical))
}

/// Walk every claim of every property in document order and emit triples.
///
/// Claims whose snaktype is not "value" carry no triple. Datavalue dispatch:
/// entity references become entity triples (skipped silently when the `id`
/// field is absent); string/time/quantity/monolingualtext become literal
/// triples rendered per `form`; any other type tag is dropped.
pub fn claim_triples(id: &str, record: &RawEntityRecord, form: LiteralForm) -> Vec<Triple> {
    let mut triples = Vec::new();

    for (pid, claims) in record.property_claims() {
        for claim in &claims {
            let snak = &claim.mainsnak;
            if snak.snaktype != "value" {
                continue;
            }
            let Some(datavalue) = &snak.datavalue else {
                continue;
            };

            match datavalue.kind.as_str() {
                "wikibase-entityid" => {
                    if let Some(target) = datavalue.value.get("id").and_then(Value::as_str) {
                        triples.push(Triple {
                            subject: id.to_string(),
                            predicate: pid.to_string(),
                            object: TripleObject::Entity(target.to_string()),
                        });
                    }
                }
                "string" | "time" | "quantity" | "monolingualtext" => {
                    triples.push(Triple {
                        subject: id.to_string(),
                        predicate: pid.to_string(),
                        object: TripleObject::Literal(literal_text(
                            &datavalue.kind,
                            &datavalue.value,
                            form,
                        )),
                    });
                }
                // Unhandled payload kinds (globe-coordinate, ...) carry no triple.
                _ => {}
            }
        }
    }

    triples
}

fn literal_text(kind: &str, value: &Value, form: LiteralForm) -> String {
    if kind == "monolingualtext" {
        if let Some(text) = value.get("text").and_then(Value::as_str) {
            return text.to_string();
        }
        // Missing `text` field: fall through and render the whole payload.
    }

    match form {
        LiteralForm::Canonical => match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        LiteralForm::Amount => match value {
            Value::String(s) => s.clone(),
            Value::Object(obj) => obj
                .get("amount")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            other => other.to_string(),
        },
    }
}
