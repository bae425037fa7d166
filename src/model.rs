//! Data model for raw Wikidata records and their normalized forms.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Opaque entity identifier within the source graph (e.g. "Q5").
pub type EntityId = String;

/// The fetched document for one entity: localized labels/descriptions plus
/// claims grouped per property, all in upstream document order.
///
/// Fields beyond the three we consume (sitelinks, aliases, ...) are ignored on
/// parse; the persisted snapshot keeps the verbatim envelope instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntityRecord {
    #[serde(default)]
    pub labels: Map<String, Value>,
    #[serde(default)]
    pub descriptions: Map<String, Value>,
    #[serde(default)]
    pub claims: Map<String, Value>,
}

impl RawEntityRecord {
    /// Iterate claims grouped by property id, in document order.
    ///
    /// Entries that are not arrays, or array elements that are not objects,
    /// are skipped (presence checks only, no upstream schema validation).
    pub fn property_claims(&self) -> impl Iterator<Item = (&str, Vec<Claim>)> + '_ {
        self.claims.iter().map(|(pid, group)| {
            let claims = group
                .as_array()
                .map(|arr| {
                    arr.iter()
                        .filter_map(|c| serde_json::from_value(c.clone()).ok())
                        .collect()
                })
                .unwrap_or_default();
            (pid.as_str(), claims)
        })
    }
}

/// One assertion under a property. Only the main snak carries the triple
/// payload; qualifiers and references are not modeled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claim {
    #[serde(default)]
    pub mainsnak: Snak,
}

/// A snak is usable only when `snaktype == "value"`; "somevalue" and
/// "novalue" snaks carry no datavalue worth a triple.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snak {
    #[serde(default)]
    pub snaktype: String,
    #[serde(default)]
    pub datavalue: Option<DataValue>,
}

/// Tagged datavalue payload. The `value` shape depends on `kind`: entity
/// reference object, plain string, time object, quantity object, or
/// monolingual-text object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataValue {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: Value,
}

/// One entity row: id plus resolved label and description.
///
/// The label is never empty; it falls back to the entity id itself when no
/// localized label is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntity {
    pub id: EntityId,
    pub label: String,
    pub description: String,
}

/// Object position of a triple: either a reference to another entity or a
/// literal rendered as text. The enum makes "exactly one of the two is
/// populated" hold by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripleObject {
    Entity(EntityId),
    Literal(String),
}

impl TripleObject {
    /// Stable type tag persisted in the relational `object_type` column.
    pub fn type_tag(&self) -> &'static str {
        match self {
            TripleObject::Entity(_) => "entity",
            TripleObject::Literal(_) => "literal",
        }
    }
}

/// A canonical (subject, predicate, object) assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: EntityId,
    pub predicate: String,
    pub object: TripleObject,
}
