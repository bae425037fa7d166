//! RDF export: the snapshot as N-Triples-style statements.

use std::io::Write;

use crate::error::Result;
use crate::lang::resolve_preferred;
use crate::model::TripleObject;
use crate::normalize::{claim_triples, LiteralForm};
use crate::snapshot::Snapshot;

const ENTITY_URI_BASE: &str = "http://www.wikidata.org/entity/";
const PROPERTY_URI_BASE: &str = "http://www.wikidata.org/prop/direct/";

/// Escape a literal for N-Triples output: `"` becomes `\"`.
///
/// Control characters and newlines are deliberately left alone; the sink
/// accepts this limitation.
fn escape_literal(value: &str) -> String {
    value.replace('"', "\\\"")
}

/// Stream the snapshot as one statement per line, returning the statement
/// count.
///
/// Per entity in snapshot order: a label and a description statement (each
/// only when the resolved string is non-empty), then one statement per claim
/// triple. Structured literals render amount-only; claims whose literal
/// renders empty are skipped. No referential filtering happens on this path,
/// so statements may reference entities absent from the snapshot.
pub fn export_snapshot<W: Write>(
    snapshot: &Snapshot,
    preference: &[String],
    out: &mut W,
) -> Result<usize> {
    let mut statements = 0usize;

    for (id, record) in snapshot.entities() {
        let subject = format!("<{ENTITY_URI_BASE}{id}>");

        let label = resolve_preferred(&record.labels, preference);
        if !label.is_empty() {
            writeln!(out, "{subject} <rdfs:label> \"{}\"@en .", escape_literal(&label))?;
            statements += 1;
        }

        let description = resolve_preferred(&record.descriptions, preference);
        if !description.is_empty() {
            writeln!(
                out,
                "{subject} <rdfs:comment> \"{}\"@en .",
                escape_literal(&description)
            )?;
            statements += 1;
        }

        for triple in claim_triples(&id, &record, LiteralForm::Amount) {
            let predicate = format!("<{PROPERTY_URI_BASE}{}>", triple.predicate);
            match &triple.object {
                TripleObject::Entity(target) => {
                    writeln!(out, "{subject} {predicate} <{ENTITY_URI_BASE}{target}> .")?;
                    statements += 1;
                }
                TripleObject::Literal(text) if !text.is_empty() => {
                    writeln!(out, "{subject} {predicate} \"{}\" .", escape_literal(text))?;
                    statements += 1;
                }
                TripleObject::Literal(_) => {}
            }
        }
    }

    Ok(statements)
}
