//! Language-preference resolution for localized label/description maps.

use serde_json::{Map, Value};

/// Pick the best localized string from a `lang -> {value}` map.
///
/// Returns the value for the first preference-list language present; when no
/// preferred language matches, falls back to the first-inserted entry; when
/// the map is empty (or the fallback entry has no usable value), returns "".
///
/// Both exporters resolve labels and descriptions through this one function;
/// any divergence between them is a defect.
pub fn resolve_preferred(localized: &Map<String, Value>, preference: &[String]) -> String {
    for lang in preference {
        if let Some(text) = localized
            .get(lang)
            .and_then(|entry| entry.get("value"))
            .and_then(Value::as_str)
        {
            return text.to_string();
        }
    }

    localized
        .values()
        .next()
        .and_then(|entry| entry.get("value"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
