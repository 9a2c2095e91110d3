//! Conversion of extraction output into named entities.
//!
//! The extraction tool reports entities under a `named_entities` array.
//! Entities whose id carries the [`AUTO_ID_PREFIX`] are placeholders the
//! tool could not ground in an ontology and are dropped from the result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::ResultPayload;

/// Id prefix marking an unresolved, auto-generated entity.
pub const AUTO_ID_PREFIX: &str = "AUTO:";

/// Field holding the entity list in extraction output.
const NAMED_ENTITIES_FIELD: &str = "named_entities";

/// A grounded entity returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: String,
    pub label: String,
}

/// Returns `true` when the id marks an auto-generated placeholder.
pub fn is_auto_generated(id: &str) -> bool {
    id.starts_with(AUTO_ID_PREFIX)
}

/// Extract the ordered list of grounded entities from a worker payload.
///
/// Accepts an object with a `named_entities` array, an array of such
/// objects (flattened in order), or raw text holding either as YAML or
/// JSON. Source order is preserved; auto-generated entities and entries
/// without a string `id` are skipped. A missing `label` becomes empty.
///
/// Raw text that does not parse to a mapping or sequence yields
/// [`CoreError::ExtractionFailed`].
pub fn parse_named_entities(payload: &ResultPayload) -> Result<Vec<NamedEntity>, CoreError> {
    let mut entities = Vec::new();
    match payload {
        ResultPayload::Raw(text) => collect_from_text(text, &mut entities)?,
        ResultPayload::Structured(value) => collect(value, &mut entities)?,
    }
    Ok(entities)
}

/// The extraction tool prints YAML by default; JSON parses as YAML too.
fn collect_from_text(text: &str, out: &mut Vec<NamedEntity>) -> Result<(), CoreError> {
    let value: Value = serde_yaml::from_str(text.trim()).map_err(|e| {
        CoreError::ExtractionFailed(format!("extraction output is not structured data: {e}"))
    })?;
    match value {
        Value::Object(_) | Value::Array(_) => collect(&value, out),
        other => Err(CoreError::ExtractionFailed(format!(
            "extraction output is not structured data: got {}",
            type_name(&other)
        ))),
    }
}

fn collect(value: &Value, out: &mut Vec<NamedEntity>) -> Result<(), CoreError> {
    match value {
        Value::Object(map) => match map.get(NAMED_ENTITIES_FIELD) {
            Some(Value::Array(entries)) => {
                out.extend(entries.iter().filter_map(to_entity));
                Ok(())
            }
            Some(Value::Null) | None => Ok(()),
            Some(other) => Err(CoreError::ExtractionFailed(format!(
                "`{NAMED_ENTITIES_FIELD}` must be an array, got {}",
                type_name(other)
            ))),
        },
        Value::Array(items) => items.iter().try_for_each(|item| collect(item, out)),
        Value::String(text) => collect_from_text(text, out),
        _ => Ok(()),
    }
}

fn to_entity(entry: &Value) -> Option<NamedEntity> {
    let id = entry.get("id")?.as_str()?;
    if is_auto_generated(id) {
        return None;
    }
    let label = entry
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some(NamedEntity {
        id: id.to_string(),
        label: label.to_string(),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
