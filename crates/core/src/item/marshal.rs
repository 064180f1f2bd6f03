//! Marshal serializable structs into items.
//!
//! Goes through `serde_json::Value`, so field names follow the struct's serde
//! attributes (e.g. `#[serde(rename = "PK")]`).

use std::collections::HashMap;

use serde::Serialize;

use super::{Item, Value};
use crate::storage::{Result, StoreError};

/// Converts a serializable struct into an item.
///
/// The struct must serialize to a JSON object. Strings map to `S`, numbers to
/// `N`, booleans to `Bool`, null to `Null`, arrays to `L` and objects to `M`.
pub fn to_item<T: Serialize>(value: &T) -> Result<Item> {
    let json = serde_json::to_value(value).map_err(|e| StoreError::InvalidItem(e.to_string()))?;

    match json {
        serde_json::Value::Object(fields) => Ok(Item::from(
            fields
                .into_iter()
                .map(|(name, value)| (name, from_json(value)))
                .collect::<HashMap<_, _>>(),
        )),
        other => Err(StoreError::InvalidItem(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::N(n.to_string()),
        serde_json::Value::String(s) => Value::S(s),
        serde_json::Value::Array(values) => Value::L(values.into_iter().map(from_json).collect()),
        serde_json::Value::Object(fields) => Value::M(
            fields
                .into_iter()
                .map(|(name, value)| (name, from_json(value)))
                .collect(),
        ),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
