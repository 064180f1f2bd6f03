//! Conversions between core items and `AttributeValue` maps.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;

use dynamodb_reference_core::item::{Item, ItemKey, Value, PARTITION_KEY, SORT_KEY};
use dynamodb_reference_core::storage::{Result, StoreError};

pub fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::S(s) => AttributeValue::S(s.clone()),
        Value::N(n) => AttributeValue::N(n.clone()),
        Value::B(b) => AttributeValue::B(Blob::new(b.clone())),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Null => AttributeValue::Null(true),
        Value::L(values) => AttributeValue::L(values.iter().map(to_attribute_value).collect()),
        Value::M(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute_value(v)))
                .collect(),
        ),
        Value::Ss(values) => AttributeValue::Ss(values.clone()),
        Value::Ns(values) => AttributeValue::Ns(values.clone()),
        Value::Bs(values) => AttributeValue::Bs(values.iter().cloned().map(Blob::new).collect()),
    }
}

pub fn from_attribute_value(value: AttributeValue) -> Result<Value> {
    Ok(match value {
        AttributeValue::S(s) => Value::S(s),
        AttributeValue::N(n) => Value::N(n),
        AttributeValue::B(b) => Value::B(b.into_inner()),
        AttributeValue::Bool(b) => Value::Bool(b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(values) => Value::L(
            values
                .into_iter()
                .map(from_attribute_value)
                .collect::<Result<_>>()?,
        ),
        AttributeValue::M(map) => Value::M(
            map.into_iter()
                .map(|(k, v)| Ok((k, from_attribute_value(v)?)))
                .collect::<Result<_>>()?,
        ),
        AttributeValue::Ss(values) => Value::Ss(values),
        AttributeValue::Ns(values) => Value::Ns(values),
        AttributeValue::Bs(values) => Value::Bs(values.into_iter().map(Blob::into_inner).collect()),
        other => {
            return Err(StoreError::InvalidItem(format!(
                "unsupported attribute value: {other:?}"
            )))
        }
    })
}

/// Convert an item into the attribute map sent to DynamoDB.
pub fn item_to_attributes(item: &Item) -> HashMap<String, AttributeValue> {
    item.attributes()
        .iter()
        .map(|(name, value)| (name.clone(), to_attribute_value(value)))
        .collect()
}

/// Convert a DynamoDB attribute map into an item.
pub fn attributes_to_item(attributes: HashMap<String, AttributeValue>) -> Result<Item> {
    attributes
        .into_iter()
        .map(|(name, value)| Ok((name, from_attribute_value(value)?)))
        .collect::<Result<HashMap<_, _>>>()
        .map(Item::from)
}

/// Key attributes for a delete-by-key request.
pub fn key_to_attributes(key: &ItemKey) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (PARTITION_KEY.to_string(), AttributeValue::S(key.pk.clone())),
        (SORT_KEY.to_string(), AttributeValue::S(key.sk.clone())),
    ])
}
