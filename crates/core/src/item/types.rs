use std::collections::HashMap;

use crate::storage::{Result, StoreError};

/// Name of the partition key attribute.
pub const PARTITION_KEY: &str = "PK";

/// Name of the sort key attribute.
pub const SORT_KEY: &str = "SK";

/// A tagged attribute value, mirroring the DynamoDB attribute value types.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String.
    S(String),
    /// Number, kept as its decimal string representation.
    N(String),
    /// Binary.
    B(Vec<u8>),
    Bool(bool),
    Null,
    L(Vec<Value>),
    M(HashMap<String, Value>),
    /// String set.
    Ss(Vec<String>),
    /// Number set.
    Ns(Vec<String>),
    /// Binary set.
    Bs(Vec<Vec<u8>>),
}

impl Value {
    /// Returns the string payload if this is an `S` value.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Value::S(s) => Some(s),
            _ => None,
        }
    }

    /// Approximate stored size in bytes, used to size scan pages.
    pub fn size(&self) -> usize {
        match self {
            Value::S(s) | Value::N(s) => s.len(),
            Value::B(b) => b.len(),
            Value::Bool(_) | Value::Null => 1,
            Value::L(values) => values.iter().map(Value::size).sum::<usize>() + 3,
            Value::M(map) => map.iter().map(|(k, v)| k.len() + v.size()).sum::<usize>() + 3,
            Value::Ss(values) | Value::Ns(values) => values.iter().map(String::len).sum(),
            Value::Bs(values) => values.iter().map(Vec::len).sum(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::S(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::S(value)
    }
}

/// A single item: attribute name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    attributes: HashMap<String, Value>,
}

impl Item {
    /// Creates an item with the given partition and sort key.
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self::default()
            .with(PARTITION_KEY, Value::S(pk.into()))
            .with(SORT_KEY, Value::S(sk.into()))
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    pub fn into_attributes(self) -> HashMap<String, Value> {
        self.attributes
    }

    /// Extracts the `(PK, SK)` key of this item.
    ///
    /// Fails with `InvalidItem` if either key attribute is missing or is not a string.
    pub fn key(&self) -> Result<ItemKey> {
        let pk = self.string_attribute(PARTITION_KEY)?;
        let sk = self.string_attribute(SORT_KEY)?;
        Ok(ItemKey::new(pk, sk))
    }

    /// Approximate stored size in bytes.
    pub fn size(&self) -> usize {
        self.attributes
            .iter()
            .map(|(name, value)| name.len() + value.size())
            .sum()
    }

    fn string_attribute(&self, name: &str) -> Result<&str> {
        self.get(name)
            .and_then(Value::as_s)
            .ok_or_else(|| StoreError::InvalidItem(format!("missing string attribute {name}")))
    }
}

impl From<HashMap<String, Value>> for Item {
    fn from(attributes: HashMap<String, Value>) -> Self {
        Self { attributes }
    }
}

/// Composite primary key of an item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey {
    pub pk: String,
    pub sk: String,
}

impl ItemKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }

    /// Key attributes as an item, the shape expected by delete-by-key requests.
    pub fn to_item(&self) -> Item {
        Item::new(self.pk.clone(), self.sk.clone())
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.pk, self.sk)
    }
}

/// Opaque cursor returned by a scan page.
///
/// Holds the key attributes of the last evaluated item. Callers only hand it
/// back as the exclusive start key of the next page.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationToken(Item);

impl ContinuationToken {
    /// Wraps the last evaluated key returned by the service.
    ///
    /// An empty key map means the scan is complete, so it yields `None`.
    pub fn from_last_evaluated_key(key: Item) -> Option<Self> {
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn into_key(self) -> Item {
        self.0
    }

    pub fn key(&self) -> &Item {
        &self.0
    }
}

/// One page of a full-table scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub items: Vec<Item>,
    /// `None` once the scan has reached the end of the table.
    pub continuation: Option<ContinuationToken>,
}
