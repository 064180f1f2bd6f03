//! Table schema configuration (pure data).

use crate::item::{PARTITION_KEY, SORT_KEY};

/// Table name used when none is configured.
pub const DEFAULT_TABLE_NAME: &str = "dynamodb-reference-table";

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: KeyAttribute,
    pub billing_mode: BillingMode,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// Scalar attribute types usable in a key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
}

/// Billing mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
}

impl KeyAttribute {
    pub fn string(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute_type: AttributeType::String,
        }
    }
}

impl TableConfig {
    /// The reference schema: `PK` (S, hash), `SK` (S, range), pay-per-request.
    pub fn reference(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key: KeyAttribute::string(PARTITION_KEY),
            sort_key: KeyAttribute::string(SORT_KEY),
            billing_mode: BillingMode::PayPerRequest,
        }
    }

    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::reference(DEFAULT_TABLE_NAME)
    }
}
