use async_trait::async_trait;

use crate::item::{ContinuationToken, Item, ItemKey, ScanPage};

use super::{Result, TableConfig};

/// Condition attached to a put request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutCondition {
    /// Write unconditionally.
    None,
    /// Write only if the stored item with the same key lacks this attribute.
    AttributeNotExists(String),
}

impl PutCondition {
    /// The condition as a DynamoDB condition expression.
    pub fn expression(&self) -> Option<String> {
        match self {
            PutCondition::None => None,
            PutCondition::AttributeNotExists(name) => Some(format!("attribute_not_exists({name})")),
        }
    }
}

/// Access to a key-value table service.
///
/// One method per service call. Implementations translate service failures
/// into `StoreError` so callers can classify them.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Lists the names of all tables.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Creates a table with the given schema.
    async fn create_table(&self, config: &TableConfig) -> Result<()>;

    /// Writes an item, subject to `condition`.
    async fn put_item(&self, table_name: &str, item: &Item, condition: &PutCondition) -> Result<()>;

    /// Writes all items atomically, each subject to `condition`.
    async fn transact_put_items(
        &self,
        table_name: &str,
        items: &[Item],
        condition: &PutCondition,
    ) -> Result<()>;

    /// Returns one page of a full-table scan, starting after `start` if given.
    async fn scan_page(
        &self,
        table_name: &str,
        start: Option<ContinuationToken>,
    ) -> Result<ScanPage>;

    /// Deletes the item with the given key. Deleting a missing item succeeds.
    async fn delete_item(&self, table_name: &str, key: &ItemKey) -> Result<()>;
}
