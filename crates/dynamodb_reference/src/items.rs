//! Item operations: conditional writes, scan-and-purge, and counting.

use dynamodb_reference_core::item::{ContinuationToken, Item, PARTITION_KEY};
use dynamodb_reference_core::storage::{PutCondition, Result, TableStore};

/// The create-only condition: `attribute_not_exists(PK)`.
pub fn partition_key_absent() -> PutCondition {
    PutCondition::AttributeNotExists(PARTITION_KEY.to_string())
}

/// Writes `item` only if no item with the same key exists.
///
/// A rejected write returns `StoreError::ConditionalCheckFailed`.
pub async fn put_item_if_absent(store: &dyn TableStore, table_name: &str, item: &Item) -> Result<()> {
    store
        .put_item(table_name, item, &partition_key_absent())
        .await
}

/// Writes all `items` in one transaction, each only if its key is unused.
///
/// If any item already exists nothing is written and the error carries one
/// cancellation reason per item.
pub async fn put_items_transactionally(
    store: &dyn TableStore,
    table_name: &str,
    items: &[Item],
) -> Result<()> {
    store
        .transact_put_items(table_name, items, &partition_key_absent())
        .await
}

/// Deletes every item in the table, one delete request per scanned item.
///
/// Pages through a full-table scan until no continuation token is returned.
/// The first failing scan or delete aborts the sweep. Returns the number of
/// delete requests issued.
pub async fn delete_all_items(store: &dyn TableStore, table_name: &str) -> Result<usize> {
    let mut start: Option<ContinuationToken> = None;
    let mut deleted = 0;
    let mut pages = 0;

    loop {
        let page = store.scan_page(table_name, start.take()).await?;
        pages += 1;
        tracing::debug!(table = %table_name, page = pages, items = page.items.len(), "Scanned page");

        for item in &page.items {
            let key = item.key()?;
            store.delete_item(table_name, &key).await?;
            deleted += 1;
        }

        match page.continuation {
            Some(token) => start = Some(token),
            None => break,
        }
    }

    tracing::info!(table = %table_name, deleted, pages, "Deleted all items");
    Ok(deleted)
}

/// Counts the items in the table with a full paginated scan.
pub async fn count_items(store: &dyn TableStore, table_name: &str) -> Result<usize> {
    let mut start: Option<ContinuationToken> = None;
    let mut count = 0;

    loop {
        let page = store.scan_page(table_name, start.take()).await?;
        count += page.items.len();

        match page.continuation {
            Some(token) => start = Some(token),
            None => break,
        }
    }

    Ok(count)
}
