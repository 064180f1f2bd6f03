//! In-memory table store implementation.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dynamodb_reference_core::item::{ContinuationToken, Item, ItemKey, ScanPage};
use dynamodb_reference_core::storage::{
    CancellationReason, PutCondition, Result, StoreError, TableConfig, TableStore,
    CONDITIONAL_CHECK_FAILED_REASON,
};

/// Scan page byte budget, matching the service's 1 MB page limit.
pub const DEFAULT_PAGE_BYTES: usize = 1024 * 1024;

/// Maximum number of items in one transaction.
const MAX_TRANSACTION_ITEMS: usize = 100;

type Table = BTreeMap<ItemKey, Item>;

/// In-memory storage backend for testing.
///
/// Tables are `BTreeMap`s keyed by `(PK, SK)` so scans walk items in key
/// order and a continuation token can resume after the last returned key.
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
    page_bytes: usize,
    page_items: Option<usize>,
    delete_budget: Option<usize>,
    scan_budget: Option<usize>,
    scan_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new store with no tables.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            page_bytes: DEFAULT_PAGE_BYTES,
            page_items: None,
            delete_budget: None,
            scan_budget: None,
            scan_calls: Arc::new(AtomicUsize::new(0)),
            delete_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Closes scan pages once their accumulated item size reaches `bytes`.
    pub fn with_page_bytes(mut self, bytes: usize) -> Self {
        self.page_bytes = bytes.max(1);
        self
    }

    /// Caps the number of items per scan page.
    pub fn with_page_items(mut self, items: usize) -> Self {
        self.page_items = Some(items.max(1));
        self
    }

    /// Fails every delete after the first `deletes` with a connection error.
    pub fn with_delete_budget(mut self, deletes: usize) -> Self {
        self.delete_budget = Some(deletes);
        self
    }

    /// Fails every scan after the first `scans` with a connection error.
    pub fn with_scan_budget(mut self, scans: usize) -> Self {
        self.scan_budget = Some(scans);
        self
    }

    /// Number of scan requests received so far, failed ones included.
    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    /// Number of delete requests received so far, failed ones included.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Number of items currently stored in `table_name`.
    pub async fn item_count(&self, table_name: &str) -> Option<usize> {
        self.tables.read().await.get(table_name).map(BTreeMap::len)
    }
}

fn table_not_found(table_name: &str) -> StoreError {
    StoreError::TableNotFound(format!(
        "Cannot do operations on a non-existent table: {table_name}"
    ))
}

/// Evaluates `condition` against the stored item with the same key.
fn condition_holds(existing: Option<&Item>, condition: &PutCondition) -> bool {
    match condition {
        PutCondition::None => true,
        PutCondition::AttributeNotExists(name) => !existing.is_some_and(|item| item.contains(name)),
    }
}

#[async_trait]
impl TableStore for InMemoryStore {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let tables = self.tables.read().await;
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn create_table(&self, config: &TableConfig) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(&config.table_name) {
            return Err(StoreError::RequestFailed(format!(
                "ResourceInUseException: Table already exists: {}",
                config.table_name
            )));
        }
        tables.insert(config.table_name.clone(), BTreeMap::new());
        Ok(())
    }

    async fn put_item(&self, table_name: &str, item: &Item, condition: &PutCondition) -> Result<()> {
        let key = item.key()?;
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| table_not_found(table_name))?;

        if !condition_holds(table.get(&key), condition) {
            return Err(StoreError::ConditionalCheckFailed(
                "The conditional request failed".to_string(),
            ));
        }

        table.insert(key, item.clone());
        Ok(())
    }

    async fn transact_put_items(
        &self,
        table_name: &str,
        items: &[Item],
        condition: &PutCondition,
    ) -> Result<()> {
        if items.is_empty() {
            return Err(StoreError::RequestFailed(
                "ValidationException: Member must have length greater than or equal to 1"
                    .to_string(),
            ));
        }
        if items.len() > MAX_TRANSACTION_ITEMS {
            return Err(StoreError::RequestFailed(format!(
                "ValidationException: Member must have length less than or equal to {MAX_TRANSACTION_ITEMS}"
            )));
        }

        let keys = items.iter().map(Item::key).collect::<Result<Vec<_>>>()?;
        let mut seen = HashSet::new();
        if !keys.iter().all(|key| seen.insert(key)) {
            return Err(StoreError::RequestFailed(
                "ValidationException: Transaction request cannot include multiple operations on one item"
                    .to_string(),
            ));
        }

        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| table_not_found(table_name))?;

        let reasons: Vec<CancellationReason> = keys
            .iter()
            .map(|key| {
                if condition_holds(table.get(key), condition) {
                    CancellationReason::new("None")
                } else {
                    CancellationReason::new(CONDITIONAL_CHECK_FAILED_REASON)
                        .with_message("The conditional request failed")
                }
            })
            .collect();

        if reasons
            .iter()
            .any(|r| r.code.as_deref() == Some(CONDITIONAL_CHECK_FAILED_REASON))
        {
            let codes: Vec<&str> = reasons
                .iter()
                .map(|r| r.code.as_deref().unwrap_or("None"))
                .collect();
            return Err(StoreError::TransactionCanceled {
                message: format!(
                    "Transaction cancelled, please refer cancellation reasons for specific reasons [{}]",
                    codes.join(", ")
                ),
                reasons,
            });
        }

        for (key, item) in keys.into_iter().zip(items) {
            table.insert(key, item.clone());
        }
        Ok(())
    }

    async fn scan_page(
        &self,
        table_name: &str,
        start: Option<ContinuationToken>,
    ) -> Result<ScanPage> {
        let calls = self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if self.scan_budget.is_some_and(|budget| calls >= budget) {
            return Err(StoreError::ConnectionFailed(
                "dispatch failure: connection refused".to_string(),
            ));
        }

        let lower = match start {
            Some(token) => Bound::Excluded(token.into_key().key()?),
            None => Bound::Unbounded,
        };

        let tables = self.tables.read().await;
        let table = tables
            .get(table_name)
            .ok_or_else(|| table_not_found(table_name))?;

        let mut remaining = table.range((lower, Bound::Unbounded)).peekable();
        let mut items = Vec::new();
        let mut bytes = 0;

        for (_, item) in remaining.by_ref() {
            bytes += item.size();
            items.push(item.clone());

            let full = bytes >= self.page_bytes
                || self.page_items.is_some_and(|limit| items.len() >= limit);
            if full {
                break;
            }
        }

        let continuation = match (remaining.peek(), items.last()) {
            (Some(_), Some(last)) => {
                ContinuationToken::from_last_evaluated_key(last.key()?.to_item())
            }
            _ => None,
        };

        Ok(ScanPage {
            items,
            continuation,
        })
    }

    async fn delete_item(&self, table_name: &str, key: &ItemKey) -> Result<()> {
        let calls = self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.delete_budget.is_some_and(|budget| calls >= budget) {
            return Err(StoreError::ConnectionFailed(
                "dispatch failure: connection refused".to_string(),
            ));
        }

        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| table_not_found(table_name))?;
        table.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamodb_reference_core::item::Value;
    use dynamodb_reference_core::storage::is_conditional_check_failure;

    const TABLE: &str = "test-table";

    fn not_exists_pk() -> PutCondition {
        PutCondition::AttributeNotExists("PK".to_string())
    }

    async fn store_with_table() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .create_table(&TableConfig::reference(TABLE))
            .await
            .unwrap();
        store
    }

    // ==================== Table Tests ====================

    #[tokio::test]
    async fn test_create_and_list_tables() {
        let store = InMemoryStore::new();
        store.create_table(&TableConfig::reference("b")).await.unwrap();
        store.create_table(&TableConfig::reference("a")).await.unwrap();

        assert_eq!(store.list_tables().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_create_existing_table_fails() {
        let store = store_with_table().await;
        let err = store
            .create_table(&TableConfig::reference(TABLE))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RequestFailed(_)));
    }

    // ==================== Put Tests ====================

    #[tokio::test]
    async fn test_put_on_missing_table() {
        let store = InMemoryStore::new();
        let err = store
            .put_item("missing", &Item::new("P", "S"), &PutCondition::None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TableNotFound(_)));
    }

    #[tokio::test]
    async fn test_conditional_put_twice() {
        let store = store_with_table().await;
        let item = Item::new("ITEM#123", "A");

        store.put_item(TABLE, &item, &not_exists_pk()).await.unwrap();
        let err = store
            .put_item(TABLE, &item, &not_exists_pk())
            .await
            .unwrap_err();

        assert!(is_conditional_check_failure(&err));
    }

    #[tokio::test]
    async fn test_conditional_put_same_pk_different_sk_succeeds() {
        let store = store_with_table().await;

        store
            .put_item(TABLE, &Item::new("ITEM#123", "A"), &not_exists_pk())
            .await
            .unwrap();
        store
            .put_item(TABLE, &Item::new("ITEM#123", "B"), &not_exists_pk())
            .await
            .unwrap();

        assert_eq!(store.item_count(TABLE).await, Some(2));
    }

    #[tokio::test]
    async fn test_unconditional_put_overwrites() {
        let store = store_with_table().await;
        store
            .put_item(TABLE, &Item::new("P", "S").with("v", "1"), &PutCondition::None)
            .await
            .unwrap();
        store
            .put_item(TABLE, &Item::new("P", "S").with("v", "2"), &PutCondition::None)
            .await
            .unwrap();

        let page = store.scan_page(TABLE, None).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].get("v"), Some(&Value::S("2".to_string())));
    }

    #[tokio::test]
    async fn test_put_without_key_is_invalid() {
        let store = store_with_table().await;
        let item = Item::default().with("PK", "only-pk");
        let err = store
            .put_item(TABLE, &item, &PutCondition::None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidItem(_)));
    }

    // ==================== Transaction Tests ====================

    #[tokio::test]
    async fn test_transaction_cancelled_on_existing_item() {
        let store = store_with_table().await;
        store
            .put_item(TABLE, &Item::new("P-2", "A"), &not_exists_pk())
            .await
            .unwrap();

        let err = store
            .transact_put_items(
                TABLE,
                &[Item::new("P-1", "A"), Item::new("P-2", "A")],
                &not_exists_pk(),
            )
            .await
            .unwrap_err();

        match &err {
            StoreError::TransactionCanceled { reasons, .. } => {
                assert_eq!(reasons[0].code.as_deref(), Some("None"));
                assert_eq!(reasons[1].code.as_deref(), Some("ConditionalCheckFailed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(is_conditional_check_failure(&err));
        // Nothing from a cancelled transaction is written
        assert_eq!(store.item_count(TABLE).await, Some(1));
    }

    #[tokio::test]
    async fn test_transaction_writes_all_items() {
        let store = store_with_table().await;
        store
            .transact_put_items(
                TABLE,
                &[Item::new("P-1", "A"), Item::new("P-2", "A")],
                &not_exists_pk(),
            )
            .await
            .unwrap();
        assert_eq!(store.item_count(TABLE).await, Some(2));
    }

    #[tokio::test]
    async fn test_transaction_rejects_duplicate_keys() {
        let store = store_with_table().await;
        let err = store
            .transact_put_items(
                TABLE,
                &[Item::new("P-1", "A"), Item::new("P-1", "A")],
                &not_exists_pk(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RequestFailed(_)));
        assert!(!is_conditional_check_failure(&err));
    }

    #[tokio::test]
    async fn test_transaction_rejects_empty_request() {
        let store = store_with_table().await;
        let err = store
            .transact_put_items(TABLE, &[], &not_exists_pk())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RequestFailed(_)));
        assert!(!is_conditional_check_failure(&err));
    }

    // ==================== Scan Tests ====================

    #[tokio::test]
    async fn test_scan_empty_table() {
        let store = store_with_table().await;
        let page = store.scan_page(TABLE, None).await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.continuation.is_none());
    }

    #[tokio::test]
    async fn test_scan_pages_by_item_limit() {
        let store = store_with_table().await.with_page_items(2);
        for i in 0..5 {
            store
                .put_item(TABLE, &Item::new(format!("PK-{i}"), "A"), &PutCondition::None)
                .await
                .unwrap();
        }

        let mut pages = Vec::new();
        let mut start = None;
        loop {
            let page = store.scan_page(TABLE, start).await.unwrap();
            pages.push(page.items.len());
            match page.continuation {
                Some(token) => start = Some(token),
                None => break,
            }
        }

        assert_eq!(pages, vec![2, 2, 1]);
        assert_eq!(store.scan_calls(), 3);
    }

    #[tokio::test]
    async fn test_scan_pages_by_byte_budget() {
        let store = store_with_table().await.with_page_bytes(250);
        for i in 0..4 {
            let item = Item::new(format!("PK-{i}"), "A").with("Filler", "x".repeat(100));
            store.put_item(TABLE, &item, &PutCondition::None).await.unwrap();
        }

        // Each item is 115 bytes; the page closes on the item that crosses 250.
        let first = store.scan_page(TABLE, None).await.unwrap();
        assert_eq!(first.items.len(), 3);
        let second = store.scan_page(TABLE, first.continuation).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(second.continuation.is_none());
    }

    #[tokio::test]
    async fn test_scan_missing_table() {
        let store = InMemoryStore::new();
        let err = store.scan_page("missing", None).await.unwrap_err();
        assert!(matches!(err, StoreError::TableNotFound(_)));
    }

    // ==================== Delete Tests ====================

    #[tokio::test]
    async fn test_delete_missing_item_succeeds() {
        let store = store_with_table().await;
        store
            .delete_item(TABLE, &ItemKey::new("nope", "A"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_scan_budget_fails_after_limit() {
        let store = store_with_table().await.with_scan_budget(1);
        store.scan_page(TABLE, None).await.unwrap();
        let err = store.scan_page(TABLE, None).await.unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailed(_)));
        assert_eq!(store.scan_calls(), 2);
    }

    #[tokio::test]
    async fn test_delete_budget_fails_after_limit() {
        let store = store_with_table().await.with_delete_budget(1);
        store
            .delete_item(TABLE, &ItemKey::new("a", "A"))
            .await
            .unwrap();
        let err = store
            .delete_item(TABLE, &ItemKey::new("b", "A"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailed(_)));
        assert_eq!(store.delete_calls(), 2);
    }
}
