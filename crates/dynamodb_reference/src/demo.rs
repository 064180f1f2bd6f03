//! The reference demonstration sequence.
//!
//! Provision the table, show a conditional-write conflict (single put and
//! transaction), then seed items and purge them with a paginated sweep.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use dynamodb_reference_core::item::{seed_item, to_item, Item};
use dynamodb_reference_core::storage::{ErrorKind, Result, TableConfig, TableStore};

use crate::config::DemoSettings;
use crate::items::{count_items, delete_all_items, put_item_if_absent, put_items_transactionally};
use crate::provision::create_table_if_absent;

/// Key of the item used for the conflict demonstration.
const CONFLICT_ITEM_PK: &str = "ITEM#123";
const CONFLICT_ITEM_SK: &str = "A";

/// Outcome of a demo run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoReport {
    pub table_created: bool,
    /// The duplicate single-item put was rejected as a conflict.
    pub conflict_detected: bool,
    /// The transaction containing the duplicate was cancelled as a conflict.
    pub transactional_conflict_detected: bool,
    pub seeded: usize,
    pub deleted: usize,
    /// Items left after the purge; zero on a successful run.
    pub remaining: usize,
}

#[derive(Serialize)]
struct ConflictRecord {
    #[serde(rename = "PK")]
    pk: &'static str,
    #[serde(rename = "SK")]
    sk: &'static str,
}

/// Runs the full sequence against `store`.
pub async fn run(store: &dyn TableStore, settings: &DemoSettings) -> Result<DemoReport> {
    let table = TableConfig::reference(settings.table_name.clone());
    let table_name = table.table_name.as_str();

    let table_created = create_table_if_absent(store, &table).await?;
    if !table_created {
        tracing::info!(table = %table_name, "Using existing table");
    }

    let (conflict_detected, transactional_conflict_detected) =
        condition_check_failure(store, table_name).await?;

    let (seeded, deleted) = put_items_and_delete_all(store, settings).await?;

    let remaining = count_items(store, table_name).await?;
    if remaining == 0 {
        tracing::info!(table = %table_name, "Scan after purge returned zero items");
    } else {
        tracing::warn!(
            table = %table_name,
            remaining,
            "Expected scan to have zero items after purge"
        );
    }

    Ok(DemoReport {
        table_created,
        conflict_detected,
        transactional_conflict_detected,
        seeded,
        deleted,
        remaining,
    })
}

/// Puts the same item twice with `attribute_not_exists(PK)`, then once more
/// inside a transaction. Conflicts are reported, anything else is returned.
async fn condition_check_failure(store: &dyn TableStore, table_name: &str) -> Result<(bool, bool)> {
    delete_all_items(store, table_name).await?;

    let item = to_item(&ConflictRecord {
        pk: CONFLICT_ITEM_PK,
        sk: CONFLICT_ITEM_SK,
    })?;

    tracing::info!(pk = CONFLICT_ITEM_PK, "Putting item");
    put_item_if_absent(store, table_name, &item).await?;

    tracing::info!(
        pk = CONFLICT_ITEM_PK,
        "Putting same item, should fail with condition check failure"
    );
    let single = expect_conflict(put_item_if_absent(store, table_name, &item).await, "PutItem")?;

    let companion = Item::new("ITEM#124", CONFLICT_ITEM_SK);
    tracing::info!(
        pk = CONFLICT_ITEM_PK,
        "Putting same item in a transaction, should be cancelled"
    );
    let transactional = expect_conflict(
        put_items_transactionally(store, table_name, &[companion, item]).await,
        "TransactWriteItems",
    )?;

    Ok((single, transactional))
}

/// Reports the outcome of a write that is expected to conflict.
///
/// Returns whether a conflict was seen; non-conflict errors propagate.
fn expect_conflict(outcome: Result<()>, operation: &'static str) -> Result<bool> {
    match outcome {
        Ok(()) => {
            tracing::warn!(operation, "Duplicate write unexpectedly succeeded");
            Ok(false)
        }
        Err(err) if err.kind() == ErrorKind::Conflict => {
            tracing::info!(operation, error = %err, "Condition check failure");
            Ok(true)
        }
        Err(err) => {
            tracing::error!(operation, error = %err, kind = ?err.kind(), "General error");
            Err(err)
        }
    }
}

/// Seeds `item_count` items with random filler, then deletes them all.
async fn put_items_and_delete_all(
    store: &dyn TableStore,
    settings: &DemoSettings,
) -> Result<(usize, usize)> {
    let table_name = settings.table_name.as_str();
    let mut rng = match settings.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    tracing::info!(
        table = %table_name,
        count = settings.item_count,
        filler_length = settings.filler_length,
        "Seeding items"
    );
    for index in 0..settings.item_count {
        let item = seed_item(&mut rng, index, settings.filler_length);
        put_item_if_absent(store, table_name, &item).await?;
    }

    let deleted = delete_all_items(store, table_name).await?;
    Ok((settings.item_count, deleted))
}
