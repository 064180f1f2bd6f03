//! Table provisioning.

use dynamodb_reference_core::storage::{Result, TableConfig, TableStore};

/// Returns true if a table named `name` exists.
pub async fn table_exists(store: &dyn TableStore, name: &str) -> Result<bool> {
    let tables = store.list_tables().await?;
    Ok(tables.iter().any(|table| table == name))
}

/// Creates the table if it does not exist. Returns whether a create occurred.
pub async fn create_table_if_absent(store: &dyn TableStore, config: &TableConfig) -> Result<bool> {
    if table_exists(store, &config.table_name).await? {
        tracing::debug!(table = %config.table_name, "Table already exists");
        return Ok(false);
    }

    store.create_table(config).await?;
    tracing::info!(
        table = %config.table_name,
        partition_key = %config.partition_key.name,
        sort_key = %config.sort_key.name,
        "Created table"
    );
    Ok(true)
}
