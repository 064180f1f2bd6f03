//! DynamoDB table store implementation.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, Put, ScalarAttributeType,
    TransactWriteItem,
};
use aws_sdk_dynamodb::Client;

use dynamodb_reference_core::item::{ContinuationToken, Item, ItemKey, ScanPage};
use dynamodb_reference_core::storage::{
    self as core_storage, KeyAttribute, PutCondition, Result, TableConfig, TableStore,
};

use super::conversions::{attributes_to_item, item_to_attributes, key_to_attributes};
use super::error::{
    map_build_error, map_put_item_error, map_sdk_error, map_transact_write_items_error,
};

/// DynamoDB-backed table store.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Creates a new store around the given DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn key_schema_element(key: &KeyAttribute, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(&key.name)
        .key_type(key_type)
        .build()
        .map_err(map_build_error)
}

fn attribute_definition(key: &KeyAttribute) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(&key.name)
        .attribute_type(to_scalar_type(&key.attribute_type))
        .build()
        .map_err(map_build_error)
}

fn to_scalar_type(attr_type: &core_storage::AttributeType) -> ScalarAttributeType {
    match attr_type {
        core_storage::AttributeType::String => ScalarAttributeType::S,
    }
}

fn to_billing_mode(mode: &core_storage::BillingMode) -> BillingMode {
    match mode {
        core_storage::BillingMode::PayPerRequest => BillingMode::PayPerRequest,
    }
}

#[async_trait]
impl TableStore for DynamoDbStore {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut start_table_name = None;

        loop {
            let output = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start_table_name.take())
                .send()
                .await
                .map_err(|e| map_sdk_error(e, "ListTables"))?;

            names.extend(output.table_names().iter().cloned());

            match output.last_evaluated_table_name() {
                Some(name) => start_table_name = Some(name.to_string()),
                None => break,
            }
        }

        Ok(names)
    }

    async fn create_table(&self, config: &TableConfig) -> Result<()> {
        let key_schema = vec![
            key_schema_element(&config.partition_key, KeyType::Hash)?,
            key_schema_element(&config.sort_key, KeyType::Range)?,
        ];
        let attribute_definitions = vec![
            attribute_definition(&config.partition_key)?,
            attribute_definition(&config.sort_key)?,
        ];

        self.client
            .create_table()
            .table_name(&config.table_name)
            .set_key_schema(Some(key_schema))
            .set_attribute_definitions(Some(attribute_definitions))
            .billing_mode(to_billing_mode(&config.billing_mode))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "CreateTable"))?;

        Ok(())
    }

    async fn put_item(&self, table_name: &str, item: &Item, condition: &PutCondition) -> Result<()> {
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item_to_attributes(item)))
            .set_condition_expression(condition.expression())
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn transact_put_items(
        &self,
        table_name: &str,
        items: &[Item],
        condition: &PutCondition,
    ) -> Result<()> {
        let transact_items = items
            .iter()
            .map(|item| {
                let put = Put::builder()
                    .table_name(table_name)
                    .set_item(Some(item_to_attributes(item)))
                    .set_condition_expression(condition.expression())
                    .build()
                    .map_err(map_build_error)?;
                Ok(TransactWriteItem::builder().put(put).build())
            })
            .collect::<Result<Vec<_>>>()?;

        self.client
            .transact_write_items()
            .set_transact_items(Some(transact_items))
            .send()
            .await
            .map_err(map_transact_write_items_error)?;

        Ok(())
    }

    async fn scan_page(
        &self,
        table_name: &str,
        start: Option<ContinuationToken>,
    ) -> Result<ScanPage> {
        let output = self
            .client
            .scan()
            .table_name(table_name)
            .set_exclusive_start_key(start.map(|token| item_to_attributes(&token.into_key())))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "Scan"))?;

        let items = output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(attributes_to_item)
            .collect::<Result<Vec<_>>>()?;

        let continuation = output
            .last_evaluated_key
            .map(attributes_to_item)
            .transpose()?
            .and_then(ContinuationToken::from_last_evaluated_key);

        Ok(ScanPage {
            items,
            continuation,
        })
    }

    async fn delete_item(&self, table_name: &str, key: &ItemKey) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table_name)
            .set_key(Some(key_to_attributes(key)))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "DeleteItem"))?;

        Ok(())
    }
}
