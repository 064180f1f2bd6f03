//! Table store implementations.
//!
//! `dynamodb` talks to a DynamoDB endpoint through `aws-sdk-dynamodb`.
//! `inmemory` keeps tables in process and backs the workflow tests.

pub mod dynamodb;

pub use dynamodb::DynamoDbStore;
#[cfg(test)]
pub use inmemory::InMemoryStore;
