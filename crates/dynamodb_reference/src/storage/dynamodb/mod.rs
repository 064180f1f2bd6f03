//! DynamoDB storage backend implementation.
//!
//! Implements `TableStore` from `dynamodb_reference_core::storage` using
//! `aws-sdk-dynamodb`, pointed at DynamoDB Local.

mod client;
mod conversions;
mod error;
mod store;


pub use client::{create_local_client, LocalClientConfig, DEFAULT_PORT, DEFAULT_REGION};
pub use store::DynamoDbStore;
