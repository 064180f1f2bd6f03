//! Core types for the DynamoDB reference workflow.
//!
//! Items and keys, the `TableStore` trait, the error hierarchy with its
//! conflict classifier, and the reference table schema. Nothing here performs
//! I/O; backends live in the `dynamodb_reference` crate.

pub mod item;
pub mod storage;
