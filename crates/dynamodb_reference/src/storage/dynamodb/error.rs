//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `dynamodb_reference_core::storage`.
//! Conditional-check failures arrive in two shapes: a typed exception on
//! single-item writes, and cancellation reasons on transactions.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;

use dynamodb_reference_core::storage::{
    CancellationReason, StoreError, CONDITIONAL_CHECK_FAILED_EXCEPTION,
};

/// Map any SDK error to StoreError by transport failure or service error code.
pub fn map_sdk_error<E, R>(err: SdkError<E, R>, operation: &'static str) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    let message = format!("{operation} failed: {}", DisplayErrorContext(&err));

    match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            return StoreError::ConnectionFailed(message)
        }
        SdkError::ConstructionFailure(_) => return StoreError::RequestFailed(message),
        _ => {}
    }

    let code = err.as_service_error().and_then(|e| e.code());
    match code {
        Some(CONDITIONAL_CHECK_FAILED_EXCEPTION) => StoreError::ConditionalCheckFailed(
            err.as_service_error()
                .and_then(|e| e.message())
                .unwrap_or("The conditional request failed")
                .to_string(),
        ),
        Some("ResourceNotFoundException") => StoreError::TableNotFound(message),
        Some(
            "ProvisionedThroughputExceededException"
            | "RequestLimitExceeded"
            | "ThrottlingException"
            | "TransactionConflictException",
        ) => StoreError::Throttled(message),
        Some("InternalServerError" | "ServiceUnavailable") => {
            StoreError::ServiceUnavailable(message)
        }
        _ => StoreError::RequestFailed(message),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> StoreError {
    if let Some(PutItemError::ConditionalCheckFailedException(e)) = err.as_service_error() {
        return StoreError::ConditionalCheckFailed(
            e.message()
                .unwrap_or("The conditional request failed")
                .to_string(),
        );
    }
    map_sdk_error(err, "PutItem")
}

/// Map a TransactWriteItems SDK error to StoreError, keeping cancellation reasons.
pub fn map_transact_write_items_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<TransactWriteItemsError, R>,
) -> StoreError {
    if let Some(TransactWriteItemsError::TransactionCanceledException(e)) = err.as_service_error()
    {
        return StoreError::TransactionCanceled {
            message: e.message().unwrap_or("Transaction cancelled").to_string(),
            reasons: e
                .cancellation_reasons()
                .iter()
                .map(|reason| CancellationReason {
                    code: reason.code().map(str::to_string),
                    message: reason.message().map(str::to_string),
                })
                .collect(),
        };
    }
    map_sdk_error(err, "TransactWriteItems")
}

/// Map a builder error (missing required field) to StoreError.
pub fn map_build_error(err: aws_sdk_dynamodb::error::BuildError) -> StoreError {
    StoreError::RequestFailed(format!("invalid request: {err}"))
}
