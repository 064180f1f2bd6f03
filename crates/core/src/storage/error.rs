use thiserror::Error;

/// Error code the service uses for a failed condition expression.
pub const CONDITIONAL_CHECK_FAILED_EXCEPTION: &str = "ConditionalCheckFailedException";

/// Cancellation reason code for a transaction item whose condition failed.
pub const CONDITIONAL_CHECK_FAILED_REASON: &str = "ConditionalCheckFailed";

/// Coarse error classes, used to decide how a caller reacts to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The write was rejected because its precondition did not hold.
    Conflict,
    /// The request may succeed if sent again later.
    Transient,
    /// Retrying the same request will not help.
    Permanent,
}

/// Why one item of a transaction was cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationReason {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl CancellationReason {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn is_conditional_check_failed(&self) -> bool {
        self.code.as_deref() == Some(CONDITIONAL_CHECK_FAILED_REASON)
    }
}

/// Errors returned by table store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("ConditionalCheckFailedException: {0}")]
    ConditionalCheckFailed(String),
    #[error("Transaction cancelled: {message}")]
    TransactionCanceled {
        message: String,
        reasons: Vec<CancellationReason>,
    },
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Throttled: {0}")]
    Throttled(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid item: {0}")]
    InvalidItem(String),
}

impl StoreError {
    /// Classifies this error.
    ///
    /// A conflict is detected first by message text, then by the cancellation
    /// reasons of a transaction. Single-item puts and transactions report a
    /// failed condition in these two different shapes.
    pub fn kind(&self) -> ErrorKind {
        if self.to_string().contains(CONDITIONAL_CHECK_FAILED_EXCEPTION) {
            return ErrorKind::Conflict;
        }

        match self {
            StoreError::TransactionCanceled { reasons, .. }
                if reasons.iter().any(CancellationReason::is_conditional_check_failed) =>
            {
                ErrorKind::Conflict
            }
            StoreError::ConditionalCheckFailed(_) => ErrorKind::Conflict,
            StoreError::Throttled(_)
            | StoreError::ServiceUnavailable(_)
            | StoreError::ConnectionFailed(_) => ErrorKind::Transient,
            StoreError::TransactionCanceled { .. }
            | StoreError::TableNotFound(_)
            | StoreError::RequestFailed(_)
            | StoreError::InvalidItem(_) => ErrorKind::Permanent,
        }
    }
}

/// Returns true if the error is a conditional-check failure.
pub fn is_conditional_check_failure(err: &StoreError) -> bool {
    err.kind() == ErrorKind::Conflict
}

/// Result type for table store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
