mod error;
mod table;
mod traits;

pub use error::{
    is_conditional_check_failure, CancellationReason, ErrorKind, Result, StoreError,
    CONDITIONAL_CHECK_FAILED_EXCEPTION, CONDITIONAL_CHECK_FAILED_REASON,
};
pub use table::{AttributeType, BillingMode, KeyAttribute, TableConfig, DEFAULT_TABLE_NAME};
pub use traits::{PutCondition, TableStore};
