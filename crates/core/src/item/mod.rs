mod marshal;
mod seed;
mod types;

pub use marshal::to_item;
pub use seed::{random_filler, seed_item, FILLER_ATTRIBUTE, SEED_SORT_KEY};
pub use types::{ContinuationToken, Item, ItemKey, ScanPage, Value, PARTITION_KEY, SORT_KEY};
