use dynamodb_reference_core::storage::DEFAULT_TABLE_NAME;

/// Number of items seeded before the purge.
pub const DEFAULT_ITEM_COUNT: usize = 500;

/// Length of the random filler attribute on each seeded item.
pub const DEFAULT_FILLER_LENGTH: usize = 10_000;

/// Settings for the demonstration sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSettings {
    /// Table every step operates on.
    pub table_name: String,
    /// Items to seed before the purge.
    pub item_count: usize,
    /// Characters of random filler per seeded item.
    pub filler_length: usize,
    /// Seed for the filler generator; OS entropy when `None`.
    pub rng_seed: Option<u64>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            item_count: DEFAULT_ITEM_COUNT,
            filler_length: DEFAULT_FILLER_LENGTH,
            rng_seed: None,
        }
    }
}
