//! Seed item generation for the bulk-delete demo.

use rand::Rng;

use super::Item;

/// Alphabet used for filler payloads.
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Attribute holding the random payload on seed items.
pub const FILLER_ATTRIBUTE: &str = "Filler";

/// Sort key shared by every seed item.
pub const SEED_SORT_KEY: &str = "A";

/// Returns a random string of `len` ASCII letters.
pub fn random_filler<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| LETTERS[rng.random_range(0..LETTERS.len())] as char)
        .collect()
}

/// Builds the seed item for `index`: `PK = PK-<index>`, `SK = A`, plus filler.
pub fn seed_item<R: Rng + ?Sized>(rng: &mut R, index: usize, filler_len: usize) -> Item {
    Item::new(format!("PK-{index}"), SEED_SORT_KEY)
        .with(FILLER_ATTRIBUTE, random_filler(rng, filler_len))
}
