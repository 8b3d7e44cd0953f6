//! Sorting helpers for callers assembling input to [`crate::Set::new`] /
//! [`crate::Map::new`], which both require strictly sorted, deduplicated
//! input.

use crate::symbol::{compare_keys, Symbol};

/// Sorts `keys` by the lexicographic-then-length order construction
/// requires, then removes duplicates.
pub fn sort_keys<S: Symbol>(keys: &mut Vec<Vec<S>>) {
    keys.sort_by(|a, b| compare_keys(a, b));
    keys.dedup();
}

/// Sorts `entries` by key, then removes duplicate keys (keeping the first
/// value seen for each, matching the order-preserving behavior of a stable
/// sort followed by `dedup_by_key`).
pub fn sort_entries<S: Symbol, V: Copy>(entries: &mut Vec<(Vec<S>, V)>) {
    entries.sort_by(|a, b| compare_keys(&a.0, &b.0));
    entries.dedup_by(|a, b| a.0 == b.0);
}
