//! Opaque identifiers for cells and rows.
//!
//! Keys come from one process-wide counter. Operations only ever compare keys
//! for identity, so the counter carries no ordering contract beyond uniqueness.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

fn next_key() -> u64 {
    NEXT_KEY.fetch_add(1, Ordering::Relaxed)
}

/// Stable identity of a cell across structural edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellKey(u64);

impl CellKey {
    /// Allocate a fresh, never-before-seen key.
    #[must_use]
    pub fn generate() -> Self {
        Self(next_key())
    }

    /// Raw numeric value (for hosts that need a plain id, e.g. JS).
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    /// Rebuild a key from its raw value.
    ///
    /// The result only refers to a cell if the value came from [`CellKey::get`]
    /// on a key of the same table.
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Identity of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(u64);

impl RowKey {
    #[must_use]
    pub fn generate() -> Self {
        Self(next_key())
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<CellKey> = (0..1000).map(|_| CellKey::generate()).collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn test_row_and_cell_keys_share_counter() {
        let cell = CellKey::generate();
        let row = RowKey::generate();
        assert_ne!(cell.get(), row.0);
    }

    #[test]
    fn test_display() {
        let key = CellKey::from_raw(42);
        assert_eq!(key.to_string(), "c42");
    }
}
