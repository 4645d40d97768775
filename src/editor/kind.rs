//! Per-table-kind collaborators.
//!
//! Structural edits need three things only the domain knows: whether a payload
//! counts as empty, what an empty payload looks like, and how to derive a new
//! cell from a neighbour. Each table kind supplies them as plain function
//! pointers, so a kind is a value that can be stored and copied freely.

use serde_json::Value;

use crate::types::{Cell, Table};

/// Domain collaborators for a payload type `D`.
pub struct TableKind<D> {
    /// Whether a payload counts as empty when picking a merge prototype
    pub is_cell_empty: fn(&D) -> bool,
    /// Payload for newly created cells
    pub empty_data: fn() -> D,
    /// New cell (fresh key) carrying the prototype's structural flags
    pub create_cell_from: fn(&Cell) -> Cell,
}

// Manual impls: function pointers are always `Copy`, whatever `D` is.
impl<D> Clone for TableKind<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for TableKind<D> {}

impl<D> std::fmt::Debug for TableKind<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableKind").finish_non_exhaustive()
    }
}

impl<D> TableKind<D> {
    /// A kind whose new cells copy the prototype's header flag.
    pub fn new(is_cell_empty: fn(&D) -> bool, empty_data: fn() -> D) -> Self {
        Self {
            is_cell_empty,
            empty_data,
            create_cell_from: Cell::like,
        }
    }

    pub fn is_empty(&self, data: &D) -> bool {
        (self.is_cell_empty)(data)
    }

    pub fn empty(&self) -> D {
        (self.empty_data)()
    }

    /// A 1x1 cell derived from `proto`, whatever spans the constructor chose.
    pub fn unit_cell_like(&self, proto: &Cell) -> Cell {
        (self.create_cell_from)(proto).with_span(1, 1)
    }

    /// The default table: a single non-header cell with empty data.
    pub fn new_table(&self) -> Table<D> {
        Table::with_single_cell(self.empty())
    }
}

impl TableKind<Value> {
    /// Kind for untyped JSON payloads.
    ///
    /// `null`, blank strings, empty arrays and objects whose every value is
    /// empty all count as empty.
    pub fn json() -> Self {
        Self::new(json_is_empty, || Value::Null)
    }
}

fn json_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.values().all(json_is_empty),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_emptiness() {
        let kind = TableKind::json();
        assert!(kind.is_empty(&Value::Null));
        assert!(kind.is_empty(&json!("  ")));
        assert!(kind.is_empty(&json!({ "text": "", "forms": [] })));
        assert!(!kind.is_empty(&json!({ "text": "kata" })));
        assert!(!kind.is_empty(&json!(0)));
    }

    #[test]
    fn test_unit_cell_like_copies_header() {
        let kind = TableKind::json();
        let proto = Cell::header().with_span(2, 3);
        let cell = kind.unit_cell_like(&proto);
        assert!(cell.header);
        assert_eq!((cell.row_span, cell.column_span), (1, 1));
        assert_ne!(cell.key, proto.key);
    }

    #[test]
    fn test_new_table() {
        let table = TableKind::json().new_table();
        let cell = table.cell(table.focus()).unwrap();
        assert!(!cell.header);
        assert_eq!(*table.data(cell.key).unwrap(), Value::Null);
    }
}
