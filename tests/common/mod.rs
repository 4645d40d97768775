//! Common test utilities and assertion helpers.
//!
//! Slot-level views of a table and checks for the grid invariants that every
//! edit must preserve.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::collections::HashMap;

use serde_json::Value;
use tablegrid::editor::select;
use tablegrid::{CellKey, Table};

// Re-export fixtures for convenience
pub use super::fixtures::*;

// ============================================================================
// Slot views
// ============================================================================

/// Key covering every slot, row-major.
pub fn slot_keys(table: &Table<Value>) -> Vec<Vec<CellKey>> {
    let layout = table.layout();
    (0..layout.row_count())
        .map(|r| {
            (0..layout.column_count())
                .map(|c| layout.cell_at(r, c).expect("hole in layout"))
                .collect()
        })
        .collect()
}

/// Payload of every slot as text (`""` for null), row-major.
pub fn slot_labels(table: &Table<Value>) -> Vec<Vec<String>> {
    slot_keys(table)
        .into_iter()
        .map(|row| row.into_iter().map(|key| label(table, key)).collect())
        .collect()
}

pub fn label(table: &Table<Value>, key: CellKey) -> String {
    match table.data(key).unwrap() {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Home slot of a cell.
pub fn home(table: &Table<Value>, key: CellKey) -> (usize, usize) {
    let position = table.layout().position(key).unwrap();
    (position.row, position.column)
}

pub fn focus_slot(table: &Table<Value>) -> (usize, usize) {
    home(table, table.focus())
}

pub fn anchor_slot(table: &Table<Value>) -> (usize, usize) {
    home(table, table.anchor())
}

/// Select between whatever covers the two slots.
pub fn select_slots(table: &Table<Value>, from: (usize, usize), to: (usize, usize)) -> Table<Value> {
    let layout = table.layout();
    let anchor = layout.cell_at(from.0, from.1).expect("anchor slot out of range");
    let focus = layout.cell_at(to.0, to.1).expect("focus slot out of range");
    select(table, anchor, focus).unwrap().into_owned()
}

// ============================================================================
// Invariant assertions
// ============================================================================

/// Every slot is covered by exactly one cell, every cell covers exactly its
/// span rectangle, and the store, rows and layout agree.
pub fn assert_tiles(table: &Table<Value>) {
    let layout = table.layout();
    let (rows, columns) = (layout.row_count(), layout.column_count());
    assert!(rows >= 1 && columns >= 1, "empty grid {rows}x{columns}");
    assert_eq!(table.rows().len(), rows, "row list count differs from layout");

    let mut area: HashMap<CellKey, usize> = HashMap::new();
    for r in 0..rows {
        for c in 0..columns {
            let key = layout.cell_at(r, c).unwrap_or_else(|| panic!("slot ({r}, {c}) uncovered"));
            let position = layout.position(key).unwrap();
            assert!(
                (position.row..=position.end_row()).contains(&r)
                    && (position.column..=position.end_column()).contains(&c),
                "slot ({r}, {c}) maps to {key} outside its span"
            );
            *area.entry(key).or_default() += 1;
        }
    }

    let mut listed = 0;
    for (row_index, row) in table.rows().iter().enumerate() {
        for &key in &row.cells {
            listed += 1;
            let cell = table.cell(key).unwrap();
            table.data(key).unwrap();
            assert_eq!(home(table, key).0, row_index, "{key} listed in the wrong row");
            assert_eq!(
                area.get(&key).copied(),
                Some(cell.row_span * cell.column_span),
                "{key} covers the wrong number of slots"
            );
        }
    }
    assert_eq!(listed, table.cell_count(), "store holds cells no row lists");
    assert_eq!(area.len(), table.cell_count());
}

/// The selection is a union of whole cells: every cell touching the bounds
/// lies inside them and is in the selected set.
pub fn assert_selection_closed(table: &Table<Value>) {
    let shape = table.selection_shape();
    let bounds = shape.bounds;
    let layout = table.layout();
    for r in bounds.min_row..=bounds.max_row {
        for c in bounds.min_column..=bounds.max_column {
            let key = layout.cell_at(r, c).unwrap();
            assert!(shape.contains(key), "{key} at ({r}, {c}) not selected");
            let position = layout.position(key).unwrap();
            assert!(
                bounds.contains(position.row, position.column)
                    && bounds.contains(position.end_row(), position.end_column()),
                "{key} sticks out of the selection"
            );
        }
    }
    assert!(shape.contains(table.anchor()));
    assert!(shape.contains(table.focus()));
}
