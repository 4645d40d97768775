//! Integration tests for structural edits on merged-cell tables.
//!
//! Tables are written out as slot grids of labels: a cell spanning several
//! slots shows its label in each of them, and `""` marks an empty cell.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;
mod fixtures;

use std::borrow::Cow;

use common::{
    anchor_slot, assert_selection_closed, assert_tiles, focus_slot, home, label, select_slots,
    slot_labels,
};
use fixtures::{grid, kind, TableFixture};
use serde_json::Value;
use tablegrid::editor::{
    delete_selected_columns, delete_selected_rows, insert_column, insert_row, merge_selected,
    move_focus, select_all, separate_selected, toggle_header_selected, Delta, InsertLocation,
};
use test_case::test_case;

fn labels(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|s| (*s).to_string()).collect())
        .collect()
}

/// A spans rows 0-1 in column 0; B and C are plain in column 1.
fn tall_left() -> tablegrid::Table<Value> {
    TableFixture::new()
        .row()
        .cell("A")
        .span(2, 1)
        .cell("B")
        .row()
        .cell("C")
        .build()
}

// ============================================================================
// MERGE / SEPARATE
// ============================================================================

#[test]
fn test_merge_and_separate_two_by_two() {
    let table = TableFixture::new()
        .row()
        .cell("A")
        .cell("B")
        .row()
        .cell("C")
        .cell("D")
        .build();
    let a = table.rows()[0].cells[0];
    let table = select_slots(&table, (0, 0), (1, 1));

    let merged = merge_selected(&table, &kind()).unwrap().into_owned();
    assert_tiles(&merged);
    assert_eq!(merged.cell_count(), 1);
    let cell = merged.cell(a).unwrap();
    assert_eq!((cell.row_span, cell.column_span), (2, 2));
    assert_eq!(label(&merged, a), "A");
    assert_eq!(merged.anchor(), a);
    assert_eq!(merged.focus(), a);

    let separated = separate_selected(&merged, &kind()).unwrap().into_owned();
    assert_tiles(&separated);
    assert_eq!(separated.cell_count(), 4);
    assert_eq!(slot_labels(&separated), labels(&[&["A", ""], &["", ""]]));
    assert_eq!(separated.layout().cell_at(0, 0), Some(a));
    assert_eq!(anchor_slot(&separated), (0, 0));
    assert_eq!(focus_slot(&separated), (1, 1));
}

#[test]
fn test_merge_prototype_skips_empty_cells() {
    let table = TableFixture::new().row().empty().empty().cell("x").build();
    let x = table.rows()[0].cells[2];
    let table = select_slots(&table, (0, 0), (0, 2));

    let merged = merge_selected(&table, &kind()).unwrap().into_owned();
    assert_eq!(merged.rows()[0].cells, vec![x]);
    assert_eq!(slot_labels(&merged), labels(&[&["x", "x", "x"]]));
}

#[test]
fn test_merge_expands_over_partial_merge() {
    // Selecting A and B pulls in row 1, since A is two rows tall.
    //  A | B | C
    //  A | D | E
    let table = TableFixture::new()
        .row()
        .cell("A")
        .span(2, 1)
        .cell("B")
        .cell("C")
        .row()
        .cell("D")
        .cell("E")
        .build();
    let table = select_slots(&table, (0, 0), (0, 1));
    assert_eq!(table.selection_shape().bounds.max_row, 1);
    assert_selection_closed(&table);

    let merged = merge_selected(&table, &kind()).unwrap().into_owned();
    assert_tiles(&merged);
    assert_eq!(slot_labels(&merged), labels(&[&["A", "A", "C"], &["A", "A", "E"]]));
}

#[test]
fn test_separate_only_touches_selected_merges() {
    let table = TableFixture::new()
        .row()
        .cell("A")
        .span(1, 2)
        .cell("B")
        .span(1, 2)
        .build();
    let separated = separate_selected(&table, &kind()).unwrap().into_owned();
    assert_tiles(&separated);
    assert_eq!(slot_labels(&separated), labels(&[&["A", "", "B", "B"]]));
}

#[test]
fn test_separate_noop_returns_input() {
    let table = grid(2, 2);
    let table = select_slots(&table, (0, 0), (1, 1));
    assert!(matches!(
        separate_selected(&table, &kind()).unwrap(),
        Cow::Borrowed(_)
    ));
}

#[test]
fn test_merge_separate_round_trip_keeps_headers() {
    let table = TableFixture::new()
        .row()
        .header("H1")
        .header("H2")
        .row()
        .header("H3")
        .header("H4")
        .build();
    let table = select_slots(&table, (0, 0), (1, 1));
    let merged = merge_selected(&table, &kind()).unwrap().into_owned();
    let separated = separate_selected(&merged, &kind()).unwrap().into_owned();

    assert_eq!(separated.cell_count(), table.cell_count());
    assert!(separated.cells().all(|cell| cell.header));
    // Only the prototype's content survives.
    assert_eq!(slot_labels(&separated), labels(&[&["H1", ""], &["", ""]]));
}

// ============================================================================
// INSERT
// ============================================================================

#[test]
fn test_insert_column_after_middle_of_three() {
    let table = grid(1, 3);
    let middle = table.rows()[0].cells[1];
    let table = select_slots(&table, (0, 1), (0, 1));

    let next = insert_column(&table, &kind(), InsertLocation::After).unwrap().into_owned();
    assert_tiles(&next);
    assert_eq!(slot_labels(&next), labels(&[&["r0c0", "r0c1", "", "r0c2"]]));
    assert_eq!(focus_slot(&next), (0, 2));
    assert_eq!(home(&next, middle), (0, 1));
}

#[test_case(InsertLocation::Start, 0 ; "start")]
#[test_case(InsertLocation::Before, 1 ; "before")]
#[test_case(InsertLocation::After, 2 ; "after")]
#[test_case(InsertLocation::End, 3 ; "end")]
fn test_insert_row_locations(location: InsertLocation, expected_row: usize) {
    let table = grid(3, 2);
    let table = select_slots(&table, (1, 1), (1, 1));

    let next = insert_row(&table, &kind(), location).unwrap().into_owned();
    assert_tiles(&next);
    assert_eq!(next.layout().row_count(), 4);
    assert_eq!(slot_labels(&next)[expected_row], vec!["", ""]);
    assert_eq!(focus_slot(&next), (expected_row, 1));
}

#[test_case(InsertLocation::Start, 0 ; "start")]
#[test_case(InsertLocation::Before, 1 ; "before")]
#[test_case(InsertLocation::After, 2 ; "after")]
#[test_case(InsertLocation::End, 3 ; "end")]
fn test_insert_column_locations(location: InsertLocation, expected_column: usize) {
    let table = grid(2, 3);
    let table = select_slots(&table, (0, 1), (0, 1));

    let next = insert_column(&table, &kind(), location).unwrap().into_owned();
    assert_tiles(&next);
    assert_eq!(next.layout().column_count(), 4);
    for row in slot_labels(&next) {
        assert_eq!(row[expected_column], "");
    }
    assert_eq!(focus_slot(&next), (0, expected_column));
}

#[test]
fn test_insert_row_inside_tall_cell_focuses_extended_cell() {
    let table = tall_left();
    let a = table.rows()[0].cells[0];
    let table = select_slots(&table, (1, 1), (1, 1));

    let next = insert_row(&table, &kind(), InsertLocation::Before).unwrap().into_owned();
    assert_tiles(&next);
    assert_eq!(slot_labels(&next), labels(&[&["A", "B"], &["A", ""], &["A", "C"]]));

    // Column 0 of the new row is the extended cell, not a new one.
    let moved = move_focus(&next, Delta::Stay, Delta::First, false).unwrap().into_owned();
    assert_eq!(moved.focus(), a);
}

#[test]
fn test_insert_column_mirrors_header_and_height() {
    let table = TableFixture::new()
        .row()
        .header("H")
        .span(2, 1)
        .cell("x")
        .row()
        .cell("y")
        .build();
    let next = insert_column(&table, &kind(), InsertLocation::Start).unwrap().into_owned();
    assert_tiles(&next);
    let created = next.focus();
    let cell = next.cell(created).unwrap();
    assert!(cell.header);
    assert_eq!((cell.row_span, cell.column_span), (2, 1));
    assert_eq!(slot_labels(&next), labels(&[&["", "H", "x"], &["", "H", "y"]]));
}

#[test]
fn test_insert_then_delete_restores_size() {
    let table = tall_left();
    let table = select_slots(&table, (1, 1), (1, 1));
    let inserted = insert_row(&table, &kind(), InsertLocation::Before).unwrap().into_owned();
    let deleted = delete_selected_rows(&inserted, &kind()).unwrap().into_owned();
    assert_tiles(&deleted);
    assert_eq!(deleted.layout().row_count(), table.layout().row_count());
    assert_eq!(slot_labels(&deleted), slot_labels(&table));
}

// ============================================================================
// DELETE
// ============================================================================

#[test]
fn test_delete_all_rows_through_tall_cell_collapses() {
    let table = tall_left();
    let table = select_slots(&table, (0, 0), (1, 1));

    let next = delete_selected_rows(&table, &kind()).unwrap().into_owned();
    assert_tiles(&next);
    assert_eq!(next.layout().row_count(), 1);
    assert_eq!(next.layout().column_count(), 1);
    let only = next.cell(next.focus()).unwrap();
    assert!(!only.header);
    assert_eq!(next.data(only.key).unwrap(), &Value::Null);
}

#[test]
fn test_delete_rows_covering_tall_cell() {
    let table = TableFixture::new()
        .row()
        .cell("A")
        .span(2, 1)
        .cell("B")
        .row()
        .cell("C")
        .row()
        .cell("D")
        .cell("E")
        .build();
    let table = select_slots(&table, (0, 1), (1, 1));

    let next = delete_selected_rows(&table, &kind()).unwrap().into_owned();
    assert_tiles(&next);
    assert_eq!(slot_labels(&next), labels(&[&["D", "E"]]));
    assert_eq!(focus_slot(&next), (0, 1));
}

#[test]
fn test_delete_last_column_moves_focus_left() {
    let table = grid(2, 3);
    let table = select_slots(&table, (1, 2), (1, 2));
    let next = delete_selected_columns(&table, &kind()).unwrap().into_owned();
    assert_tiles(&next);
    assert_eq!(next.layout().column_count(), 2);
    assert_eq!(focus_slot(&next), (1, 1));
}

#[test]
fn test_delete_column_inside_wide_cell_keeps_its_place() {
    //  x | W | W
    //  y | p | q
    let table = TableFixture::new()
        .row()
        .cell("x")
        .cell("W")
        .span(1, 2)
        .row()
        .cell("y")
        .cell("p")
        .cell("q")
        .build();
    let table = select_slots(&table, (1, 1), (1, 1));

    let next = delete_selected_columns(&table, &kind()).unwrap().into_owned();
    assert_tiles(&next);
    assert_eq!(slot_labels(&next), labels(&[&["x", "W"], &["y", "q"]]));
}

#[test]
fn test_delete_all_columns_collapses() {
    let table = grid(3, 2);
    let table = select_slots(&table, (1, 0), (1, 1));
    let next = delete_selected_columns(&table, &kind()).unwrap().into_owned();
    assert_eq!(next.cell_count(), 1);
}

// ============================================================================
// HEADERS AND NAVIGATION
// ============================================================================

#[test]
fn test_toggle_header_batch() {
    let table = grid(2, 2);
    let table = select_slots(&table, (0, 0), (0, 1));
    let next = toggle_header_selected(&table).unwrap().into_owned();
    let headers: Vec<bool> = next.rows()[0]
        .cells
        .iter()
        .chain(&next.rows()[1].cells)
        .map(|&key| next.cell(key).unwrap().header)
        .collect();
    assert_eq!(headers, vec![true, true, false, false]);
}

#[test]
fn test_extend_across_merge_grows_selection() {
    //  A | A | B
    //  C | D | E
    let table = TableFixture::new()
        .row()
        .cell("A")
        .span(1, 2)
        .cell("B")
        .row()
        .cell("C")
        .cell("D")
        .cell("E")
        .build();
    let table = select_slots(&table, (1, 1), (1, 1));
    let next = move_focus(&table, Delta::Prev, Delta::Stay, true).unwrap().into_owned();
    assert_selection_closed(&next);
    let bounds = next.selection_shape().bounds;
    assert_eq!((bounds.min_row, bounds.max_row), (0, 1));
    assert_eq!((bounds.min_column, bounds.max_column), (0, 1));
    assert_eq!(next.selection_shape().len(), 3);
}

#[test]
fn test_select_all_covers_every_cell() {
    let table = tall_left();
    let next = select_all(&table).unwrap().into_owned();
    assert_eq!(next.selection_shape().len(), table.cell_count());
    assert_eq!(anchor_slot(&next), (0, 0));
    assert_eq!(focus_slot(&next), (1, 1));
}
