//! Structural edits on table snapshots.
//!
//! Every operation takes the current [`Table`] and returns the next one:
//! - `Cow::Borrowed(table)` when the edit is a no-op, so callers can skip
//!   change propagation without comparing contents
//! - `Cow::Owned(next)` otherwise, with layout and selection rebuilt
//!
//! The current selection shape is the region each edit works on. Keys that
//! are not in the table are reported as [`crate::GridError::CellNotFound`].

mod delete;
mod history;
mod insert;
mod kind;
mod merge;
mod mutation;
mod navigation;

use std::borrow::Cow;

use crate::error::Result;
use crate::key::CellKey;
use crate::layout::Layout;
use crate::types::{Row, Table};

pub use delete::{delete_selected_columns, delete_selected_rows};
pub use history::{EditorConfig, TableEditor};
pub use insert::{insert_column, insert_row, InsertLocation};
pub use kind::TableKind;
pub use merge::{merge_selected, separate_selected};
pub use mutation::{set_cell_data, toggle_header_selected};
pub use navigation::{move_focus, select, select_all, Delta};

/// Result of a structural edit.
pub type Edit<'a, D> = Result<Cow<'a, Table<D>>>;

/// Number of cells in `cells` whose home column lies left of `column`.
fn count_before(layout: &Layout, cells: &[CellKey], column: usize) -> Result<usize> {
    let mut count = 0;
    for &key in cells {
        if layout.position(key)?.column < column {
            count += 1;
        }
    }
    Ok(count)
}

/// Add `added` (home column, key) to `row`, keeping the list in column order.
///
/// Existing entries are ordered by their columns in `layout`, which must be
/// the layout the row's current cells were placed with.
fn insert_by_column(row: &mut Row, layout: &Layout, added: Vec<(usize, CellKey)>) -> Result<()> {
    let mut placed = row
        .cells
        .iter()
        .map(|&key| Ok((layout.position(key)?.column, key)))
        .collect::<Result<Vec<_>>>()?;
    placed.extend(added);
    placed.sort_by_key(|&(column, _)| column);
    row.cells = placed.into_iter().map(|(_, key)| key).collect();
    Ok(())
}
