//! Cell-level mutations: header flags and payload edits.

use std::borrow::Cow;

use super::Edit;
use crate::error::Result;
use crate::key::CellKey;
use crate::types::Table;

/// Flip the focus cell's header flag and apply the result to the selection.
///
/// The whole selection takes the focus cell's new value, so a mixed
/// selection becomes uniform instead of having each flag inverted.
pub fn toggle_header_selected<D>(table: &Table<D>) -> Edit<'_, D> {
    let header = !table.cell(table.focus())?.header;
    let mut builder = table.to_builder();
    for &key in table.selection_shape().cells() {
        builder.cell_mut(key)?.header = header;
    }
    log::debug!(
        "set header={header} on {} cells",
        table.selection_shape().len()
    );
    builder.build().map(Cow::Owned)
}

/// Replace the payload of one cell.
///
/// The returned table shares every other payload with `table`.
pub fn set_cell_data<D>(table: &Table<D>, key: CellKey, data: D) -> Result<Table<D>> {
    let mut builder = table.to_builder();
    builder.set_data(key, data)?;
    builder.build()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::editor::select;
    use crate::types::{Cell, TableBuilder};
    use crate::GridError;

    #[test]
    fn test_toggle_header_follows_focus() {
        let mut builder = TableBuilder::new();
        let a = Cell::header();
        let b = Cell::new();
        builder.push_row(vec![(a, ()), (b, ())]);
        let table = builder.build().unwrap();

        // Focus on the data cell: both become headers.
        let table = select(&table, a.key, b.key).unwrap().into_owned();
        let next = toggle_header_selected(&table).unwrap().into_owned();
        assert!(next.cell(a.key).unwrap().header);
        assert!(next.cell(b.key).unwrap().header);

        // Focus on a header cell: both become data cells.
        let next = toggle_header_selected(&next).unwrap().into_owned();
        assert!(!next.cell(a.key).unwrap().header);
        assert!(!next.cell(b.key).unwrap().header);
    }

    #[test]
    fn test_set_cell_data() {
        let table = Table::with_single_cell(1);
        let key = table.focus();
        let next = set_cell_data(&table, key, 2).unwrap();
        assert_eq!(*next.data(key).unwrap(), 2);
        assert_eq!(*table.data(key).unwrap(), 1);
    }

    #[test]
    fn test_set_cell_data_unknown_key() {
        let table = Table::with_single_cell(1);
        let stray = CellKey::generate();
        assert!(matches!(
            set_cell_data(&table, stray, 2),
            Err(GridError::CellNotFound(k)) if k == stray
        ));
    }
}
