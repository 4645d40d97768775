use std::collections::HashMap;
use std::rc::Rc;

use super::{Bounds, Cell, Row, SelectionShape, TableSelection};
use crate::error::{GridError, Result};
use crate::key::CellKey;
use crate::layout::Layout;
use crate::selection::compute_selection;

/// An immutable table snapshot.
///
/// Holds the row/cell store, per-cell payloads, the stored selection and the
/// layout and selection shape derived from them. Edits never touch a
/// snapshot: they go through a [`TableBuilder`] and produce a new one.
/// Payloads sit behind `Rc`, so consecutive snapshots share every payload an
/// edit did not replace.
#[derive(Debug)]
pub struct Table<D> {
    rows: Vec<Row>,
    cells: HashMap<CellKey, Cell>,
    cell_data: HashMap<CellKey, Rc<D>>,
    selection: TableSelection,
    layout: Layout,
    shape: SelectionShape,
}

// Manual impl: cloning shares payloads, so `D` itself need not be `Clone`.
impl<D> Clone for Table<D> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            cells: self.cells.clone(),
            cell_data: self.cell_data.clone(),
            selection: self.selection,
            layout: self.layout.clone(),
            shape: self.shape.clone(),
        }
    }
}

impl<D> Table<D> {
    /// A 1x1 table holding one non-header cell with `data`.
    pub fn with_single_cell(data: D) -> Self {
        let cell = Cell::new();
        let key = cell.key;
        Self {
            rows: vec![Row::new(vec![key])],
            cells: HashMap::from([(key, cell)]),
            cell_data: HashMap::from([(key, Rc::new(data))]),
            selection: TableSelection::single(key),
            layout: Layout::single_cell(key),
            shape: SelectionShape::new(key, key, Bounds::from_span(0, 0, 1, 1), vec![key]),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn cell(&self, key: CellKey) -> Result<&Cell> {
        self.cells.get(&key).ok_or(GridError::CellNotFound(key))
    }

    pub fn data(&self, key: CellKey) -> Result<&D> {
        self.data_rc(key).map(|data| &**data)
    }

    pub(crate) fn data_rc(&self, key: CellKey) -> Result<&Rc<D>> {
        self.cell_data.get(&key).ok_or(GridError::CellNotFound(key))
    }

    /// All cells, in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn selection(&self) -> TableSelection {
        self.selection
    }

    pub fn anchor(&self) -> CellKey {
        self.selection.anchor
    }

    pub fn focus(&self) -> CellKey {
        self.selection.focus
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn selection_shape(&self) -> &SelectionShape {
        &self.shape
    }

    /// Same store and layout, different selection.
    pub(crate) fn reselected(&self, selection: TableSelection) -> Result<Self> {
        let shape = compute_selection(&self.layout, selection.anchor, selection.focus)?;
        Ok(Self {
            selection,
            shape,
            ..self.clone()
        })
    }

    /// Start an edit from this snapshot. Payloads are shared, not copied.
    pub fn to_builder(&self) -> TableBuilder<D> {
        TableBuilder {
            rows: self.rows.clone(),
            cells: self.cells.clone(),
            cell_data: self.cell_data.clone(),
            selection: Some(self.selection),
        }
    }
}

/// Scoped mutable store used to construct the next [`Table`].
///
/// Mutations do not validate anything; the `build*` methods rebuild the
/// layout and selection and reject stores that break the table invariants.
#[derive(Debug)]
pub struct TableBuilder<D> {
    rows: Vec<Row>,
    cells: HashMap<CellKey, Cell>,
    cell_data: HashMap<CellKey, Rc<D>>,
    selection: Option<TableSelection>,
}

impl<D> Default for TableBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> TableBuilder<D> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            cells: HashMap::new(),
            cell_data: HashMap::new(),
            selection: None,
        }
    }

    /// Append a row holding `cells` in order.
    pub fn push_row(&mut self, cells: Vec<(Cell, D)>) {
        let mut keys = Vec::with_capacity(cells.len());
        for (cell, data) in cells {
            keys.push(cell.key);
            self.insert_cell(cell, Rc::new(data));
        }
        self.rows.push(Row::new(keys));
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> Result<&mut Row> {
        let count = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or_else(|| GridError::InvalidTable(format!("row {index} out of {count}")))
    }

    pub fn cell(&self, key: CellKey) -> Result<&Cell> {
        self.cells.get(&key).ok_or(GridError::CellNotFound(key))
    }

    pub fn cell_mut(&mut self, key: CellKey) -> Result<&mut Cell> {
        self.cells.get_mut(&key).ok_or(GridError::CellNotFound(key))
    }

    /// Add a cell and its payload to the store (not to any row).
    pub(crate) fn insert_cell(&mut self, cell: Cell, data: Rc<D>) {
        self.cell_data.insert(cell.key, data);
        self.cells.insert(cell.key, cell);
    }

    /// Drop a cell and its payload from the store (not from its row).
    pub(crate) fn forget_cell(&mut self, key: CellKey) -> Result<Cell> {
        self.cell_data.remove(&key);
        self.cells.remove(&key).ok_or(GridError::CellNotFound(key))
    }

    pub fn set_data(&mut self, key: CellKey, data: D) -> Result<()> {
        let slot = self.cell_data.get_mut(&key).ok_or(GridError::CellNotFound(key))?;
        *slot = Rc::new(data);
        Ok(())
    }

    pub fn set_selection(&mut self, selection: TableSelection) {
        self.selection = Some(selection);
    }

    /// Freeze with the stored selection, or the first cell if none was set.
    pub fn build(self) -> Result<Table<D>> {
        let stored = self.selection;
        self.freeze(|layout| match stored {
            Some(selection) => Ok(selection),
            None => layout.try_cell_at(0, 0).map(TableSelection::single),
        })
    }

    /// Freeze with a single-cell selection on whatever covers `(row, column)`.
    pub fn build_focused_at(self, row: usize, column: usize) -> Result<Table<D>> {
        self.freeze(|layout| layout.try_cell_at(row, column).map(TableSelection::single))
    }

    /// Freeze with anchor and focus on whatever covers the given slots.
    pub fn build_selecting(self, anchor_at: (usize, usize), focus_at: (usize, usize)) -> Result<Table<D>> {
        self.freeze(|layout| {
            Ok(TableSelection {
                anchor: layout.try_cell_at(anchor_at.0, anchor_at.1)?,
                focus: layout.try_cell_at(focus_at.0, focus_at.1)?,
            })
        })
    }

    fn freeze(self, pick: impl FnOnce(&Layout) -> Result<TableSelection>) -> Result<Table<D>> {
        if self.rows.is_empty() {
            return Err(GridError::InvalidTable("table has no rows".into()));
        }
        if self.cells.len() != self.cell_data.len()
            || self.cells.keys().any(|key| !self.cell_data.contains_key(key))
        {
            return Err(GridError::InvalidTable("cells and cell data disagree".into()));
        }

        let layout = Layout::build(&self.rows, &self.cells)?;
        if let Some(orphan) = self.cells.keys().find(|&&key| !layout.contains(key)) {
            return Err(GridError::InvalidTable(format!("{orphan} belongs to no row")));
        }

        let selection = pick(&layout)?;
        let shape = compute_selection(&layout, selection.anchor, selection.focus)?;

        Ok(Table {
            rows: self.rows,
            cells: self.cells,
            cell_data: self.cell_data,
            selection,
            layout,
            shape,
        })
    }
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

    #[test]
    fn test_single_cell_table() {
        let table = Table::with_single_cell("x");
        assert_eq!(table.cell_count(), 1);
        assert_eq!(table.anchor(), table.focus());
        assert_eq!(*table.data(table.focus()).unwrap(), "x");
        assert_eq!(table.layout().row_count(), 1);
        assert_eq!(table.layout().column_count(), 1);
    }

    #[test]
    fn test_builder_defaults_selection_to_first_cell() {
        let mut builder = TableBuilder::new();
        let a = Cell::new();
        let b = Cell::new();
        builder.push_row(vec![(a, 1), (b, 2)]);
        let table = builder.build().unwrap();
        assert_eq!(table.focus(), a.key);
        assert_eq!(*table.data(b.key).unwrap(), 2);
    }

    #[test]
    fn test_builder_rejects_orphan_cells() {
        let mut builder = TableBuilder::new();
        builder.push_row(vec![(Cell::new(), ())]);
        builder.insert_cell(Cell::new(), Rc::new(()));
        assert!(matches!(builder.build(), Err(GridError::InvalidTable(_))));
    }

    #[test]
    fn test_builder_rejects_stale_selection() {
        let mut builder = TableBuilder::new();
        builder.push_row(vec![(Cell::new(), ())]);
        builder.set_selection(TableSelection::single(CellKey::generate()));
        assert!(matches!(builder.build(), Err(GridError::CellNotFound(_))));
    }

    #[test]
    fn test_snapshots_share_payloads() {
        let table = Table::with_single_cell(String::from("shared"));
        let key = table.focus();
        let next = table.to_builder().build().unwrap();
        assert!(Rc::ptr_eq(table.data_rc(key).unwrap(), next.data_rc(key).unwrap()));
    }
}
