//! Serializable render snapshot of a table.
//!
//! Hosts that draw the grid (the wasm wrapper, the CLI) need each row's cells
//! with spans and selection flags resolved; [`TableView`] bundles that.

use serde::Serialize;

use crate::error::Result;
use crate::key::{CellKey, RowKey};
use crate::types::{Bounds, Table};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView<'a, D> {
    pub key: CellKey,
    pub header: bool,
    pub row_span: usize,
    pub column_span: usize,
    pub selected: bool,
    pub focused: bool,
    pub data: &'a D,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView<'a, D> {
    pub key: RowKey,
    pub cells: Vec<CellView<'a, D>>,
}

/// Rows of cells in row-list order, plus grid size and selection bounds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView<'a, D> {
    pub row_count: usize,
    pub column_count: usize,
    pub selection: Bounds,
    pub rows: Vec<RowView<'a, D>>,
}

impl<'a, D> TableView<'a, D> {
    pub fn new(table: &'a Table<D>) -> Result<Self> {
        let shape = table.selection_shape();
        let focus = table.focus();

        let mut rows = Vec::with_capacity(table.rows().len());
        for row in table.rows() {
            let mut cells = Vec::with_capacity(row.cells.len());
            for &key in &row.cells {
                let cell = table.cell(key)?;
                cells.push(CellView {
                    key,
                    header: cell.header,
                    row_span: cell.row_span,
                    column_span: cell.column_span,
                    selected: shape.contains(key),
                    focused: key == focus,
                    data: table.data(key)?,
                });
            }
            rows.push(RowView {
                key: row.key,
                cells,
            });
        }

        Ok(Self {
            row_count: table.layout().row_count(),
            column_count: table.layout().column_count(),
            selection: shape.bounds,
            rows,
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
    use crate::convert::parse_json_table;
    use serde_json::json;

    #[test]
    fn test_view_flags() {
        let table = parse_json_table(
            r#"[{"cells": [{"header": "A", "columnSpan": 2}]}, {"cells": [{"data": 1}, {"data": 2}]}]"#,
        )
        .unwrap();
        let view = TableView::new(&table).unwrap();
        assert_eq!(view.row_count, 2);
        assert_eq!(view.column_count, 2);

        let title = &view.rows[0].cells[0];
        assert!(title.header && title.focused && title.selected);
        assert_eq!(title.column_span, 2);
        assert!(!view.rows[1].cells[0].selected);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["rows"][1]["cells"][1]["data"], json!(2));
        assert_eq!(json["selection"]["maxColumn"], json!(1));
    }
}
