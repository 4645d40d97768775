//! tablegrid - grid value model for table editors
//!
//! Rectangular tables of cells that may span several rows and columns:
//! - Layout of row lists into a dense slot grid, with tiling validation
//! - Anchor/focus selections grown until no merged cell is cut
//! - Insert, delete, merge, separate and header edits over immutable snapshots
//! - Undo/redo editor with configurable key bindings
//!
//! # Usage
//!
//! ```
//! use tablegrid::{parse_json_table, TableCommand, TableEditor, TableKind};
//!
//! let table = parse_json_table(r#"[{"cells": [{"header": "A"}, {"data": 1}]}]"#)?;
//! let mut editor = TableEditor::new(table, TableKind::json());
//! editor.apply("insertRow:after".parse::<TableCommand>()?)?;
//! assert_eq!(editor.table().layout().row_count(), 2);
//! # Ok::<(), tablegrid::GridError>(())
//! ```

pub mod commands;
pub mod convert;
pub mod editor;
pub mod error;
pub mod key;
pub mod layout;
pub mod selection;
pub mod types;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use commands::{KeyBinding, Keymap, TableCommand, TableCommandFn};
pub use convert::{
    convert_standard_table, parse_json_table, table_to_json, to_standard_rows, StandardCell,
    StandardRow,
};
pub use editor::{EditorConfig, TableEditor, TableKind};
pub use error::{GridError, Result};
pub use key::{CellKey, RowKey};
pub use layout::{CellPosition, Layout};
pub use types::*;
pub use view::TableView;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
