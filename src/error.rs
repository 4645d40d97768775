//! Structured error types for tablegrid.
//!
//! Reference errors (`CellNotFound`, `InvalidTable`) are contract violations:
//! they only occur when a caller passes keys or rows that did not come from
//! the current table. Conversion errors come from malformed external input.

use crate::key::CellKey;

/// All errors that can occur while building or editing a table.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A cell key is not present in the table or its layout.
    #[error("Cell not found: {0}")]
    CellNotFound(CellKey),

    /// Rows and cells do not tile a rectangular grid.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// External row/cell data could not be converted.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A command or key binding name that is not recognised.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
