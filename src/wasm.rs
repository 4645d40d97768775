//! JavaScript bindings.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { JsTableEditor } from 'tablegrid';
//! await init();
//! const editor = new JsTableEditor(rows, { historyLimit: 50 });
//! editor.keyDown('m', true, false, false);
//! const view = editor.view();
//! ```

use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::commands::TableCommand;
use crate::convert::{convert_standard_table, to_standard_rows, StandardCell, StandardRow};
use crate::editor::{EditorConfig, TableEditor, TableKind};
use crate::key::CellKey;
use crate::view::TableView;

/// Table editor over JSON payloads.
#[wasm_bindgen]
pub struct JsTableEditor {
    inner: TableEditor<Value>,
}

#[wasm_bindgen]
impl JsTableEditor {
    /// Create an editor from persisted rows and an optional config object.
    #[wasm_bindgen(constructor)]
    pub fn new(rows: JsValue, config: JsValue) -> Result<JsTableEditor, JsValue> {
        console_error_panic_hook::set_once();

        let rows: Vec<StandardRow<StandardCell>> = serde_wasm_bindgen::from_value(rows)?;
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        let kind = TableKind::json();
        let table = convert_standard_table(rows, &kind, StandardCell::into_cell)?;
        Ok(JsTableEditor {
            inner: TableEditor::with_config(table, kind, config),
        })
    }

    /// Apply a command object such as `{type: "insertRow", location: "after"}`.
    /// Returns whether the table changed.
    #[wasm_bindgen]
    pub fn apply(&mut self, command: JsValue) -> Result<bool, JsValue> {
        let command: TableCommand = serde_wasm_bindgen::from_value(command)?;
        Ok(self.inner.apply(command)?)
    }

    /// Handle a key chord through the keymap. Returns whether the table changed.
    #[wasm_bindgen(js_name = "keyDown")]
    pub fn key_down(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool) -> Result<bool, JsValue> {
        Ok(self.inner.handle_key(key, ctrl, shift, alt)?)
    }

    #[wasm_bindgen]
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    #[wasm_bindgen]
    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    #[wasm_bindgen(js_name = "canUndo")]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(js_name = "canRedo")]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    #[wasm_bindgen(js_name = "setCellData")]
    pub fn set_cell_data(&mut self, key: JsValue, data: JsValue) -> Result<(), JsValue> {
        let key: CellKey = serde_wasm_bindgen::from_value(key)?;
        let data: Value = serde_wasm_bindgen::from_value(data)?;
        Ok(self.inner.set_cell_data(key, data)?)
    }

    #[wasm_bindgen]
    pub fn select(&mut self, anchor: JsValue, focus: JsValue) -> Result<bool, JsValue> {
        let anchor: CellKey = serde_wasm_bindgen::from_value(anchor)?;
        let focus: CellKey = serde_wasm_bindgen::from_value(focus)?;
        Ok(self.inner.select(anchor, focus)?)
    }

    /// Render snapshot: rows of cells with spans and selection flags.
    #[wasm_bindgen]
    pub fn view(&self) -> Result<JsValue, JsValue> {
        let view = TableView::new(self.inner.table())?;
        Ok(serde_wasm_bindgen::to_value(&view)?)
    }

    /// Current table as persisted rows.
    #[wasm_bindgen(js_name = "toRows")]
    pub fn to_rows(&self) -> Result<JsValue, JsValue> {
        let rows = to_standard_rows(self.inner.table(), StandardCell::from_cell)?;
        Ok(serde_wasm_bindgen::to_value(&rows)?)
    }
}
