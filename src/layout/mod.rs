//! Layout engine: turns rows of cell keys into a dense position grid.
//!
//! This module handles:
//! - Charging tall cells to every row they occupy to size the grid
//! - Placing each cell at the next free slot of its home row
//! - Validating that the cells tile the grid without holes or overlaps

mod grid_layout;

pub use grid_layout::{CellPosition, Layout};
