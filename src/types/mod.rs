//! Data types for the table store.

mod cell;
mod selection;
mod table;

pub use cell::*;
pub use selection::*;
pub use table::*;
