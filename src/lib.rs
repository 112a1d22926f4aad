pub mod extract;
pub mod fetch;
pub mod grammar;
pub mod grid;
pub mod hex;
pub mod table;

pub use extract::{extract, write_switch, ExtractError, OnMismatch, OpcodeRecord, Strategy};
pub use grid::{Cell, Row, TableGrid};
pub use table::Table;
