//! Tabular input handling
//!
//! Turns raw comma-separated text into typed rows and picks the chart axes:
//! - [`parser`] - header/row splitting and per-cell coercion
//! - [`keys`] - x/y key heuristics and the CSV-derived chart payload

pub mod keys;
pub mod parser;

pub use keys::{chart_from_table, select_keys, KeySelection};
pub use parser::{coerce_cell, parse_csv, TabularRecord};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TabularError {
    #[error("CSV input needs a header line and at least one data row")]
    EmptyInput,
}
