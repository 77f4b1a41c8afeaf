//! Data ingestion for the donor pipeline.
//!
//! Loads the raw vendor extract (Stata `.dta`) and the canonical flat CSV
//! into Polars DataFrames, and verifies required columns up front so a
//! malformed input fails before any output is written.

mod frame;
mod value;

pub use frame::{dta_to_frame, read_canonical_frame, read_raw_frame, require_columns};
pub use value::{any_to_f64, any_to_i64, any_to_string, column_f64, column_i64, column_string};
