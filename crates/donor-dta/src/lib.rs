//! Stata `.dta` file format reader and writer.
//!
//! This crate reads and writes the modern tagged Stata dataset formats
//! (release 117 and 118), covering the subset the donor pipeline needs:
//! the five fixed numeric storage types and fixed-width `str#` variables.
//! `strL` variables and big-endian (`MSF`) files are rejected with a
//! format error.
//!
//! # Features
//!
//! - Formats 117 and 118 with auto-detection on read
//! - All 27 Stata numeric missing-value codes (`.`, `.a`-`.z`)
//! - Variable labels and dataset labels
//! - Deterministic writer (zero-length timestamp) for fixture generation
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use donor_dta::{DtaColumn, DtaDataset, DtaValue, read_dta, write_dta};
//!
//! let mut ds = DtaDataset::with_columns(vec![
//!     DtaColumn::string("DONOR_KEY", 12).with_label("Donor identifier"),
//!     DtaColumn::double("AGE_YRS").with_label("Age in years"),
//! ]);
//! ds.add_row(vec![
//!     DtaValue::string("D-000001"),
//!     DtaValue::numeric(35.0),
//! ]);
//! write_dta(Path::new("extract.dta"), &ds).unwrap();
//!
//! let back = read_dta(Path::new("extract.dta")).unwrap();
//! assert_eq!(back.num_rows(), 1);
//! ```
//!
//! # Missing values
//!
//! ```
//! use donor_dta::{DtaValue, MissingValue};
//!
//! let missing = DtaValue::numeric_missing();
//! let missing_a = DtaValue::numeric_missing_with(MissingValue::Extended('a'));
//! assert!(missing.is_missing());
//! assert!(missing_a.is_missing());
//! ```

mod error;
pub mod missing;
mod reader;
mod types;
mod writer;

pub use error::{DtaError, Result};
pub use types::{
    DtaColumn, DtaDataset, DtaReaderOptions, DtaType, DtaValue, DtaVersion, DtaWriterOptions,
    MissingValue, NumericValue,
};

pub use reader::{DtaReader, read_dta, read_dta_with_options};
pub use writer::{DtaWriter, write_dta, write_dta_with_options};
