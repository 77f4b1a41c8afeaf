//! Table Generator: produces the ten analysis tables S1-S10 from the
//! canonical flat dataset.
//!
//! Every table recipe is fixed: sample, model specification, captions,
//! column headers, and numeric formatting are all part of the
//! reproducibility contract. Given the same canonical file, the rendered
//! output is byte-identical across runs.

pub mod data;
pub mod recipe;
pub mod render;
pub mod stars;
pub mod summary;
pub mod table;
pub mod tables;

pub use data::AnalysisData;
pub use recipe::{CovariateSet, Family, FittedModel, ModelSpec, fit_model};
pub use table::Table;
pub use tables::{ALL_TABLES, build_all, build_table, write_tables};
