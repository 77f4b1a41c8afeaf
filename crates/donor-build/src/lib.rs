//! Dataset Builder: turns the raw vendor extract into the canonical flat
//! analysis dataset.
//!
//! The builder is a pure projection: it renames, decodes, and derives,
//! but never drops or reorders records. Derived fields are computed once
//! here; downstream stages treat the canonical file as immutable.

mod builder;
mod output;
mod record;

pub use builder::{BuildOutcome, build_dataset, median};
pub use output::write_canonical_csv;
pub use record::CanonicalRow;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use donor_ingest::read_raw_frame;
use donor_model::BuildOptions;

/// Run the full builder stage: read the raw extract, derive the
/// canonical rows, write the flat CSV.
pub fn build_to_csv(raw: &Path, out: &Path, options: &BuildOptions) -> Result<BuildOutcome> {
    let df = read_raw_frame(raw)?;
    let outcome = build_dataset(&df, options)?;
    write_canonical_csv(&outcome.rows, out)
        .with_context(|| format!("write canonical dataset: {}", out.display()))?;
    info!(
        records = outcome.rows.len(),
        out = %out.display(),
        "canonical dataset written"
    );
    Ok(outcome)
}
