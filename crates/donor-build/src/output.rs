//! Canonical CSV output.

use std::path::Path;

use anyhow::{Context, Result};

use donor_model::CANONICAL_COLUMNS;

use crate::record::CanonicalRow;

/// Write the canonical rows to `path` with the fixed header. Rows go out
/// in the order given; missing values are empty cells.
pub fn write_canonical_csv(rows: &[CanonicalRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    writer
        .write_record(CANONICAL_COLUMNS)
        .context("write header")?;
    for row in rows {
        writer.write_record(row.fields()).context("write record")?;
    }
    writer.flush().context("flush canonical dataset")?;
    Ok(())
}
