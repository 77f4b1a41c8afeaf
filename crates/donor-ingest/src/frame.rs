//! Loading the raw extract and the canonical dataset into DataFrames.

use std::path::Path;

use anyhow::{Context, Result, bail};
use polars::prelude::{Column, CsvReadOptions, DataFrame, NamedFrom, Series, SerReader};
use tracing::{debug, info};

use donor_dta::{DtaDataset, DtaValue, read_dta};
use donor_model::{CANONICAL_COLUMNS, DonorError, required_raw_columns};

/// Read the raw vendor extract and verify the required column set.
pub fn read_raw_frame(path: &Path) -> Result<DataFrame> {
    let dataset =
        read_dta(path).with_context(|| format!("read raw extract: {}", path.display()))?;
    info!(
        path = %path.display(),
        variables = dataset.num_vars(),
        records = dataset.num_rows(),
        "raw extract loaded"
    );
    let df = dta_to_frame(&dataset)?;
    require_columns(&df, required_raw_columns())?;
    Ok(df)
}

/// Convert an in-memory `.dta` dataset into a DataFrame.
///
/// Numeric variables become Float64 columns with Stata missing codes as
/// nulls; string variables become String columns with the empty string
/// (Stata's string missing) as null.
pub fn dta_to_frame(dataset: &DtaDataset) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(dataset.num_vars());
    for (idx, meta) in dataset.columns.iter().enumerate() {
        let series = if meta.data_type.is_numeric() {
            let values: Vec<Option<f64>> = dataset
                .rows
                .iter()
                .map(|row| row.get(idx).and_then(DtaValue::as_f64))
                .collect();
            Series::new(meta.name.as_str().into(), values)
        } else {
            let values: Vec<Option<String>> = dataset
                .rows
                .iter()
                .map(|row| match row.get(idx) {
                    Some(DtaValue::Str(s)) if !s.is_empty() => Some(s.clone()),
                    _ => None,
                })
                .collect();
            Series::new(meta.name.as_str().into(), values)
        };
        columns.push(series.into());
    }
    debug!(variables = columns.len(), "converted extract to frame");
    DataFrame::new(columns).context("assemble raw frame")
}

/// Read the canonical flat dataset written by the builder.
///
/// The header must carry exactly the canonical column set; anything else
/// means the file is not a builder output.
pub fn read_canonical_frame(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("open canonical dataset: {}", path.display()))?
        .finish()
        .with_context(|| format!("read canonical dataset: {}", path.display()))?;
    require_columns(&df, CANONICAL_COLUMNS.iter().copied())?;
    info!(path = %path.display(), records = df.height(), "canonical dataset loaded");
    Ok(df)
}

/// Fail with a configuration error when any required column is absent.
pub fn require_columns<'a>(
    df: &DataFrame,
    names: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let present: Vec<&str> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();
    for name in names {
        if !present.contains(&name) {
            bail!(DonorError::missing_column(name));
        }
    }
    Ok(())
}
