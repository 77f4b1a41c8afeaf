//! In-memory view of the canonical dataset.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Result, bail};
use polars::prelude::DataFrame;
use tracing::info;

use donor_ingest::{column_f64, column_string, read_canonical_frame};
use donor_model::{DonorError, Sample, canonical};
use donor_stats::DataColumns;

/// Canonical columns holding decoded labels rather than numbers.
const LABEL_COLUMNS: &[&str] = &[
    canonical::PARTICIPANT_ID,
    canonical::RACE,
    canonical::BLOOD_TYPE,
    canonical::REGION,
];

/// Canonical numeric columns (flags, counts, and measurements).
const NUMERIC_COLUMNS: &[&str] = &[
    canonical::TREATMENT,
    canonical::WAVE,
    canonical::FEMALE,
    canonical::AGE,
    canonical::AB_BLOOD_TYPE,
    canonical::PRIOR_DONOR,
    canonical::AVG_ANNUAL_DONATIONS,
    canonical::HIGH_PRIOR_DONATIONS,
    canonical::ZIP_MEDIAN_INCOME,
    canonical::URBAN,
    canonical::COVID_CASE_RATE,
    canonical::MAJORITY_DEMOCRATIC,
    canonical::EMAIL_OPENED,
    canonical::NO_PHONE_CONTACT,
    canonical::IS_STUDY_SAMPLE,
    canonical::APPOINTMENT_WITHIN_24H,
    canonical::APPOINTMENT_WITHIN_48H,
    canonical::APPOINTMENT_WITHIN_7D,
    canonical::APPOINTMENT_EVER,
    canonical::DONATED_WITHIN_13D,
    canonical::DONATED_ANYTIME,
    canonical::INTENTION_BEHAVIOR_GAP,
    canonical::UNSUBSCRIBED,
    canonical::TOTAL_DONATIONS,
];

/// Immutable column store over the canonical dataset. All table recipes
/// read from one instance of this; nothing mutates it after load.
#[derive(Debug, Clone)]
pub struct AnalysisData {
    numeric: BTreeMap<&'static str, Vec<Option<f64>>>,
    labels: BTreeMap<&'static str, Vec<Option<String>>>,
    rows: usize,
}

impl AnalysisData {
    /// Load the canonical flat file.
    pub fn load(path: &Path) -> Result<Self> {
        let df = read_canonical_frame(path)?;
        Self::from_frame(&df)
    }

    /// Materialize an already loaded canonical frame.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let mut numeric = BTreeMap::new();
        for &name in NUMERIC_COLUMNS {
            numeric.insert(name, column_f64(df, name)?);
        }
        let mut labels = BTreeMap::new();
        for &name in LABEL_COLUMNS {
            labels.insert(name, column_string(df, name)?);
        }
        let rows = df.height();
        info!(records = rows, "analysis dataset materialized");
        Ok(Self { numeric, labels, rows })
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        match self.numeric.get(name) {
            Some(values) => Ok(values),
            None => bail!(DonorError::missing_column(name)),
        }
    }

    pub fn labels(&self, name: &str) -> Result<&[Option<String>]> {
        match self.labels.get(name) {
            Some(values) => Ok(values),
            None => bail!(DonorError::missing_column(name)),
        }
    }

    /// Row indices belonging to the given sample, in input order.
    pub fn sample_rows(&self, sample: Sample) -> Result<Vec<usize>> {
        let flags = self.numeric(canonical::IS_STUDY_SAMPLE)?;
        Ok((0..self.rows)
            .filter(|&row| match sample {
                Sample::Baseline => true,
                Sample::Study => flags[row] == Some(1.0),
            })
            .collect())
    }

    /// Model input columns restricted to the given sample.
    ///
    /// Wave enters twice: numerically under its canonical name and as a
    /// categorical column for fixed-effect expansion (levels sort as
    /// strings, so wave 1 is the reference).
    pub fn model_columns(&self, sample: Sample) -> Result<DataColumns> {
        let rows = self.sample_rows(sample)?;
        let mut columns = DataColumns::new();
        for (&name, values) in &self.numeric {
            let filtered: Vec<Option<f64>> = rows.iter().map(|&r| values[r]).collect();
            columns.insert_numeric(name, filtered);
        }
        for (&name, values) in &self.labels {
            if name == canonical::PARTICIPANT_ID {
                continue;
            }
            let filtered: Vec<Option<String>> = rows.iter().map(|&r| values[r].clone()).collect();
            columns.insert_categorical(name, filtered);
        }
        let waves = self.numeric(canonical::WAVE)?;
        let wave_levels: Vec<Option<String>> = rows
            .iter()
            .map(|&r| waves[r].map(|w| format!("{w:.0}")))
            .collect();
        columns.insert_categorical(WAVE_FE, wave_levels);
        Ok(columns)
    }
}

/// Name of the synthetic categorical wave column used for fixed effects.
pub const WAVE_FE: &str = "wave_fe";

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, NamedFrom, Series};

    fn frame() -> DataFrame {
        let mut columns: Vec<Column> = Vec::new();
        for &name in LABEL_COLUMNS {
            let values: Vec<Option<String>> = vec![Some("x".into()), None, Some("y".into())];
            columns.push(Series::new(name.into(), values).into());
        }
        for &name in NUMERIC_COLUMNS {
            let values: Vec<Option<f64>> = match name {
                canonical::IS_STUDY_SAMPLE => vec![Some(1.0), Some(0.0), Some(1.0)],
                canonical::WAVE => vec![Some(1.0), Some(2.0), Some(3.0)],
                _ => vec![Some(0.0), Some(1.0), None],
            };
            columns.push(Series::new(name.into(), values).into());
        }
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn study_sample_filters_on_flag() {
        let data = AnalysisData::from_frame(&frame()).unwrap();
        assert_eq!(data.sample_rows(Sample::Baseline).unwrap(), vec![0, 1, 2]);
        assert_eq!(data.sample_rows(Sample::Study).unwrap(), vec![0, 2]);
    }

    #[test]
    fn wave_fixed_effect_column_holds_integer_labels() {
        let data = AnalysisData::from_frame(&frame()).unwrap();
        let columns = data.model_columns(Sample::Study).unwrap();
        // Two study rows, waves 1 and 3.
        assert_eq!(columns.num_rows(), 2);
    }
}
