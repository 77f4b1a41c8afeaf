//! Design-matrix construction.
//!
//! Models are specified as an outcome plus a list of [`Term`]s over named
//! input columns. Rows with a missing outcome or any missing term input
//! are dropped (listwise deletion); categorical terms expand to indicator
//! columns against the first level in sorted order.

use std::collections::BTreeMap;

use faer::Mat;
use tracing::debug;

use crate::error::{Result, StatsError};

/// One right-hand-side term of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// A numeric column entered as-is. Covers 0/1 indicator columns too.
    Continuous(String),
    /// A string column expanded to indicators against its first sorted
    /// level.
    Categorical(String),
    /// The elementwise product of two numeric columns.
    Interaction(String, String),
}

impl Term {
    pub fn continuous(name: impl Into<String>) -> Self {
        Term::Continuous(name.into())
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Term::Categorical(name.into())
    }

    pub fn interaction(left: impl Into<String>, right: impl Into<String>) -> Self {
        Term::Interaction(left.into(), right.into())
    }

    fn input_names(&self) -> Vec<&str> {
        match self {
            Term::Continuous(name) | Term::Categorical(name) => vec![name],
            Term::Interaction(left, right) => vec![left, right],
        }
    }
}

/// Column-oriented model input.
///
/// Keys are canonical column names; values keep missingness explicit so
/// listwise deletion sees exactly what the source dataset recorded.
#[derive(Debug, Default, Clone)]
pub struct DataColumns {
    numeric: BTreeMap<String, Vec<Option<f64>>>,
    categorical: BTreeMap<String, Vec<Option<String>>>,
    rows: usize,
}

impl DataColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_numeric(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        self.rows = self.rows.max(values.len());
        self.numeric.insert(name.into(), values);
    }

    pub fn insert_categorical(&mut self, name: impl Into<String>, values: Vec<Option<String>>) {
        self.rows = self.rows.max(values.len());
        self.categorical.insert(name.into(), values);
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    fn numeric_at(&self, name: &str, row: usize) -> Result<Option<f64>> {
        let values = self
            .numeric
            .get(name)
            .ok_or_else(|| StatsError::MissingVariable { name: name.to_string() })?;
        Ok(values.get(row).copied().flatten())
    }

    fn categorical_at(&self, name: &str, row: usize) -> Result<Option<&str>> {
        let values = self
            .categorical
            .get(name)
            .ok_or_else(|| StatsError::MissingVariable { name: name.to_string() })?;
        Ok(values.get(row).and_then(|v| v.as_deref()))
    }

    fn has_variable(&self, name: &str) -> bool {
        self.numeric.contains_key(name) || self.categorical.contains_key(name)
    }

    fn is_categorical(&self, name: &str) -> bool {
        self.categorical.contains_key(name)
    }
}

/// A fully materialized design: outcome vector, predictor matrix with a
/// leading intercept column, and the design-column names.
#[derive(Debug, Clone)]
pub struct Design {
    pub x: Mat<f64>,
    pub y: Vec<f64>,
    pub column_names: Vec<String>,
    /// Row indices of the source data that survived listwise deletion.
    pub kept_rows: Vec<usize>,
}

impl Design {
    pub fn num_rows(&self) -> usize {
        self.y.len()
    }

    pub fn num_parameters(&self) -> usize {
        self.column_names.len()
    }

    /// Build a design for `outcome ~ intercept + terms`.
    pub fn build(data: &DataColumns, outcome: &str, terms: &[Term]) -> Result<Design> {
        for term in terms {
            for name in term.input_names() {
                if !data.has_variable(name) {
                    return Err(StatsError::MissingVariable { name: name.to_string() });
                }
            }
        }
        if !data.has_variable(outcome) {
            return Err(StatsError::MissingVariable { name: outcome.to_string() });
        }

        let kept_rows = complete_rows(data, outcome, terms)?;
        if kept_rows.is_empty() {
            return Err(StatsError::EmptySample);
        }

        let mut column_names = vec!["const".to_string()];
        let mut columns: Vec<Vec<f64>> = vec![vec![1.0; kept_rows.len()]];

        for term in terms {
            match term {
                Term::Continuous(name) => {
                    let mut values = Vec::with_capacity(kept_rows.len());
                    for &row in &kept_rows {
                        values.push(required_numeric(data, name, row)?);
                    }
                    column_names.push(name.clone());
                    columns.push(values);
                }
                Term::Categorical(name) => {
                    expand_categorical(data, name, &kept_rows, &mut column_names, &mut columns)?;
                }
                Term::Interaction(left, right) => {
                    let mut values = Vec::with_capacity(kept_rows.len());
                    for &row in &kept_rows {
                        let a = required_numeric(data, left, row)?;
                        let b = required_numeric(data, right, row)?;
                        values.push(a * b);
                    }
                    column_names.push(format!("{left}:{right}"));
                    columns.push(values);
                }
            }
        }

        let n = kept_rows.len();
        let p = columns.len();
        if n <= p {
            return Err(StatsError::TooFewObservations { rows: n, parameters: p });
        }

        let mut y = Vec::with_capacity(n);
        for &row in &kept_rows {
            y.push(required_numeric(data, outcome, row)?);
        }

        let x = Mat::from_fn(n, p, |i, j| columns[j][i]);
        debug!(outcome, rows = n, parameters = p, "design assembled");
        Ok(Design { x, y, column_names, kept_rows })
    }
}

/// Row indices with a non-missing outcome and non-missing term inputs.
fn complete_rows(data: &DataColumns, outcome: &str, terms: &[Term]) -> Result<Vec<usize>> {
    let mut kept = Vec::new();
    'rows: for row in 0..data.num_rows() {
        if data.numeric_at(outcome, row)?.is_none() {
            continue;
        }
        for term in terms {
            for name in term.input_names() {
                let present = if data.is_categorical(name) {
                    data.categorical_at(name, row)?.is_some()
                } else {
                    data.numeric_at(name, row)?.is_some()
                };
                if !present {
                    continue 'rows;
                }
            }
        }
        kept.push(row);
    }
    Ok(kept)
}

fn required_numeric(data: &DataColumns, name: &str, row: usize) -> Result<f64> {
    data.numeric_at(name, row)?
        .ok_or_else(|| StatsError::MissingVariable { name: name.to_string() })
}

/// Append indicator columns for every level past the first sorted level.
fn expand_categorical(
    data: &DataColumns,
    name: &str,
    kept_rows: &[usize],
    column_names: &mut Vec<String>,
    columns: &mut Vec<Vec<f64>>,
) -> Result<()> {
    let mut levels: Vec<String> = Vec::new();
    for &row in kept_rows {
        if let Some(level) = data.categorical_at(name, row)? {
            if !levels.iter().any(|l| l == level) {
                levels.push(level.to_string());
            }
        }
    }
    levels.sort();

    // A single level carries no information once the intercept is in.
    for level in levels.iter().skip(1) {
        let mut values = Vec::with_capacity(kept_rows.len());
        for &row in kept_rows {
            let observed = data.categorical_at(name, row)?;
            values.push(if observed == Some(level.as_str()) { 1.0 } else { 0.0 });
        }
        column_names.push(format!("{name}[{level}]"));
        columns.push(values);
    }
    Ok(())
}
