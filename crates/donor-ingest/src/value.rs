//! Polars `AnyValue` conversion helpers.

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, DataFrame};

/// Convert an `AnyValue` to f64; nulls and non-numeric values become None.
pub fn any_to_f64(value: &AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Float64(v) => Some(*v),
        AnyValue::Int8(v) => Some(f64::from(*v)),
        AnyValue::Int16(v) => Some(f64::from(*v)),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(f64::from(*v)),
        AnyValue::UInt16(v) => Some(f64::from(*v)),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(s),
        _ => None,
    }
}

/// Convert an `AnyValue` to i64; fractional floats become None.
pub fn any_to_i64(value: &AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(*v)),
        AnyValue::Int16(v) => Some(i64::from(*v)),
        AnyValue::Int32(v) => Some(i64::from(*v)),
        AnyValue::Int64(v) => Some(*v),
        AnyValue::UInt8(v) => Some(i64::from(*v)),
        AnyValue::UInt16(v) => Some(i64::from(*v)),
        AnyValue::UInt32(v) => Some(i64::from(*v)),
        AnyValue::UInt64(v) => i64::try_from(*v).ok(),
        AnyValue::Boolean(v) => Some(i64::from(*v)),
        _ => any_to_f64(value).and_then(|v| {
            if v.fract() == 0.0 {
                Some(v as i64)
            } else {
                None
            }
        }),
    }
}

/// Convert an `AnyValue` to a string; nulls become None.
pub fn any_to_string(value: &AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => non_empty(s),
        AnyValue::StringOwned(s) => non_empty(s),
        other => {
            let text = other.to_string();
            non_empty(&text)
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Materialize a DataFrame column as f64 values with missing as None.
pub fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .with_context(|| format!("missing column {name}"))?;
    let mut out = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        out.push(any_to_f64(&value));
    }
    Ok(out)
}

/// Materialize a DataFrame column as i64 values with missing as None.
pub fn column_i64(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = df
        .column(name)
        .with_context(|| format!("missing column {name}"))?;
    let mut out = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        out.push(any_to_i64(&value));
    }
    Ok(out)
}

/// Materialize a DataFrame column as strings with missing as None.
pub fn column_string(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .with_context(|| format!("missing column {name}"))?;
    let mut out = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        out.push(any_to_string(&value));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_conversions() {
        assert_eq!(any_to_f64(&AnyValue::Int32(3)), Some(3.0));
        assert_eq!(any_to_f64(&AnyValue::Boolean(true)), Some(1.0));
        assert_eq!(any_to_f64(&AnyValue::Null), None);
        assert_eq!(any_to_f64(&AnyValue::String("1.5")), Some(1.5));
        assert_eq!(any_to_f64(&AnyValue::String("")), None);
    }

    #[test]
    fn i64_rejects_fractions() {
        assert_eq!(any_to_i64(&AnyValue::Float64(2.0)), Some(2));
        assert_eq!(any_to_i64(&AnyValue::Float64(2.5)), None);
    }

    #[test]
    fn string_trims_and_drops_empty() {
        assert_eq!(
            any_to_string(&AnyValue::String("  O+ ")),
            Some("O+".to_string())
        );
        assert_eq!(any_to_string(&AnyValue::String("   ")), None);
        assert_eq!(any_to_string(&AnyValue::Null), None);
    }
}
