//! `.dta` file writer.
//!
//! Emits release 117 or 118 files covering the same subset the reader
//! accepts. The timestamp section is written empty so output is
//! byte-deterministic.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{DtaError, Result};
use crate::missing::{
    encode_byte_missing, encode_double_missing, encode_float_missing, encode_int_missing,
    encode_long_missing,
};
use crate::types::{
    DtaColumn, DtaDataset, DtaType, DtaValue, DtaVersion, DtaWriterOptions, NumericValue,
};

/// `.dta` file writer.
pub struct DtaWriter<W: Write> {
    writer: BufWriter<W>,
    options: DtaWriterOptions,
}

impl<W: Write> DtaWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options: DtaWriterOptions::default(),
        }
    }

    pub fn with_options(writer: W, options: DtaWriterOptions) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options,
        }
    }

    /// Write a dataset to the underlying stream.
    pub fn write_dataset(mut self, dataset: &DtaDataset) -> Result<()> {
        validate_dataset(dataset)?;
        let version = self.options.version;

        let header = build_header(dataset, version)?;
        let variable_types = build_variable_types(&dataset.columns);
        let varnames = build_padded_section(
            "<varnames>",
            "</varnames>",
            dataset.columns.iter().map(|c| c.name.as_str()),
            version.varname_len(),
        );
        let sortlist = build_sortlist(dataset.num_vars());
        let formats = {
            let values: Vec<String> = dataset
                .columns
                .iter()
                .map(|c| c.data_type.default_format())
                .collect();
            build_padded_section(
                "<formats>",
                "</formats>",
                values.iter().map(String::as_str),
                version.format_len(),
            )
        };
        let value_label_names = build_padded_section(
            "<value_label_names>",
            "</value_label_names>",
            dataset.columns.iter().map(|_| ""),
            version.value_label_name_len(),
        );
        let variable_labels = build_padded_section(
            "<variable_labels>",
            "</variable_labels>",
            dataset.columns.iter().map(|c| c.label.as_deref().unwrap_or("")),
            version.variable_label_len(),
        );
        let characteristics = b"<characteristics></characteristics>".to_vec();
        let data = build_data(dataset)?;
        let strls = b"<strls></strls>".to_vec();
        let value_labels = b"<value_labels></value_labels>".to_vec();

        // Section offsets for the <map> block, in file order.
        const OPEN_TAG_LEN: u64 = 11; // "<stata_dta>"
        const MAP_LEN: u64 = 5 + 14 * 8 + 6;
        let map_pos = OPEN_TAG_LEN + header.len() as u64;
        let mut offsets = [0u64; 14];
        offsets[1] = map_pos;
        offsets[2] = map_pos + MAP_LEN;
        offsets[3] = offsets[2] + variable_types.len() as u64;
        offsets[4] = offsets[3] + varnames.len() as u64;
        offsets[5] = offsets[4] + sortlist.len() as u64;
        offsets[6] = offsets[5] + formats.len() as u64;
        offsets[7] = offsets[6] + value_label_names.len() as u64;
        offsets[8] = offsets[7] + variable_labels.len() as u64;
        offsets[9] = offsets[8] + characteristics.len() as u64;
        offsets[10] = offsets[9] + data.len() as u64;
        offsets[11] = offsets[10] + strls.len() as u64;
        offsets[12] = offsets[11] + value_labels.len() as u64;
        offsets[13] = offsets[12] + 12; // "</stata_dta>"

        self.writer.write_all(b"<stata_dta>")?;
        self.writer.write_all(&header)?;
        self.writer.write_all(b"<map>")?;
        for offset in offsets {
            self.writer.write_all(&offset.to_le_bytes())?;
        }
        self.writer.write_all(b"</map>")?;
        self.writer.write_all(&variable_types)?;
        self.writer.write_all(&varnames)?;
        self.writer.write_all(&sortlist)?;
        self.writer.write_all(&formats)?;
        self.writer.write_all(&value_label_names)?;
        self.writer.write_all(&variable_labels)?;
        self.writer.write_all(&characteristics)?;
        self.writer.write_all(&data)?;
        self.writer.write_all(&strls)?;
        self.writer.write_all(&value_labels)?;
        self.writer.write_all(b"</stata_dta>")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Write a dataset to a path using default options.
pub fn write_dta(path: &Path, dataset: &DtaDataset) -> Result<()> {
    let file = File::create(path)?;
    DtaWriter::new(file).write_dataset(dataset)
}

/// Write a dataset to a path with options.
pub fn write_dta_with_options(
    path: &Path,
    dataset: &DtaDataset,
    options: DtaWriterOptions,
) -> Result<()> {
    let file = File::create(path)?;
    DtaWriter::with_options(file, options).write_dataset(dataset)
}

fn validate_dataset(dataset: &DtaDataset) -> Result<()> {
    for column in &dataset.columns {
        column.validate_name()?;
        if let DtaType::Str(len) = column.data_type
            && !(1..=2045).contains(&len)
        {
            return Err(DtaError::invalid_format(format!(
                "str width {len} out of range for variable {}",
                column.name
            )));
        }
    }
    for row in &dataset.rows {
        if row.len() != dataset.num_vars() {
            return Err(DtaError::RowLengthMismatch {
                expected: dataset.num_vars(),
                actual: row.len(),
            });
        }
    }
    Ok(())
}

fn build_header(dataset: &DtaDataset, version: DtaVersion) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(b"<header><release>");
    out.extend_from_slice(version.release_bytes());
    out.extend_from_slice(b"</release><byteorder>LSF</byteorder><K>");
    let var_count = u16::try_from(dataset.num_vars())
        .map_err(|_| DtaError::invalid_format("too many variables"))?;
    out.extend_from_slice(&var_count.to_le_bytes());
    out.extend_from_slice(b"</K><N>");
    match version {
        DtaVersion::V117 => {
            let rows = u32::try_from(dataset.num_rows())
                .map_err(|_| DtaError::invalid_format("too many rows for release 117"))?;
            out.extend_from_slice(&rows.to_le_bytes());
        }
        DtaVersion::V118 => {
            out.extend_from_slice(&(dataset.num_rows() as u64).to_le_bytes());
        }
    }
    out.extend_from_slice(b"</N><label>");
    let label = dataset.label.as_deref().unwrap_or("");
    let max_label = match version {
        DtaVersion::V117 => 80,
        DtaVersion::V118 => 320,
    };
    if label.len() > max_label {
        return Err(DtaError::invalid_format("dataset label too long"));
    }
    match version {
        DtaVersion::V117 => out.push(label.len() as u8),
        DtaVersion::V118 => out.extend_from_slice(&(label.len() as u16).to_le_bytes()),
    }
    out.extend_from_slice(label.as_bytes());
    out.extend_from_slice(b"</label><timestamp>");
    out.push(0); // empty timestamp keeps output deterministic
    out.extend_from_slice(b"</timestamp></header>");
    Ok(out)
}

fn build_variable_types(columns: &[DtaColumn]) -> Vec<u8> {
    let mut out = Vec::with_capacity(17 + 18 + columns.len() * 2);
    out.extend_from_slice(b"<variable_types>");
    for column in columns {
        out.extend_from_slice(&column.data_type.code().to_le_bytes());
    }
    out.extend_from_slice(b"</variable_types>");
    out
}

fn build_padded_section<'a>(
    open: &str,
    close: &str,
    values: impl Iterator<Item = &'a str>,
    width: usize,
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(open.as_bytes());
    for value in values {
        let bytes = value.as_bytes();
        let take = bytes.len().min(width.saturating_sub(1));
        out.extend_from_slice(&bytes[..take]);
        out.resize(out.len() + width - take, 0);
    }
    out.extend_from_slice(close.as_bytes());
    out
}

fn build_sortlist(var_count: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"<sortlist>");
    out.resize(out.len() + (var_count + 1) * 2, 0);
    out.extend_from_slice(b"</sortlist>");
    out
}

fn build_data(dataset: &DtaDataset) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(12 + dataset.num_rows() * dataset.row_width());
    out.extend_from_slice(b"<data>");
    for row in &dataset.rows {
        for (value, column) in row.iter().zip(dataset.columns.iter()) {
            encode_value(&mut out, value, column)?;
        }
    }
    out.extend_from_slice(b"</data>");
    Ok(out)
}

fn encode_value(out: &mut Vec<u8>, value: &DtaValue, column: &DtaColumn) -> Result<()> {
    let mismatch = || DtaError::ValueTypeMismatch {
        name: column.name.clone(),
    };
    match (column.data_type, value) {
        (DtaType::Byte, DtaValue::Num(num)) => {
            let raw = match *num {
                NumericValue::Missing(m) => encode_byte_missing(m),
                NumericValue::Value(v) => int_in_range(v, -127.0, 100.0).ok_or_else(mismatch)? as i8,
            };
            out.push(raw as u8);
        }
        (DtaType::Int, DtaValue::Num(num)) => {
            let raw = match *num {
                NumericValue::Missing(m) => encode_int_missing(m),
                NumericValue::Value(v) => {
                    int_in_range(v, -32767.0, 32740.0).ok_or_else(mismatch)? as i16
                }
            };
            out.extend_from_slice(&raw.to_le_bytes());
        }
        (DtaType::Long, DtaValue::Num(num)) => {
            let raw = match *num {
                NumericValue::Missing(m) => encode_long_missing(m),
                NumericValue::Value(v) => {
                    int_in_range(v, -2_147_483_647.0, 2_147_483_620.0).ok_or_else(mismatch)? as i32
                }
            };
            out.extend_from_slice(&raw.to_le_bytes());
        }
        (DtaType::Float, DtaValue::Num(num)) => {
            let raw = match *num {
                NumericValue::Missing(m) => encode_float_missing(m),
                NumericValue::Value(v) => {
                    let narrowed = v as f32;
                    if !narrowed.is_finite() || narrowed.abs() > 1.701e38 {
                        return Err(mismatch());
                    }
                    narrowed
                }
            };
            out.extend_from_slice(&raw.to_le_bytes());
        }
        (DtaType::Double, DtaValue::Num(num)) => {
            let raw = match *num {
                NumericValue::Missing(m) => encode_double_missing(m),
                NumericValue::Value(v) => {
                    if !v.is_finite() || v.abs() > 8.988e307 {
                        return Err(mismatch());
                    }
                    v
                }
            };
            out.extend_from_slice(&raw.to_le_bytes());
        }
        (DtaType::Str(len), DtaValue::Str(text)) => {
            let width = len as usize;
            let bytes = text.as_bytes();
            if bytes.len() > width {
                return Err(mismatch());
            }
            out.extend_from_slice(bytes);
            out.resize(out.len() + width - bytes.len(), 0);
        }
        _ => return Err(mismatch()),
    }
    Ok(())
}

/// Check a numeric value is an integer within the storage range.
fn int_in_range(value: f64, min: f64, max: f64) -> Option<f64> {
    (value.fract() == 0.0 && value >= min && value <= max).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_row_length_mismatch() {
        let mut ds = DtaDataset::with_columns(vec![DtaColumn::double("a"), DtaColumn::double("b")]);
        ds.add_row(vec![DtaValue::numeric(1.0)]);
        let err = DtaWriter::new(Vec::new()).write_dataset(&ds).unwrap_err();
        assert!(matches!(
            err,
            DtaError::RowLengthMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_byte() {
        let mut ds = DtaDataset::with_columns(vec![DtaColumn::byte("flag")]);
        ds.add_row(vec![DtaValue::numeric(250.0)]);
        let err = DtaWriter::new(Vec::new()).write_dataset(&ds).unwrap_err();
        assert!(matches!(err, DtaError::ValueTypeMismatch { .. }));
    }

    #[test]
    fn rejects_oversized_string() {
        let mut ds = DtaDataset::with_columns(vec![DtaColumn::string("id", 4)]);
        ds.add_row(vec![DtaValue::string("toolong")]);
        let err = DtaWriter::new(Vec::new()).write_dataset(&ds).unwrap_err();
        assert!(matches!(err, DtaError::ValueTypeMismatch { .. }));
    }

    #[test]
    fn rejects_string_in_numeric_column() {
        let mut ds = DtaDataset::with_columns(vec![DtaColumn::double("x")]);
        ds.add_row(vec![DtaValue::string("oops")]);
        let err = DtaWriter::new(Vec::new()).write_dataset(&ds).unwrap_err();
        assert!(matches!(err, DtaError::ValueTypeMismatch { .. }));
    }

    #[test]
    fn int_range_check() {
        assert!(int_in_range(10.0, -127.0, 100.0).is_some());
        assert!(int_in_range(10.5, -127.0, 100.0).is_none());
        assert!(int_in_range(101.0, -127.0, 100.0).is_none());
    }
}
