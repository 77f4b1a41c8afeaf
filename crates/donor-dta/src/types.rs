//! Core types for `.dta` datasets.

use crate::error::{DtaError, Result};

/// Supported `.dta` releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DtaVersion {
    /// Release 117 (Stata 13).
    V117,
    /// Release 118 (Stata 14+).
    #[default]
    V118,
}

impl DtaVersion {
    /// The `<release>` payload for this version.
    pub fn release_bytes(self) -> &'static [u8; 3] {
        match self {
            Self::V117 => b"117",
            Self::V118 => b"118",
        }
    }

    /// Width of a NUL-padded variable-name slot.
    pub fn varname_len(self) -> usize {
        match self {
            Self::V117 => 33,
            Self::V118 => 129,
        }
    }

    /// Width of a NUL-padded display-format slot.
    pub fn format_len(self) -> usize {
        match self {
            Self::V117 => 49,
            Self::V118 => 57,
        }
    }

    /// Width of a NUL-padded value-label-name slot.
    pub fn value_label_name_len(self) -> usize {
        match self {
            Self::V117 => 33,
            Self::V118 => 129,
        }
    }

    /// Width of a NUL-padded variable-label slot.
    pub fn variable_label_len(self) -> usize {
        match self {
            Self::V117 => 81,
            Self::V118 => 321,
        }
    }
}

/// Storage type of a `.dta` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtaType {
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Int,
    /// Signed 32-bit integer.
    Long,
    /// IEEE single precision.
    Float,
    /// IEEE double precision.
    Double,
    /// Fixed-width string of the given byte length (1..=2045).
    Str(u16),
}

impl DtaType {
    /// The on-disk type code.
    pub fn code(self) -> u16 {
        match self {
            Self::Str(len) => len,
            Self::Double => 65526,
            Self::Float => 65527,
            Self::Long => 65528,
            Self::Int => 65529,
            Self::Byte => 65530,
        }
    }

    /// Decode an on-disk type code.
    pub fn from_code(code: u16, name: &str) -> Result<Self> {
        match code {
            1..=2045 => Ok(Self::Str(code)),
            32768 => Err(DtaError::StrlUnsupported {
                name: name.to_string(),
            }),
            65526 => Ok(Self::Double),
            65527 => Ok(Self::Float),
            65528 => Ok(Self::Long),
            65529 => Ok(Self::Int),
            65530 => Ok(Self::Byte),
            _ => Err(DtaError::UnsupportedType {
                name: name.to_string(),
                code,
            }),
        }
    }

    /// Bytes one value of this type occupies in a data row.
    pub fn width(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Int => 2,
            Self::Long | Self::Float => 4,
            Self::Double => 8,
            Self::Str(len) => len as usize,
        }
    }

    /// Default display format Stata would assign.
    pub fn default_format(self) -> String {
        match self {
            Self::Byte | Self::Int => "%8.0g".to_string(),
            Self::Long => "%12.0g".to_string(),
            Self::Float => "%9.0g".to_string(),
            Self::Double => "%10.0g".to_string(),
            Self::Str(len) => format!("%{len}s"),
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Str(_))
    }
}

/// Stata numeric missing-value codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingValue {
    /// The standard missing value `.`.
    Standard,
    /// Extended missing values `.a` through `.z`.
    Extended(char),
}

impl MissingValue {
    /// Offset from the base missing sentinel (0 for `.`, 1..=26 for `.a`-`.z`).
    pub fn index(self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Extended(letter) => (letter as u8) - b'a' + 1,
        }
    }

    /// Build from a sentinel offset; out-of-range offsets collapse to `.`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1..=26 => Self::Extended((b'a' + index - 1) as char),
            _ => Self::Standard,
        }
    }
}

/// A numeric cell: either a value or a missing-value code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Value(f64),
    Missing(MissingValue),
}

impl NumericValue {
    pub fn is_missing(self) -> bool {
        matches!(self, Self::Missing(_))
    }

    pub fn is_present(self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing(_) => None,
        }
    }

    pub fn missing_type(self) -> Option<MissingValue> {
        match self {
            Self::Value(_) => None,
            Self::Missing(m) => Some(m),
        }
    }
}

/// A single cell of a `.dta` row.
#[derive(Debug, Clone, PartialEq)]
pub enum DtaValue {
    Num(NumericValue),
    Str(String),
}

impl DtaValue {
    pub fn numeric(value: f64) -> Self {
        Self::Num(NumericValue::Value(value))
    }

    pub fn numeric_missing() -> Self {
        Self::Num(NumericValue::Missing(MissingValue::Standard))
    }

    pub fn numeric_missing_with(missing: MissingValue) -> Self {
        Self::Num(NumericValue::Missing(missing))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// True for numeric missing codes and for empty strings (Stata's
    /// string missing value).
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Num(num) => num.is_missing(),
            Self::Str(s) => s.is_empty(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Num(num) => num.value(),
            Self::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Num(_) => None,
            Self::Str(s) => Some(s.as_str()),
        }
    }
}

/// Metadata for one `.dta` variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtaColumn {
    /// Variable name (ASCII identifier, at most 32 bytes).
    pub name: String,
    /// Optional variable label.
    pub label: Option<String>,
    /// Storage type.
    pub data_type: DtaType,
}

impl DtaColumn {
    pub fn new(name: impl Into<String>, data_type: DtaType) -> Self {
        Self {
            name: name.into(),
            label: None,
            data_type,
        }
    }

    pub fn byte(name: impl Into<String>) -> Self {
        Self::new(name, DtaType::Byte)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, DtaType::Int)
    }

    pub fn long(name: impl Into<String>) -> Self {
        Self::new(name, DtaType::Long)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, DtaType::Float)
    }

    pub fn double(name: impl Into<String>) -> Self {
        Self::new(name, DtaType::Double)
    }

    pub fn string(name: impl Into<String>, len: u16) -> Self {
        Self::new(name, DtaType::Str(len))
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Validate the variable name against Stata's identifier rules.
    pub fn validate_name(&self) -> Result<()> {
        let name = self.name.as_str();
        let valid_start = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if name.is_empty() || name.len() > 32 || !valid_start || !valid_rest {
            return Err(DtaError::InvalidVariableName {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

/// An in-memory `.dta` dataset.
#[derive(Debug, Clone, Default)]
pub struct DtaDataset {
    /// Optional dataset label.
    pub label: Option<String>,
    /// Variable metadata, in column order.
    pub columns: Vec<DtaColumn>,
    /// Row-major data.
    pub rows: Vec<Vec<DtaValue>>,
}

impl DtaDataset {
    pub fn with_columns(columns: Vec<DtaColumn>) -> Self {
        Self {
            label: None,
            columns,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn add_row(&mut self, row: Vec<DtaValue>) {
        self.rows.push(row);
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_vars(&self) -> usize {
        self.columns.len()
    }

    /// Bytes one data row occupies on disk.
    pub fn row_width(&self) -> usize {
        self.columns.iter().map(|c| c.data_type.width()).sum()
    }

    /// Position of a variable by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// Options for reading `.dta` files.
#[derive(Debug, Clone)]
pub struct DtaReaderOptions {
    /// Trim trailing whitespace from string values.
    pub trim_strings: bool,
}

impl Default for DtaReaderOptions {
    fn default() -> Self {
        Self { trim_strings: true }
    }
}

/// Options for writing `.dta` files.
#[derive(Debug, Clone, Default)]
pub struct DtaWriterOptions {
    /// Target release. Defaults to 118.
    pub version: DtaVersion,
}

impl DtaWriterOptions {
    #[must_use]
    pub fn with_version(mut self, version: DtaVersion) -> Self {
        self.version = version;
        self
    }
}
