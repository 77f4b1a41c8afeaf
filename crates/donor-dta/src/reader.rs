//! `.dta` file reader.
//!
//! Parses the tagged section layout of releases 117 and 118. Sections are
//! laid out sequentially, so the reader walks the tags in order and never
//! consults the `<map>` offsets.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{DtaError, Result};
use crate::missing::{decode_byte, decode_double, decode_float, decode_int, decode_long};
use crate::types::{DtaColumn, DtaDataset, DtaReaderOptions, DtaType, DtaValue, DtaVersion};

/// `.dta` file reader with release auto-detection.
pub struct DtaReader<R: Read> {
    reader: BufReader<R>,
    options: DtaReaderOptions,
}

impl<R: Read> DtaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            options: DtaReaderOptions::default(),
        }
    }

    pub fn with_options(reader: R, options: DtaReaderOptions) -> Self {
        Self {
            reader: BufReader::new(reader),
            options,
        }
    }

    /// Read the entire file into memory and parse it.
    pub fn read_dataset(mut self) -> Result<DtaDataset> {
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data)?;
        parse_dta_data(&data, &self.options)
    }
}

impl DtaReader<File> {
    /// Open a `.dta` file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DtaError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DtaError::Io(e)
            }
        })?;
        Ok(Self::new(file))
    }
}

/// Read a `.dta` file from a path.
pub fn read_dta(path: &Path) -> Result<DtaDataset> {
    DtaReader::open(path)?.read_dataset()
}

/// Read a `.dta` file with options.
pub fn read_dta_with_options(path: &Path, options: DtaReaderOptions) -> Result<DtaDataset> {
    let mut reader = DtaReader::open(path)?;
    reader.options = options;
    reader.read_dataset()
}

/// Sequential cursor over the file bytes.
struct Scanner<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(DtaError::OutOfBounds {
                offset: self.offset,
            })?;
        let slice = &self.data[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn peek(&self, len: usize) -> Option<&'a [u8]> {
        self.data.get(self.offset..self.offset + len)
    }

    fn expect_tag(&mut self, tag: &'static str) -> Result<()> {
        let bytes = self.peek(tag.len()).ok_or(DtaError::OutOfBounds {
            offset: self.offset,
        })?;
        if bytes != tag.as_bytes() {
            return Err(DtaError::UnexpectedTag {
                expected: tag,
                offset: self.offset,
            });
        }
        self.offset += tag.len();
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }
}

/// Decode a NUL-padded fixed-width text slot.
fn padded_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn parse_dta_data(data: &[u8], options: &DtaReaderOptions) -> Result<DtaDataset> {
    let mut scan = Scanner::new(data);
    scan.expect_tag("<stata_dta>")?;

    // Header: release, byte order, dimensions, labels.
    scan.expect_tag("<header>")?;
    scan.expect_tag("<release>")?;
    let release = scan.take(3)?;
    let version = match release {
        b"117" => DtaVersion::V117,
        b"118" => DtaVersion::V118,
        other => {
            return Err(DtaError::UnsupportedRelease {
                release: String::from_utf8_lossy(other).into_owned(),
            });
        }
    };
    scan.expect_tag("</release>")?;

    scan.expect_tag("<byteorder>")?;
    let order = scan.take(3)?;
    match order {
        b"LSF" => {}
        b"MSF" => return Err(DtaError::BigEndianUnsupported),
        _ => return Err(DtaError::invalid_format("unrecognized byte order")),
    }
    scan.expect_tag("</byteorder>")?;

    scan.expect_tag("<K>")?;
    let var_count = scan.read_u16()? as usize;
    scan.expect_tag("</K>")?;

    scan.expect_tag("<N>")?;
    let row_count = match version {
        DtaVersion::V117 => u64::from(scan.read_u32()?),
        DtaVersion::V118 => scan.read_u64()?,
    };
    scan.expect_tag("</N>")?;

    scan.expect_tag("<label>")?;
    let label_len = match version {
        DtaVersion::V117 => usize::from(scan.read_u8()?),
        DtaVersion::V118 => usize::from(scan.read_u16()?),
    };
    let label_bytes = scan.take(label_len)?;
    let dataset_label = if label_len == 0 {
        None
    } else {
        Some(String::from_utf8_lossy(label_bytes).into_owned())
    };
    scan.expect_tag("</label>")?;

    scan.expect_tag("<timestamp>")?;
    let ts_len = usize::from(scan.read_u8()?);
    let _ = scan.take(ts_len)?;
    scan.expect_tag("</timestamp>")?;
    scan.expect_tag("</header>")?;

    // Map offsets are redundant for a sequential parse.
    scan.expect_tag("<map>")?;
    for _ in 0..14 {
        let _ = scan.read_u64()?;
    }
    scan.expect_tag("</map>")?;

    scan.expect_tag("<variable_types>")?;
    let mut type_codes = Vec::with_capacity(var_count);
    for _ in 0..var_count {
        type_codes.push(scan.read_u16()?);
    }
    scan.expect_tag("</variable_types>")?;

    scan.expect_tag("<varnames>")?;
    let mut names = Vec::with_capacity(var_count);
    for _ in 0..var_count {
        names.push(padded_str(scan.take(version.varname_len())?));
    }
    scan.expect_tag("</varnames>")?;

    scan.expect_tag("<sortlist>")?;
    let _ = scan.take((var_count + 1) * 2)?;
    scan.expect_tag("</sortlist>")?;

    scan.expect_tag("<formats>")?;
    let _ = scan.take(var_count * version.format_len())?;
    scan.expect_tag("</formats>")?;

    scan.expect_tag("<value_label_names>")?;
    let _ = scan.take(var_count * version.value_label_name_len())?;
    scan.expect_tag("</value_label_names>")?;

    scan.expect_tag("<variable_labels>")?;
    let mut labels = Vec::with_capacity(var_count);
    for _ in 0..var_count {
        let text = padded_str(scan.take(version.variable_label_len())?);
        labels.push(if text.is_empty() { None } else { Some(text) });
    }
    scan.expect_tag("</variable_labels>")?;

    // Characteristics: zero or more <ch> blocks, each length-prefixed.
    scan.expect_tag("<characteristics>")?;
    while scan.peek(4) == Some(b"<ch>") {
        scan.expect_tag("<ch>")?;
        let len = scan.read_u32()? as usize;
        let _ = scan.take(len)?;
        scan.expect_tag("</ch>")?;
    }
    scan.expect_tag("</characteristics>")?;

    // Build column metadata before touching data rows.
    let mut columns = Vec::with_capacity(var_count);
    for idx in 0..var_count {
        let name = names[idx].clone();
        let data_type = DtaType::from_code(type_codes[idx], &name)?;
        columns.push(DtaColumn {
            name,
            label: labels[idx].take(),
            data_type,
        });
    }

    scan.expect_tag("<data>")?;
    let mut rows = Vec::with_capacity(usize::try_from(row_count).unwrap_or(0));
    for _ in 0..row_count {
        rows.push(parse_row(&mut scan, &columns, options)?);
    }
    scan.expect_tag("</data>")?;

    // strLs and value labels are not consumed: codes are decoded through
    // the pipeline's own closed lookup tables.
    Ok(DtaDataset {
        label: dataset_label,
        columns,
        rows,
    })
}

fn parse_row(
    scan: &mut Scanner<'_>,
    columns: &[DtaColumn],
    options: &DtaReaderOptions,
) -> Result<Vec<DtaValue>> {
    let mut values = Vec::with_capacity(columns.len());
    for column in columns {
        let value = match column.data_type {
            DtaType::Byte => DtaValue::Num(decode_byte(scan.take(1)?[0] as i8)),
            DtaType::Int => {
                let b = scan.take(2)?;
                DtaValue::Num(decode_int(i16::from_le_bytes([b[0], b[1]])))
            }
            DtaType::Long => {
                let b = scan.take(4)?;
                DtaValue::Num(decode_long(i32::from_le_bytes([b[0], b[1], b[2], b[3]])))
            }
            DtaType::Float => {
                let b = scan.take(4)?;
                DtaValue::Num(decode_float(f32::from_le_bytes([b[0], b[1], b[2], b[3]])))
            }
            DtaType::Double => {
                let b = scan.take(8)?;
                let mut buf = [0u8; 8];
                buf.copy_from_slice(b);
                DtaValue::Num(decode_double(f64::from_le_bytes(buf)))
            }
            DtaType::Str(len) => {
                let text = padded_str(scan.take(len as usize)?);
                let text = if options.trim_strings {
                    text.trim_end().to_string()
                } else {
                    text
                };
                DtaValue::Str(text)
            }
        };
        values.push(value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_str_stops_at_nul() {
        assert_eq!(padded_str(b"AGE\0\0\0"), "AGE");
        assert_eq!(padded_str(b"FULLWIDTH"), "FULLWIDTH");
        assert_eq!(padded_str(b"\0\0"), "");
    }

    #[test]
    fn scanner_rejects_wrong_tag() {
        let mut scan = Scanner::new(b"<stata_dta>");
        let err = scan.expect_tag("<header>").unwrap_err();
        assert!(matches!(
            err,
            DtaError::UnexpectedTag {
                expected: "<header>",
                ..
            }
        ));
    }

    #[test]
    fn scanner_reports_out_of_bounds() {
        let mut scan = Scanner::new(b"ab");
        assert!(scan.take(2).is_ok());
        assert!(matches!(
            scan.take(1),
            Err(DtaError::OutOfBounds { offset: 2 })
        ));
    }

    #[test]
    fn truncated_file_is_a_format_error() {
        let err = parse_dta_data(b"<stata_dta><header>", &DtaReaderOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            DtaError::UnexpectedTag { .. } | DtaError::OutOfBounds { .. }
        ));
    }
}
