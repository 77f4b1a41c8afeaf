//! Round-trip tests for the `.dta` reader/writer pair.

use std::io::Cursor;

use donor_dta::{
    DtaColumn, DtaDataset, DtaReader, DtaValue, DtaVersion, DtaWriter, DtaWriterOptions,
    MissingValue, NumericValue,
};
use proptest::prelude::{ProptestConfig, proptest};

/// Write a dataset to a buffer and read it back.
fn roundtrip(dataset: &DtaDataset, version: DtaVersion) -> DtaDataset {
    let mut buffer = Vec::new();
    let options = DtaWriterOptions::default().with_version(version);
    {
        let writer = DtaWriter::with_options(Cursor::new(&mut buffer), options);
        writer.write_dataset(dataset).unwrap();
    }
    let reader = DtaReader::new(Cursor::new(&buffer));
    reader.read_dataset().unwrap()
}

fn sample_dataset() -> DtaDataset {
    let mut dataset = DtaDataset::with_columns(vec![
        DtaColumn::string("DONOR_KEY", 12).with_label("Donor identifier"),
        DtaColumn::byte("ASSIGN_GRP").with_label("Treatment assignment"),
        DtaColumn::int("CAMPAIGN_WAVE"),
        DtaColumn::long("ZIP_MED_INC"),
        DtaColumn::double("AVG_DON_YR").with_label("Avg donations per year"),
    ])
    .with_label("Vendor extract");

    dataset.add_row(vec![
        DtaValue::string("D-000001"),
        DtaValue::numeric(1.0),
        DtaValue::numeric(2.0),
        DtaValue::numeric(61_500.0),
        DtaValue::numeric(1.25),
    ]);
    dataset.add_row(vec![
        DtaValue::string("D-000002"),
        DtaValue::numeric(0.0),
        DtaValue::numeric(1.0),
        DtaValue::numeric_missing(),
        DtaValue::numeric_missing_with(MissingValue::Extended('a')),
    ]);
    dataset
}

#[test]
fn v118_basic_roundtrip() {
    let dataset = sample_dataset();
    let back = roundtrip(&dataset, DtaVersion::V118);

    assert_eq!(back.label.as_deref(), Some("Vendor extract"));
    assert_eq!(back.num_vars(), 5);
    assert_eq!(back.num_rows(), 2);
    assert_eq!(back.columns[0].name, "DONOR_KEY");
    assert_eq!(back.columns[0].label.as_deref(), Some("Donor identifier"));
    assert_eq!(back.columns[2].label, None);
    assert_eq!(back.rows, dataset.rows);
}

#[test]
fn v117_basic_roundtrip() {
    let dataset = sample_dataset();
    let back = roundtrip(&dataset, DtaVersion::V117);
    assert_eq!(back.rows, dataset.rows);
    assert_eq!(
        back.columns[4].label.as_deref(),
        Some("Avg donations per year")
    );
}

#[test]
fn missing_sentinels_survive_roundtrip() {
    let mut dataset = DtaDataset::with_columns(vec![
        DtaColumn::byte("b"),
        DtaColumn::int("i"),
        DtaColumn::long("l"),
        DtaColumn::float("f"),
        DtaColumn::double("d"),
    ]);
    for missing in [
        MissingValue::Standard,
        MissingValue::Extended('a'),
        MissingValue::Extended('z'),
    ] {
        dataset.add_row(vec![DtaValue::numeric_missing_with(missing); 5]);
    }

    let back = roundtrip(&dataset, DtaVersion::V118);
    for (row, missing) in back.rows.iter().zip([
        MissingValue::Standard,
        MissingValue::Extended('a'),
        MissingValue::Extended('z'),
    ]) {
        for value in row {
            assert_eq!(
                *value,
                DtaValue::Num(NumericValue::Missing(missing)),
                "sentinel changed in roundtrip"
            );
        }
    }
}

#[test]
fn empty_dataset_roundtrip() {
    let dataset = DtaDataset::with_columns(vec![DtaColumn::double("x")]);
    let back = roundtrip(&dataset, DtaVersion::V118);
    assert_eq!(back.num_rows(), 0);
    assert_eq!(back.num_vars(), 1);
}

#[test]
fn string_padding_is_trimmed() {
    let mut dataset = DtaDataset::with_columns(vec![DtaColumn::string("s", 8)]);
    dataset.add_row(vec![DtaValue::string("ab")]);
    dataset.add_row(vec![DtaValue::string("")]);
    let back = roundtrip(&dataset, DtaVersion::V118);
    assert_eq!(back.rows[0][0], DtaValue::string("ab"));
    assert_eq!(back.rows[1][0], DtaValue::string(""));
    assert!(back.rows[1][0].is_missing());
}

#[test]
fn read_rejects_strl_column() {
    // Hand-build a file with a strL type code by patching writer output.
    let mut dataset = DtaDataset::with_columns(vec![DtaColumn::int("notes")]);
    dataset.add_row(vec![DtaValue::numeric(1.0)]);
    let mut buffer = Vec::new();
    DtaWriter::new(Cursor::new(&mut buffer))
        .write_dataset(&dataset)
        .unwrap();

    let marker = b"<variable_types>";
    let pos = buffer
        .windows(marker.len())
        .position(|w| w == marker)
        .unwrap()
        + marker.len();
    buffer[pos..pos + 2].copy_from_slice(&32768u16.to_le_bytes());

    let err = DtaReader::new(Cursor::new(&buffer))
        .read_dataset()
        .unwrap_err();
    assert!(matches!(err, donor_dta::DtaError::StrlUnsupported { .. }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn doubles_roundtrip(values in proptest::collection::vec(-1.0e300..1.0e300_f64, 1..40)) {
        let mut dataset = DtaDataset::with_columns(vec![DtaColumn::double("x")]);
        for v in &values {
            dataset.add_row(vec![DtaValue::numeric(*v)]);
        }
        let back = roundtrip(&dataset, DtaVersion::V118);
        for (row, v) in back.rows.iter().zip(values.iter()) {
            assert_eq!(row[0], DtaValue::numeric(*v));
        }
    }

    #[test]
    fn ascii_strings_roundtrip(values in proptest::collection::vec("[ -~]{0,20}", 1..20)) {
        let mut dataset = DtaDataset::with_columns(vec![DtaColumn::string("s", 20)]);
        for v in &values {
            dataset.add_row(vec![DtaValue::string(v.clone())]);
        }
        let back = roundtrip(&dataset, DtaVersion::V118);
        for (row, v) in back.rows.iter().zip(values.iter()) {
            assert_eq!(row[0].as_str(), Some(v.trim_end()));
        }
    }

    #[test]
    fn small_ints_roundtrip(values in proptest::collection::vec(-127i64..=100, 1..40)) {
        let mut dataset = DtaDataset::with_columns(vec![DtaColumn::byte("b")]);
        for v in &values {
            dataset.add_row(vec![DtaValue::numeric(*v as f64)]);
        }
        let back = roundtrip(&dataset, DtaVersion::V118);
        for (row, v) in back.rows.iter().zip(values.iter()) {
            assert_eq!(row[0], DtaValue::numeric(*v as f64));
        }
    }
}
