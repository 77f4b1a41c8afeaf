//! The builder output must be stable under re-derivation: recomputing
//! the median split from the written flat file reproduces the stored
//! split exactly.

use donor_build::{build_dataset, median, write_canonical_csv};
use donor_dta::{DtaColumn, DtaDataset, DtaValue};
use donor_ingest::{column_f64, column_i64, dta_to_frame, read_canonical_frame};
use donor_model::{BuildOptions, canonical, raw, required_raw_columns};

fn raw_frame(donation_avgs: &[Option<f64>]) -> polars::prelude::DataFrame {
    let mut columns = vec![DtaColumn::string(raw::DONOR_KEY, 12)];
    for name in required_raw_columns().skip(1) {
        columns.push(DtaColumn::double(name));
    }
    let mut dataset = DtaDataset::with_columns(columns);
    for (idx, avg) in donation_avgs.iter().enumerate() {
        let mut row = vec![DtaValue::string(format!("D-{idx}"))];
        for name in required_raw_columns().skip(1) {
            row.push(match (name, avg) {
                (raw::AVG_DON_YR, Some(v)) => DtaValue::numeric(*v),
                _ => DtaValue::numeric_missing(),
            });
        }
        dataset.add_row(row);
    }
    dta_to_frame(&dataset).unwrap()
}

#[test]
fn median_split_is_idempotent_under_rederivation() {
    let avgs = vec![
        Some(0.5),
        Some(1.5),
        Some(3.0),
        None,
        Some(2.0),
        Some(8.0),
        Some(0.0),
    ];
    let df = raw_frame(&avgs);
    let outcome = build_dataset(&df, &BuildOptions::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis.csv");
    write_canonical_csv(&outcome.rows, &path).unwrap();

    let reread = read_canonical_frame(&path).unwrap();
    let reread_avgs = column_f64(&reread, canonical::AVG_ANNUAL_DONATIONS).unwrap();
    let stored_split = column_i64(&reread, canonical::HIGH_PRIOR_DONATIONS).unwrap();

    let threshold = median(&reread_avgs).unwrap();
    assert_eq!(Some(threshold), outcome.median_threshold);
    for (avg, stored) in reread_avgs.iter().zip(&stored_split) {
        let expected = avg.map(|v| i64::from(v > threshold));
        assert_eq!(*stored, expected);
    }
}
