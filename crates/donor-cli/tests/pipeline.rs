//! End-to-end pipeline test: raw extract in, LaTeX tables out.

use std::path::Path;

use donor_cli::cli::{BuildArgs, RunArgs};
use donor_cli::commands::{run_build, run_pipeline};
use donor_dta::{DtaColumn, DtaDataset, DtaValue, write_dta};
use donor_model::{raw, required_raw_columns};

/// Deterministic pseudo-draw in 0..100.
fn draw(i: usize, salt: u32) -> u32 {
    (i as u32)
        .wrapping_mul(2654435761)
        .wrapping_add(salt)
        .rotate_left(13)
        % 100
}

fn flag(value: bool) -> DtaValue {
    DtaValue::numeric(if value { 1.0 } else { 0.0 })
}

/// Write a 240-record raw vendor extract with mild treatment effects.
fn write_raw_extract(path: &Path) {
    let mut columns = vec![DtaColumn::string(raw::DONOR_KEY, 12)];
    for name in required_raw_columns().skip(1) {
        columns.push(DtaColumn::double(name));
    }
    let mut dataset = DtaDataset::with_columns(columns);

    for i in 0..240 {
        let treated = i % 2 == 1;
        let opened = draw(i, 1) < 80;
        let phone_ok = draw(i, 2) < 70;
        let bonus = if treated { 15 } else { 0 };
        let a24 = draw(i, 3) < 15 + bonus;
        let a48 = a24 || draw(i, 4) < 15 + bonus;
        let a7d = a48 || draw(i, 5) < 10;
        let ever = a7d || draw(i, 6) < 5;
        let d13 = a48 && draw(i, 7) < 60;
        let d_ever = if i % 17 == 0 {
            DtaValue::numeric_missing()
        } else {
            flag(d13 || draw(i, 8) < 10)
        };

        // Covariates come from independent draws so no regressor is an
        // exact linear combination of the wave or region indicators.
        dataset.add_row(vec![
            DtaValue::string(format!("D-{i}")),
            flag(treated),
            DtaValue::numeric((draw(i, 11) % 4 + 1) as f64),
            flag(draw(i, 12) < 51),
            DtaValue::numeric(25.0 + (draw(i, 13) % 40) as f64),
            DtaValue::numeric((draw(i, 14) % 5 + 1) as f64),
            DtaValue::numeric((draw(i, 15) % 8 + 1) as f64),
            flag(draw(i, 16) < 40),
            DtaValue::numeric((draw(i, 17) % 7) as f64),
            DtaValue::numeric(40_000.0 + (draw(i, 18) % 10) as f64 * 1_000.0),
            DtaValue::numeric((draw(i, 19) % 4 + 1) as f64),
            flag(draw(i, 20) < 60),
            DtaValue::numeric((draw(i, 21) % 9) as f64 * 0.1),
            flag(draw(i, 22) < 50),
            flag(opened),
            flag(phone_ok),
            flag(a24),
            flag(a48),
            flag(a7d),
            flag(ever),
            flag(d13),
            d_ever,
            flag(draw(i, 9) < 10),
            DtaValue::numeric((draw(i, 10) % 4) as f64),
        ]);
    }
    write_dta(path, &dataset).unwrap();
}

#[test]
fn pipeline_produces_dataset_and_all_tables() {
    let dir = tempfile::tempdir().unwrap();
    let raw_path = dir.path().join("extract.dta");
    write_raw_extract(&raw_path);

    let out_dir = dir.path().join("out");
    let (build, tables) = run_pipeline(&RunArgs {
        raw: raw_path,
        out_dir: out_dir.clone(),
        print: false,
        only: Vec::new(),
        strict: false,
        median_override: None,
    })
    .unwrap();

    assert_eq!(build.records, 240);
    assert_eq!(tables.records, 240);
    assert_eq!(tables.written.len(), 10);
    assert!(out_dir.join("analysis.csv").exists());
    for number in 1..=10 {
        assert!(out_dir.join(format!("s{number}.tex")).exists());
    }
}

#[test]
fn missing_raw_column_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let raw_path = dir.path().join("broken.dta");

    // Leave out the blood-type column entirely.
    let mut columns = vec![DtaColumn::string(raw::DONOR_KEY, 12)];
    for name in required_raw_columns().skip(1) {
        if name != raw::BLOOD_CD {
            columns.push(DtaColumn::double(name));
        }
    }
    let mut dataset = DtaDataset::with_columns(columns);
    dataset.add_row(
        std::iter::once(DtaValue::string("D-0"))
            .chain((1..required_raw_columns().count() - 1).map(|_| DtaValue::numeric(0.0)))
            .collect(),
    );
    write_dta(&raw_path, &dataset).unwrap();

    let out = dir.path().join("analysis.csv");
    let error = run_build(&BuildArgs {
        raw: raw_path,
        out: out.clone(),
        strict: false,
        median_override: None,
    })
    .unwrap_err();
    assert!(error.to_string().contains(raw::BLOOD_CD));
    assert!(!out.exists(), "no partial output on configuration error");
}
