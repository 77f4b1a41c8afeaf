//! Descriptive tables: representativeness (S1), balance (S2), and
//! attrition (S3).

use anyhow::Result;

use donor_model::{Sample, TreatmentArm, UNKNOWN_LABEL, canonical};

use crate::data::AnalysisData;
use crate::summary::{mean, proportion};
use crate::table::{Table, fmt3_opt};

/// External population benchmarks for S1, keyed by characteristic label.
/// Characteristics without an entry render a blank benchmark cell.
const POPULATION_BENCHMARKS: &[(&str, f64)] = &[
    ("Female", 0.508),
    ("Age", 38.9),
    ("White", 0.601),
    ("Black", 0.122),
    ("Asian", 0.059),
    ("Hispanic", 0.187),
    ("Other", 0.031),
    ("Urban", 0.803),
];

fn benchmark(label: &str) -> Option<f64> {
    POPULATION_BENCHMARKS
        .iter()
        .find(|(key, _)| *key == label)
        .map(|(_, value)| *value)
}

/// S1: study-sample characteristics against population benchmarks.
pub fn representativeness(data: &AnalysisData) -> Result<Table> {
    let rows = data.sample_rows(Sample::Study)?;
    let race = data.labels(canonical::RACE)?;

    let mut entries: Vec<(&str, Option<f64>)> = vec![
        ("Female", mean(data.numeric(canonical::FEMALE)?, &rows)),
        ("Age", mean(data.numeric(canonical::AGE)?, &rows)),
    ];
    // The fallback level is listed too so records with unrecognized race
    // codes stay visible instead of silently diluting the other shares.
    for level in ["White", "Black", "Asian", "Hispanic", "Other", UNKNOWN_LABEL] {
        entries.push((level, proportion(race, &rows, level)));
    }
    entries.push(("Urban", mean(data.numeric(canonical::URBAN)?, &rows)));
    entries.push(("Prior donor", mean(data.numeric(canonical::PRIOR_DONOR)?, &rows)));

    let mut table = Table::new(
        1,
        "Representativeness of the study sample",
        vec![
            "Characteristic".into(),
            "Study sample".into(),
            "Population benchmark".into(),
        ],
    );
    for (label, value) in entries {
        table.push_row(vec![
            label.to_string(),
            fmt3_opt(value),
            fmt3_opt(benchmark(label)),
        ]);
    }
    table.push_row(vec![
        "Observations".into(),
        rows.len().to_string(),
        String::new(),
    ]);
    Ok(table)
}

/// Covariates summarized per arm in S2's Panel A.
const BALANCE_COVARIATES: &[(&str, &str)] = &[
    ("Female", canonical::FEMALE),
    ("Age", canonical::AGE),
    ("Prior donor", canonical::PRIOR_DONOR),
    ("Avg. annual donations", canonical::AVG_ANNUAL_DONATIONS),
    ("ZIP median income", canonical::ZIP_MEDIAN_INCOME),
    ("AB blood type", canonical::AB_BLOOD_TYPE),
    ("Urban", canonical::URBAN),
    ("COVID case rate", canonical::COVID_CASE_RATE),
    ("Majority Democratic county", canonical::MAJORITY_DEMOCRATIC),
];

/// S2: per-arm covariate means, study sample (Panel A) and eligibility
/// flags over the baseline sample (Panel B).
pub fn balance(data: &AnalysisData) -> Result<Table> {
    let treatment = data.numeric(canonical::TREATMENT)?;
    let arm_rows = |sample: Sample, arm: TreatmentArm| -> Result<Vec<usize>> {
        let code = arm_code(arm);
        Ok(data
            .sample_rows(sample)?
            .into_iter()
            .filter(|&r| treatment[r] == Some(code))
            .collect())
    };

    let mut table = Table::new(
        2,
        "Covariate balance by treatment arm",
        vec![
            "Characteristic".into(),
            TreatmentArm::Control.label().into(),
            TreatmentArm::Symbolic.label().into(),
        ],
    );

    table.push_row(vec!["Panel A: Study sample".into(), String::new(), String::new()]);
    let control = arm_rows(Sample::Study, TreatmentArm::Control)?;
    let symbolic = arm_rows(Sample::Study, TreatmentArm::Symbolic)?;
    for &(label, column) in BALANCE_COVARIATES {
        let values = data.numeric(column)?;
        table.push_row(vec![
            label.to_string(),
            fmt3_opt(mean(values, &control)),
            fmt3_opt(mean(values, &symbolic)),
        ]);
    }
    table.push_row(vec![
        "Observations".into(),
        control.len().to_string(),
        symbolic.len().to_string(),
    ]);

    table.push_row(vec!["Panel B: Baseline sample".into(), String::new(), String::new()]);
    let control = arm_rows(Sample::Baseline, TreatmentArm::Control)?;
    let symbolic = arm_rows(Sample::Baseline, TreatmentArm::Symbolic)?;
    for (label, column) in [
        ("Opened email", canonical::EMAIL_OPENED),
        ("No phone contact", canonical::NO_PHONE_CONTACT),
    ] {
        let values = data.numeric(column)?;
        table.push_row(vec![
            label.to_string(),
            fmt3_opt(mean(values, &control)),
            fmt3_opt(mean(values, &symbolic)),
        ]);
    }
    table.push_row(vec![
        "Observations".into(),
        control.len().to_string(),
        symbolic.len().to_string(),
    ]);
    Ok(table)
}

fn arm_code(arm: TreatmentArm) -> f64 {
    match arm {
        TreatmentArm::Control => 0.0,
        TreatmentArm::Symbolic => 1.0,
    }
}

/// S3 attrition categories, in priority order.
const ATTRITION_CATEGORIES: [&str; 4] = [
    "Excluded (Both)",
    "Excluded (Did Not Open)",
    "Excluded (Phone Contact)",
    "Analyzed (Study Sample)",
];

/// Classify one record; a missing eligibility flag fails its criterion.
fn attrition_category(email_opened: Option<f64>, no_phone: Option<f64>) -> &'static str {
    let opened = email_opened == Some(1.0);
    let phone_ok = no_phone == Some(1.0);
    match (opened, phone_ok) {
        (false, false) => ATTRITION_CATEGORIES[0],
        (false, true) => ATTRITION_CATEGORIES[1],
        (true, false) => ATTRITION_CATEGORIES[2],
        (true, true) => ATTRITION_CATEGORIES[3],
    }
}

/// S3: exclusive, exhaustive partition of the baseline sample by arm.
pub fn attrition(data: &AnalysisData) -> Result<Table> {
    let treatment = data.numeric(canonical::TREATMENT)?;
    let email = data.numeric(canonical::EMAIL_OPENED)?;
    let phone = data.numeric(canonical::NO_PHONE_CONTACT)?;
    let baseline = data.sample_rows(Sample::Baseline)?;

    let mut table = Table::new(
        3,
        "Attrition and analysis sample construction",
        vec![
            "Category".into(),
            TreatmentArm::Control.label().into(),
            TreatmentArm::Symbolic.label().into(),
            "Total".into(),
        ],
    );

    let mut arm_totals = [0usize; 2];
    for category in ATTRITION_CATEGORIES {
        let mut counts = [0usize; 2];
        for &row in &baseline {
            if attrition_category(email[row], phone[row]) != category {
                continue;
            }
            match treatment[row] {
                Some(code) if code == 0.0 => counts[0] += 1,
                Some(code) if code == 1.0 => counts[1] += 1,
                _ => {}
            }
        }
        arm_totals[0] += counts[0];
        arm_totals[1] += counts[1];
        table.push_row(vec![
            category.to_string(),
            counts[0].to_string(),
            counts[1].to_string(),
            (counts[0] + counts[1]).to_string(),
        ]);
    }
    table.push_row(vec![
        "Total".into(),
        arm_totals[0].to_string(),
        arm_totals[1].to_string(),
        (arm_totals[0] + arm_totals[1]).to_string(),
    ]);
    Ok(table)
}
