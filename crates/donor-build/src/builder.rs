//! Projection from the raw extract to canonical rows.

use anyhow::{Result, bail};
use polars::prelude::DataFrame;
use tracing::{info, warn};

use donor_ingest::{column_f64, column_i64, column_string, require_columns};
use donor_model::{
    BLOOD_TYPE, BuildOptions, CodeMap, DonorError, RACE, REGION, TreatmentArm, is_ab_blood_type,
    raw, required_raw_columns,
};

use crate::record::CanonicalRow;

/// Result of a builder run: the canonical rows plus the global derived
/// state that shaped them.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub rows: Vec<CanonicalRow>,
    /// Threshold used for the high/low prior-donation split; `None` when
    /// every donation average was missing.
    pub median_threshold: Option<f64>,
    /// Count of categorical codes that fell back to the sentinel label.
    pub unknown_codes: usize,
}

/// Median of the non-missing values; `None` when there are none.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().copied().flatten().collect();
    if present.is_empty() {
        return None;
    }
    present.sort_by(|a, b| a.total_cmp(b));
    let mid = present.len() / 2;
    if present.len() % 2 == 1 {
        Some(present[mid])
    } else {
        Some((present[mid - 1] + present[mid]) / 2.0)
    }
}

/// Build canonical rows from the raw extract frame.
///
/// Records come out in input order, one per input row; nothing is
/// dropped. The median split threshold is computed once over the full
/// population before any per-record derivation.
pub fn build_dataset(df: &DataFrame, options: &BuildOptions) -> Result<BuildOutcome> {
    require_columns(df, required_raw_columns())?;

    let participant_ids = column_string(df, raw::DONOR_KEY)?;
    let treatments = column_i64(df, raw::ASSIGN_GRP)?;
    let waves = column_i64(df, raw::CAMPAIGN_WAVE)?;
    let females = column_i64(df, raw::GENDER_F)?;
    let ages = column_f64(df, raw::AGE_YRS)?;
    let race_codes = column_i64(df, raw::RACE_CD)?;
    let blood_codes = column_i64(df, raw::BLOOD_CD)?;
    let prior_donors = column_i64(df, raw::PRIOR_DON_FL)?;
    let donation_avgs = column_f64(df, raw::AVG_DON_YR)?;
    let incomes = column_f64(df, raw::ZIP_MED_INC)?;
    let region_codes = column_i64(df, raw::CENSUS_REG_CD)?;
    let urbans = column_i64(df, raw::URBAN_FL)?;
    let covid_rates = column_f64(df, raw::COVID_RATE)?;
    let democratics = column_i64(df, raw::DEM_MAJ_FL)?;
    let emails_opened = column_i64(df, raw::EMAIL_OPEN_FL)?;
    let no_phones = column_i64(df, raw::NO_PHONE_FL)?;
    let appts_24h = column_i64(df, raw::APPT_24H)?;
    let appts_48h = column_i64(df, raw::APPT_48H)?;
    let appts_7d = column_i64(df, raw::APPT_7D)?;
    let appts_ever = column_i64(df, raw::APPT_EVER)?;
    let donations_13d = column_i64(df, raw::DON_13D)?;
    let donations_ever = column_i64(df, raw::DON_EVER)?;
    let unsubscribes = column_i64(df, raw::UNSUB_FL)?;
    let totals = column_f64(df, raw::TOT_DON_POST)?;

    let median_threshold = match options.median_override {
        Some(threshold) => Some(threshold),
        None => {
            let computed = median(&donation_avgs);
            if computed.is_none() {
                warn!(
                    column = raw::AVG_DON_YR,
                    "all donation averages missing; high/low split left undefined"
                );
            }
            computed
        }
    };

    let mut unknown_codes = 0usize;
    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let treatment = match treatments[idx] {
            Some(code) => match TreatmentArm::from_code(code) {
                Some(_) => Some(code),
                None => {
                    unknown_codes += 1;
                    report_unknown(options, "treatment", code, idx)?;
                    None
                }
            },
            None => None,
        };
        let race = decode(&RACE, race_codes[idx], idx, options, &mut unknown_codes)?;
        let blood_type = decode(&BLOOD_TYPE, blood_codes[idx], idx, options, &mut unknown_codes)?;
        let region = decode(&REGION, region_codes[idx], idx, options, &mut unknown_codes)?;

        let ab_blood_type = blood_type.map(|label| i64::from(is_ab_blood_type(label)));

        // A missing eligibility flag counts as failing that criterion.
        let email_opened = emails_opened[idx];
        let no_phone_contact = no_phones[idx];
        let is_study_sample =
            i64::from(email_opened == Some(1) && no_phone_contact == Some(1));

        let high_prior_donations = match (donation_avgs[idx], median_threshold) {
            (Some(avg), Some(threshold)) => Some(i64::from(avg > threshold)),
            _ => None,
        };

        let appointment_within_48h = appts_48h[idx];
        let donated_anytime = donations_ever[idx];
        let intention_behavior_gap = match (appointment_within_48h, donated_anytime) {
            (Some(1), Some(donated)) => Some(1 - donated),
            _ => None,
        };

        rows.push(CanonicalRow {
            participant_id: participant_ids[idx].clone(),
            treatment,
            wave: waves[idx],
            female: females[idx],
            age: ages[idx],
            race,
            blood_type,
            ab_blood_type,
            prior_donor: prior_donors[idx],
            avg_annual_donations: donation_avgs[idx],
            high_prior_donations,
            zip_median_income: incomes[idx],
            region,
            urban: urbans[idx],
            covid_case_rate: covid_rates[idx],
            majority_democratic: democratics[idx],
            email_opened,
            no_phone_contact,
            is_study_sample,
            appointment_within_24h: appts_24h[idx],
            appointment_within_48h,
            appointment_within_7d: appts_7d[idx],
            appointment_ever: appts_ever[idx],
            donated_within_13d: donations_13d[idx],
            donated_anytime,
            intention_behavior_gap,
            unsubscribed: unsubscribes[idx],
            total_donations: totals[idx],
        });
    }

    info!(
        records = rows.len(),
        unknown_codes,
        median = median_threshold,
        "canonical rows derived"
    );
    Ok(BuildOutcome { rows, median_threshold, unknown_codes })
}

fn decode(
    map: &CodeMap,
    code: Option<i64>,
    row: usize,
    options: &BuildOptions,
    unknown_codes: &mut usize,
) -> Result<Option<&'static str>> {
    let Some(code) = code else { return Ok(None) };
    if !map.contains(code) {
        *unknown_codes += 1;
        report_unknown(options, map.name(), code, row)?;
    }
    Ok(Some(map.label(code)))
}

fn report_unknown(options: &BuildOptions, field: &str, code: i64, row: usize) -> Result<()> {
    if options.fail_on_unknown_codes {
        bail!(DonorError::invalid_value(
            field,
            format!("unknown code {code} at row {row}"),
        ));
    }
    if options.warn_on_unknown_codes {
        warn!(field, code, row, "unknown categorical code mapped to sentinel");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use donor_dta::{DtaColumn, DtaDataset, DtaValue};
    use donor_ingest::dta_to_frame;
    use donor_model::UNKNOWN_LABEL;

    fn raw_columns() -> Vec<DtaColumn> {
        let mut columns = vec![DtaColumn::string(raw::DONOR_KEY, 12)];
        for name in required_raw_columns().skip(1) {
            columns.push(DtaColumn::double(name));
        }
        columns
    }

    fn raw_row(values: &[(&str, f64)], id: &str) -> Vec<DtaValue> {
        let mut row = vec![DtaValue::string(id)];
        for name in required_raw_columns().skip(1) {
            let value = values
                .iter()
                .find(|(column, _)| *column == name)
                .map(|(_, v)| DtaValue::numeric(*v))
                .unwrap_or_else(DtaValue::numeric_missing);
            row.push(value);
        }
        row
    }

    fn frame(rows: Vec<Vec<DtaValue>>) -> DataFrame {
        let mut dataset = DtaDataset::with_columns(raw_columns());
        for row in rows {
            dataset.add_row(row);
        }
        dta_to_frame(&dataset).unwrap()
    }

    #[test]
    fn study_sample_requires_both_eligibility_flags() {
        let df = frame(vec![
            raw_row(&[(raw::EMAIL_OPEN_FL, 1.0), (raw::NO_PHONE_FL, 1.0)], "A"),
            raw_row(&[(raw::EMAIL_OPEN_FL, 1.0), (raw::NO_PHONE_FL, 0.0)], "B"),
            raw_row(&[(raw::EMAIL_OPEN_FL, 0.0), (raw::NO_PHONE_FL, 1.0)], "C"),
            raw_row(&[(raw::NO_PHONE_FL, 1.0)], "D"),
        ]);
        let outcome = build_dataset(&df, &BuildOptions::default()).unwrap();
        let flags: Vec<i64> = outcome.rows.iter().map(|r| r.is_study_sample).collect();
        assert_eq!(flags, vec![1, 0, 0, 0]);
    }

    #[test]
    fn gap_defined_only_with_early_appointment_and_known_donation() {
        let df = frame(vec![
            raw_row(&[(raw::APPT_48H, 1.0), (raw::DON_EVER, 1.0)], "A"),
            raw_row(&[(raw::APPT_48H, 1.0), (raw::DON_EVER, 0.0)], "B"),
            raw_row(&[(raw::APPT_48H, 0.0), (raw::DON_EVER, 1.0)], "C"),
            raw_row(&[(raw::APPT_48H, 1.0)], "D"),
        ]);
        let outcome = build_dataset(&df, &BuildOptions::default()).unwrap();
        let gaps: Vec<Option<i64>> = outcome
            .rows
            .iter()
            .map(|r| r.intention_behavior_gap)
            .collect();
        assert_eq!(gaps, vec![Some(0), Some(1), None, None]);
    }

    #[test]
    fn unknown_blood_code_maps_to_sentinel_and_is_counted() {
        let df = frame(vec![
            raw_row(&[(raw::BLOOD_CD, 7.0)], "A"),
            raw_row(&[(raw::BLOOD_CD, 99.0)], "B"),
        ]);
        let outcome = build_dataset(&df, &BuildOptions::default()).unwrap();
        assert_eq!(outcome.rows[0].blood_type, Some("O+"));
        assert_eq!(outcome.rows[0].ab_blood_type, Some(0));
        assert_eq!(outcome.rows[1].blood_type, Some(UNKNOWN_LABEL));
        assert_eq!(outcome.unknown_codes, 1);
    }

    #[test]
    fn strict_options_reject_unknown_codes() {
        let df = frame(vec![raw_row(&[(raw::RACE_CD, 42.0)], "A")]);
        assert!(build_dataset(&df, &BuildOptions::strict()).is_err());
    }

    #[test]
    fn median_split_uses_global_threshold() {
        let df = frame(vec![
            raw_row(&[(raw::AVG_DON_YR, 1.0)], "A"),
            raw_row(&[(raw::AVG_DON_YR, 2.0)], "B"),
            raw_row(&[(raw::AVG_DON_YR, 10.0)], "C"),
            raw_row(&[], "D"),
        ]);
        let outcome = build_dataset(&df, &BuildOptions::default()).unwrap();
        assert_eq!(outcome.median_threshold, Some(2.0));
        let splits: Vec<Option<i64>> = outcome
            .rows
            .iter()
            .map(|r| r.high_prior_donations)
            .collect();
        assert_eq!(splits, vec![Some(0), Some(0), Some(1), None]);
    }

    #[test]
    fn all_missing_donations_leave_split_undefined() {
        let df = frame(vec![raw_row(&[], "A"), raw_row(&[], "B")]);
        let outcome = build_dataset(&df, &BuildOptions::default()).unwrap();
        assert_eq!(outcome.median_threshold, None);
        assert!(outcome.rows.iter().all(|r| r.high_prior_donations.is_none()));
    }

    #[test]
    fn ab_blood_type_flags_both_ab_labels() {
        let df = frame(vec![
            raw_row(&[(raw::BLOOD_CD, 5.0)], "A"),
            raw_row(&[(raw::BLOOD_CD, 6.0)], "B"),
            raw_row(&[(raw::BLOOD_CD, 1.0)], "C"),
            raw_row(&[], "D"),
        ]);
        let outcome = build_dataset(&df, &BuildOptions::default()).unwrap();
        let flags: Vec<Option<i64>> = outcome.rows.iter().map(|r| r.ab_blood_type).collect();
        assert_eq!(flags, vec![Some(1), Some(1), Some(0), None]);
    }

    #[test]
    fn median_of_even_count_averages_middles() {
        assert_eq!(
            median(&[Some(4.0), Some(1.0), None, Some(3.0), Some(2.0)]),
            Some(2.5)
        );
        assert_eq!(median(&[Some(5.0)]), Some(5.0));
        assert_eq!(median(&[None, None]), None);
    }
}
