//! The canonical analysis record.

/// One row of the canonical flat dataset, in canonical column order.
///
/// Flags are 0/1 with `None` for missing; labels are decoded through the
/// closed lookups, so a present-but-unknown code carries the sentinel
/// label rather than `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRow {
    pub participant_id: Option<String>,
    pub treatment: Option<i64>,
    pub wave: Option<i64>,
    pub female: Option<i64>,
    pub age: Option<f64>,
    pub race: Option<&'static str>,
    pub blood_type: Option<&'static str>,
    pub ab_blood_type: Option<i64>,
    pub prior_donor: Option<i64>,
    pub avg_annual_donations: Option<f64>,
    pub high_prior_donations: Option<i64>,
    pub zip_median_income: Option<f64>,
    pub region: Option<&'static str>,
    pub urban: Option<i64>,
    pub covid_case_rate: Option<f64>,
    pub majority_democratic: Option<i64>,
    pub email_opened: Option<i64>,
    pub no_phone_contact: Option<i64>,
    pub is_study_sample: i64,
    pub appointment_within_24h: Option<i64>,
    pub appointment_within_48h: Option<i64>,
    pub appointment_within_7d: Option<i64>,
    pub appointment_ever: Option<i64>,
    pub donated_within_13d: Option<i64>,
    pub donated_anytime: Option<i64>,
    pub intention_behavior_gap: Option<i64>,
    pub unsubscribed: Option<i64>,
    pub total_donations: Option<f64>,
}

impl CanonicalRow {
    /// CSV field values in canonical column order. Missing is the empty
    /// string.
    pub fn fields(&self) -> Vec<String> {
        vec![
            opt_string(self.participant_id.as_deref()),
            opt_i64(self.treatment),
            opt_i64(self.wave),
            opt_i64(self.female),
            opt_f64(self.age),
            opt_string(self.race),
            opt_string(self.blood_type),
            opt_i64(self.ab_blood_type),
            opt_i64(self.prior_donor),
            opt_f64(self.avg_annual_donations),
            opt_i64(self.high_prior_donations),
            opt_f64(self.zip_median_income),
            opt_string(self.region),
            opt_i64(self.urban),
            opt_f64(self.covid_case_rate),
            opt_i64(self.majority_democratic),
            opt_i64(self.email_opened),
            opt_i64(self.no_phone_contact),
            self.is_study_sample.to_string(),
            opt_i64(self.appointment_within_24h),
            opt_i64(self.appointment_within_48h),
            opt_i64(self.appointment_within_7d),
            opt_i64(self.appointment_ever),
            opt_i64(self.donated_within_13d),
            opt_i64(self.donated_anytime),
            opt_i64(self.intention_behavior_gap),
            opt_i64(self.unsubscribed),
            opt_f64(self.total_donations),
        ]
    }
}

fn opt_string(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn opt_i64(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_f64(value: Option<f64>) -> String {
    match value {
        // Whole numbers print without a trailing ".0" so flags and
        // counts read naturally in the flat file.
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donor_model::CANONICAL_COLUMNS;

    #[test]
    fn fields_match_canonical_width() {
        let row = CanonicalRow::default();
        assert_eq!(row.fields().len(), CANONICAL_COLUMNS.len());
    }

    #[test]
    fn whole_floats_print_without_decimal() {
        assert_eq!(opt_f64(Some(34.0)), "34");
        assert_eq!(opt_f64(Some(2.5)), "2.5");
        assert_eq!(opt_f64(None), "");
    }
}
