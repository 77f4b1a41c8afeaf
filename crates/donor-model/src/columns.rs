//! Canonical column registry and the raw-to-canonical rename map.
//!
//! The header names and their order in the flat analysis file are part of
//! the reproducibility contract: the Dataset Builder writes exactly
//! [`CANONICAL_COLUMNS`] in this order, and the Table Generator refuses
//! anything else.

/// Canonical column names for the flat analysis dataset.
pub mod canonical {
    pub const PARTICIPANT_ID: &str = "participant_id";
    pub const TREATMENT: &str = "treatment";
    pub const WAVE: &str = "wave";
    pub const FEMALE: &str = "female";
    pub const AGE: &str = "age";
    pub const RACE: &str = "race";
    pub const BLOOD_TYPE: &str = "blood_type";
    pub const AB_BLOOD_TYPE: &str = "ab_blood_type";
    pub const PRIOR_DONOR: &str = "prior_donor";
    pub const AVG_ANNUAL_DONATIONS: &str = "avg_annual_donations";
    pub const HIGH_PRIOR_DONATIONS: &str = "high_prior_donations";
    pub const ZIP_MEDIAN_INCOME: &str = "zip_median_income";
    pub const REGION: &str = "region";
    pub const URBAN: &str = "urban";
    pub const COVID_CASE_RATE: &str = "covid_case_rate";
    pub const MAJORITY_DEMOCRATIC: &str = "majority_democratic";
    pub const EMAIL_OPENED: &str = "email_opened";
    pub const NO_PHONE_CONTACT: &str = "no_phone_contact";
    pub const IS_STUDY_SAMPLE: &str = "is_study_sample";
    pub const APPOINTMENT_WITHIN_24H: &str = "appointment_within_24h";
    pub const APPOINTMENT_WITHIN_48H: &str = "appointment_within_48h";
    pub const APPOINTMENT_WITHIN_7D: &str = "appointment_within_7d";
    pub const APPOINTMENT_EVER: &str = "appointment_ever";
    pub const DONATED_WITHIN_13D: &str = "donated_within_13d";
    pub const DONATED_ANYTIME: &str = "donated_anytime";
    pub const INTENTION_BEHAVIOR_GAP: &str = "intention_behavior_gap";
    pub const UNSUBSCRIBED: &str = "unsubscribed";
    pub const TOTAL_DONATIONS: &str = "total_donations";
}

/// Raw variable names as they appear in the vendor extract.
pub mod raw {
    pub const DONOR_KEY: &str = "DONOR_KEY";
    pub const ASSIGN_GRP: &str = "ASSIGN_GRP";
    pub const CAMPAIGN_WAVE: &str = "CAMPAIGN_WAVE";
    pub const GENDER_F: &str = "GENDER_F";
    pub const AGE_YRS: &str = "AGE_YRS";
    pub const RACE_CD: &str = "RACE_CD";
    pub const BLOOD_CD: &str = "BLOOD_CD";
    pub const PRIOR_DON_FL: &str = "PRIOR_DON_FL";
    pub const AVG_DON_YR: &str = "AVG_DON_YR";
    pub const ZIP_MED_INC: &str = "ZIP_MED_INC";
    pub const CENSUS_REG_CD: &str = "CENSUS_REG_CD";
    pub const URBAN_FL: &str = "URBAN_FL";
    pub const COVID_RATE: &str = "COVID_RATE";
    pub const DEM_MAJ_FL: &str = "DEM_MAJ_FL";
    pub const EMAIL_OPEN_FL: &str = "EMAIL_OPEN_FL";
    pub const NO_PHONE_FL: &str = "NO_PHONE_FL";
    pub const APPT_24H: &str = "APPT_24H";
    pub const APPT_48H: &str = "APPT_48H";
    pub const APPT_7D: &str = "APPT_7D";
    pub const APPT_EVER: &str = "APPT_EVER";
    pub const DON_13D: &str = "DON_13D";
    pub const DON_EVER: &str = "DON_EVER";
    pub const UNSUB_FL: &str = "UNSUB_FL";
    pub const TOT_DON_POST: &str = "TOT_DON_POST";
}

/// Canonical column order for the flat analysis file.
pub const CANONICAL_COLUMNS: &[&str] = &[
    canonical::PARTICIPANT_ID,
    canonical::TREATMENT,
    canonical::WAVE,
    canonical::FEMALE,
    canonical::AGE,
    canonical::RACE,
    canonical::BLOOD_TYPE,
    canonical::AB_BLOOD_TYPE,
    canonical::PRIOR_DONOR,
    canonical::AVG_ANNUAL_DONATIONS,
    canonical::HIGH_PRIOR_DONATIONS,
    canonical::ZIP_MEDIAN_INCOME,
    canonical::REGION,
    canonical::URBAN,
    canonical::COVID_CASE_RATE,
    canonical::MAJORITY_DEMOCRATIC,
    canonical::EMAIL_OPENED,
    canonical::NO_PHONE_CONTACT,
    canonical::IS_STUDY_SAMPLE,
    canonical::APPOINTMENT_WITHIN_24H,
    canonical::APPOINTMENT_WITHIN_48H,
    canonical::APPOINTMENT_WITHIN_7D,
    canonical::APPOINTMENT_EVER,
    canonical::DONATED_WITHIN_13D,
    canonical::DONATED_ANYTIME,
    canonical::INTENTION_BEHAVIOR_GAP,
    canonical::UNSUBSCRIBED,
    canonical::TOTAL_DONATIONS,
];

/// Fixed raw-to-canonical rename map. Every raw name listed here is a
/// required column of the vendor extract.
pub const RAW_RENAMES: &[(&str, &str)] = &[
    (raw::DONOR_KEY, canonical::PARTICIPANT_ID),
    (raw::ASSIGN_GRP, canonical::TREATMENT),
    (raw::CAMPAIGN_WAVE, canonical::WAVE),
    (raw::GENDER_F, canonical::FEMALE),
    (raw::AGE_YRS, canonical::AGE),
    (raw::RACE_CD, canonical::RACE),
    (raw::BLOOD_CD, canonical::BLOOD_TYPE),
    (raw::PRIOR_DON_FL, canonical::PRIOR_DONOR),
    (raw::AVG_DON_YR, canonical::AVG_ANNUAL_DONATIONS),
    (raw::ZIP_MED_INC, canonical::ZIP_MEDIAN_INCOME),
    (raw::CENSUS_REG_CD, canonical::REGION),
    (raw::URBAN_FL, canonical::URBAN),
    (raw::COVID_RATE, canonical::COVID_CASE_RATE),
    (raw::DEM_MAJ_FL, canonical::MAJORITY_DEMOCRATIC),
    (raw::EMAIL_OPEN_FL, canonical::EMAIL_OPENED),
    (raw::NO_PHONE_FL, canonical::NO_PHONE_CONTACT),
    (raw::APPT_24H, canonical::APPOINTMENT_WITHIN_24H),
    (raw::APPT_48H, canonical::APPOINTMENT_WITHIN_48H),
    (raw::APPT_7D, canonical::APPOINTMENT_WITHIN_7D),
    (raw::APPT_EVER, canonical::APPOINTMENT_EVER),
    (raw::DON_13D, canonical::DONATED_WITHIN_13D),
    (raw::DON_EVER, canonical::DONATED_ANYTIME),
    (raw::UNSUB_FL, canonical::UNSUBSCRIBED),
    (raw::TOT_DON_POST, canonical::TOTAL_DONATIONS),
];

/// The raw columns the builder requires; absence of any is a
/// configuration error.
pub fn required_raw_columns() -> impl Iterator<Item = &'static str> {
    RAW_RENAMES.iter().map(|(raw_name, _)| *raw_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_stable() {
        assert_eq!(CANONICAL_COLUMNS.len(), 28);
        assert_eq!(CANONICAL_COLUMNS[0], canonical::PARTICIPANT_ID);
        assert_eq!(
            CANONICAL_COLUMNS[CANONICAL_COLUMNS.len() - 1],
            canonical::TOTAL_DONATIONS
        );
    }

    #[test]
    fn no_duplicate_columns() {
        let mut seen = std::collections::BTreeSet::new();
        for name in CANONICAL_COLUMNS {
            assert!(seen.insert(*name), "duplicate canonical column {name}");
        }
    }

    #[test]
    fn required_raw_matches_rename_map() {
        assert_eq!(required_raw_columns().count(), RAW_RENAMES.len());
    }
}
