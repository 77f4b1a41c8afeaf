//! Data model for the donor field-experiment pipeline.
//!
//! This crate defines the contract shared by the Dataset Builder and the
//! Table Generator: the canonical column registry (names and order of the
//! flat analysis file), the raw-to-canonical rename map, the closed
//! categorical lookup tables, and the shared error type.

pub mod columns;
pub mod error;
pub mod lookup;
pub mod options;
pub mod sample;

pub use columns::{CANONICAL_COLUMNS, RAW_RENAMES, canonical, raw, required_raw_columns};
pub use error::{DonorError, Result};
pub use lookup::{BLOOD_TYPE, CodeMap, RACE, REGION, UNKNOWN_LABEL, is_ab_blood_type};
pub use options::BuildOptions;
pub use sample::{Sample, TreatmentArm};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_columns_match_rename_targets() {
        // Every rename target must be a canonical column.
        for (_, target) in RAW_RENAMES {
            assert!(
                CANONICAL_COLUMNS.contains(target),
                "rename target {target} missing from canonical registry"
            );
        }
    }

    #[test]
    fn derived_columns_have_no_raw_source() {
        let renamed: Vec<&str> = RAW_RENAMES.iter().map(|(_, c)| *c).collect();
        for derived in [
            canonical::AB_BLOOD_TYPE,
            canonical::HIGH_PRIOR_DONATIONS,
            canonical::IS_STUDY_SAMPLE,
            canonical::INTENTION_BEHAVIOR_GAP,
        ] {
            assert!(!renamed.contains(&derived), "{derived} should be derived");
        }
    }

    #[test]
    fn arm_serializes() {
        let json = serde_json::to_string(&TreatmentArm::Symbolic).expect("serialize arm");
        let round: TreatmentArm = serde_json::from_str(&json).expect("deserialize arm");
        assert_eq!(round, TreatmentArm::Symbolic);
    }
}
