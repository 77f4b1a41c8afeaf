//! Treatment arms and analysis samples.

use serde::{Deserialize, Serialize};

/// Treatment assignment for a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreatmentArm {
    Control,
    Symbolic,
}

impl TreatmentArm {
    /// Decode the 0/1 assignment column.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Control),
            1 => Some(Self::Symbolic),
            _ => None,
        }
    }

    /// Column-header label used in the tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Control => "Control",
            Self::Symbolic => "Symbolic Incentive",
        }
    }
}

/// Which view of the canonical dataset a table operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sample {
    /// All records.
    Baseline,
    /// Records with `is_study_sample` true.
    Study,
}

impl Sample {
    pub fn label(self) -> &'static str {
        match self {
            Self::Baseline => "Baseline sample",
            Self::Study => "Study sample",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_from_code() {
        assert_eq!(TreatmentArm::from_code(0), Some(TreatmentArm::Control));
        assert_eq!(TreatmentArm::from_code(1), Some(TreatmentArm::Symbolic));
        assert_eq!(TreatmentArm::from_code(2), None);
    }
}
