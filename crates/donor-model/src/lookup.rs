//! Closed categorical lookup tables.
//!
//! Raw categorical fields arrive as integer codes. Each code set is a
//! closed mapping with an explicit fallback label; a code outside the
//! known set maps to [`UNKNOWN_LABEL`] rather than propagating a null.

/// Label assigned to codes outside the known set.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A closed integer-code-to-label mapping with a fixed fallback.
#[derive(Debug, Clone, Copy)]
pub struct CodeMap {
    name: &'static str,
    entries: &'static [(i64, &'static str)],
}

impl CodeMap {
    /// The field this map decodes (used in log messages).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Decode a code to its label; unknown codes get the fallback label.
    pub fn label(&self, code: i64) -> &'static str {
        self.entries
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, label)| *label)
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// True when the code belongs to the known set.
    pub fn contains(&self, code: i64) -> bool {
        self.entries.iter().any(|(known, _)| *known == code)
    }
}

/// Race/ethnicity codes in the vendor extract.
pub const RACE: CodeMap = CodeMap {
    name: "race",
    entries: &[
        (1, "White"),
        (2, "Black"),
        (3, "Asian"),
        (4, "Hispanic"),
        (5, "Other"),
    ],
};

/// ABO/Rh blood-type codes in the vendor extract.
pub const BLOOD_TYPE: CodeMap = CodeMap {
    name: "blood_type",
    entries: &[
        (1, "A+"),
        (2, "A-"),
        (3, "B+"),
        (4, "B-"),
        (5, "AB+"),
        (6, "AB-"),
        (7, "O+"),
        (8, "O-"),
    ],
};

/// US census region codes.
pub const REGION: CodeMap = CodeMap {
    name: "region",
    entries: &[
        (1, "Northeast"),
        (2, "Midwest"),
        (3, "South"),
        (4, "West"),
    ],
};

/// True when a decoded blood-type label is one of the AB types.
pub fn is_ab_blood_type(label: &str) -> bool {
    label == "AB+" || label == "AB-"
}
