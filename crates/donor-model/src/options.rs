//! Configuration options for the Dataset Builder.

use serde::{Deserialize, Serialize};

/// Options controlling Dataset Builder behavior.
///
/// The high/low donation split threshold is global derived state: it is
/// computed once over the full population before any per-record split.
/// `median_override` threads an externally fixed threshold into the
/// builder instead of recomputing it, which keeps re-runs against a
/// frozen threshold reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Treat unknown categorical codes as fatal instead of mapping them
    /// to the sentinel label. Default: false (sentinel mapping).
    pub fail_on_unknown_codes: bool,

    /// Fixed threshold for the high/low prior-donation split. When None
    /// the median of non-missing donation averages is computed from the
    /// input.
    pub median_override: Option<f64>,

    /// Log a warning for every record carrying an unknown categorical code.
    pub warn_on_unknown_codes: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            fail_on_unknown_codes: false,
            median_override: None,
            warn_on_unknown_codes: true,
        }
    }
}

impl BuildOptions {
    /// Strict variant: unknown categorical codes abort the build.
    pub fn strict() -> Self {
        Self {
            fail_on_unknown_codes: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_median_override(mut self, threshold: Option<f64>) -> Self {
        self.median_override = threshold;
        self
    }
}
