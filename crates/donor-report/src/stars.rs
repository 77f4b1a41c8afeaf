//! Significance markers.
//!
//! Two distinct schemes are in use and must stay separate. The AME
//! tables collapse p < 0.01 and p < 0.05 into a single asterisk and mark
//! p < 0.1 with a plus; the remaining regression tables use the
//! conventional three-tier asterisks.

/// Marker scheme of the marginal-effect tables: one tier of `*` below
/// 0.05 and `+` below 0.1.
pub fn ame_stars(p_value: f64) -> &'static str {
    if p_value < 0.05 {
        "*"
    } else if p_value < 0.1 {
        "+"
    } else {
        ""
    }
}

/// Conventional three-tier markers.
pub fn conventional_stars(p_value: f64) -> &'static str {
    if p_value < 0.01 {
        "***"
    } else if p_value < 0.05 {
        "**"
    } else if p_value < 0.1 {
        "*"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemes_diverge_at_p_of_0_04() {
        assert_eq!(ame_stars(0.04), "*");
        assert_eq!(conventional_stars(0.04), "**");
    }

    #[test]
    fn ame_scheme_is_two_tier() {
        assert_eq!(ame_stars(0.004), "*");
        assert_eq!(ame_stars(0.04), "*");
        assert_eq!(ame_stars(0.07), "+");
        assert_eq!(ame_stars(0.2), "");
    }

    #[test]
    fn conventional_scheme_is_three_tier() {
        assert_eq!(conventional_stars(0.004), "***");
        assert_eq!(conventional_stars(0.04), "**");
        assert_eq!(conventional_stars(0.07), "*");
        assert_eq!(conventional_stars(0.2), "");
    }

    #[test]
    fn undefined_p_value_gets_no_marker() {
        assert_eq!(ame_stars(f64::NAN), "");
        assert_eq!(conventional_stars(f64::NAN), "");
    }
}
