//! Descriptive summaries over row subsets.

/// Mean over the selected rows, excluding missing values. `None` when no
/// value is present.
pub fn mean(values: &[Option<f64>], rows: &[usize]) -> Option<f64> {
    let present: Vec<f64> = rows.iter().filter_map(|&r| values[r]).collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

/// Share of the selected rows carrying the given label, over rows with a
/// non-missing label.
pub fn proportion(labels: &[Option<String>], rows: &[usize], level: &str) -> Option<f64> {
    let present: Vec<&str> = rows.iter().filter_map(|&r| labels[r].as_deref()).collect();
    if present.is_empty() {
        return None;
    }
    let hits = present.iter().filter(|&&l| l == level).count();
    Some(hits as f64 / present.len() as f64)
}

/// Count of selected rows where the flag holds the given value.
pub fn count_flag(values: &[Option<f64>], rows: &[usize], value: f64) -> usize {
    rows.iter().filter(|&&r| values[r] == Some(value)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_skips_missing() {
        let values = vec![Some(1.0), None, Some(3.0), Some(5.0)];
        assert_eq!(mean(&values, &[0, 1, 2]), Some(2.0));
        assert_eq!(mean(&values, &[1]), None);
    }

    #[test]
    fn proportion_over_non_missing() {
        let labels = vec![
            Some("White".to_string()),
            None,
            Some("Black".to_string()),
            Some("White".to_string()),
        ];
        assert_eq!(proportion(&labels, &[0, 1, 2, 3], "White"), Some(2.0 / 3.0));
        assert_eq!(proportion(&labels, &[1], "White"), None);
    }

    #[test]
    fn flag_counts() {
        let values = vec![Some(1.0), Some(0.0), None, Some(1.0)];
        assert_eq!(count_flag(&values, &[0, 1, 2, 3], 1.0), 2);
        assert_eq!(count_flag(&values, &[0, 1, 2, 3], 0.0), 1);
    }
}
