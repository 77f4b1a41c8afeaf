//! The rendered-table value type and cell formatting.

/// A fully formatted table: every cell is already a string, so both
/// renderers emit it verbatim and output stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table number, 1 through 10.
    pub number: u8,
    pub caption: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(number: u8, caption: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            number,
            caption: caption.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Output file name, `s<N>.tex`.
    pub fn file_name(&self) -> String {
        format!("s{}.tex", self.number)
    }

    /// LaTeX cross-reference label, `tab:s<N>`.
    pub fn latex_label(&self) -> String {
        format!("tab:s{}", self.number)
    }
}

/// Fixed three-decimal estimate formatting.
pub fn fmt3(value: f64) -> String {
    format!("{value:.3}")
}

/// Three decimals, blank for missing.
pub fn fmt3_opt(value: Option<f64>) -> String {
    value.map(fmt3).unwrap_or_default()
}

/// Standard error in parentheses.
pub fn fmt_se(value: f64) -> String {
    format!("({value:.3})")
}

pub fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_and_label_follow_table_number() {
        let table = Table::new(4, "AMEs", vec![String::new()]);
        assert_eq!(table.file_name(), "s4.tex");
        assert_eq!(table.latex_label(), "tab:s4");
    }

    #[test]
    fn formatting_is_three_decimal() {
        assert_eq!(fmt3(0.12345), "0.123");
        assert_eq!(fmt3(-0.5), "-0.500");
        assert_eq!(fmt_se(0.0456), "(0.046)");
        assert_eq!(fmt3_opt(None), "");
    }
}
