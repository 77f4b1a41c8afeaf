//! LaTeX and console rendering.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement};

use crate::table::Table;

/// Render a table as a standalone LaTeX `table` environment.
pub fn to_latex(table: &Table) -> String {
    let mut out = String::new();
    out.push_str("\\begin{table}[ht!]\n\\centering\n");
    out.push_str(&format!("\\caption{{{}}}\n", escape(&table.caption)));
    out.push_str(&format!("\\label{{{}}}\n", table.latex_label()));

    let spec: String = std::iter::once('l')
        .chain(std::iter::repeat_n('c', table.headers.len().saturating_sub(1)))
        .collect();
    out.push_str(&format!("\\begin{{tabular}}{{{spec}}}\n\\toprule\n"));
    out.push_str(&row_line(&table.headers));
    out.push_str("\\midrule\n");
    for row in &table.rows {
        out.push_str(&row_line(row));
    }
    out.push_str("\\bottomrule\n\\end{tabular}\n\\end{table}\n");
    out
}

fn row_line(cells: &[String]) -> String {
    let escaped: Vec<String> = cells.iter().map(|c| escape(c)).collect();
    format!("{} \\\\\n", escaped.join(" & "))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' | '%' | '#' | '_' | '$' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Render a table for the terminal.
pub fn to_console(table: &Table) -> comfy_table::Table {
    let mut rendered = comfy_table::Table::new();
    rendered
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    rendered.set_header(
        table
            .headers
            .iter()
            .map(|h| {
                Cell::new(h)
                    .fg(Color::Cyan)
                    .add_attribute(Attribute::Bold)
            })
            .collect::<Vec<_>>(),
    );
    for row in &table.rows {
        rendered.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
    }
    rendered
}
