//! Console summaries of a pipeline run.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::{BuildReport, TablesReport};

pub fn print_build_summary(report: &BuildReport) {
    println!("Canonical dataset: {}", report.out.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Records"),
        header_cell("Unknown codes"),
        header_cell("Median threshold"),
    ]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new(report.records),
        count_cell(report.unknown_codes),
        Cell::new(
            report
                .median_threshold
                .map(|m| format!("{m:.3}"))
                .unwrap_or_else(|| "undefined".to_string()),
        ),
    ]);
    println!("{table}");
}

pub fn print_tables_summary(report: &TablesReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Output")]);
    apply_table_style(&mut table);
    for path in &report.written {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_uppercase())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(path.display()),
        ]);
    }
    println!("{table}");
    println!(
        "{} tables from {} records",
        report.written.len(),
        report.records
    );
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Left);
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
