//! The ten table recipes and the generation orchestrator.

mod descriptives;
mod extended;
mod primary;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::data::AnalysisData;
use crate::render;
use crate::table::Table;

/// All table numbers, in generation order.
pub const ALL_TABLES: [u8; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// Build a single table by number.
pub fn build_table(data: &AnalysisData, number: u8) -> Result<Table> {
    match number {
        1 => descriptives::representativeness(data),
        2 => descriptives::balance(data),
        3 => descriptives::attrition(data),
        4 => primary::primary_ames(data),
        5 => primary::intent_to_treat_ames(data),
        6 => primary::linear_primary(data),
        7 => extended::time_windows(data),
        8 => extended::secondary_outcomes(data),
        9 => extended::heterogeneity(data),
        10 => extended::intention_behavior_gap(data),
        other => bail!("no table s{other}; valid tables are s1 through s10"),
    }
}

/// Build the selected tables (all ten when `only` is empty), in order.
pub fn build_all(data: &AnalysisData, only: &[u8]) -> Result<Vec<Table>> {
    let mut tables = Vec::new();
    for number in ALL_TABLES {
        if !only.is_empty() && !only.contains(&number) {
            continue;
        }
        tables.push(build_table(data, number)?);
    }
    Ok(tables)
}

/// Build the selected tables and write each as LaTeX under `out_dir`.
/// With `print` set, also render each to stdout.
pub fn write_tables(
    data: &AnalysisData,
    out_dir: &Path,
    only: &[u8],
    print: bool,
) -> Result<Vec<PathBuf>> {
    let tables = build_all(data, only)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory {}", out_dir.display()))?;
    let mut written = Vec::with_capacity(tables.len());
    for table in &tables {
        let path = out_dir.join(table.file_name());
        fs::write(&path, render::to_latex(table))
            .with_context(|| format!("write {}", path.display()))?;
        info!(table = %table.file_name(), caption = %table.caption, "table written");
        if print {
            println!("{}", table.caption);
            println!("{}", render::to_console(table));
            println!();
        }
        written.push(path);
    }
    Ok(written)
}
