//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::info;

use donor_build::build_to_csv;
use donor_model::BuildOptions;
use donor_report::AnalysisData;

use crate::cli::{BuildArgs, RunArgs, TablesArgs};

/// Outcome of the builder stage, for the console summary.
#[derive(Debug)]
pub struct BuildReport {
    pub records: usize,
    pub unknown_codes: usize,
    pub median_threshold: Option<f64>,
    pub out: PathBuf,
}

/// Outcome of the table stage, for the console summary.
pub struct TablesReport {
    pub records: usize,
    pub written: Vec<PathBuf>,
}

pub fn run_build(args: &BuildArgs) -> Result<BuildReport> {
    let options = build_options(args.strict, args.median_override);
    let outcome = build_to_csv(&args.raw, &args.out, &options)?;
    Ok(BuildReport {
        records: outcome.rows.len(),
        unknown_codes: outcome.unknown_codes,
        median_threshold: outcome.median_threshold,
        out: args.out.clone(),
    })
}

pub fn run_tables(args: &TablesArgs) -> Result<TablesReport> {
    let only = parse_table_selection(&args.only)?;
    let data = AnalysisData::load(&args.dataset)?;
    let written = donor_report::write_tables(&data, &args.out_dir, &only, args.print)?;
    Ok(TablesReport {
        records: data.num_rows(),
        written,
    })
}

/// Both stages; the canonical dataset lands inside the output directory.
pub fn run_pipeline(args: &RunArgs) -> Result<(BuildReport, TablesReport)> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output directory {}", args.out_dir.display()))?;
    let dataset = args.out_dir.join("analysis.csv");

    let build = run_build(&BuildArgs {
        raw: args.raw.clone(),
        out: dataset.clone(),
        strict: args.strict,
        median_override: args.median_override,
    })?;
    info!(dataset = %dataset.display(), "builder stage complete");

    let tables = run_tables(&TablesArgs {
        dataset,
        out_dir: args.out_dir.clone(),
        print: args.print,
        only: args.only.clone(),
    })?;
    Ok((build, tables))
}

fn build_options(strict: bool, median_override: Option<f64>) -> BuildOptions {
    let base = if strict {
        BuildOptions::strict()
    } else {
        BuildOptions::default()
    };
    base.with_median_override(median_override)
}

/// Parse `--only` values: `s4` or plain `4`, 1 through 10.
pub fn parse_table_selection(values: &[String]) -> Result<Vec<u8>> {
    let mut selected = Vec::with_capacity(values.len());
    for value in values {
        let digits = value.trim().trim_start_matches(['s', 'S']);
        let number: u8 = digits
            .parse()
            .with_context(|| format!("invalid table selector {value:?}"))?;
        if !(1..=10).contains(&number) {
            bail!("invalid table selector {value:?}: tables run s1 through s10");
        }
        if !selected.contains(&number) {
            selected.push(number);
        }
    }
    Ok(selected)
}
