//! Primary-outcome regression tables: AMEs on the study sample (S4),
//! intent-to-treat AMEs on the baseline sample (S5), and the linear
//! versions with robust standard errors (S6).

use anyhow::Result;

use donor_model::{Sample, canonical};

use crate::data::AnalysisData;
use crate::recipe::{CovariateSet, Family, ModelSpec, fit_model};
use crate::stars::{ame_stars, conventional_stars};
use crate::table::{Table, fmt3, fmt_se, yes_no};

const PRIMARY_OUTCOMES: [(&str, &str); 2] = [
    ("Appointment within 48h", canonical::APPOINTMENT_WITHIN_48H),
    ("Donated within 13 days", canonical::DONATED_WITHIN_13D),
];

/// The four primary specifications: each outcome bare, then with the
/// full covariate set and wave fixed effects.
fn primary_specs(sample: Sample, family: Family) -> Vec<(&'static str, ModelSpec)> {
    let mut specs = Vec::with_capacity(4);
    for (label, outcome) in PRIMARY_OUTCOMES {
        specs.push((
            label,
            ModelSpec {
                outcome,
                covariates: CovariateSet::None,
                wave_effects: false,
                sample,
                family,
                moderator: None,
            },
        ));
        specs.push((
            label,
            ModelSpec {
                outcome,
                covariates: CovariateSet::Full,
                wave_effects: true,
                sample,
                family,
                moderator: None,
            },
        ));
    }
    specs
}

fn model_headers(specs: &[(&str, ModelSpec)]) -> Vec<String> {
    let mut headers = vec![String::new()];
    for (index, _) in specs.iter().enumerate() {
        headers.push(format!("({})", index + 1));
    }
    headers
}

/// Shared layout of the AME tables.
fn ame_table(data: &AnalysisData, number: u8, caption: &str, sample: Sample) -> Result<Table> {
    let specs = primary_specs(sample, Family::Logit);
    let mut table = Table::new(number, caption, model_headers(&specs));

    let mut outcome_row = vec!["Outcome".to_string()];
    let mut effect_row = vec!["Symbolic incentive (AME)".to_string()];
    let mut se_row = vec![String::new()];
    let mut n_row = vec!["Observations".to_string()];
    let mut fe_row = vec!["Wave fixed effects".to_string()];
    let mut controls_row = vec!["Controls".to_string()];

    for (label, spec) in &specs {
        let fitted = fit_model(data, spec)?;
        let effect = fitted.treatment_marginal_effect()?;
        outcome_row.push((*label).to_string());
        effect_row.push(format!("{}{}", fmt3(effect.estimate), ame_stars(effect.p_value)));
        se_row.push(fmt_se(effect.std_error));
        n_row.push(fitted.num_observations().to_string());
        fe_row.push(yes_no(spec.wave_effects));
        controls_row.push(yes_no(spec.covariates.is_adjusted()));
    }

    table.push_row(outcome_row);
    table.push_row(effect_row);
    table.push_row(se_row);
    table.push_row(n_row);
    table.push_row(fe_row);
    table.push_row(controls_row);
    Ok(table)
}

/// S4: average marginal effects of treatment, study sample.
pub fn primary_ames(data: &AnalysisData) -> Result<Table> {
    ame_table(
        data,
        4,
        "Effect of the symbolic incentive on primary outcomes (average marginal effects)",
        Sample::Study,
    )
}

/// S5: the same specifications as intent-to-treat on the baseline sample.
pub fn intent_to_treat_ames(data: &AnalysisData) -> Result<Table> {
    ame_table(
        data,
        5,
        "Intent-to-treat effects on primary outcomes (average marginal effects)",
        Sample::Baseline,
    )
}

/// S6: linear probability models of the primary outcomes with HC1
/// robust standard errors.
pub fn linear_primary(data: &AnalysisData) -> Result<Table> {
    let specs = primary_specs(Sample::Study, Family::OlsRobust);
    let mut table = Table::new(
        6,
        "Linear probability models of primary outcomes",
        model_headers(&specs),
    );

    let mut outcome_row = vec!["Outcome".to_string()];
    let mut effect_row = vec!["Symbolic incentive".to_string()];
    let mut se_row = vec![String::new()];
    let mut n_row = vec!["Observations".to_string()];
    let mut fe_row = vec!["Wave fixed effects".to_string()];
    let mut controls_row = vec!["Controls".to_string()];

    for (label, spec) in &specs {
        let fitted = fit_model(data, spec)?;
        let (estimate, std_error, p_value) = fitted.treatment_coefficient()?;
        outcome_row.push((*label).to_string());
        effect_row.push(format!("{}{}", fmt3(estimate), conventional_stars(p_value)));
        se_row.push(fmt_se(std_error));
        n_row.push(fitted.num_observations().to_string());
        fe_row.push(yes_no(spec.wave_effects));
        controls_row.push(yes_no(spec.covariates.is_adjusted()));
    }

    table.push_row(outcome_row);
    table.push_row(effect_row);
    table.push_row(se_row);
    table.push_row(n_row);
    table.push_row(fe_row);
    table.push_row(controls_row);
    Ok(table)
}
