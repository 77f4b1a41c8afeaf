//! Declarative model recipes.
//!
//! Each regression table names its models as a [`ModelSpec`]; fitting
//! goes through one path so listwise deletion, dummy expansion, and
//! fixed-effect handling are identical everywhere.

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use donor_model::{Sample, canonical};
use donor_stats::{
    Design, LogitFit, MarginalEffect, OlsFit, Term, VarianceKind, fit_logit, fit_ols,
};

use crate::data::{AnalysisData, WAVE_FE};

/// Model family for a table recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Logit,
    /// Linear model with HC1 robust standard errors.
    OlsRobust,
}

/// Fixed covariate lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CovariateSet {
    /// Treatment only.
    None,
    /// The full adjustment set of the primary specifications.
    Full,
    /// The small set used by the gap models.
    Gap,
}

impl CovariateSet {
    pub fn terms(self) -> Vec<Term> {
        match self {
            CovariateSet::None => Vec::new(),
            CovariateSet::Full => vec![
                Term::continuous(canonical::FEMALE),
                Term::continuous(canonical::AGE),
                Term::categorical(canonical::RACE),
                Term::continuous(canonical::AB_BLOOD_TYPE),
                Term::continuous(canonical::PRIOR_DONOR),
                Term::continuous(canonical::ZIP_MEDIAN_INCOME),
                Term::categorical(canonical::REGION),
                Term::continuous(canonical::URBAN),
                Term::continuous(canonical::COVID_CASE_RATE),
                Term::continuous(canonical::MAJORITY_DEMOCRATIC),
            ],
            CovariateSet::Gap => vec![
                Term::continuous(canonical::FEMALE),
                Term::continuous(canonical::AGE),
                Term::continuous(canonical::PRIOR_DONOR),
            ],
        }
    }

    pub fn is_adjusted(self) -> bool {
        !matches!(self, CovariateSet::None)
    }
}

/// One regression specification.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub outcome: &'static str,
    pub covariates: CovariateSet,
    pub wave_effects: bool,
    pub sample: Sample,
    pub family: Family,
    /// Moderator interacted with treatment (heterogeneity models).
    pub moderator: Option<&'static str>,
}

impl ModelSpec {
    fn terms(&self) -> Vec<Term> {
        let mut terms = vec![Term::continuous(canonical::TREATMENT)];
        if let Some(moderator) = self.moderator {
            terms.push(Term::continuous(moderator));
            terms.push(Term::interaction(canonical::TREATMENT, moderator));
        }
        terms.extend(self.covariates.terms());
        if self.wave_effects {
            terms.push(Term::categorical(WAVE_FE));
        }
        terms
    }

    /// Design column holding the treatment-moderator interaction.
    pub fn interaction_column(&self) -> Option<String> {
        self.moderator
            .map(|moderator| format!("{}:{moderator}", canonical::TREATMENT))
    }
}

/// A fitted recipe: the spec plus the family-specific fit.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub spec: ModelSpec,
    fit: Fit,
}

#[derive(Debug, Clone)]
enum Fit {
    Logit(LogitFit),
    Ols(OlsFit),
}

impl FittedModel {
    pub fn num_observations(&self) -> usize {
        match &self.fit {
            Fit::Logit(fit) => fit.num_observations,
            Fit::Ols(fit) => fit.num_observations,
        }
    }

    /// Estimate, standard error, and p-value for one design column.
    pub fn coefficient(&self, name: &str) -> Result<(f64, f64, f64)> {
        let found = match &self.fit {
            Fit::Logit(fit) => fit.coefficient(name).map(|c| (c.estimate, c.std_error, c.p_value)),
            Fit::Ols(fit) => fit.coefficient(name).map(|c| (c.estimate, c.std_error, c.p_value)),
        };
        found.ok_or_else(|| anyhow!("coefficient {name} not in fitted model"))
    }

    pub fn treatment_coefficient(&self) -> Result<(f64, f64, f64)> {
        self.coefficient(canonical::TREATMENT)
    }

    /// Average marginal effect of treatment; logistic models only.
    pub fn treatment_marginal_effect(&self) -> Result<MarginalEffect> {
        match &self.fit {
            Fit::Logit(fit) => fit
                .marginal_effect(canonical::TREATMENT)
                .context("treatment marginal effect"),
            Fit::Ols(_) => Err(anyhow!("marginal effects are defined for logistic fits only")),
        }
    }
}

/// Fit one recipe against the dataset.
pub fn fit_model(data: &AnalysisData, spec: &ModelSpec) -> Result<FittedModel> {
    let columns = data.model_columns(spec.sample)?;
    let design = Design::build(&columns, spec.outcome, &spec.terms())
        .with_context(|| format!("design for outcome {}", spec.outcome))?;
    debug!(
        outcome = spec.outcome,
        sample = spec.sample.label(),
        rows = design.num_rows(),
        "fitting model"
    );
    let fit = match spec.family {
        Family::Logit => Fit::Logit(
            fit_logit(&design).with_context(|| format!("logit for {}", spec.outcome))?,
        ),
        Family::OlsRobust => Fit::Ols(
            fit_ols(&design, VarianceKind::RobustHc1)
                .with_context(|| format!("linear model for {}", spec.outcome))?,
        ),
    };
    Ok(FittedModel { spec: *spec, fit })
}
