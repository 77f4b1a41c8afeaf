//! Logistic regression via iteratively reweighted least squares, with
//! average marginal effects.

use faer::Mat;
use tracing::debug;

use crate::Coefficient;
use crate::design::Design;
use crate::error::{Result, StatsError};
use crate::inference::normal_p_value;
use crate::solve;

const MAX_ITERATIONS: usize = 50;
const COEFFICIENT_TOLERANCE: f64 = 1e-9;
// Fisher weights are floored so separation cannot zero out a pivot.
const WEIGHT_FLOOR: f64 = 1e-10;

/// A fitted logistic model.
#[derive(Debug, Clone)]
pub struct LogitFit {
    pub coefficients: Vec<Coefficient>,
    pub num_observations: usize,
    pub log_likelihood: f64,
    pub iterations: usize,
    fitted: Vec<f64>,
    covariance: Mat<f64>,
    estimates: Vec<f64>,
    x: Mat<f64>,
}

impl LogitFit {
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        Coefficient::find(&self.coefficients, name)
    }

    /// Average marginal effect of one regressor, derivative form:
    /// mean over observations of p(1-p) times the coefficient, with a
    /// delta-method standard error and a normal p-value.
    pub fn marginal_effect(&self, name: &str) -> Result<MarginalEffect> {
        let k = self
            .coefficients
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| StatsError::MissingVariable { name: name.to_string() })?;
        let n = self.num_observations as f64;
        let p = self.coefficients.len();
        let beta_k = self.estimates[k];

        let mean_density = self.fitted.iter().map(|mu| mu * (1.0 - mu)).sum::<f64>() / n;
        let estimate = mean_density * beta_k;

        // Gradient of the AME with respect to each coefficient.
        let mut gradient = vec![0.0; p];
        for (row, &mu) in self.fitted.iter().enumerate() {
            let density = mu * (1.0 - mu);
            let density_slope = density * (1.0 - 2.0 * mu);
            for (j, grad) in gradient.iter_mut().enumerate() {
                *grad += density_slope * self.x[(row, j)] * beta_k / n;
            }
        }
        gradient[k] += mean_density;

        let mut variance = 0.0;
        for (i, gi) in gradient.iter().enumerate() {
            for (j, gj) in gradient.iter().enumerate() {
                variance += gi * self.covariance[(i, j)] * gj;
            }
        }
        let std_error = variance.max(0.0).sqrt();
        let p_value = if std_error > 0.0 {
            normal_p_value(estimate / std_error)
        } else {
            f64::NAN
        };
        Ok(MarginalEffect {
            name: name.to_string(),
            estimate,
            std_error,
            p_value,
        })
    }
}

/// An average marginal effect with its delta-method inference.
#[derive(Debug, Clone)]
pub struct MarginalEffect {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub p_value: f64,
}

/// Fit a logistic model by IRLS. The outcome must be coded 0/1.
pub fn fit_logit(design: &Design) -> Result<LogitFit> {
    for &y in &design.y {
        if y != 0.0 && y != 1.0 {
            return Err(StatsError::NonBinaryOutcome { value: y });
        }
    }

    let n = design.num_rows();
    let p = design.num_parameters();
    let x = &design.x;

    let mut beta = vec![0.0; p];
    let mut covariance = Mat::zeros(p, p);
    let mut fitted = vec![0.5; n];
    let mut converged_at = None;

    for iteration in 1..=MAX_ITERATIONS {
        let mut eta = vec![0.0; n];
        for (row, eta_row) in eta.iter_mut().enumerate() {
            *eta_row = (0..p).map(|j| x[(row, j)] * beta[j]).sum();
        }
        for (mu, &e) in fitted.iter_mut().zip(&eta) {
            *mu = 1.0 / (1.0 + (-e).exp());
        }

        // Working response z = eta + (y - mu) / w with w = mu(1 - mu).
        let weights: Vec<f64> = fitted.iter().map(|mu| (mu * (1.0 - mu)).max(WEIGHT_FLOOR)).collect();
        let working: Vec<f64> = (0..n)
            .map(|r| eta[r] + (design.y[r] - fitted[r]) / weights[r])
            .collect();

        let xtwx = Mat::from_fn(p, p, |i, j| {
            (0..n).map(|r| x[(r, i)] * weights[r] * x[(r, j)]).sum::<f64>()
        });
        let xtwz = Mat::from_fn(p, 1, |i, _| {
            (0..n).map(|r| x[(r, i)] * weights[r] * working[r]).sum::<f64>()
        });

        let factor = solve::cholesky(&xtwx)?;
        let updated = solve::solve(&factor, &xtwz);

        let max_change = (0..p)
            .map(|j| (updated[(j, 0)] - beta[j]).abs())
            .fold(0.0_f64, f64::max);
        for (j, b) in beta.iter_mut().enumerate() {
            *b = updated[(j, 0)];
        }
        if max_change < COEFFICIENT_TOLERANCE {
            covariance = solve::invert(&factor, p);
            converged_at = Some(iteration);
            break;
        }
        if iteration == MAX_ITERATIONS {
            return Err(StatsError::NotConverged { iterations: MAX_ITERATIONS });
        }
    }
    let iterations = converged_at.ok_or(StatsError::NotConverged { iterations: MAX_ITERATIONS })?;

    // Refresh fitted values at the converged coefficients.
    for (row, mu) in fitted.iter_mut().enumerate() {
        let eta: f64 = (0..p).map(|j| x[(row, j)] * beta[j]).sum();
        *mu = 1.0 / (1.0 + (-eta).exp());
    }
    let log_likelihood: f64 = design
        .y
        .iter()
        .zip(&fitted)
        .map(|(&y, &mu)| {
            let mu = mu.clamp(1e-12, 1.0 - 1e-12);
            y * mu.ln() + (1.0 - y) * (1.0 - mu).ln()
        })
        .sum();

    let coefficients = (0..p)
        .map(|j| {
            let estimate = beta[j];
            let std_error = covariance[(j, j)].max(0.0).sqrt();
            let p_value = if std_error > 0.0 {
                normal_p_value(estimate / std_error)
            } else {
                f64::NAN
            };
            Coefficient {
                name: design.column_names[j].clone(),
                estimate,
                std_error,
                p_value,
            }
        })
        .collect();

    debug!(rows = n, parameters = p, iterations, "logistic model fitted");
    Ok(LogitFit {
        coefficients,
        num_observations: n,
        log_likelihood,
        iterations,
        fitted,
        covariance,
        estimates: beta,
        x: x.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{DataColumns, Design, Term};

    fn close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    /// Build a 2x2 layout by repetition: counts of successes and
    /// failures per arm.
    fn two_by_two(control: (usize, usize), treated: (usize, usize)) -> Design {
        let mut ys = Vec::new();
        let mut xs = Vec::new();
        for _ in 0..control.0 {
            ys.push(Some(1.0));
            xs.push(Some(0.0));
        }
        for _ in 0..control.1 {
            ys.push(Some(0.0));
            xs.push(Some(0.0));
        }
        for _ in 0..treated.0 {
            ys.push(Some(1.0));
            xs.push(Some(1.0));
        }
        for _ in 0..treated.1 {
            ys.push(Some(0.0));
            xs.push(Some(1.0));
        }
        let mut data = DataColumns::new();
        data.insert_numeric("y", ys);
        data.insert_numeric("treatment", xs);
        Design::build(&data, "y", &[Term::continuous("treatment")]).unwrap()
    }

    #[test]
    fn saturated_logit_recovers_log_odds() {
        // Control: 20/80 success; treated: 40/60 success.
        let design = two_by_two((20, 80), (40, 60));
        let fit = fit_logit(&design).unwrap();
        let intercept = fit.coefficient("const").unwrap();
        let slope = fit.coefficient("treatment").unwrap();
        close(intercept.estimate, (0.2_f64 / 0.8).ln(), 1e-6);
        close(
            slope.estimate,
            (0.4_f64 / 0.6).ln() - (0.2_f64 / 0.8).ln(),
            1e-6,
        );
        // Wald SE of the log odds ratio: sqrt(sum of 1/cell).
        let expected_se =
            (1.0 / 20.0 + 1.0 / 80.0 + 1.0 / 40.0 + 1.0 / 60.0_f64).sqrt();
        close(slope.std_error, expected_se, 1e-6);
    }

    #[test]
    fn marginal_effect_is_mean_density_times_beta() {
        let design = two_by_two((20, 80), (40, 60));
        let fit = fit_logit(&design).unwrap();
        let slope = fit.coefficient("treatment").unwrap().estimate;
        let ame = fit.marginal_effect("treatment").unwrap();
        // Fitted probabilities are exactly 0.2 and 0.4 per arm.
        let mean_density = (100.0 * 0.2 * 0.8 + 100.0 * 0.4 * 0.6) / 200.0;
        close(ame.estimate, mean_density * slope, 1e-6);
        assert!(ame.std_error > 0.0);
        assert!(ame.p_value > 0.0 && ame.p_value < 1.0);
    }

    #[test]
    fn non_binary_outcome_is_rejected() {
        let mut data = DataColumns::new();
        data.insert_numeric("y", vec![Some(0.0), Some(2.0), Some(1.0), Some(0.0)]);
        data.insert_numeric("x", vec![Some(0.0), Some(1.0), Some(0.0), Some(1.0)]);
        let design = Design::build(&data, "y", &[Term::continuous("x")]).unwrap();
        assert!(matches!(
            fit_logit(&design),
            Err(StatsError::NonBinaryOutcome { .. })
        ));
    }

    #[test]
    fn balanced_coin_flip_has_zero_slope() {
        let design = two_by_two((50, 50), (50, 50));
        let fit = fit_logit(&design).unwrap();
        close(fit.coefficient("treatment").unwrap().estimate, 0.0, 1e-8);
        close(fit.coefficient("const").unwrap().estimate, 0.0, 1e-8);
    }
}
