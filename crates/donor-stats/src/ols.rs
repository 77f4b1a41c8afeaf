//! Linear models with classical and HC1 robust standard errors.

use faer::Mat;
use tracing::debug;

use crate::Coefficient;
use crate::design::Design;
use crate::error::Result;
use crate::inference::student_t_p_value;
use crate::solve;

/// How coefficient variances are estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarianceKind {
    /// Homoskedastic sigma^2 (X'X)^-1.
    Classical,
    /// Heteroskedasticity-consistent HC1 sandwich with the n/(n-k)
    /// small-sample factor.
    #[default]
    RobustHc1,
}

/// A fitted linear model.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub coefficients: Vec<Coefficient>,
    pub num_observations: usize,
    pub df_residual: usize,
    pub r_squared: f64,
    pub variance: VarianceKind,
}

impl OlsFit {
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        Coefficient::find(&self.coefficients, name)
    }
}

/// Fit `y ~ X` by least squares.
///
/// P-values use the Student-t distribution with `n - k` degrees of
/// freedom under either variance estimator.
pub fn fit_ols(design: &Design, variance: VarianceKind) -> Result<OlsFit> {
    let n = design.num_rows();
    let p = design.num_parameters();
    let x = &design.x;

    let xtx = Mat::from_fn(p, p, |i, j| {
        (0..n).map(|r| x[(r, i)] * x[(r, j)]).sum::<f64>()
    });
    let xty = Mat::from_fn(p, 1, |i, _| {
        (0..n).map(|r| x[(r, i)] * design.y[r]).sum::<f64>()
    });

    let factor = solve::cholesky(&xtx)?;
    let beta = solve::solve(&factor, &xty);
    let xtx_inv = solve::invert(&factor, p);

    let residuals: Vec<f64> = (0..n)
        .map(|r| {
            let fitted: f64 = (0..p).map(|j| x[(r, j)] * beta[(j, 0)]).sum();
            design.y[r] - fitted
        })
        .collect();

    let df_residual = n - p;
    let ssr: f64 = residuals.iter().map(|e| e * e).sum();
    let y_mean = design.y.iter().sum::<f64>() / n as f64;
    let sst: f64 = design.y.iter().map(|y| (y - y_mean).powi(2)).sum();
    let r_squared = if sst > 0.0 { 1.0 - ssr / sst } else { 0.0 };

    let covariance = match variance {
        VarianceKind::Classical => {
            let sigma2 = ssr / df_residual as f64;
            Mat::from_fn(p, p, |i, j| sigma2 * xtx_inv[(i, j)])
        }
        VarianceKind::RobustHc1 => {
            // Meat of the sandwich: X' diag(e^2) X.
            let meat = Mat::from_fn(p, p, |i, j| {
                (0..n)
                    .map(|r| x[(r, i)] * residuals[r] * residuals[r] * x[(r, j)])
                    .sum::<f64>()
            });
            let half = matmul(&xtx_inv, &meat);
            let sandwich = matmul(&half, &xtx_inv);
            let adjust = n as f64 / df_residual as f64;
            Mat::from_fn(p, p, |i, j| adjust * sandwich[(i, j)])
        }
    };

    let coefficients = (0..p)
        .map(|j| {
            let estimate = beta[(j, 0)];
            let std_error = covariance[(j, j)].max(0.0).sqrt();
            let p_value = if std_error > 0.0 {
                student_t_p_value(estimate / std_error, df_residual)
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

    debug!(rows = n, parameters = p, r_squared, "linear model fitted");
    Ok(OlsFit {
        coefficients,
        num_observations: n,
        df_residual,
        r_squared,
        variance,
    })
}

fn matmul(a: &Mat<f64>, b: &Mat<f64>) -> Mat<f64> {
    let inner = a.ncols();
    Mat::from_fn(a.nrows(), b.ncols(), |i, j| {
        (0..inner).map(|k| a[(i, k)] * b[(k, j)]).sum::<f64>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{DataColumns, Term};

    fn close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    fn simple_design() -> Design {
        let mut data = DataColumns::new();
        data.insert_numeric(
            "y",
            vec![Some(1.0), Some(2.0), Some(2.5), Some(4.0), Some(5.5), Some(5.0)],
        );
        data.insert_numeric(
            "x",
            vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
        );
        Design::build(&data, "y", &[Term::continuous("x")]).unwrap()
    }

    #[test]
    fn slope_matches_closed_form() {
        let design = simple_design();
        let fit = fit_ols(&design, VarianceKind::Classical).unwrap();
        // slope = cov(x, y) / var(x)
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [1.0, 2.0, 2.5, 4.0, 5.5, 5.0];
        let x_mean = xs.iter().sum::<f64>() / 6.0;
        let y_mean = ys.iter().sum::<f64>() / 6.0;
        let cov: f64 = xs.iter().zip(&ys).map(|(x, y)| (x - x_mean) * (y - y_mean)).sum();
        let var: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
        let slope = fit.coefficient("x").unwrap();
        close(slope.estimate, cov / var, 1e-10);
        assert_eq!(fit.num_observations, 6);
        assert_eq!(fit.df_residual, 4);
        assert!(fit.r_squared > 0.9);
    }

    #[test]
    fn perfect_fit_recovers_exact_coefficients() {
        let mut data = DataColumns::new();
        data.insert_numeric("y", vec![Some(3.0), Some(5.0), Some(7.0), Some(9.0)]);
        data.insert_numeric("x", vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0)]);
        let design = Design::build(&data, "y", &[Term::continuous("x")]).unwrap();
        let fit = fit_ols(&design, VarianceKind::RobustHc1).unwrap();
        close(fit.coefficient("const").unwrap().estimate, 3.0, 1e-10);
        close(fit.coefficient("x").unwrap().estimate, 2.0, 1e-10);
        close(fit.r_squared, 1.0, 1e-10);
    }

    #[test]
    fn hc1_applies_small_sample_factor() {
        let design = simple_design();
        let fit = fit_ols(&design, VarianceKind::RobustHc1).unwrap();
        let n = design.num_rows() as f64;
        let p = design.num_parameters() as f64;

        // Recompute HC0 by hand and check the n/(n-k) scaling.
        let x = &design.x;
        let beta: Vec<f64> = fit.coefficients.iter().map(|c| c.estimate).collect();
        let residuals: Vec<f64> = (0..design.num_rows())
            .map(|r| {
                let fitted: f64 = (0..design.num_parameters())
                    .map(|j| x[(r, j)] * beta[j])
                    .sum();
                design.y[r] - fitted
            })
            .collect();
        let xs: Vec<f64> = (0..design.num_rows()).map(|r| x[(r, 1)]).collect();
        let x_mean = xs.iter().sum::<f64>() / n;
        // For simple regression the slope HC0 variance has the closed
        // form sum((x - xbar)^2 e^2) / sum((x - xbar)^2)^2.
        let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
        let hc0: f64 = xs
            .iter()
            .zip(&residuals)
            .map(|(x, e)| (x - x_mean).powi(2) * e * e)
            .sum::<f64>()
            / (sxx * sxx);
        let expected = (n / (n - p) * hc0).sqrt();
        close(fit.coefficient("x").unwrap().std_error, expected, 1e-10);
    }

    #[test]
    fn singular_design_is_rejected() {
        let mut data = DataColumns::new();
        data.insert_numeric("y", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        data.insert_numeric("x", vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0)]);
        // Constant predictor duplicates the intercept.
        let design = Design::build(&data, "y", &[Term::continuous("x")]).unwrap();
        assert!(fit_ols(&design, VarianceKind::Classical).is_err());
    }
}
