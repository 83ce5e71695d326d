//! Binned Poisson polynomial fit.
//!
//! Given bin midpoints, observed counts, and per-bin live-time exposures,
//! fit a rate polynomial `r(t)` by minimizing the Poisson count
//! negative log-likelihood
//!
//! ```text
//! NLL(c) = sum_i [ mu_i - n_i ln mu_i ],   mu_i = r(t_i) * e_i
//! ```
//!
//! (the `ln n_i!` constant is dropped). The fit runs in the rescaled
//! coordinate `x = t / s` for conditioning and maps coefficients and
//! covariance back afterwards.

use crate::domain::MAX_POLY_DEGREE;
use crate::error::{Error, Result};
use crate::fit::minimizer::{Minimizer, Objective};
use crate::fit::{horner, time_scale, unscale_model, INFEASIBLE};
use crate::models::PolynomialModel;

struct BinnedObjective<'a> {
    midpoints: &'a [f64],
    counts: &'a [f64],
    exposures: &'a [f64],
}

impl Objective for BinnedObjective<'_> {
    fn value(&self, parameters: &[f64]) -> f64 {
        let mut nll = 0.0;
        for ((&t, &n), &e) in self
            .midpoints
            .iter()
            .zip(self.counts)
            .zip(self.exposures)
        {
            let mu = horner(parameters, t) * e;
            if n > 0.0 {
                if mu <= 0.0 {
                    return INFEASIBLE;
                }
                nll += mu - n * mu.ln();
            } else {
                // Zero-count bins constrain the rate to stay non-negative.
                if mu < 0.0 {
                    return INFEASIBLE;
                }
                nll += mu;
            }
        }
        nll
    }
}

/// Fit a degree-`grade` rate polynomial to binned counts.
///
/// Returns the fitted model and the minimized negative log-likelihood.
/// A selection with no counts at all yields the zero polynomial.
pub fn polyfit(
    bin_midpoints: &[f64],
    counts: &[f64],
    grade: usize,
    bin_exposures: &[f64],
    minimizer: &dyn Minimizer,
) -> Result<(PolynomialModel, f64)> {
    if bin_midpoints.len() != counts.len() {
        return Err(Error::LengthMismatch {
            what: "bin midpoints and counts",
            left: bin_midpoints.len(),
            right: counts.len(),
        });
    }
    if bin_midpoints.len() != bin_exposures.len() {
        return Err(Error::LengthMismatch {
            what: "bin midpoints and exposures",
            left: bin_midpoints.len(),
            right: bin_exposures.len(),
        });
    }
    if grade > MAX_POLY_DEGREE {
        return Err(Error::InvalidDegree { requested: grade });
    }

    let total_counts: f64 = counts.iter().sum();
    if total_counts == 0.0 {
        return Ok((PolynomialModel::zero(grade), 0.0));
    }

    // Bins with no live time carry no information and break the Poisson
    // term; drop them up front.
    let mut live_mids = Vec::with_capacity(bin_midpoints.len());
    let mut live_counts = Vec::with_capacity(counts.len());
    let mut live_exps = Vec::with_capacity(bin_exposures.len());
    for ((&t, &n), &e) in bin_midpoints.iter().zip(counts).zip(bin_exposures) {
        if e > 0.0 {
            live_mids.push(t);
            live_counts.push(n);
            live_exps.push(e);
        }
    }
    let total_exposure: f64 = live_exps.iter().sum();
    if total_exposure <= 0.0 {
        return Err(Error::FitFailure {
            channel: None,
            reason: "no live time in the selected bins".to_string(),
        });
    }

    let scale = time_scale(live_mids.iter());
    let scaled_mids: Vec<f64> = live_mids.iter().map(|&t| t / scale).collect();

    let objective = BinnedObjective {
        midpoints: &scaled_mids,
        counts: &live_counts,
        exposures: &live_exps,
    };

    // Start from the flat mean rate; higher-order terms start at zero.
    let mut start = vec![0.0; grade + 1];
    start[0] = total_counts / total_exposure;

    let outcome = minimizer.minimize(&objective, &start)?;
    let model = unscale_model(&outcome.parameters, &outcome.covariance, scale);
    Ok((model, outcome.minimum))
}
