//! Background-model fitting.
//!
//! Responsibilities:
//!
//! - the minimizer capability and its closed backend set (`minimizer`)
//! - binned and unbinned polynomial likelihood fits (`binned`, `unbinned`)
//! - automatic degree selection via likelihood ratios (`grade`)
//! - sequential vs. sharded per-channel execution (`strategy`)

pub mod binned;
pub mod grade;
pub mod minimizer;
pub mod strategy;
pub mod unbinned;

pub use binned::*;
pub use grade::*;
pub use minimizer::*;
pub use strategy::*;
pub use unbinned::*;

use crate::models::PolynomialModel;

/// Objective value marking an infeasible parameter point (non-positive rate
/// where events were observed). The line search backs away from these.
pub(crate) const INFEASIBLE: f64 = 1e30;

/// Evaluate a raw coefficient slice (ascending powers) at `t`.
pub(crate) fn horner(coefficients: &[f64], t: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * t + c)
}

/// Map a solution fitted in the rescaled coordinate `x = t / scale` back to
/// the raw time coordinate: `c_k = c'_k / scale^k`, with the covariance
/// transformed accordingly.
pub(crate) fn unscale_model(
    parameters: &[f64],
    covariance: &[Vec<f64>],
    scale: f64,
) -> PolynomialModel {
    let n = parameters.len();
    let factors: Vec<f64> = (0..n).map(|k| scale.powi(k as i32)).collect();

    let coefficients: Vec<f64> = parameters
        .iter()
        .zip(&factors)
        .map(|(&p, &f)| p / f)
        .collect();
    let cov: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| covariance[i][j] / (factors[i] * factors[j]))
                .collect()
        })
        .collect();

    PolynomialModel::new(coefficients, cov)
}

/// Conditioning scale for a set of time values: the largest magnitude,
/// floored at 1 so already-small coordinates pass through unchanged.
pub(crate) fn time_scale<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.fold(1.0_f64, |acc, &v| acc.max(v.abs()))
}
