//! Unbinned event-likelihood polynomial fit.
//!
//! No histogramming: the rate polynomial is fitted directly to the event
//! arrival times over the background intervals by minimizing the extended
//! likelihood
//!
//! ```text
//! NLL(c) = M(c) - sum_k ln r(t_k)
//! ```
//!
//! where `M` is the expected number of events: the integral of `r` over the
//! background intervals scaled by the live fraction
//! `exposure / total_duration` (dead-time correction).

use crate::domain::MAX_POLY_DEGREE;
use crate::error::{Error, Result};
use crate::fit::minimizer::{Minimizer, Objective};
use crate::fit::{horner, time_scale, unscale_model, INFEASIBLE};
use crate::models::PolynomialModel;

struct UnbinnedObjective<'a> {
    events: &'a [f64],
    starts: &'a [f64],
    stops: &'a [f64],
    /// Live fraction times the coordinate scale: multiplying the scaled
    /// integral by this yields expected counts in real time units.
    integral_weight: f64,
}

impl Objective for UnbinnedObjective<'_> {
    fn value(&self, parameters: &[f64]) -> f64 {
        let mut expected = 0.0;
        for (&a, &b) in self.starts.iter().zip(self.stops) {
            expected += poly_integral(parameters, a, b);
        }
        let expected = expected * self.integral_weight;
        if !expected.is_finite() || expected < 0.0 {
            return INFEASIBLE;
        }

        let mut log_sum = 0.0;
        for &t in self.events {
            let rate = horner(parameters, t);
            if rate <= 0.0 {
                return INFEASIBLE;
            }
            log_sum += rate.ln();
        }

        expected - log_sum
    }
}

fn poly_integral(coefficients: &[f64], a: f64, b: f64) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .map(|(k, &c)| {
            let p = k as i32 + 1;
            c * (b.powi(p) - a.powi(p)) / p as f64
        })
        .sum()
}

/// Fit a degree-`grade` rate polynomial to raw event times over the
/// background intervals.
///
/// Returns the fitted model and the minimized negative log-likelihood.
/// A channel with no events yields the zero polynomial.
pub fn unbinned_polyfit(
    event_times: &[f64],
    grade: usize,
    interval_starts: &[f64],
    interval_stops: &[f64],
    exposure: f64,
    minimizer: &dyn Minimizer,
) -> Result<(PolynomialModel, f64)> {
    if interval_starts.len() != interval_stops.len() {
        return Err(Error::LengthMismatch {
            what: "interval starts and stops",
            left: interval_starts.len(),
            right: interval_stops.len(),
        });
    }
    if grade > MAX_POLY_DEGREE {
        return Err(Error::InvalidDegree { requested: grade });
    }

    if event_times.is_empty() {
        return Ok((PolynomialModel::zero(grade), 0.0));
    }

    let total_duration: f64 = interval_starts
        .iter()
        .zip(interval_stops)
        .map(|(&a, &b)| b - a)
        .sum();
    if total_duration <= 0.0 || exposure <= 0.0 {
        return Err(Error::FitFailure {
            channel: None,
            reason: "background selection has no live time".to_string(),
        });
    }
    let live_fraction = exposure / total_duration;

    let scale = time_scale(
        event_times
            .iter()
            .chain(interval_starts)
            .chain(interval_stops),
    );
    let events: Vec<f64> = event_times.iter().map(|&t| t / scale).collect();
    let starts: Vec<f64> = interval_starts.iter().map(|&t| t / scale).collect();
    let stops: Vec<f64> = interval_stops.iter().map(|&t| t / scale).collect();

    let objective = UnbinnedObjective {
        events: &events,
        starts: &starts,
        stops: &stops,
        integral_weight: live_fraction * scale,
    };

    let mut start = vec![0.0; grade + 1];
    start[0] = event_times.len() as f64 / exposure;

    let outcome = minimizer.minimize(&objective, &start)?;
    let model = unscale_model(&outcome.parameters, &outcome.covariance, scale);
    Ok((model, outcome.minimum))
}
