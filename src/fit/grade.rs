//! Automatic polynomial-degree selection.
//!
//! Degrees 0..=3 are fitted against the energy-summed (binned) or
//! whole-sample (unbinned) background data, and consecutive fits are
//! compared with the likelihood-ratio statistic
//! `Δ[d] = 2 * (NLL[d] - NLL[d+1])`. One added degree of freedom at the
//! fixed threshold `Δ >= 9` corresponds to ~99.7% confidence; the selected
//! degree is the highest `d+1` whose Δ clears it, or 0 when none does.

use tracing::info;

use crate::error::Result;
use crate::fit::binned::polyfit;
use crate::fit::minimizer::Minimizer;
use crate::fit::unbinned::unbinned_polyfit;

/// Likelihood-ratio improvement required to accept one more degree.
pub const DELTA_LOGLIKE_THRESHOLD: f64 = 9.0;

/// Lowest and highest degrees attempted by the automatic selector.
pub const MIN_GRADE: usize = 0;
pub const MAX_GRADE: usize = 3;

/// Pick a degree from the minimized negative log-likelihoods of the
/// candidate fits (index = degree).
pub fn select_grade(neg_log_likelihoods: &[f64]) -> usize {
    let mut best = 0;
    for d in 0..neg_log_likelihoods.len().saturating_sub(1) {
        let delta = 2.0 * (neg_log_likelihoods[d] - neg_log_likelihoods[d + 1]);
        if delta >= DELTA_LOGLIKE_THRESHOLD {
            best = d + 1;
        }
    }
    best
}

/// Determine the optimal degree from the energy-summed binned data.
pub fn optimum_grade_binned(
    bin_midpoints: &[f64],
    summed_counts: &[f64],
    bin_exposures: &[f64],
    minimizer: &dyn Minimizer,
) -> Result<usize> {
    let mut nlls = Vec::with_capacity(MAX_GRADE - MIN_GRADE + 1);
    for grade in MIN_GRADE..=MAX_GRADE {
        let (_, nll) = polyfit(bin_midpoints, summed_counts, grade, bin_exposures, minimizer)?;
        nlls.push(nll);
    }
    let grade = select_grade(&nlls);
    info!(grade, "auto-determined polynomial grade (binned)");
    Ok(grade)
}

/// Determine the optimal degree from the whole unbinned background sample.
pub fn optimum_grade_unbinned(
    event_times: &[f64],
    interval_starts: &[f64],
    interval_stops: &[f64],
    exposure: f64,
    minimizer: &dyn Minimizer,
) -> Result<usize> {
    let mut nlls = Vec::with_capacity(MAX_GRADE - MIN_GRADE + 1);
    for grade in MIN_GRADE..=MAX_GRADE {
        let (_, nll) = unbinned_polyfit(
            event_times,
            grade,
            interval_starts,
            interval_stops,
            exposure,
            minimizer,
        )?;
        nlls.push(nll);
    }
    let grade = select_grade(&nlls);
    info!(grade, "auto-determined polynomial grade (unbinned)");
    Ok(grade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::minimizer::MinimizerBackend;

    #[test]
    fn no_improvement_selects_zero() {
        assert_eq!(select_grade(&[100.0, 99.8, 99.7, 99.7]), 0);
    }

    #[test]
    fn single_step_improvement_selects_one() {
        // Δ = [9.0, 0.2, 0.2]
        assert_eq!(select_grade(&[100.0, 95.5, 95.4, 95.3]), 1);
    }

    #[test]
    fn last_qualifying_step_wins() {
        // Δ = [10, 1, 10]: the rule keeps the highest qualifying degree.
        assert_eq!(select_grade(&[100.0, 95.0, 94.5, 89.5]), 3);
    }

    #[test]
    fn binned_selector_prefers_flat_for_constant_counts() {
        let width = 0.1;
        let mids: Vec<f64> = (0..400).map(|i| (i as f64 + 0.5) * width).collect();
        let exps = vec![width; mids.len()];
        let counts = vec![2.0; mids.len()];
        let minimizer = MinimizerBackend::Minuit.resolve();
        let grade = optimum_grade_binned(&mids, &counts, &exps, minimizer.as_ref()).unwrap();
        assert_eq!(grade, 0);
    }

    #[test]
    fn binned_selector_detects_linear_trend() {
        let width = 0.1;
        let mids: Vec<f64> = (0..400).map(|i| (i as f64 + 0.5) * width).collect();
        let exps = vec![width; mids.len()];
        let counts: Vec<f64> = mids.iter().map(|&t| (10.0 + 2.0 * t) * width).collect();
        let minimizer = MinimizerBackend::Minuit.resolve();
        let grade = optimum_grade_binned(&mids, &counts, &exps, minimizer.as_ref()).unwrap();
        assert!(grade >= 1, "expected at least a linear grade, got {grade}");
    }
}
