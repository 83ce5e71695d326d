//! Damped Newton minimizer with finite-difference derivatives.
//!
//! The likelihood objectives in this crate are smooth and convex in the
//! polynomial coefficients (Poisson likelihoods with an identity link), so a
//! Newton iteration with a backtracking line search is reliable:
//!
//! - gradient and Hessian from central differences
//! - ridge escalation when the Hessian step is not a descent direction
//! - covariance of the solution from the inverse Hessian at the minimum
//!   (for a negative log-likelihood this is the Fisher-information estimate)
//!
//! Objectives may return very large values to mark infeasible points (e.g. a
//! non-positive rate); the line search backs away from them.

use nalgebra::{DMatrix, DVector};

/// Tuning knobs for the Newton iteration.
#[derive(Debug, Clone)]
pub struct NewtonOptions {
    pub max_iterations: usize,
    /// Relative objective-change convergence threshold.
    pub tolerance: f64,
    /// Relative gradient-norm convergence threshold.
    pub gradient_tolerance: f64,
    /// Relative finite-difference step.
    pub fd_step: f64,
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-10,
            gradient_tolerance: 1e-7,
            fd_step: 1e-5,
        }
    }
}

/// A converged Newton solution.
#[derive(Debug, Clone)]
pub struct NewtonSolution {
    pub parameters: Vec<f64>,
    pub covariance: Vec<Vec<f64>>,
    pub minimum: f64,
}

/// Minimize `objective` starting from `start`.
///
/// Returns `None` when the objective is non-finite at the start, a
/// derivative evaluation produces NaN, or no progress can be made from a
/// non-stationary point.
pub fn minimize<F>(objective: F, start: &[f64], options: &NewtonOptions) -> Option<NewtonSolution>
where
    F: Fn(&[f64]) -> f64,
{
    let n = start.len();
    let mut x = start.to_vec();
    let mut fx = objective(&x);
    if !fx.is_finite() {
        return None;
    }

    for _ in 0..options.max_iterations {
        let grad = gradient(&objective, &x, options.fd_step)?;
        let gnorm = grad.iter().map(|g| g * g).sum::<f64>().sqrt();
        if gnorm <= options.gradient_tolerance * (1.0 + fx.abs()) {
            break;
        }

        let hess = hessian(&objective, &x, fx, options.fd_step)?;
        let step = descent_step(&hess, &grad);
        let slope: f64 = grad.iter().zip(&step).map(|(g, d)| g * d).sum();

        // Backtracking line search with an Armijo acceptance test.
        let mut alpha = 1.0;
        let mut accepted = None;
        while alpha >= 1e-14 {
            let trial: Vec<f64> = x
                .iter()
                .zip(&step)
                .map(|(xi, di)| xi + alpha * di)
                .collect();
            let ft = objective(&trial);
            if ft.is_finite() && ft <= fx + 1e-4 * alpha * slope {
                accepted = Some((trial, ft));
                break;
            }
            alpha *= 0.5;
        }

        let Some((trial, ft)) = accepted else {
            // No descent possible along the computed direction; treat the
            // current point as the minimum.
            break;
        };

        let change = fx - ft;
        x = trial;
        fx = ft;
        if change.abs() <= options.tolerance * (1.0 + fx.abs()) {
            break;
        }
    }

    let hess = hessian(&objective, &x, fx, options.fd_step)?;
    let covariance = invert_symmetric(&hess, n);

    Some(NewtonSolution {
        parameters: x,
        covariance,
        minimum: fx,
    })
}

fn fd_scale(x: f64, fd_step: f64) -> f64 {
    fd_step * (1.0 + x.abs())
}

fn gradient<F>(objective: &F, x: &[f64], fd_step: f64) -> Option<Vec<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut grad = Vec::with_capacity(x.len());
    let mut probe = x.to_vec();
    for i in 0..x.len() {
        let h = fd_scale(x[i], fd_step);
        probe[i] = x[i] + h;
        let fp = objective(&probe);
        probe[i] = x[i] - h;
        let fm = objective(&probe);
        probe[i] = x[i];
        let g = (fp - fm) / (2.0 * h);
        if g.is_nan() {
            return None;
        }
        grad.push(g);
    }
    Some(grad)
}

fn hessian<F>(objective: &F, x: &[f64], fx: f64, fd_step: f64) -> Option<DMatrix<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let n = x.len();
    let mut hess = DMatrix::<f64>::zeros(n, n);
    let mut probe = x.to_vec();

    for i in 0..n {
        let hi = fd_scale(x[i], fd_step);

        probe[i] = x[i] + hi;
        let fp = objective(&probe);
        probe[i] = x[i] - hi;
        let fm = objective(&probe);
        probe[i] = x[i];

        let d2 = (fp - 2.0 * fx + fm) / (hi * hi);
        if d2.is_nan() {
            return None;
        }
        hess[(i, i)] = d2;

        for j in (i + 1)..n {
            let hj = fd_scale(x[j], fd_step);

            probe[i] = x[i] + hi;
            probe[j] = x[j] + hj;
            let fpp = objective(&probe);
            probe[j] = x[j] - hj;
            let fpm = objective(&probe);
            probe[i] = x[i] - hi;
            let fmm = objective(&probe);
            probe[j] = x[j] + hj;
            let fmp = objective(&probe);
            probe[i] = x[i];
            probe[j] = x[j];

            let d2 = (fpp - fpm - fmp + fmm) / (4.0 * hi * hj);
            if d2.is_nan() {
                return None;
            }
            hess[(i, j)] = d2;
            hess[(j, i)] = d2;
        }
    }
    Some(hess)
}

/// Solve for a descent direction, escalating a ridge term until the Newton
/// step points downhill; falls back to steepest descent.
fn descent_step(hess: &DMatrix<f64>, grad: &[f64]) -> Vec<f64> {
    let n = grad.len();
    let g = DVector::from_column_slice(grad);
    let scale = (0..n)
        .map(|i| hess[(i, i)].abs())
        .fold(1.0_f64, f64::max);

    for ridge in [0.0, 1e-10, 1e-6, 1e-2, 1.0, 1e4] {
        let mut damped = hess.clone();
        for i in 0..n {
            damped[(i, i)] += ridge * scale;
        }
        if let Some(step) = damped.lu().solve(&(-&g)) {
            let slope: f64 = grad.iter().zip(step.iter()).map(|(a, b)| a * b).sum();
            if slope < 0.0 && step.iter().all(|v| v.is_finite()) {
                return step.iter().copied().collect();
            }
        }
    }

    // Steepest descent; the line search chooses the length.
    grad.iter().map(|&gi| -gi).collect()
}

/// Invert the Hessian for the covariance estimate; a singular Hessian
/// (e.g. a channel at the zero-rate boundary) yields a zero matrix.
fn invert_symmetric(hess: &DMatrix<f64>, n: usize) -> Vec<Vec<f64>> {
    match hess.clone().try_inverse() {
        Some(inv) if inv.iter().all(|v| v.is_finite()) => (0..n)
            .map(|i| (0..n).map(|j| inv[(i, j)]).collect())
            .collect(),
        _ => vec![vec![0.0; n]; n],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimizes_separable_quadratic() {
        let f = |p: &[f64]| (p[0] - 3.0).powi(2) + 2.0 * (p[1] + 1.0).powi(2);
        let sol = minimize(f, &[0.0, 0.0], &NewtonOptions::default()).unwrap();
        assert!((sol.parameters[0] - 3.0).abs() < 1e-5);
        assert!((sol.parameters[1] + 1.0).abs() < 1e-5);
        assert!(sol.minimum < 1e-8);
        // Hessian diag (2, 4) -> covariance diag (0.5, 0.25).
        assert!((sol.covariance[0][0] - 0.5).abs() < 1e-3);
        assert!((sol.covariance[1][1] - 0.25).abs() < 1e-3);
    }

    #[test]
    fn minimizes_poisson_style_objective() {
        // f(c) = 10 c - 30 ln c has its minimum at c = 3 with f'' = 30/9.
        let f = |p: &[f64]| {
            if p[0] <= 0.0 {
                return 1e30;
            }
            10.0 * p[0] - 30.0 * p[0].ln()
        };
        let sol = minimize(f, &[1.0], &NewtonOptions::default()).unwrap();
        assert!((sol.parameters[0] - 3.0).abs() < 1e-4);
        assert!((sol.covariance[0][0] - 0.3).abs() < 1e-2);
    }

    #[test]
    fn flat_quartic_converges_near_the_minimum() {
        let f = |p: &[f64]| (p[0] - 2.0).powi(4);
        let sol = minimize(f, &[0.0], &NewtonOptions::default()).unwrap();
        assert!((sol.parameters[0] - 2.0).abs() < 0.05);
    }

    #[test]
    fn rejects_non_finite_start() {
        let f = |_: &[f64]| f64::NAN;
        assert!(minimize(f, &[0.0], &NewtonOptions::default()).is_none());
    }
}
