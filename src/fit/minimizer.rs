//! Minimizer capability and backend selection.
//!
//! Backends form a small closed set resolved to a capability object at
//! configuration time; there is no runtime string dispatch in the fit path.
//! Native MINUIT/ROOT/PyOpt/MultiNest bindings live outside this crate, so
//! every backend currently resolves to the built-in damped-Newton driver;
//! the tag is kept for diagnostics and the original selection semantics
//! (unknown names and a missing PYOPT algorithm are configuration errors).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::newton::{self, NewtonOptions};

/// An objective function handed to a minimizer.
///
/// `Sync` so per-channel fits can run on shard workers.
pub trait Objective: Sync {
    fn value(&self, parameters: &[f64]) -> f64;
}

/// Best-fit parameters, their errors and covariance, and the minimized
/// objective value.
#[derive(Debug, Clone)]
pub struct MinimizeOutcome {
    pub parameters: Vec<f64>,
    pub errors: Vec<f64>,
    pub covariance: Vec<Vec<f64>>,
    pub minimum: f64,
}

/// The minimizer capability consumed by the fit objectives.
pub trait Minimizer: Send + Sync {
    fn minimize(&self, objective: &dyn Objective, start: &[f64]) -> Result<MinimizeOutcome>;
}

/// Algorithms accepted for the PYOPT backend.
pub const PYOPT_ALGORITHMS: &[&str] = &[
    "ALPSO", "COBYLA", "CONMIN", "KSOPT", "NSGA2", "PSQP", "SLSQP", "SNOPT", "SOLVOPT",
];

/// The closed set of minimizer backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinimizerBackend {
    Minuit,
    Root,
    PyOpt { algorithm: String },
    MultiNest,
}

impl Default for MinimizerBackend {
    fn default() -> Self {
        MinimizerBackend::Minuit
    }
}

impl MinimizerBackend {
    /// Resolve a backend by name, case-insensitive.
    ///
    /// PYOPT additionally requires an algorithm from [`PYOPT_ALGORITHMS`];
    /// the other backends ignore `algorithm`.
    pub fn parse(name: &str, algorithm: Option<&str>) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "MINUIT" => Ok(MinimizerBackend::Minuit),
            "ROOT" => Ok(MinimizerBackend::Root),
            "MULTINEST" => Ok(MinimizerBackend::MultiNest),
            "PYOPT" => {
                let algorithm = algorithm.ok_or(Error::MissingAlgorithm)?;
                let upper = algorithm.to_ascii_uppercase();
                if !PYOPT_ALGORITHMS.contains(&upper.as_str()) {
                    return Err(Error::UnknownAlgorithm {
                        name: algorithm.to_string(),
                    });
                }
                Ok(MinimizerBackend::PyOpt { algorithm: upper })
            }
            _ => Err(Error::UnknownBackend {
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MinimizerBackend::Minuit => "MINUIT",
            MinimizerBackend::Root => "ROOT",
            MinimizerBackend::PyOpt { .. } => "PYOPT",
            MinimizerBackend::MultiNest => "MULTINEST",
        }
    }

    /// Resolve the backend to its capability object.
    pub fn resolve(&self) -> Arc<dyn Minimizer> {
        Arc::new(NewtonMinimizer::default())
    }
}

/// The built-in likelihood driver backing every backend tag.
#[derive(Debug, Default)]
pub struct NewtonMinimizer {
    options: NewtonOptions,
}

impl Minimizer for NewtonMinimizer {
    fn minimize(&self, objective: &dyn Objective, start: &[f64]) -> Result<MinimizeOutcome> {
        let solution = newton::minimize(|p| objective.value(p), start, &self.options)
            .ok_or_else(|| Error::FitFailure {
                channel: None,
                reason: "minimizer did not converge".to_string(),
            })?;

        let errors = solution
            .covariance
            .iter()
            .enumerate()
            .map(|(i, row)| row[i].max(0.0).sqrt())
            .collect();

        Ok(MinimizeOutcome {
            parameters: solution.parameters,
            errors,
            covariance: solution.covariance,
            minimum: solution.minimum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backends_case_insensitive() {
        assert_eq!(
            MinimizerBackend::parse("minuit", None).unwrap(),
            MinimizerBackend::Minuit
        );
        assert_eq!(
            MinimizerBackend::parse("Root", None).unwrap(),
            MinimizerBackend::Root
        );
        assert_eq!(
            MinimizerBackend::parse("MULTINEST", None).unwrap(),
            MinimizerBackend::MultiNest
        );
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(matches!(
            MinimizerBackend::parse("SCIPY", None),
            Err(Error::UnknownBackend { .. })
        ));
    }

    #[test]
    fn pyopt_requires_a_known_algorithm() {
        assert!(matches!(
            MinimizerBackend::parse("PYOPT", None),
            Err(Error::MissingAlgorithm)
        ));
        assert!(matches!(
            MinimizerBackend::parse("PYOPT", Some("MAGIC")),
            Err(Error::UnknownAlgorithm { .. })
        ));
        assert_eq!(
            MinimizerBackend::parse("pyopt", Some("slsqp")).unwrap(),
            MinimizerBackend::PyOpt {
                algorithm: "SLSQP".to_string()
            }
        );
    }

    #[test]
    fn resolved_backend_minimizes() {
        struct Quadratic;
        impl Objective for Quadratic {
            fn value(&self, p: &[f64]) -> f64 {
                (p[0] - 1.5).powi(2)
            }
        }

        let minimizer = MinimizerBackend::Minuit.resolve();
        let outcome = minimizer.minimize(&Quadratic, &[0.0]).unwrap();
        assert!((outcome.parameters[0] - 1.5).abs() < 1e-5);
        assert!(outcome.minimum < 1e-8);
    }
}
