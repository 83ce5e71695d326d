//! Crate error types.
//!
//! Every fallible operation surfaces one of these variants; nothing degrades
//! silently. Selection and fit state is swapped in whole snapshots, so an
//! error leaves the previous state untouched.

use thiserror::Error;

/// Result type alias for event-list operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The interval string did not match the `tmin-tmax` form.
    #[error("could not parse time interval {input:?}: expected \"tmin-tmax\" with signed decimal bounds")]
    ParseInterval { input: String },

    /// An interval with `tmin >= tmax`.
    #[error("invalid time interval: tmin ({tmin}) must be strictly less than tmax ({tmax})")]
    InvalidInterval { tmin: f64, tmax: f64 },

    /// A selection needs at least one interval.
    #[error("an interval set must contain at least one interval")]
    EmptyIntervalSet,

    /// Two intervals in the same set overlap (open-interval test).
    #[error("provided intervals are overlapping and hence invalid")]
    OverlappingIntervals,

    /// Rates or selection info requested before any active selection was made.
    #[error("no active time selection exists; call set_active_time_intervals first")]
    MissingActiveSelection,

    /// Background products requested before any background fit was made.
    #[error("no background fit exists; call set_background_fit_intervals first")]
    MissingBackgroundFit,

    /// A forced polynomial degree outside the supported range.
    #[error("polynomial degree must be within 0..=4, got {requested}")]
    InvalidDegree { requested: usize },

    /// A minimizer name outside the closed backend set.
    #[error("unknown minimizer backend {name:?}; available backends: MINUIT, ROOT, PYOPT, MULTINEST")]
    UnknownBackend { name: String },

    /// The PYOPT backend was selected without naming an algorithm.
    #[error("the PYOPT backend requires an algorithm name")]
    MissingAlgorithm,

    /// A PYOPT algorithm name outside the supported set.
    #[error("unknown PYOPT algorithm {name:?}")]
    UnknownAlgorithm { name: String },

    /// The minimizer or objective failed; the whole background fit aborts.
    #[error("background fit failed{}: {reason}", channel.map(|c| format!(" on channel {c}")).unwrap_or_default())]
    FitFailure {
        channel: Option<usize>,
        reason: String,
    },

    /// Parallel event-stream arrays with different lengths.
    #[error("{what}: lengths differ ({left} vs {right})")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    /// An event stream with no events and no explicit time span.
    #[error("event stream is empty and no explicit start/stop time was given")]
    EmptyStream,

    /// Invalid synthetic-sample configuration.
    #[error("invalid sample configuration: {reason}")]
    InvalidSample { reason: &'static str },
}
