//! Event stream container, fit-state enums, and output value objects.
//!
//! These types are intentionally lightweight and serializable so they can be:
//!
//! - used in-memory during selection and fitting
//! - exported to JSON for downstream pipelines
//! - rendered into human-readable summaries

use serde::{Deserialize, Serialize};

use crate::domain::intervals::IntervalSet;
use crate::error::{Error, Result};

/// Which estimation mode a background fit uses.
///
/// Binned discretizes the stream into fixed-width count bins and fits a
/// Poisson count likelihood; unbinned fits the event-time likelihood
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    Binned,
    Unbinned,
}

/// Maximum supported polynomial degree for background models.
pub const MAX_POLY_DEGREE: usize = 4;

/// User-requested polynomial degree.
///
/// `Auto` selects the degree with the likelihood-ratio stepwise test;
/// `Fixed(d)` bypasses the selector entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolyOrder {
    Auto,
    Fixed(usize),
}

impl PolyOrder {
    /// Construct a validated forced degree.
    pub fn fixed(degree: usize) -> Result<Self> {
        if degree > MAX_POLY_DEGREE {
            return Err(Error::InvalidDegree { requested: degree });
        }
        Ok(PolyOrder::Fixed(degree))
    }

    pub(crate) fn validate(self) -> Result<Self> {
        match self {
            PolyOrder::Fixed(d) if d > MAX_POLY_DEGREE => {
                Err(Error::InvalidDegree { requested: d })
            }
            other => Ok(other),
        }
    }
}

/// A time-tagged photon event stream, immutable after construction.
///
/// Parallel sequences: one arrival time, one channel tag, and (optionally)
/// one dead-time entry per event. The span defaults to the min/max arrival
/// time when not given explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStream {
    arrival_times: Vec<f64>,
    energies: Vec<usize>,
    dead_time: Option<Vec<f64>>,
    start_time: f64,
    stop_time: f64,
    n_channels: usize,
    first_channel: usize,
}

impl EventStream {
    pub fn new(arrival_times: Vec<f64>, energies: Vec<usize>, n_channels: usize) -> Result<Self> {
        if arrival_times.len() != energies.len() {
            return Err(Error::LengthMismatch {
                what: "arrival times and energies",
                left: arrival_times.len(),
                right: energies.len(),
            });
        }
        if arrival_times.is_empty() {
            return Err(Error::EmptyStream);
        }

        let start_time = arrival_times.iter().copied().fold(f64::INFINITY, f64::min);
        let stop_time = arrival_times
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            arrival_times,
            energies,
            dead_time: None,
            start_time,
            stop_time,
            n_channels,
            first_channel: 0,
        })
    }

    /// Attach a per-event dead-time array (time the detector was unable to
    /// record after each event).
    pub fn with_dead_time(mut self, dead_time: Vec<f64>) -> Result<Self> {
        if dead_time.len() != self.arrival_times.len() {
            return Err(Error::LengthMismatch {
                what: "arrival times and dead time",
                left: self.arrival_times.len(),
                right: dead_time.len(),
            });
        }
        self.dead_time = Some(dead_time);
        Ok(self)
    }

    /// Override the stream span (defaults to min/max arrival time).
    pub fn with_span(mut self, start_time: f64, stop_time: f64) -> Self {
        self.start_time = start_time;
        self.stop_time = stop_time;
        self
    }

    /// Set the index at which detector channels begin.
    pub fn with_first_channel(mut self, first_channel: usize) -> Self {
        self.first_channel = first_channel;
        self
    }

    pub fn n_events(&self) -> usize {
        self.arrival_times.len()
    }

    pub fn arrival_times(&self) -> &[f64] {
        &self.arrival_times
    }

    pub fn energies(&self) -> &[usize] {
        &self.energies
    }

    pub fn dead_time(&self) -> Option<&[f64]> {
        self.dead_time.as_deref()
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn stop_time(&self) -> f64 {
        self.stop_time
    }

    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    pub fn first_channel(&self) -> usize {
        self.first_channel
    }

    /// The channel id range covered by this stream.
    pub fn channels(&self) -> std::ops::Range<usize> {
        self.first_channel..self.first_channel + self.n_channels
    }

    /// Per-event membership in the union of the given intervals
    /// (inclusive bounds).
    pub fn union_mask(&self, intervals: &IntervalSet) -> Vec<bool> {
        self.arrival_times
            .iter()
            .map(|&t| intervals.contains(t))
            .collect()
    }

    /// Total dead time accumulated by masked events; zero when no dead-time
    /// array was supplied.
    pub fn dead_time_in_mask(&self, mask: &[bool]) -> f64 {
        match &self.dead_time {
            Some(dead) => dead
                .iter()
                .zip(mask)
                .filter(|&(_, &m)| m)
                .map(|(&d, _)| d)
                .sum(),
            None => 0.0,
        }
    }

    /// Live-time exposure over `[tmin, tmax]`: duration minus the dead time
    /// of events arriving inside the interval (inclusive bounds).
    pub fn exposure_over_interval(&self, tmin: f64, tmax: f64) -> f64 {
        let dead = match &self.dead_time {
            Some(dead) => self
                .arrival_times
                .iter()
                .zip(dead)
                .filter(|&(&t, _)| tmin <= t && t <= tmax)
                .map(|(_, &d)| d)
                .sum(),
            None => 0.0,
        };
        (tmax - tmin) - dead
    }
}

/// Per-channel spectral products handed to a downstream fitting pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumContainer {
    pub rates: Vec<f64>,
    pub rate_errors: Option<Vec<f64>>,
    pub n_channels: usize,
    pub exposure: f64,
    /// True when the rates carry Poisson (counting) statistics; false when
    /// they are background-model predictions with Gaussian errors.
    pub is_poisson: bool,
    pub response_file: Option<String>,
}

/// Per-channel polynomial coefficients and errors, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyInfo {
    pub channel: usize,
    pub coefficients: Vec<f64>,
    pub errors: Vec<f64>,
}

/// Read-only snapshot of the current selection state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub active_intervals: Vec<(f64, f64)>,
    pub exposure: f64,
    pub dead_time: f64,
    pub total_events: usize,
    pub active_counts: u64,
    pub n_channels: usize,
    pub background: Option<BackgroundSummary>,
}

/// Background-fit section of a [`Summary`], present once a fit exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSummary {
    pub intervals: Vec<(f64, f64)>,
    pub grade: usize,
    pub mode: FitMode,
    pub predicted_counts: f64,
    pub predicted_count_error: f64,
    /// Two-sample Poisson significance of observed vs. predicted counts;
    /// absent when either count is zero.
    pub significance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream() -> EventStream {
        EventStream::new(vec![1.0, 2.0, 3.0, 4.0], vec![0, 1, 0, 1], 2).unwrap()
    }

    #[test]
    fn stream_defaults_span_to_data() {
        let s = stream();
        assert_eq!(s.start_time(), 1.0);
        assert_eq!(s.stop_time(), 4.0);
        assert_eq!(s.n_events(), 4);
        assert_eq!(s.channels(), 0..2);
    }

    #[test]
    fn stream_rejects_mismatched_lengths() {
        assert!(matches!(
            EventStream::new(vec![1.0, 2.0], vec![0], 1),
            Err(Error::LengthMismatch { .. })
        ));
        assert!(matches!(
            stream().with_dead_time(vec![0.1]),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn stream_rejects_empty_events() {
        assert!(matches!(
            EventStream::new(vec![], vec![], 1),
            Err(Error::EmptyStream)
        ));
    }

    #[test]
    fn exposure_over_interval_subtracts_dead_time() {
        let s = stream().with_dead_time(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        // Events at 2.0 and 3.0 fall in [1.5, 3.5].
        assert!((s.exposure_over_interval(1.5, 3.5) - (2.0 - 0.5)).abs() < 1e-12);
        // Without dead time the exposure is the plain duration.
        assert!((stream().exposure_over_interval(1.5, 3.5) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn union_mask_uses_inclusive_bounds() {
        let s = stream();
        let set = IntervalSet::from_strings(&["2.0-3.0"]).unwrap();
        assert_eq!(s.union_mask(&set), vec![false, true, true, false]);
    }

    #[test]
    fn poly_order_validates_range() {
        assert!(PolyOrder::fixed(4).is_ok());
        assert!(matches!(
            PolyOrder::fixed(5),
            Err(Error::InvalidDegree { requested: 5 })
        ));
    }
}
