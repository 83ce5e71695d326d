//! Time intervals and interval-set validation.
//!
//! Selections are entered by the analyst as `"tmin-tmax"` strings. The parser
//! accepts signed decimal bounds separated by a `-` token, so `"-10--5"`,
//! `"-10 - -5"` and `"5-10"` are all valid. A selection is a non-empty set of
//! intervals that must be pairwise non-overlapping; touching endpoints are
//! allowed.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An ordered time interval with `tmin < tmax`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    tmin: f64,
    tmax: f64,
}

impl TimeInterval {
    pub fn new(tmin: f64, tmax: f64) -> Result<Self> {
        if !(tmin < tmax) {
            return Err(Error::InvalidInterval { tmin, tmax });
        }
        Ok(Self { tmin, tmax })
    }

    /// Parse a `"tmin-tmax"` string into a validated interval.
    pub fn parse(text: &str) -> Result<Self> {
        let (tmin, tmax) = parse_time_interval(text)?;
        Self::new(tmin, tmax)
    }

    pub fn tmin(&self) -> f64 {
        self.tmin
    }

    pub fn tmax(&self) -> f64 {
        self.tmax
    }

    pub fn duration(&self) -> f64 {
        self.tmax - self.tmin
    }

    /// Inclusive containment test, matching the event-selection masks.
    pub fn contains(&self, t: f64) -> bool {
        self.tmin <= t && t <= self.tmax
    }
}

/// Split a `"tmin-tmax"` string into its two bounds.
///
/// The accepted language: an optional sign, one or more digits, an optional
/// fractional part; then a `-` separator with optional surrounding
/// whitespace; then a second such number. The match is anchored at the start
/// of the string and trailing text is ignored.
pub fn parse_time_interval(text: &str) -> Result<(f64, f64)> {
    let fail = || Error::ParseInterval {
        input: text.to_string(),
    };

    let (tmin, rest) = scan_number(text).ok_or_else(fail)?;
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('-').ok_or_else(fail)?;
    let rest = rest.trim_start();
    let (tmax, _) = scan_number(rest).ok_or_else(fail)?;

    Ok((tmin, tmax))
}

/// Scan a signed decimal number (`-?[0-9]+(\.[0-9]*)?`) off the front of `s`.
fn scan_number(s: &str) -> Option<(f64, &str)> {
    let bytes = s.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }

    let value: f64 = s[..i].parse().ok()?;
    Some((value, &s[i..]))
}

/// True if any interval's bound falls strictly inside another interval's
/// open range. Touching endpoints are not an overlap.
///
/// Every pair is checked, in both directions.
pub fn intervals_overlap(intervals: &[TimeInterval]) -> bool {
    for (i, a) in intervals.iter().enumerate() {
        for (j, b) in intervals.iter().enumerate() {
            if i == j {
                continue;
            }
            if a.tmin < b.tmin && b.tmin < a.tmax {
                return true;
            }
            if a.tmin < b.tmax && b.tmax < a.tmax {
                return true;
            }
        }
    }
    false
}

/// A validated, non-empty set of pairwise non-overlapping intervals.
///
/// Intervals keep their input order; all derived quantities (exposure,
/// counts) are order-independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSet {
    intervals: Vec<TimeInterval>,
}

impl IntervalSet {
    pub fn new(intervals: Vec<TimeInterval>) -> Result<Self> {
        if intervals.is_empty() {
            return Err(Error::EmptyIntervalSet);
        }
        if intervals_overlap(&intervals) {
            return Err(Error::OverlappingIntervals);
        }
        Ok(Self { intervals })
    }

    /// Parse and validate a set of `"tmin-tmax"` strings.
    pub fn from_strings<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let intervals = specs
            .iter()
            .map(|s| TimeInterval::parse(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(intervals)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeInterval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn total_duration(&self) -> f64 {
        self.intervals.iter().map(TimeInterval::duration).sum()
    }

    /// True if `t` falls in any interval (inclusive bounds).
    pub fn contains(&self, t: f64) -> bool {
        self.intervals.iter().any(|iv| iv.contains(t))
    }

    pub fn starts(&self) -> Vec<f64> {
        self.intervals.iter().map(TimeInterval::tmin).collect()
    }

    pub fn stops(&self) -> Vec<f64> {
        self.intervals.iter().map(TimeInterval::tmax).collect()
    }

    /// Interval bounds as `(tmin, tmax)` pairs, for summaries.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        self.intervals
            .iter()
            .map(|iv| (iv.tmin, iv.tmax))
            .collect()
    }
}
