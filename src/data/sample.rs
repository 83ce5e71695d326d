//! Seeded synthetic event-stream generation.
//!
//! Used by tests and host applications that want smoke data with a known
//! ground truth: a constant-rate (homogeneous Poisson) stream, or one with a
//! linear rate trend generated by thinning. Generation is deterministic
//! given the same seed and configuration.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Poisson;

use crate::domain::EventStream;
use crate::error::{Error, Result};

/// Generate `n_events` arrival times uniformly distributed over
/// `[start, stop]`, with channel tags drawn uniformly from
/// `0..n_channels`.
pub fn uniform_stream(
    n_events: usize,
    start: f64,
    stop: f64,
    n_channels: usize,
    seed: u64,
) -> Result<EventStream> {
    validate_span(start, stop, n_channels)?;
    if n_events == 0 {
        return Err(Error::InvalidSample {
            reason: "event count must be > 0",
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut times: Vec<f64> = (0..n_events).map(|_| rng.gen_range(start..stop)).collect();
    times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let energies: Vec<usize> = (0..n_events).map(|_| rng.gen_range(0..n_channels)).collect();

    Ok(EventStream::new(times, energies, n_channels)?.with_span(start, stop))
}

/// Generate an inhomogeneous Poisson stream with rate
/// `r(t) = base_rate + slope * (t - start)`, by thinning a homogeneous
/// candidate stream at the peak rate.
pub fn linear_trend_stream(
    base_rate: f64,
    slope: f64,
    start: f64,
    stop: f64,
    n_channels: usize,
    seed: u64,
) -> Result<EventStream> {
    validate_span(start, stop, n_channels)?;
    if !(base_rate.is_finite() && slope.is_finite()) {
        return Err(Error::InvalidSample {
            reason: "rate parameters must be finite",
        });
    }

    let duration = stop - start;
    let rate = |t: f64| (base_rate + slope * (t - start)).max(0.0);
    let peak = rate(start).max(rate(stop));
    if peak <= 0.0 {
        return Err(Error::InvalidSample {
            reason: "rate must be positive somewhere in the span",
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let poisson = Poisson::new(peak * duration).map_err(|_| Error::InvalidSample {
        reason: "expected event count is not a valid Poisson mean",
    })?;
    let n_candidates = poisson.sample(&mut rng) as usize;

    let mut times = Vec::new();
    for _ in 0..n_candidates {
        let t = rng.gen_range(start..stop);
        if rng.r#gen::<f64>() < rate(t) / peak {
            times.push(t);
        }
    }
    times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let energies: Vec<usize> = (0..times.len())
        .map(|_| rng.gen_range(0..n_channels))
        .collect();

    Ok(EventStream::new(times, energies, n_channels)?.with_span(start, stop))
}

fn validate_span(start: f64, stop: f64, n_channels: usize) -> Result<()> {
    if !(start.is_finite() && stop.is_finite() && stop > start) {
        return Err(Error::InvalidSample {
            reason: "span must be finite with stop > start",
        });
    }
    if n_channels == 0 {
        return Err(Error::InvalidSample {
            reason: "channel count must be > 0",
        });
    }
    Ok(())
}
