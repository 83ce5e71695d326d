//! Per-channel fit execution.
//!
//! The default strategy visits channels sequentially. The sharded strategy
//! partitions the channel range into contiguous chunks of
//! `ceil(n_channels / workers)` and runs each chunk as an independent rayon
//! task; inputs are captured immutably, results are returned by value and
//! concatenated in chunk order, so channel ordering is preserved regardless
//! of completion order. The first failing channel aborts the whole fit.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::PolynomialModel;

/// How per-channel background fits are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    Sequential,
    Sharded { workers: usize },
}

impl Default for ExecutionStrategy {
    fn default() -> Self {
        ExecutionStrategy::Sequential
    }
}

/// Run `fit_one` for every channel offset in `0..n_channels` and collect the
/// fitted models in channel order.
///
/// `fit_one` must be a pure function of its channel offset; the sharded
/// strategy calls it from worker threads.
pub fn run_channel_fits<F>(
    strategy: ExecutionStrategy,
    n_channels: usize,
    fit_one: F,
) -> Result<Vec<PolynomialModel>>
where
    F: Fn(usize) -> Result<PolynomialModel> + Sync,
{
    match strategy {
        ExecutionStrategy::Sequential => {
            let mut models = Vec::with_capacity(n_channels);
            for offset in 0..n_channels {
                debug!(channel_offset = offset, "fitting background channel");
                models.push(fit_one(offset)?);
            }
            Ok(models)
        }
        ExecutionStrategy::Sharded { workers } => {
            // More workers than channels just means empty shards; clamp so
            // the chunk arithmetic stays meaningful.
            let workers = workers.max(1).min(n_channels.max(1));
            let chunk_size = n_channels.div_ceil(workers);

            let chunks: Vec<std::ops::Range<usize>> = (0..workers)
                .map(|w| {
                    let lo = w * chunk_size;
                    let hi = ((w + 1) * chunk_size).min(n_channels);
                    lo..hi
                })
                .filter(|r| !r.is_empty())
                .collect();

            let shard_results: Vec<Result<Vec<PolynomialModel>>> = chunks
                .par_iter()
                .map(|range| {
                    debug!(?range, "fitting background channel shard");
                    range.clone().map(&fit_one).collect()
                })
                .collect();

            let mut models = Vec::with_capacity(n_channels);
            for shard in shard_results {
                models.extend(shard?);
            }
            Ok(models)
        }
    }
}
