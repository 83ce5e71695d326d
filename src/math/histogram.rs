//! Fixed-width time binning.
//!
//! Edge generation follows arange semantics: edges at `start + k*width`
//! for every `k` with `start + k*width < stop`, so the final partial bin
//! beyond the last edge is dropped. Histogram bins are half-open
//! `[e_i, e_{i+1})` except the last, which includes its right edge.

/// Generate bin edges of the given width across `[start, stop)`.
pub fn bin_edges(start: f64, stop: f64, width: f64) -> Vec<f64> {
    let mut edges = Vec::new();
    if !(width > 0.0) || !start.is_finite() || !stop.is_finite() {
        return edges;
    }
    let mut k = 0usize;
    loop {
        let edge = start + k as f64 * width;
        if edge >= stop {
            break;
        }
        edges.push(edge);
        k += 1;
    }
    edges
}

/// Midpoint of each bin described by `edges`.
pub fn midpoints(edges: &[f64]) -> Vec<f64> {
    edges
        .windows(2)
        .map(|pair| 0.5 * (pair[0] + pair[1]))
        .collect()
}

/// Count values into the bins described by `edges`.
///
/// Values outside `[edges[0], edges[last]]` are ignored. Counts are returned
/// as floats because they feed directly into the likelihood objectives.
pub fn histogram(values: &[f64], edges: &[f64]) -> Vec<f64> {
    let n_bins = edges.len().saturating_sub(1);
    let mut counts = vec![0.0; n_bins];
    if n_bins == 0 {
        return counts;
    }

    let lo = edges[0];
    let hi = edges[n_bins];
    for &v in values {
        if v < lo || v > hi {
            continue;
        }
        // Index of the last edge <= v; the right edge of the final bin is
        // inclusive.
        let idx = edges.partition_point(|&e| e <= v).saturating_sub(1);
        counts[idx.min(n_bins - 1)] += 1.0;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_cover_span_below_stop() {
        let edges = bin_edges(0.0, 1.0, 0.25);
        assert_eq!(edges, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn midpoints_are_bin_centers() {
        let edges = vec![0.0, 1.0, 2.0];
        assert_eq!(midpoints(&edges), vec![0.5, 1.5]);
    }

    #[test]
    fn histogram_counts_with_inclusive_last_edge() {
        let edges = vec![0.0, 1.0, 2.0];
        let counts = histogram(&[0.0, 0.5, 1.0, 1.5, 2.0, 2.5, -0.1], &edges);
        // 2.5 and -0.1 are out of range; 1.0 lands in the second bin;
        // 2.0 sits on the inclusive right edge of the last bin.
        assert_eq!(counts, vec![2.0, 3.0]);
    }

    #[test]
    fn histogram_with_too_few_edges_is_empty() {
        assert!(histogram(&[1.0], &[0.0]).is_empty());
    }
}
