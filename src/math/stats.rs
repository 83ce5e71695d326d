//! Significance statistics for the selection summary.

/// Li & Ma (1983, eq. 17) significance of an on-source count against an
/// off-source (background) count, with on/off exposure ratio `alpha`.
///
/// Here the "off" count is the background model's predicted count over the
/// active selection, so `alpha = 1`. Returns `None` when either count is
/// non-positive (the logarithms are undefined there). The sign follows the
/// excess: negative when the observed count falls below the background.
pub fn li_ma_significance(n_on: f64, n_off: f64, alpha: f64) -> Option<f64> {
    if n_on <= 0.0 || n_off <= 0.0 || alpha <= 0.0 {
        return None;
    }

    let total = n_on + n_off;
    let term_on = n_on * ((1.0 + alpha) / alpha * n_on / total).ln();
    let term_off = n_off * ((1.0 + alpha) * n_off / total).ln();
    let s = (2.0 * (term_on + term_off)).max(0.0).sqrt();

    Some(if n_on >= alpha * n_off { s } else { -s })
}
