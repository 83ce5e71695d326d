//! Formatted terminal output for selection summaries.
//!
//! Formatting stays in one place so:
//! - the selection/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{FitMode, Summary};

/// Render a selection summary as human-readable text.
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str("=== event list selection ===\n");
    out.push_str(&format!(
        "Active selections: {}\n",
        fmt_intervals(&summary.active_intervals)
    ));
    out.push_str(&format!("Active exposure: {:.5}\n", summary.exposure));
    out.push_str(&format!("Active dead time: {:.5}\n", summary.dead_time));
    out.push_str(&format!("Total n. events: {}\n", summary.total_events));
    out.push_str(&format!("Active counts: {}\n", summary.active_counts));
    out.push_str(&format!("Number of channels: {}\n", summary.n_channels));

    if let Some(background) = &summary.background {
        out.push_str("\nBackground fit:\n");
        out.push_str(&format!(
            "- selections: {}\n",
            fmt_intervals(&background.intervals)
        ));
        out.push_str(&format!("- polynomial grade: {}\n", background.grade));
        out.push_str(&format!(
            "- mode: {}\n",
            match background.mode {
                FitMode::Binned => "binned",
                FitMode::Unbinned => "unbinned",
            }
        ));
        out.push_str(&format!(
            "- predicted counts: {:.3} +/- {:.3}\n",
            background.predicted_counts, background.predicted_count_error
        ));
        if let Some(sigma) = background.significance {
            out.push_str(&format!("- Li & Ma significance: {sigma:.2}\n"));
        }
    }

    out
}

fn fmt_intervals(intervals: &[(f64, f64)]) -> String {
    intervals
        .iter()
        .map(|(a, b)| format!("{a:.5}-{b:.5}"))
        .collect::<Vec<_>>()
        .join(", ")
}
