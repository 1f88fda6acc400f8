//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the scoring/calibration code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{CalibrationResult, DatasetStats, ScoreRow};
use crate::fit::{GradientCheck, ScoreProfile};

/// Dataset header shared by every subcommand.
pub fn format_dataset_summary(source: &str, stats: &DatasetStats, row_errors: usize) -> String {
    let mut out = String::new();
    out.push_str("=== cexp - censored Exponential scores ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: n={} | events={} | censored={} ({:.1}%)\n",
        stats.n_rows,
        stats.n_events,
        stats.n_censored,
        100.0 * stats.censored_fraction()
    ));
    out.push_str(&format!(
        "Time: [{:.4}, {:.4}] | mean={:.4}\n",
        stats.time_min, stats.time_max, stats.time_mean
    ));
    if row_errors > 0 {
        out.push_str(&format!("Skipped rows: {row_errors}\n"));
    }
    out
}

/// Per-row table (first `top` rows) plus the mean score.
pub fn format_score_table(rows: &[ScoreRow], top: usize, total_score: f64) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>6} {:>12} {:>10} {:>12} {:>12} {:>10}",
            "event", "time", "scale", "score", "d_score", "metric"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<6} {:-<12} {:-<10} {:-<12} {:-<12} {:-<10}\n",
        "", "", "", "", "", ""
    ));

    for r in rows.iter().take(top) {
        out.push_str(&format!(
            "{:>6} {:>12.4} {:>10.4} {:>12.6} {:>12.6} {:>10.4}\n",
            r.event, r.time, r.scale, r.score, r.d_score, r.metric
        ));
    }
    if rows.len() > top {
        out.push_str(&format!("... ({} more rows)\n", rows.len() - top));
    }
    out.push_str(&format!("Mean score: {total_score:.6}\n"));
    out
}

pub fn format_gradient_check(check: &GradientCheck, tol: f64) -> String {
    let status = if check.passes(tol) { "PASS" } else { "FAIL" };
    let (analytic, fd) = check.rows.get(check.worst_row).copied().unwrap_or((f64::NAN, f64::NAN));
    format!(
        "{:<9} {status} | ln(scale)={:.4} h={:.1e} | max |d_score - fd|={:.3e} (tol {:.1e}) at row {} [analytic={:.6}, fd={:.6}]\n",
        check.score.display_name(),
        check.log_scale,
        check.step,
        check.max_abs_error,
        tol,
        check.worst_row,
        analytic,
        fd,
    )
}

pub fn format_profile_summary(profile: &ScoreProfile) -> String {
    format!(
        "{} profile: {} points | best scale={:.4} (ln={:.4}) | mean score={:.6}\n",
        profile.score.display_name(),
        profile.points.len(),
        profile.best.scale,
        profile.best.scale.ln(),
        profile.best.total_score,
    )
}

pub fn format_calibration(result: &CalibrationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nCalibration ({}):\n", result.score.display_name()));
    out.push_str(&format!(
        "- initial (fit, censoring ignored): scale={:.6} ln={:.6} mean score={:.6}\n",
        result.initial_scale(),
        result.initial_log_scale,
        result.initial_total_score
    ));
    out.push_str(&format!(
        "- calibrated (natural gradient):    scale={:.6} ln={:.6} mean score={:.6}\n",
        result.scale(),
        result.log_scale,
        result.total_score
    ));
    out.push_str(&format!(
        "- iterations={} converged={}\n",
        result.iterations, result.converged
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScoreKind;

    #[test]
    fn score_table_truncates_and_reports_mean() {
        let row = ScoreRow {
            event: 1.0,
            time: 2.0,
            scale: 1.0,
            score: 2.0,
            d_score: -1.0,
            metric: 1.0,
        };
        let txt = format_score_table(&[row.clone(), row.clone(), row], 2, 2.0);
        assert!(txt.contains("... (1 more rows)"));
        assert!(txt.ends_with("Mean score: 2.000000\n"));
        assert_eq!(txt.lines().count(), 2 + 2 + 2);
    }

    #[test]
    fn calibration_summary_mentions_both_scales() {
        let result = CalibrationResult {
            score: ScoreKind::Log,
            initial_log_scale: 0.0,
            initial_total_score: 1.5,
            log_scale: 2.0_f64.ln(),
            total_score: 1.2,
            iterations: 7,
            converged: true,
        };
        let txt = format_calibration(&result);
        assert!(txt.contains("scale=1.000000"));
        assert!(txt.contains("scale=2.000000"));
        assert!(txt.contains("iterations=7 converged=true"));
    }

    #[test]
    fn dataset_summary_reports_skipped_rows() {
        let stats = DatasetStats {
            n_rows: 4,
            n_events: 3,
            n_censored: 1,
            time_min: 0.5,
            time_max: 4.0,
            time_mean: 2.0,
        };
        let txt = format_dataset_summary("test.csv", &stats, 2);
        assert!(txt.contains("censored=1 (25.0%)"));
        assert!(txt.contains("Skipped rows: 2"));
        assert!(!format_dataset_summary("x", &stats, 0).contains("Skipped"));
    }
}
