//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (snapshot-style tests below)

use crate::domain::{Analysis, IntersectReason, PairDecision, SeriesAnalysis};

/// Format the run summary: dataset stats, per-series table and pair decision.
pub fn format_analysis_summary(title: &str, analysis: &Analysis) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== vc - {title} ===\n"));
    match x_range(&analysis.x) {
        Some((lo, hi)) => out.push_str(&format!(
            "Points: n={} | x=[{lo:.4}, {hi:.4}] | series={}\n",
            analysis.x.len(),
            analysis.series.len()
        )),
        None => out.push_str(&format!("Points: n=0 | series={}\n", analysis.series.len())),
    }

    out.push('\n');
    out.push_str(&format_series_table(&analysis.series));
    out.push('\n');
    out.push_str(&format_decision(analysis));

    out
}

fn format_series_table(rows: &[SeriesAnalysis]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<20} {:>6} {:<8} {:>12} {:>10} {:>8}\n",
            "series", "n", "class", "slope", "R²", "inliers"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<20} {:-<6} {:-<8} {:-<12} {:-<10} {:-<8}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for s in rows {
        let class = if s.fit.is_straight { "straight" } else { "curved" };
        let inliers = s
            .fit
            .inlier_ratio
            .map(|r| format!("{r:.2}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(
            format!(
                "{:<20} {:>6} {:<8} {:>12.4} {:>10.4} {:>8}\n",
                truncate(&s.name, 20),
                s.data.len(),
                class,
                s.slope,
                s.r_squared,
                inliers,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn format_decision(analysis: &Analysis) -> String {
    let Some(decision) = analysis.decision else {
        return format!(
            "Intersection: not evaluated ({} series; needs exactly 2)\n",
            analysis.series.len()
        );
    };

    let mut out = String::new();
    match decision {
        PairDecision::ShowSlopes => {
            out.push_str("Decision: both straight, no crossing\n");
            let slopes: Vec<String> = analysis
                .series
                .iter()
                .map(|s| format!("{}={:.4}", s.name, s.slope))
                .collect();
            out.push_str(&format!("Slopes: {}\n", slopes.join(", ")));
        }
        PairDecision::Intersect(reason) => {
            out.push_str(&format!("Decision: intersect ({})\n", reason_label(reason)));
            match analysis.intersection {
                Some(hit) => out.push_str(&format!(
                    "Intersection: time={:.4} voltage={:.4}\n",
                    hit.time, hit.voltage
                )),
                None => out.push_str("Intersection: none found\n"),
            }
        }
    }
    out
}

fn reason_label(reason: IntersectReason) -> &'static str {
    match reason {
        IntersectReason::BothStraightCrossing => "straight lines cross",
        IntersectReason::FirstCurved => "first series curved",
        IntersectReason::SecondCurved => "second series curved",
        IntersectReason::BothCurved => "both series curved",
    }
}

fn x_range(xs: &[f64]) -> Option<(f64, f64)> {
    let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
