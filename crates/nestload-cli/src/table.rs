//! Plain-text rendering of reports.

use nestload::harness::{Check, Outcome, Report, Verdict};
use std::fmt::Write;

const STRATEGY_WIDTH: usize = 14;

pub(crate) fn report(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<STRATEGY_WIDTH$} {:>6} {:>6} {:>9} {:>7} {:>12} {:>12} {:>12} {:>12} {:>9}",
        "strategy",
        "blogs",
        "posts",
        "comments",
        "owners",
        "mean (us)",
        "min (us)",
        "max (us)",
        "alloc (B)",
        "entities",
    );

    for entry in &report.entries {
        let params = &entry.params;
        let _ = write!(
            out,
            "{:<STRATEGY_WIDTH$} {:>6} {:>6} {:>9} {:>7}",
            entry.strategy,
            params.blog_count,
            params.posts_per_blog,
            params.comments_per_post,
            params.owner_count,
        );

        let _ = match &entry.outcome {
            Outcome::Measured(m) => writeln!(
                out,
                " {:>12.1} {:>12.1} {:>12.1} {:>12} {:>9}",
                micros(m.mean),
                micros(m.min),
                micros(m.max),
                m.allocated_bytes
                    .map_or_else(|| "-".to_string(), |bytes| bytes.to_string()),
                m.entities,
            ),
            Outcome::Failed { error } => writeln!(out, "  failed: {error}"),
        };
    }

    out
}

pub(crate) fn checks(checks: &[Check]) -> String {
    let mut out = String::new();

    for check in checks {
        let _ = write!(out, "{:<STRATEGY_WIDTH$} {}", check.strategy, check.params);
        let _ = match &check.verdict {
            Verdict::Match => writeln!(out, "  ok"),
            Verdict::Mismatch { detail } => writeln!(out, "  MISMATCH: {detail}"),
            Verdict::Failed { error } => writeln!(out, "  FAILED: {error}"),
        };
    }

    let passed = checks.iter().filter(|check| check.passed()).count();
    let _ = writeln!(out, "{passed}/{} checks passed", checks.len());

    out
}

fn micros(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1e6
}
