//! Aggregate batch report artifacts.
//!
//! [`BatchSummary`] is the machine-readable outcome of a run
//! (per-fixture failures plus aggregate stats); [`render_text`]
//! produces the human-readable form for terminal and CI output.
//!
//! [`render_text`]: BatchSummary::render_text

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::batch::FailureReport;

/// Aggregate results for an entire batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// When the report was generated.
    pub run_at: DateTime<Utc>,

    /// Number of fixtures in the batch.
    pub total: usize,

    /// Number of fixtures that passed.
    pub passed: usize,

    /// Number of fixtures that failed.
    pub failed: usize,

    /// `passed / total`; an empty batch trivially passes with rate 1.0.
    pub pass_rate: f32,

    /// Per-fixture failures, sorted ascending by index.
    pub failures: Vec<FailureReport>,
}

impl BatchSummary {
    /// Build a summary from the failure list of a run over `total`
    /// fixtures.
    pub fn from_failures(total: usize, failures: Vec<FailureReport>) -> Self {
        let failed = failures.len();
        let passed = total.saturating_sub(failed);
        let pass_rate = if total == 0 {
            1.0
        } else {
            passed as f32 / total as f32
        };

        Self {
            run_at: Utc::now(),
            total,
            passed,
            failed,
            pass_rate,
            failures,
        }
    }

    /// Whether every fixture in the batch passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Render the summary as plain text, one block per failed fixture.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "{}/{} fixtures passed ({:.1}%)\n",
            self.passed,
            self.total,
            self.pass_rate * 100.0
        );
        for failure in &self.failures {
            let _ = writeln!(out, "fixture {}:", failure.index);
            for line in failure.message.lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let failures = vec![FailureReport {
            index: 1,
            message: "expected intent 'Help', actual 'Other'".to_string(),
        }];
        let summary = BatchSummary::from_failures(3, failures);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_empty_batch_trivially_passes() {
        let summary = BatchSummary::from_failures(0, Vec::new());
        assert!(summary.all_passed());
        assert_eq!(summary.pass_rate, 1.0);
    }

    #[test]
    fn test_render_text_lists_each_failure_line() {
        let failures = vec![FailureReport {
            index: 2,
            message: "first problem\nsecond problem".to_string(),
        }];
        let summary = BatchSummary::from_failures(4, failures);
        let text = summary.render_text();
        assert!(text.contains("3/4 fixtures passed"));
        assert!(text.contains("fixture 2:"));
        assert!(text.contains("  first problem"));
        assert!(text.contains("  second problem"));
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let summary = BatchSummary::from_failures(1, Vec::new());
        let json = serde_json::to_string(&summary).expect("serialize");
        assert!(json.contains("\"pass_rate\""));
    }
}
