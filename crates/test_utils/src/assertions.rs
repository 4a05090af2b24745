//! Custom Test Assertions

use domain_journal::Entry;
use domain_progress::ProgressReport;

/// Asserts an optional win rate within a small tolerance
pub fn assert_win_rate(actual: Option<f64>, expected: Option<f64>) {
    match (actual, expected) {
        (Some(a), Some(e)) => assert!((a - e).abs() < 1e-9, "win rate {} != {}", a, e),
        (None, None) => {}
        _ => panic!("win rate {:?} != {:?}", actual, expected),
    }
}

/// Asserts that the entry carries nothing private
pub fn assert_redacted(entry: &Entry) {
    assert!(entry.private_notes.is_none(), "private notes leaked for {}", entry.id);
}

/// Asserts the timeline ordering (date, then kind)
pub fn assert_timeline_sorted(report: &ProgressReport) {
    for pair in report.timeline.windows(2) {
        assert!(
            (pair[0].date, pair[0].kind) <= (pair[1].date, pair[1].kind),
            "timeline out of order: {:?} before {:?}",
            pair[0],
            pair[1]
        );
    }
}
