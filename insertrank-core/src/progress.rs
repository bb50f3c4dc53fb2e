/// Remaining-work estimate for a tournament.
///
/// Assumes worst-case binary-search depth at every step, so it is an estimate
/// rather than a bound for arbitrary oracle behavior.
use std::fmt;

use crate::types::SearchWindow;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    /// Items already in the ranking.
    pub inserted: usize,
    /// Items in the seeded queue.
    pub total: usize,
    pub remaining_items: usize,
    /// 0.0 to 100.0. Zero when there is nothing to rank.
    pub percent_complete: f64,
    pub estimated_remaining_comparisons: usize,
}

/// `ceil(log2(n))`, with 0 for `n <= 1`.
pub fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

/// Estimate progress from queue length, ranking length and the active window.
///
/// The current candidate is counted in both the window term and the later
/// term, matching the worst case for a search that restarts from scratch.
pub fn estimate_progress(total: usize, inserted: usize, window: Option<SearchWindow>) -> Progress {
    let remaining_items = total.saturating_sub(inserted);

    let current_estimate = match window {
        Some(w) if w.span() > 0 => ceil_log2(w.span()),
        _ => 0,
    };

    let later_estimate: usize = (0..remaining_items)
        .map(|i| ceil_log2(inserted + i + 1))
        .sum();

    let percent_complete = if total > 0 {
        inserted as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    Progress {
        inserted,
        total,
        remaining_items,
        percent_complete,
        estimated_remaining_comparisons: current_estimate + later_estimate,
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Inserted {} of {}. Remaining: {} items ({:.1}% complete).\n\
             Total estimated comparisons remaining: {}.",
            self.inserted,
            self.total,
            self.remaining_items,
            self.percent_complete,
            self.estimated_remaining_comparisons,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_log2() {
        let expected = [(0, 0), (1, 0), (2, 1), (3, 2), (4, 2), (5, 3), (8, 3), (9, 4), (1024, 10)];
        for (n, want) in expected {
            assert_eq!(ceil_log2(n), want, "ceil_log2({n})");
        }
    }

    #[test]
    fn test_fresh_tournament_estimate() {
        // 5 items, 1 seeded, window over a 1-item ranking: span 2 → 1,
        // later: log2 of 2,3,4,5 → 1+2+2+3.
        let p = estimate_progress(5, 1, Some(SearchWindow::full(1)));
        assert_eq!(p.remaining_items, 4);
        assert_eq!(p.estimated_remaining_comparisons, 1 + 8);
        assert!((p.percent_complete - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_complete_estimate_is_zero() {
        let p = estimate_progress(3, 3, None);
        assert_eq!(p.remaining_items, 0);
        assert_eq!(p.estimated_remaining_comparisons, 0);
        assert_eq!(p.percent_complete, 100.0);
    }

    #[test]
    fn test_empty_tournament() {
        let p = estimate_progress(0, 0, None);
        assert_eq!(p.percent_complete, 0.0);
        assert_eq!(p.estimated_remaining_comparisons, 0);
    }

    #[test]
    fn test_idempotent() {
        let w = Some(SearchWindow { low: 2, high: 5 });
        assert_eq!(estimate_progress(10, 6, w), estimate_progress(10, 6, w));
    }

    #[test]
    fn test_display() {
        let p = estimate_progress(4, 1, Some(SearchWindow::full(1)));
        assert_eq!(
            p.to_string(),
            "Inserted 1 of 4. Remaining: 3 items (25.0% complete).\n\
             Total estimated comparisons remaining: 6."
        );
    }
}
