use crate::constants::DEFAULT_PRIOR_SCORE;

/// A thing to be ranked.
///
/// Identity is `id`; two items with the same `id` are the same item no matter
/// what the other fields say.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    /// Caller-provided unique ID.
    pub id: i64,
    pub title: String,
    /// Opaque reference to displayable artwork (usually a URL). May be empty.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cover_ref: String,
    /// External prior score used for seeding. `None` counts as `DEFAULT_PRIOR_SCORE`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prior_score: Option<f64>,
}

impl Item {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Item {
            id,
            title: title.into(),
            cover_ref: String::new(),
            prior_score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.prior_score = Some(score);
        self
    }

    pub fn with_cover(mut self, cover_ref: impl Into<String>) -> Self {
        self.cover_ref = cover_ref.into();
        self
    }

    /// Prior score with the default applied.
    pub fn score(&self) -> f64 {
        self.prior_score.unwrap_or(DEFAULT_PRIOR_SCORE)
    }
}

/// Binary-search bracket `[low, high]` (inclusive) of insertion slots still
/// consistent with the current candidate.
///
/// `high` starts at `len(ranking)`, one past the last valid index, because
/// "insert at the end" is itself a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchWindow {
    pub low: usize,
    pub high: usize,
}

impl SearchWindow {
    /// Fresh window over a ranking of `len` items.
    pub fn full(len: usize) -> Self {
        SearchWindow { low: 0, high: len }
    }

    /// Index of the ranked item the candidate is compared against next.
    pub fn mid(&self) -> usize {
        (self.low + self.high) / 2
    }

    /// Number of insertion slots still in play.
    pub fn span(&self) -> usize {
        self.high - self.low + 1
    }

    pub fn is_collapsed(&self) -> bool {
        self.low >= self.high
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineState {
    /// A candidate is waiting, but no search window is active.
    /// Call `start_insertion()` to begin comparing.
    Seeded,
    /// A comparison request is outstanding.
    Comparing,
    /// Every queued item has been inserted.
    Complete,
}

/// One question for the oracle: does `candidate` beat `opponent`?
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonRequest {
    /// The item being inserted.
    pub candidate: Item,
    /// The already-ranked item it is measured against.
    pub opponent: Item,
    /// 0-based position of `opponent` in the current ranking.
    pub opponent_rank: usize,
}

/// Outcome of `RankingEngine::record_decision()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The window narrowed; ask about the same candidate again.
    Compare(ComparisonRequest),
    /// The candidate was placed at `position`. `next` is the first comparison
    /// for the following candidate, or `None` once the tournament is complete.
    Inserted {
        item_id: i64,
        position: usize,
        next: Option<ComparisonRequest>,
    },
}

impl Step {
    /// The request the caller should put to the oracle next, if any.
    pub fn next_request(&self) -> Option<&ComparisonRequest> {
        match self {
            Step::Compare(req) => Some(req),
            Step::Inserted { next, .. } => next.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_score_uses_default() {
        let item = Item::new(1, "Mushishi");
        assert_eq!(item.score(), DEFAULT_PRIOR_SCORE);
        assert_eq!(item.with_score(87.0).score(), 87.0);
    }

    #[test]
    fn test_full_window_spans_end_slot() {
        let w = SearchWindow::full(4);
        assert_eq!(w.mid(), 2);
        assert_eq!(w.span(), 5);
        assert!(!w.is_collapsed());
        assert!(SearchWindow { low: 3, high: 3 }.is_collapsed());
    }
}
