/// Interactive binary-insertion ranking engine.
///
/// Pure state machine: no IO, no threads, no waiting. The caller shows each
/// `ComparisonRequest` to whoever decides, then feeds the answer back through
/// `record_decision()`. All calls must be serialized by the caller.
///
/// The engine trusts the oracle. Contradictory answers are accepted silently
/// and simply produce a ranking that may violate global transitivity.
use crate::error::{RankError, Result};
use crate::progress::{Progress, estimate_progress};
use crate::reorder::{moved, permute_by_ids};
use crate::types::{ComparisonRequest, EngineState, Item, SearchWindow, Step};

#[derive(Debug, Clone)]
pub struct RankingEngine {
    /// Seeded queue. Never reordered; consumed front to back via `current_index`.
    queue: Vec<Item>,
    /// Ranking built so far, index 0 = best.
    ranking: Vec<Item>,
    /// Queue index of the item being inserted (or next to be inserted).
    current_index: usize,
    /// Active bracket. `Some` exactly when the state is `Comparing`.
    window: Option<SearchWindow>,
    state: EngineState,
    /// Decisions recorded over the whole tournament.
    comparisons_made: usize,
    /// Decisions recorded for the current candidate since its search last (re)started.
    candidate_comparisons: usize,
}

impl RankingEngine {
    /// Build an engine over an already-seeded queue.
    ///
    /// The first queued item becomes the sole ranked item with no comparison.
    /// An empty or single-item queue is `Complete` immediately.
    pub fn new(queue: Vec<Item>) -> Self {
        let ranking: Vec<Item> = queue.first().cloned().into_iter().collect();
        let current_index = ranking.len();
        let state = if current_index >= queue.len() {
            EngineState::Complete
        } else {
            EngineState::Seeded
        };

        tracing::debug!(items = queue.len(), ?state, "ranking engine created");

        RankingEngine {
            queue,
            ranking,
            current_index,
            window: None,
            state,
            comparisons_made: 0,
            candidate_comparisons: 0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == EngineState::Complete
    }

    /// Ranking so far, best first.
    pub fn ranking(&self) -> &[Item] {
        &self.ranking
    }

    pub fn queue(&self) -> &[Item] {
        &self.queue
    }

    /// Item currently being (or about to be) inserted.
    pub fn current_candidate(&self) -> Option<&Item> {
        match self.state {
            EngineState::Complete => None,
            _ => self.queue.get(self.current_index),
        }
    }

    pub fn window(&self) -> Option<SearchWindow> {
        self.window
    }

    pub fn comparisons_made(&self) -> usize {
        self.comparisons_made
    }

    /// Decisions spent on the current candidate since its search (re)started.
    pub fn candidate_comparisons(&self) -> usize {
        self.candidate_comparisons
    }

    /// The outstanding comparison, if one is pending.
    pub fn pending(&self) -> Option<ComparisonRequest> {
        self.window.map(|w| self.request_at(w.mid()))
    }

    pub fn progress(&self) -> Progress {
        estimate_progress(self.queue.len(), self.ranking.len(), self.window)
    }

    /// Consume the engine and return the ranking, best first.
    pub fn into_ranking(self) -> Vec<Item> {
        self.ranking
    }

    /// Open a fresh search window `{0, len}` for the current candidate and
    /// return the first comparison.
    pub fn start_insertion(&mut self) -> Result<ComparisonRequest> {
        match self.state {
            EngineState::Comparing => return Err(RankError::AlreadyComparing),
            EngineState::Complete => return Err(RankError::TournamentComplete),
            EngineState::Seeded => {}
        }
        Ok(self.open_window())
    }

    /// Apply one oracle answer for the pending comparison.
    ///
    /// `candidate_wins` means the item being inserted ranks above the opponent.
    pub fn record_decision(&mut self, candidate_wins: bool) -> Result<Step> {
        let mut window = match (self.state, self.window) {
            (EngineState::Comparing, Some(w)) => w,
            (EngineState::Complete, _) => return Err(RankError::TournamentComplete),
            _ => return Err(RankError::NoPendingComparison),
        };

        self.comparisons_made += 1;
        self.candidate_comparisons += 1;

        let mid = window.mid();
        tracing::debug!(
            candidate = self.queue[self.current_index].id,
            opponent = self.ranking[mid].id,
            candidate_wins,
            low = window.low,
            high = window.high,
            "decision recorded"
        );

        if candidate_wins {
            if mid == 0 {
                return Ok(self.insert_candidate(0));
            }
            window.high = mid;
        } else {
            if mid == self.ranking.len() - 1 {
                return Ok(self.insert_candidate(self.ranking.len()));
            }
            window.low = mid + 1;
        }

        if window.is_collapsed() {
            return Ok(self.insert_candidate(window.low));
        }

        self.window = Some(window);
        Ok(Step::Compare(self.request_at(window.mid())))
    }

    // -----------------------------------------------------------------------
    // Manual override
    // -----------------------------------------------------------------------

    /// Replace the ranking with a permutation of itself.
    ///
    /// Rejected orders leave the ranking untouched. An active search window
    /// refers to positions in the old order, so it is discarded: the engine
    /// drops back to `Seeded` and the next `start_insertion()` restarts the
    /// current candidate against the edited ranking.
    ///
    /// Only the IDs of `new_order` are used; the ranked items themselves are
    /// kept, so edited copies cannot replace them.
    pub fn reorder(&mut self, new_order: &[Item]) -> Result<()> {
        let ids: Vec<i64> = new_order.iter().map(|item| item.id).collect();
        self.reorder_by_ids(&ids)
    }

    /// `reorder()` by item IDs.
    pub fn reorder_by_ids(&mut self, ids: &[i64]) -> Result<()> {
        let new_order = permute_by_ids(&self.ranking, ids)?;
        self.apply_order(new_order);
        Ok(())
    }

    /// Move the ranked item at `from` so it ends up at `to` (0-based).
    pub fn move_element(&mut self, from: usize, to: usize) -> Result<()> {
        let new_order = moved(&self.ranking, from, to)?;
        self.apply_order(new_order);
        Ok(())
    }

    /// Swap the item at `index` with the one above it. No-op at the top.
    pub fn move_up(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if index == 0 {
            return Ok(());
        }
        self.move_element(index, index - 1)
    }

    /// Swap the item at `index` with the one below it. No-op at the bottom.
    pub fn move_down(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if index + 1 == self.ranking.len() {
            return Ok(());
        }
        self.move_element(index, index + 1)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.ranking.len() {
            return Err(RankError::IndexOutOfRange {
                index,
                len: self.ranking.len(),
            });
        }
        Ok(())
    }

    fn apply_order(&mut self, new_order: Vec<Item>) {
        self.ranking = new_order;
        if self.state == EngineState::Comparing {
            tracing::debug!(
                candidate = self.queue[self.current_index].id,
                discarded = ?self.window,
                "ranking edited mid-search; window discarded"
            );
            self.window = None;
            self.candidate_comparisons = 0;
            self.state = EngineState::Seeded;
        }
    }

    fn open_window(&mut self) -> ComparisonRequest {
        let window = SearchWindow::full(self.ranking.len());
        self.window = Some(window);
        self.candidate_comparisons = 0;
        self.state = EngineState::Comparing;
        self.request_at(window.mid())
    }

    fn request_at(&self, opponent_rank: usize) -> ComparisonRequest {
        ComparisonRequest {
            candidate: self.queue[self.current_index].clone(),
            opponent: self.ranking[opponent_rank].clone(),
            opponent_rank,
        }
    }

    /// Place the current candidate at `position`, then either open the next
    /// candidate's window or finish.
    fn insert_candidate(&mut self, position: usize) -> Step {
        let item = self.queue[self.current_index].clone();
        let item_id = item.id;
        self.ranking.insert(position, item);
        self.current_index += 1;
        self.window = None;

        tracing::debug!(
            item = item_id,
            position,
            comparisons = self.candidate_comparisons,
            "candidate inserted"
        );

        let next = if self.current_index < self.queue.len() {
            Some(self.open_window())
        } else {
            self.state = EngineState::Complete;
            self.candidate_comparisons = 0;
            tracing::info!(
                items = self.ranking.len(),
                comparisons = self.comparisons_made,
                "tournament complete"
            );
            None
        };

        Step::Inserted { item_id, position, next }
    }
}
