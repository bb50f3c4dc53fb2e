//! insertrank-core: Interactive binary-insertion ranking engine.
//!
//! Seeded queue → one pairwise question at a time → fully ordered ranking.
//! No IO, no terminal, no network. Whoever answers the questions lives outside.
//!
//! Items are identified by caller-provided `i64` IDs. The engine keeps the
//! number of questions at `ceil(log2(k))` for the k-th insertion, so a list of
//! m items costs O(m log m) answers instead of a full round-robin.
//!
//! # Quick start
//!
//! ```rust
//! use insertrank_core::{seed_queue, Item, RankingEngine};
//!
//! let items = vec![
//!     Item::new(1, "Frieren").with_score(90.0),
//!     Item::new(2, "Monster").with_score(90.0),
//!     Item::new(3, "Haikyu!!").with_score(70.0),
//! ];
//!
//! let mut engine = RankingEngine::new(seed_queue(items));
//! let mut request = engine.start_insertion().ok();
//!
//! while let Some(req) = request {
//!     // Ask a human here. This oracle prefers lower IDs.
//!     let candidate_wins = req.candidate.id < req.opponent.id;
//!     let step = engine.record_decision(candidate_wins).unwrap();
//!     request = step.next_request().cloned();
//! }
//!
//! for (rank, item) in engine.ranking().iter().enumerate() {
//!     println!("{}. {}", rank + 1, item.title);
//! }
//! ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod progress;
pub mod reorder;
pub mod seeder;
pub mod types;

// Re-export primary public API at crate root.
pub use engine::RankingEngine;
pub use error::RankError;
pub use progress::{Progress, ceil_log2, estimate_progress};
pub use seeder::{dedup_by_id, seed_queue, seed_queue_with_rng};
pub use types::{ComparisonRequest, EngineState, Item, SearchWindow, Step};
