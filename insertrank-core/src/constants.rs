/// Prior score assigned to items that arrive without one.
///
/// Unscored items land in the same tie group as items explicitly scored 0,
/// which puts them at the back of the seeded queue for any source that uses
/// positive scores.
pub const DEFAULT_PRIOR_SCORE: f64 = 0.0;
