/// Initial queue ordering.
///
/// Items are grouped by descending prior score. Within a group of equal scores
/// the order is a fresh uniform shuffle on every call: equal priors carry no
/// ordering signal, and retrieval order would otherwise leak into the ranking.
use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::types::Item;

/// Seed a queue using thread-local randomness.
///
/// An empty input yields an empty queue ("nothing to rank"), not an error.
pub fn seed_queue(items: Vec<Item>) -> Vec<Item> {
    let mut rng = rand::rng();
    seed_queue_with_rng(items, &mut rng)
}

/// Seed a queue with a caller-supplied RNG.
pub fn seed_queue_with_rng(items: Vec<Item>, rng: &mut impl Rng) -> Vec<Item> {
    let mut queue = dedup_by_id(items);

    // Stable sort, then shuffle each run of equal scores in place.
    queue.sort_by(|a, b| b.score().total_cmp(&a.score()));

    let mut start = 0;
    while start < queue.len() {
        let score = queue[start].score();
        let mut end = start + 1;
        while end < queue.len() && queue[end].score().total_cmp(&score).is_eq() {
            end += 1;
        }
        queue[start..end].shuffle(rng);
        start = end;
    }

    tracing::debug!(items = queue.len(), "seeded queue");
    queue
}

/// Drop repeated IDs, keeping the first occurrence.
pub fn dedup_by_id(items: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::with_capacity(items.len());
    items.into_iter().filter(|item| seen.insert(item.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scored(id: i64, score: f64) -> Item {
        Item::new(id, format!("item-{id}")).with_score(score)
    }

    #[test]
    fn test_empty_input_gives_empty_queue() {
        assert!(seed_queue(Vec::new()).is_empty());
    }

    #[test]
    fn test_descending_score_groups() {
        let items = vec![scored(1, 70.0), scored(2, 90.0), scored(3, 80.0), scored(4, 90.0)];
        let mut rng = StdRng::seed_from_u64(7);
        let queue = seed_queue_with_rng(items, &mut rng);

        let scores: Vec<f64> = queue.iter().map(Item::score).collect();
        assert_eq!(scores, vec![90.0, 90.0, 80.0, 70.0]);
        assert_eq!(queue[2].id, 3);
        assert_eq!(queue[3].id, 1);
    }

    #[test]
    fn test_missing_score_sorts_as_zero() {
        let items = vec![Item::new(1, "unscored"), scored(2, -1.0), scored(3, 5.0)];
        let queue = seed_queue(items);
        let ids: Vec<i64> = queue.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let items = vec![scored(1, 10.0), scored(2, 20.0), scored(1, 99.0)];
        let queue = seed_queue(items);
        assert_eq!(queue.len(), 2);
        let first = queue.iter().find(|i| i.id == 1).unwrap();
        assert_eq!(first.score(), 10.0);
    }

    #[test]
    fn test_ties_are_shuffled_across_calls() {
        let items: Vec<Item> = (0..8).map(|id| scored(id, 50.0)).collect();
        let first: Vec<i64> = seed_queue(items.clone()).iter().map(|i| i.id).collect();

        // 8! orderings; 50 identical draws in a row would mean no shuffling at all.
        let differs = (0..50).any(|_| {
            let again: Vec<i64> = seed_queue(items.clone()).iter().map(|i| i.id).collect();
            again != first
        });
        assert!(differs, "equal-score items never changed relative order");
    }

    #[test]
    fn test_scenario_two_tied_then_lower() {
        let items = vec![scored(1, 90.0), scored(2, 90.0), scored(3, 70.0)];
        let mut saw_a_first = false;
        let mut saw_b_first = false;
        for _ in 0..200 {
            let queue = seed_queue(items.clone());
            assert_eq!(queue[2].id, 3);
            match queue[0].id {
                1 => saw_a_first = true,
                2 => saw_b_first = true,
                other => panic!("unexpected head {other}"),
            }
        }
        assert!(saw_a_first && saw_b_first);
    }
}
