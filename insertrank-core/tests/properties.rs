use std::collections::HashSet;

use insertrank_core::{EngineState, Item, RankingEngine, SearchWindow, Step, ceil_log2, seed_queue};
use proptest::prelude::*;

fn items(ids: &[i64]) -> Vec<Item> {
    ids.iter().map(|&id| Item::new(id, format!("item-{id}"))).collect()
}

fn ranking_ids(engine: &RankingEngine) -> Vec<i64> {
    engine.ranking().iter().map(|i| i.id).collect()
}

fn permutation(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    (1..=max_len).prop_flat_map(|n| Just((0..n as i64).collect::<Vec<_>>()).prop_shuffle())
}

proptest! {
    #[test]
    fn consistent_oracle_keeps_ranking_sorted(ids in permutation(40)) {
        let mut engine = RankingEngine::new(items(&ids));
        let mut request = engine.start_insertion().ok();
        let mut cost = 0;

        while let Some(req) = request {
            let len_before = engine.ranking().len();
            cost += 1;
            let step = engine.record_decision(req.candidate.id < req.opponent.id).unwrap();
            if let Step::Inserted { .. } = step {
                prop_assert!(cost <= ceil_log2(len_before + 1), "cost {} into {}", cost, len_before);
                let ranked = ranking_ids(&engine);
                prop_assert!(ranked.windows(2).all(|w| w[0] < w[1]), "unsorted: {:?}", ranked);
                cost = 0;
            }
            request = step.next_request().cloned();
        }

        prop_assert_eq!(engine.state(), EngineState::Complete);
        let mut expected = ids.clone();
        expected.sort();
        prop_assert_eq!(ranking_ids(&engine), expected);
    }

    #[test]
    fn arbitrary_answers_never_lose_items(ids in permutation(30), answers in prop::collection::vec(any::<bool>(), 0..200)) {
        let mut engine = RankingEngine::new(items(&ids));
        let mut request = engine.start_insertion().ok();
        let mut answers = answers.into_iter().cycle();
        let mut cost = 0;

        while request.is_some() {
            let len_before = engine.ranking().len();
            let answer = answers.next().unwrap_or(true);
            cost += 1;
            let step = engine.record_decision(answer).unwrap();
            if let Step::Inserted { .. } = step {
                prop_assert_eq!(engine.ranking().len(), len_before + 1);
                prop_assert!(cost <= ceil_log2(len_before + 1));
                cost = 0;
            }
            request = step.next_request().cloned();
        }

        let ranked: HashSet<i64> = ranking_ids(&engine).into_iter().collect();
        let queued: HashSet<i64> = ids.into_iter().collect();
        prop_assert_eq!(ranked, queued);
    }

    #[test]
    fn reorder_then_start_uses_fresh_window(ids in permutation(20), narrowing in 0usize..4, rotate in 0usize..20) {
        prop_assume!(ids.len() >= 3);
        let mut engine = RankingEngine::new(items(&ids));
        let mut req = engine.start_insertion().unwrap();

        // Let the ranking grow, then stop partway into some candidate's search.
        let mut steps = 0;
        while steps < narrowing + ids.len() / 2 {
            let step = engine.record_decision(req.candidate.id < req.opponent.id).unwrap();
            match step.next_request() {
                Some(next) => req = next.clone(),
                None => break,
            }
            steps += 1;
        }
        prop_assume!(engine.state() == EngineState::Comparing);

        let mut order = ranking_ids(&engine);
        let shift = rotate % order.len();
        order.rotate_left(shift);
        engine.reorder_by_ids(&order).unwrap();
        prop_assert_eq!(engine.state(), EngineState::Seeded);

        engine.start_insertion().unwrap();
        prop_assert_eq!(engine.window(), Some(SearchWindow::full(engine.ranking().len())));
    }

    #[test]
    fn seeding_orders_by_descending_score(scores in prop::collection::vec(0u8..5, 0..40)) {
        let input: Vec<Item> = scores
            .iter()
            .enumerate()
            .map(|(id, &s)| Item::new(id as i64, "x").with_score(f64::from(s)))
            .collect();
        let queue = seed_queue(input);

        prop_assert_eq!(queue.len(), scores.len());
        prop_assert!(queue.windows(2).all(|w| w[0].score() >= w[1].score()));
    }

    #[test]
    fn progress_is_idempotent(ids in permutation(25), answers in prop::collection::vec(any::<bool>(), 0..30)) {
        let mut engine = RankingEngine::new(items(&ids));
        let _ = engine.start_insertion();
        for answer in answers {
            if engine.record_decision(answer).is_err() {
                break;
            }
        }
        prop_assert_eq!(engine.progress(), engine.progress());
    }
}
