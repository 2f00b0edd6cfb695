//! The ranking routine.
//!
//! Results are ordered ascending by completion time. Ties keep the order
//! in which the results were inserted, because `sort_by_key` is a stable
//! sort and new results are always appended before sorting. After every
//! change the rank of each entry is its 1-based position, so ranks are
//! always exactly `1..=N` with no gaps or repeats.

use qrquest_protocol::{GameResult, PlayerId};

/// Appends `entry` and re-ranks the whole set.
pub fn insert_ranked(results: &mut Vec<GameResult>, entry: GameResult) {
    results.push(entry);
    rerank(results);
}

/// Sorts by completion time (stable) and rewrites every rank.
pub fn rerank(results: &mut [GameResult]) {
    results.sort_by_key(|r| r.completion_time);
    for (i, result) in results.iter_mut().enumerate() {
        result.rank = u32::try_from(i + 1).unwrap_or(u32::MAX);
    }
}

/// The best-ranked entry for `player_id`, if any.
pub fn find<'a>(results: &'a [GameResult], player_id: &PlayerId) -> Option<&'a GameResult> {
    results.iter().find(|r| &r.player_id == player_id)
}

/// The first `n` entries (fewer if the set is smaller).
pub fn top(results: &[GameResult], n: usize) -> &[GameResult] {
    &results[..n.min(results.len())]
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn result(id: &str, completion_time: u64) -> GameResult {
        GameResult {
            player_id: PlayerId::from(id),
            name: id.to_uppercase(),
            family_name: "Test".into(),
            completion_time,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            rank: 0,
        }
    }

    fn ids(results: &[GameResult]) -> Vec<&str> {
        results.iter().map(|r| r.player_id.as_str()).collect()
    }

    fn ranks(results: &[GameResult]) -> Vec<u32> {
        results.iter().map(|r| r.rank).collect()
    }

    #[test]
    fn test_insert_ranked_orders_by_completion_time() {
        let mut results = Vec::new();
        insert_ranked(&mut results, result("slow", 300));
        insert_ranked(&mut results, result("fast", 100));
        insert_ranked(&mut results, result("mid", 200));

        assert_eq!(ids(&results), vec!["fast", "mid", "slow"]);
        assert_eq!(ranks(&results), vec![1, 2, 3]);
    }

    #[test]
    fn test_insert_ranked_ties_keep_insertion_order() {
        let mut results = Vec::new();
        insert_ranked(&mut results, result("first", 100));
        insert_ranked(&mut results, result("other", 50));
        insert_ranked(&mut results, result("second", 100));

        assert_eq!(ids(&results), vec!["other", "first", "second"]);
        assert_eq!(ranks(&results), vec![1, 2, 3]);
    }

    #[test]
    fn test_rerank_ranks_are_dense_after_many_inserts() {
        let mut results = Vec::new();
        for (i, t) in [500, 20, 20, 999, 0, 300, 20].into_iter().enumerate() {
            insert_ranked(&mut results, result(&format!("p{i}"), t));
        }

        let expected: Vec<u32> = (1..=7).collect();
        assert_eq!(ranks(&results), expected);
        assert!(results.windows(2).all(|w| w[0].completion_time <= w[1].completion_time));
    }

    #[test]
    fn test_rerank_repairs_hand_edited_ranks() {
        let mut results = vec![result("b", 20), result("a", 10)];
        results[0].rank = 7;
        results[1].rank = 7;

        rerank(&mut results);

        assert_eq!(ids(&results), vec!["a", "b"]);
        assert_eq!(ranks(&results), vec![1, 2]);
    }

    #[test]
    fn test_find_returns_best_ranked_duplicate() {
        let mut results = Vec::new();
        insert_ranked(&mut results, result("p1", 300));
        insert_ranked(&mut results, result("p1", 100));

        let found = find(&results, &PlayerId::from("p1")).unwrap();
        assert_eq!(found.completion_time, 100);
        assert_eq!(found.rank, 1);
    }

    #[test]
    fn test_find_unknown_returns_none() {
        let results = vec![result("p1", 1)];
        assert!(find(&results, &PlayerId::from("p2")).is_none());
    }

    #[test]
    fn test_top_caps_at_n() {
        let mut results = Vec::new();
        for i in 0..15 {
            insert_ranked(&mut results, result(&format!("p{i}"), i));
        }

        assert_eq!(top(&results, 10).len(), 10);
        assert_eq!(top(&results, 10)[9].rank, 10);
    }

    #[test]
    fn test_top_smaller_set_returns_all() {
        let results = vec![result("p1", 1), result("p2", 2)];
        assert_eq!(top(&results, 10).len(), 2);
        assert!(top(&[], 10).is_empty());
    }
}
