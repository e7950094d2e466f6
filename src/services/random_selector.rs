//! Random reviewer selection.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::participation::dedup_preserving_order;

/// Pick up to `count` distinct reviewers from `available`, skipping `excluded`.
///
/// The eligible reviewers are copied, repeated handles collapsed, and
/// shuffled with an unbiased Fisher-Yates pass driven by `rng`; `available`
/// is left untouched.
pub fn select_random<R: Rng + ?Sized>(
    available: &[String],
    excluded: &[String],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut eligible = dedup_preserving_order(
        available
            .iter()
            .filter(|reviewer| !excluded.contains(reviewer))
            .cloned(),
    );

    eligible.shuffle(rng);
    eligible.truncate(count);
    eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_never_returns_excluded_or_duplicates() {
        let available = names(&["alice", "bob", "carol", "dave", "erin"]);
        let excluded = names(&["bob", "erin"]);

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = select_random(&available, &excluded, 2, &mut rng);

            assert_eq!(picked.len(), 2);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), picked.len());
            for p in &picked {
                assert!(available.contains(p));
                assert!(!excluded.contains(p));
            }
        }
    }

    #[test]
    fn test_repeated_pool_entries_are_drawn_once() {
        let available = names(&["alice", "alice", "bob"]);

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut picked = select_random(&available, &[], 2, &mut rng);
            picked.sort();
            assert_eq!(picked, names(&["alice", "bob"]), "seed {}", seed);
        }
    }

    #[test]
    fn test_count_larger_than_pool() {
        let available = names(&["alice", "bob", "carol"]);
        let mut rng = StdRng::seed_from_u64(7);
        let picked = select_random(&available, &names(&["alice"]), 10, &mut rng);

        let set: HashSet<String> = picked.into_iter().collect();
        let expected: HashSet<String> = names(&["bob", "carol"]).into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_empty_cases() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_random(&[], &[], 3, &mut rng).is_empty());

        let everyone = names(&["alice", "bob"]);
        assert!(select_random(&everyone, &everyone, 2, &mut rng).is_empty());
        assert!(select_random(&everyone, &[], 0, &mut rng).is_empty());
    }

    #[test]
    fn test_input_not_mutated_and_seed_is_reproducible() {
        let available = names(&["alice", "bob", "carol", "dave"]);
        let snapshot = available.clone();

        let first = select_random(&available, &[], 4, &mut StdRng::seed_from_u64(42));
        let second = select_random(&available, &[], 4, &mut StdRng::seed_from_u64(42));

        assert_eq!(available, snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_reviewer_can_be_drawn_first() {
        let available = names(&["alice", "bob", "carol"]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut firsts = HashSet::new();

        for _ in 0..200 {
            let picked = select_random(&available, &[], 1, &mut rng);
            firsts.insert(picked[0].clone());
        }

        assert_eq!(firsts.len(), 3);
    }
}
