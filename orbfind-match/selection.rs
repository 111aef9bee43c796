use orbfind_core::Match;

/// The `k` closest matches, ascending by distance.
///
/// The sort is stable, so equal distances keep their incoming order. `k`
/// larger than the set returns all of it.
pub fn select_top(mut matches: Vec<Match>, k: usize) -> Vec<Match> {
    matches.sort_by_key(|m| m.distance);
    matches.truncate(k);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matches_from(distances: &[u32]) -> Vec<Match> {
        distances
            .iter()
            .enumerate()
            .map(|(i, &distance)| Match {
                query_idx: i,
                train_idx: i % 3,
                distance,
            })
            .collect()
    }

    #[test]
    fn test_zero_selects_nothing() {
        assert!(select_top(matches_from(&[3, 1, 2]), 0).is_empty());
    }

    #[test]
    fn test_oversized_k_returns_all() {
        let distances: Vec<u32> = (0..40).map(|i| (i * 7) % 13).collect();
        let top = select_top(matches_from(&distances), 1000);
        assert_eq!(top.len(), 40);
        for pair in top.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_ties_keep_query_order() {
        let top = select_top(matches_from(&[5, 2, 5, 2, 0]), 4);
        let order: Vec<usize> = top.iter().map(|m| m.query_idx).collect();
        assert_eq!(order, vec![4, 1, 3, 0]);
    }

    proptest! {
        #[test]
        fn smaller_k_is_prefix(distances in proptest::collection::vec(0u32..16, 0..64), k in 0usize..80, shrink in 0usize..80) {
            let matches = matches_from(&distances);
            let top = select_top(matches.clone(), k);
            prop_assert_eq!(top.len(), k.min(matches.len()));

            let k2 = k.min(shrink);
            let again = select_top(matches, k2);
            prop_assert_eq!(&again[..], &top[..k2.min(top.len())]);

            for pair in top.windows(2) {
                prop_assert!(pair[0].distance <= pair[1].distance);
                if pair[0].distance == pair[1].distance {
                    prop_assert!(pair[0].query_idx < pair[1].query_idx);
                }
            }
        }
    }
}
