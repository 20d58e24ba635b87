//! Candidate ranking for pattern scans
//!
//! Block discovery and grade-run detection both collect candidates from an
//! undocumented byte region and keep the best one. The ranking is a value
//! passed to the scan so tests can swap it out.

/// Orders candidates found by a heuristic scan
pub trait CandidateRanking<T> {
    type Key: Ord;

    /// Rank a candidate; `None` rejects it
    fn key(&self, candidate: &T) -> Option<Self::Key>;
}

/// Pick the highest-ranked candidate; the earliest one wins ties
pub fn best_of<T, R>(candidates: impl IntoIterator<Item = T>, ranking: &R) -> Option<T>
where
    R: CandidateRanking<T> + ?Sized,
{
    let mut best: Option<(R::Key, T)> = None;
    for candidate in candidates {
        let Some(key) = ranking.key(&candidate) else {
            continue;
        };
        if best.as_ref().map_or(true, |(best_key, _)| key > *best_key) {
            best = Some((key, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Longest;

    impl CandidateRanking<&str> for Longest {
        type Key = usize;

        fn key(&self, candidate: &&str) -> Option<usize> {
            (!candidate.is_empty()).then_some(candidate.len())
        }
    }

    #[test]
    fn test_best_of_picks_max() {
        assert_eq!(best_of(["ab", "abcd", "abc"], &Longest), Some("abcd"));
    }

    #[test]
    fn test_best_of_earliest_wins_ties() {
        assert_eq!(best_of(["xy", "ab", "cd"], &Longest), Some("xy"));
    }

    #[test]
    fn test_best_of_rejects() {
        assert_eq!(best_of(["", ""], &Longest), None);
        assert_eq!(best_of(Vec::<&str>::new(), &Longest), None);
    }
}
