//! Grade letter codes
//!
//! Grade letters (E, C, A, S, G, X, Z, ...) are stored as one contiguous
//! ASCII run somewhere between a table's rank field and the field after it.
//! There is no offset for the run, so it is found by pattern.

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use tracing::{debug, warn};

use crate::bytes;
use crate::heuristic::{best_of, CandidateRanking};

/// Minimum run length considered a grade column
pub const MIN_RUN: usize = 100;

/// Grade used when no run is found
pub const UNKNOWN_GRADE: &str = "?";

static UPPERCASE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("[A-Z]{{{MIN_RUN},}}")).expect("valid grade run pattern")
});

/// Runs at least `rows` long, closest to `rows` first
#[derive(Debug, Clone, Copy)]
pub struct ClosestRun {
    pub rows: usize,
}

impl CandidateRanking<&[u8]> for ClosestRun {
    type Key = std::cmp::Reverse<usize>;

    fn key(&self, run: &&[u8]) -> Option<Self::Key> {
        (run.len() >= self.rows).then(|| std::cmp::Reverse(run.len() - self.rows))
    }
}

/// Normalize a stored grade letter (`Z` is shown as `H`)
pub fn normalize_grade(letter: char) -> char {
    match letter {
        'Z' => 'H',
        other => other,
    }
}

/// Scan `data[start..end)` for the grade run of a `rows`-row table
pub fn scan_grade_codes(data: &[u8], start: usize, end: usize, rows: usize) -> Vec<String> {
    scan_grade_codes_with(data, start, end, rows, &ClosestRun { rows })
}

/// Grade scan with an injected run ranking
///
/// Returns exactly `rows` codes; `"?"` for every row when no run qualifies.
pub fn scan_grade_codes_with<R>(
    data: &[u8],
    start: usize,
    end: usize,
    rows: usize,
    ranking: &R,
) -> Vec<String>
where
    R: for<'b> CandidateRanking<&'b [u8]> + ?Sized,
{
    let region = bytes::clamped(data, start, end);
    let runs = UPPERCASE_RUN.find_iter(region).map(|m| m.as_bytes());

    let Some(run) = best_of(runs, ranking) else {
        warn!(start, end, rows, "No grade run found, using '?'");
        return vec![UNKNOWN_GRADE.to_string(); rows];
    };

    debug!(start, run_len = run.len(), rows, "Found grade run");
    let mut codes: Vec<String> = run
        .iter()
        .take(rows)
        .map(|&b| normalize_grade(b as char).to_string())
        .collect();
    // A custom ranking may accept a short run
    codes.resize(rows, UNKNOWN_GRADE.to_string());
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(parts: &[&[u8]]) -> Vec<u8> {
        let mut data = Vec::new();
        for part in parts {
            data.extend_from_slice(part);
            data.extend_from_slice(&[0u8, 1, 2]);
        }
        data
    }

    #[test]
    fn test_exact_run() {
        let mut run = vec![b'E'; 119];
        run.push(b'Z');
        let data = region(&[&b"junk"[..], &run[..]]);
        let codes = scan_grade_codes(&data, 0, data.len(), 120);
        assert_eq!(codes.len(), 120);
        assert_eq!(codes[0], "E");
        assert_eq!(codes[119], "H");
    }

    #[test]
    fn test_closest_run_wins() {
        let long = vec![b'A'; 150];
        let close = vec![b'S'; 121];
        let short = vec![b'G'; 110];
        let data = region(&[&long[..], &short[..], &close[..]]);
        let codes = scan_grade_codes(&data, 0, data.len(), 120);
        assert_eq!(codes.len(), 120);
        assert!(codes.iter().all(|c| c == "S"));
    }

    #[test]
    fn test_tie_prefers_earliest() {
        let first = vec![b'C'; 125];
        let second = vec![b'X'; 125];
        let data = region(&[&first[..], &second[..]]);
        let codes = scan_grade_codes(&data, 0, data.len(), 120);
        assert!(codes.iter().all(|c| c == "C"));
    }

    #[test]
    fn test_no_run_gives_unknown() {
        let short = vec![b'S'; 99];
        let data = region(&[&short[..]]);
        let codes = scan_grade_codes(&data, 0, data.len(), 5);
        assert_eq!(codes, vec!["?"; 5]);

        let run = vec![b'S'; 100];
        let data = region(&[&run[..]]);
        assert_eq!(scan_grade_codes(&data, 0, data.len(), 101), vec!["?"; 101]);
    }

    #[test]
    fn test_region_bounds() {
        let run = vec![b'B'; 100];
        let data = region(&[&run[..]]);
        // Region ending mid-run cuts it below the minimum length
        assert_eq!(scan_grade_codes(&data, 0, 50, 10), vec!["?"; 10]);
        // Region past the buffer is clamped
        assert_eq!(scan_grade_codes(&data, 0, 10_000, 100)[99], "B");
    }

    struct AnyRun;

    impl CandidateRanking<&[u8]> for AnyRun {
        type Key = usize;

        fn key(&self, run: &&[u8]) -> Option<usize> {
            Some(run.len())
        }
    }

    #[test]
    fn test_injected_ranking_short_run_padded() {
        let run = vec![b'A'; 100];
        let data = region(&[&run[..]]);
        let codes = scan_grade_codes_with(&data, 0, data.len(), 102, &AnyRun);
        assert_eq!(codes[99], "A");
        assert_eq!(codes[100], "?");
        assert_eq!(codes.len(), 102);
    }
}
