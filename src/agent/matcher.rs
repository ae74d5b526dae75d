//! Fuzzy question matching
//!
//! Similarity is the gestalt pattern-matching ratio (Ratcliff/Obershelp):
//! `2 * M / T`, where `T` is the combined length of both strings and `M` is the
//! number of characters covered by matching blocks. Matching blocks are found by
//! taking the longest common substring, then recursing on the pieces to its left
//! and right.

use std::collections::HashMap;

/// Default minimum similarity for a FAQ question to count as a match
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.55;

/// Best-scoring candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Position of the candidate in the input order
    pub index: usize,
    /// Similarity in `[0.0, 1.0]`
    pub score: f64,
}

/// Similarity ratio between two strings in `[0.0, 1.0]`
///
/// Case-sensitive and computed over Unicode scalar values. Two empty strings are
/// considered identical.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_characters(&a, &b);
    (2 * matched) as f64 / total as f64
}

/// Pick the most similar candidate at or above `threshold`
///
/// Equal top scores resolve to the earliest candidate.
#[must_use]
pub fn best_match<'a, I>(query: &str, candidates: I, threshold: f64) -> Option<Match>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<Match> = None;

    for (index, candidate) in candidates.into_iter().enumerate() {
        let score = similarity(candidate, query);
        if score < threshold {
            continue;
        }
        // Strictly greater keeps the first occurrence on ties
        if best.is_none_or(|b| score > b.score) {
            best = Some(Match { index, score });
        }
    }

    best
}

/// Total size of all matching blocks between `a` and `b`
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b_index.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &b_index, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        matched += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    matched
}

/// Longest common substring of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`
///
/// Returns `(i, j, size)`. Ties go to the smallest `i`, then the smallest `j`.
fn longest_match(
    a: &[char],
    b_index: &HashMap<char, Vec<usize>>,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0);

    // run_len[j + 1] = length of the match ending at a[i - 1], b[j]
    let mut run_len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(a_hi).skip(a_lo) {
        let mut next_run: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b_index.get(c) {
            for &j in positions {
                if j < b_lo {
                    continue;
                }
                if j >= b_hi {
                    break;
                }
                let size = run_len.get(&j).copied().unwrap_or(0) + 1;
                next_run.insert(j + 1, size);
                if size > best_size {
                    best_i = i + 1 - size;
                    best_j = j + 1 - size;
                    best_size = size;
                }
            }
        }
        run_len = next_run;
    }

    (best_i, best_j, best_size)
}
