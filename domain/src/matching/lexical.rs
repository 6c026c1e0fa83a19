//! Lexical scorer: normalized edit-distance similarity between identifiers

use super::Score;
use crate::core::string::normalize_identifier;

/// Similarity of two identifiers in `[0.0, 1.0]`
///
/// Both sides are trimmed and lower-cased, then scored as
/// `1 - levenshtein / max_len` over Unicode scalar values. Two empty strings
/// score 1.0.
pub fn lexical_score(a: &str, b: &str) -> Score {
    let a: Vec<char> = normalize_identifier(a).chars().collect();
    let b: Vec<char> = normalize_identifier(b).chars().collect();
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as Score / max_len as Score
}

/// Levenshtein distance with a two-row table
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
