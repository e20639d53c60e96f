//! Containment filtering and final ranking.

use crate::detection::{Candidate, ScoredCandidate};
use crate::document::DocumentQuery;

/// Drop every candidate that lies inside another candidate's element.
///
/// Only topmost candidates survive, in their original order. Quadratic in
/// the number of candidates, which stays small after validation.
pub fn filter_nested(doc: &dyn DocumentQuery, candidates: Vec<Candidate>) -> Vec<Candidate> {
    let nested: Vec<bool> = candidates
        .iter()
        .map(|inner| {
            candidates.iter().any(|outer| {
                outer.handle != inner.handle && doc.contains(outer.handle, inner.handle)
            })
        })
        .collect();

    candidates
        .into_iter()
        .zip(nested)
        .filter_map(|(candidate, is_nested)| (!is_nested).then_some(candidate))
        .collect()
}

/// Sort by descending score, keeping input order for ties.
pub fn rank(scored: &mut [ScoredCandidate]) {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
}
