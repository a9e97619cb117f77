//! Score-and-sort ranking of embedded candidates against a query.

use crate::models::{Document, Embedding, ScoredCandidate, SkippedDocument};
use crate::similarity;
use tracing::warn;

/// Scores within this distance are considered tied and keep corpus order.
const TIE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Default)]
pub struct Ranking {
    /// At most k candidates, best first.
    pub top: Vec<ScoredCandidate>,
    /// Candidates whose score could not be computed (provider anomaly).
    pub unscored: Vec<SkippedDocument>,
}

/// Rank `candidates` against `query` and keep the best `k`.
///
/// Sorting is stable with a small tie tolerance, so equal-scoring candidates
/// retain their corpus order and repeated runs over unchanged inputs produce
/// identical output. `k` larger than the candidate count returns everything;
/// an empty candidate list is a valid input, not an error.
pub fn rank(query: &Embedding, candidates: Vec<(Document, Embedding)>, k: usize) -> Ranking {
    let mut scored = Vec::with_capacity(candidates.len());
    let mut unscored = Vec::new();

    for (document, embedding) in candidates {
        match similarity::cosine(query, &embedding) {
            Ok(score) => scored.push(ScoredCandidate { document, score }),
            Err(e) => {
                warn!(index = document.index, error = %e, "candidate could not be scored");
                unscored.push(SkippedDocument {
                    document,
                    reason: e.to_string(),
                });
            }
        }
    }

    scored.sort_by(|a, b| {
        if (a.score - b.score).abs() <= TIE_TOLERANCE {
            std::cmp::Ordering::Equal
        } else {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    });
    scored.truncate(k);

    Ranking {
        top: scored,
        unscored,
    }
}
