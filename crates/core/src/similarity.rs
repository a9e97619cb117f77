//! Cosine similarity between tagged embeddings.

use crate::models::Embedding;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SimilarityError {
    #[error("embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("embeddings come from different models: {left} vs {right}")]
    ModelMismatch { left: String, right: String },
    #[error("zero-norm embedding cannot be scored")]
    DegenerateVector,
}

/// Cosine similarity of two embeddings, in [-1, 1].
///
/// Rejects vectors from different models or of different lengths (the usual
/// symptom of model mixing) and zero-norm vectors, which a healthy provider
/// never returns for non-empty text.
pub fn cosine(a: &Embedding, b: &Embedding) -> Result<f64, SimilarityError> {
    if a.model != b.model {
        return Err(SimilarityError::ModelMismatch {
            left: a.model.clone(),
            right: b.model.clone(),
        });
    }
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0f64;
    let mut norm_a = 0f64;
    let mut norm_b = 0f64;
    for (&x, &y) in a.values.iter().zip(&b.values) {
        dot += f64::from(x) * f64::from(y);
        norm_a += f64::from(x) * f64::from(x);
        norm_b += f64::from(y) * f64::from(y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(SimilarityError::DegenerateVector);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// A zero-norm vector is unusable for ranking; see [`cosine`].
pub fn is_degenerate(e: &Embedding) -> bool {
    e.values.iter().all(|&v| v == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emb(values: Vec<f32>) -> Embedding {
        Embedding::new("test-model", values)
    }

    #[test]
    fn identical_vectors_score_one() {
        let a = emb(vec![0.3, -0.2, 0.9]);
        let s = cosine(&a, &a).unwrap();
        assert!((s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn opposite_vectors_score_minus_one() {
        let a = emb(vec![1.0, 2.0, 3.0]);
        let b = emb(vec![-1.0, -2.0, -3.0]);
        let s = cosine(&a, &b).unwrap();
        assert!((s + 1.0).abs() < 1e-9);
    }

    #[test]
    fn scores_stay_within_bounds() {
        let vectors = [
            vec![0.1, 0.0, 0.0],
            vec![5.0, -3.0, 2.0],
            vec![-0.7, 0.7, 0.1],
            vec![100.0, 0.01, -50.0],
        ];
        for a in &vectors {
            for b in &vectors {
                let s = cosine(&emb(a.clone()), &emb(b.clone())).unwrap();
                assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&s), "out of range: {s}");
            }
        }
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let a = emb(vec![1.0, 2.0]);
        let b = emb(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            cosine(&a, &b),
            Err(SimilarityError::DimensionMismatch { left: 2, right: 3 })
        ));
    }

    #[test]
    fn mismatched_models_are_rejected() {
        let a = Embedding::new("model-a", vec![1.0]);
        let b = Embedding::new("model-b", vec![1.0]);
        assert!(matches!(
            cosine(&a, &b),
            Err(SimilarityError::ModelMismatch { .. })
        ));
    }

    #[test]
    fn zero_vector_is_an_anomaly_not_a_score() {
        let a = emb(vec![0.0, 0.0, 0.0]);
        let b = emb(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            cosine(&a, &b),
            Err(SimilarityError::DegenerateVector)
        ));
        assert!(is_degenerate(&a));
        assert!(!is_degenerate(&b));
    }
}
