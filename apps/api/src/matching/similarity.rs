//! Cosine similarity between two embedding vectors.
//!
//! Unlike a lenient "return 0.0 on bad input" scorer, every degenerate case is reported as a
//! `SimilarityError` so a zero vector or a dimension mismatch can never masquerade as a real score.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimilarityError {
    #[error("embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("embedding has zero norm")]
    ZeroNorm,

    #[error("embedding contains non-finite values")]
    NonFinite,
}

impl SimilarityError {
    /// Dimension mismatches mean two incompatible embedding models were mixed.
    pub fn is_programming_error(&self) -> bool {
        matches!(self, SimilarityError::DimensionMismatch { .. })
    }
}

/// Checks that a single vector can take part in a comparison at all.
///
/// An empty vector has zero norm.
pub fn validate_embedding(v: &[f32]) -> Result<(), SimilarityError> {
    if v.iter().any(|x| !x.is_finite()) {
        return Err(SimilarityError::NonFinite);
    }
    if v.iter().all(|&x| x == 0.0) {
        return Err(SimilarityError::ZeroNorm);
    }
    Ok(())
}

/// Returns the cosine of the angle between `a` and `b`, in `[-1.0, 1.0]`.
///
/// Accumulates in f64 so long embeddings do not lose precision, then clamps to absorb
/// rounding at the boundaries.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b) {
        if !x.is_finite() || !y.is_finite() {
            return Err(SimilarityError::NonFinite);
        }
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(SimilarityError::ZeroNorm);
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    Ok(score.clamp(-1.0, 1.0) as f32)
}
