//! Cosine similarity between embedding vectors.

use thiserror::Error;

/// Reasons two vectors cannot be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimilarityError {
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("vector has zero magnitude")]
    DegenerateVector,
}

/// Cosine of the angle between `a` and `b`: `dot(a, b) / (|a| * |b|)`.
///
/// The result is not clamped, so float rounding may put it marginally
/// outside `[-1, 1]`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    // Accumulated in f64: squares of large or tiny finite f32 components
    // overflow or underflow in f32.
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(SimilarityError::DegenerateVector);
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let v = [0.5, 0.2, 0.1, 0.7];
        let s = cosine_similarity(&v, &v).unwrap();
        assert!((s - 1.0).abs() < 1e-6, "got {s}");
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        let s = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(s.abs() < 1e-6);
        let s = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((s + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_invariant() {
        let a = cosine_similarity(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        let b = cosine_similarity(&[10.0, 20.0, 30.0], &[0.3, 0.2, 0.1]).unwrap();
        assert!((a - b).abs() < 1e-5);
    }

    #[test]
    fn test_dimension_mismatch() {
        assert_eq!(
            cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(SimilarityError::DimensionMismatch { left: 2, right: 3 })
        );
    }

    #[test]
    fn test_zero_vector() {
        assert_eq!(
            cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]),
            Err(SimilarityError::DegenerateVector)
        );
        assert_eq!(
            cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]),
            Err(SimilarityError::DegenerateVector)
        );
    }

    #[test]
    fn test_extreme_magnitudes() {
        let big = [1e30f32, 1e30];
        let s = cosine_similarity(&big, &big).unwrap();
        assert!((s - 1.0).abs() < 1e-6, "got {s}");

        let tiny = [1e-30f32, 1e-30];
        let s = cosine_similarity(&[1.0, 1.0], &tiny).unwrap();
        assert!((s - 1.0).abs() < 1e-6, "got {s}");

        let s = cosine_similarity(&big, &[1.0, 0.0]).unwrap();
        assert!((s - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6, "got {s}");
    }
}
