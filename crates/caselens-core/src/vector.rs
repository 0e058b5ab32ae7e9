//! Vector math and corpus validation.
//!
//! Pure helpers over fixed-length `f32` vectors:
//! - [`euclidean_distance`]: clustering and representative selection (lower is closer)
//! - [`dot_product`]: search score for pre-normalized embeddings (higher is closer)
//! - [`vec_to_blob`] / [`blob_to_vec`]: little-endian BLOB codec for SQLite storage
//!
//! The distance functions require equal-length inputs. A mismatch is a bug in
//! the caller, so they panic instead of returning an error; corpus-level
//! checks happen once, up front, in [`validate_corpus`].

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::Document;

/// Euclidean distance between two vectors, accumulated in `f64`.
///
/// ```text
/// d(a, b) = sqrt( Σ (a_i − b_i)² )
/// ```
///
/// # Panics
///
/// Panics if `a` and `b` have different lengths.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    assert_eq!(
        a.len(),
        b.len(),
        "euclidean_distance: vectors have different lengths"
    );
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let diff = f64::from(x) - f64::from(y);
            diff * diff
        })
        .sum::<f64>()
        .sqrt()
}

/// Dot product of two vectors.
///
/// For unit-length embeddings this equals cosine similarity, which is why
/// the search ranker uses it directly as its score.
///
/// # Panics
///
/// Panics if `a` and `b` have different lengths.
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(
        a.len(),
        b.len(),
        "dot_product: vectors have different lengths"
    );
    let mut dot = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
    }
    dot
}

/// Check that a corpus can be clustered or ranked and return its dimension.
///
/// Rejects an empty corpus, zero-length vectors, vectors whose length differs
/// from the first document's, non-finite components, and duplicate ids.
pub fn validate_corpus(docs: &[Document]) -> Result<usize> {
    let first = docs.first().ok_or(Error::EmptyCorpus)?;
    let dims = first.vector.len();
    if dims == 0 {
        return Err(Error::InvalidParameter {
            name: "vector",
            message: "document vectors must not be empty",
        });
    }

    let mut seen = HashSet::with_capacity(docs.len());
    for doc in docs {
        if doc.vector.len() != dims {
            return Err(Error::DimensionMismatch {
                id: doc.id.clone(),
                expected: dims,
                found: doc.vector.len(),
            });
        }
        if let Some(position) = doc.vector.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteValue {
                id: doc.id.clone(),
                position,
            });
        }
        if !seen.insert(doc.id.as_str()) {
            return Err(Error::DuplicateId(doc.id.clone()));
        }
    }

    Ok(dims)
}

/// Encode a float vector as a BLOB (little-endian f32 bytes).
///
/// Each `f32` is stored as 4 bytes, producing a BLOB of `vec.len() × 4` bytes.
///
/// ```rust
/// use caselens_core::vector::{vec_to_blob, blob_to_vec};
///
/// let v = vec![1.0f32, -2.5, 3.125];
/// let blob = vec_to_blob(&v);
/// assert_eq!(blob.len(), 12);
/// assert_eq!(blob_to_vec(&blob), v);
/// ```
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode a BLOB back into a float vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_3_4_5() {
        let d = euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_euclidean_identical_is_zero() {
        let v = [0.25, -1.5, 8.0];
        assert_eq!(euclidean_distance(&v, &v), 0.0);
    }

    #[test]
    #[should_panic(expected = "different lengths")]
    fn test_euclidean_length_mismatch_panics() {
        euclidean_distance(&[1.0, 2.0], &[1.0]);
    }

    #[test]
    fn test_dot_product() {
        assert_eq!(dot_product(&[1.0, 2.0, 3.0], &[4.0, -5.0, 6.0]), 12.0);
    }

    #[test]
    #[should_panic(expected = "different lengths")]
    fn test_dot_length_mismatch_panics() {
        dot_product(&[1.0], &[1.0, 2.0]);
    }

    #[test]
    fn test_vec_blob_roundtrip() {
        let vec = vec![1.0f32, -2.5, 3.125, 0.0, -0.001];
        assert_eq!(blob_to_vec(&vec_to_blob(&vec)), vec);
    }

    #[test]
    fn test_validate_returns_dimension() {
        let docs = vec![
            Document::new("a", vec![1.0, 2.0], ""),
            Document::new("b", vec![3.0, 4.0], ""),
        ];
        assert_eq!(validate_corpus(&docs).unwrap(), 2);
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(validate_corpus(&[]), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_validate_rejects_mismatch() {
        let docs = vec![
            Document::new("a", vec![1.0, 2.0], ""),
            Document::new("b", vec![3.0], ""),
        ];
        match validate_corpus(&docs) {
            Err(Error::DimensionMismatch {
                id,
                expected,
                found,
            }) => {
                assert_eq!(id, "b");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_nan() {
        let docs = vec![Document::new("a", vec![1.0, f32::NAN], "")];
        assert!(matches!(
            validate_corpus(&docs),
            Err(Error::NonFiniteValue { position: 1, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let docs = vec![
            Document::new("a", vec![1.0], ""),
            Document::new("a", vec![2.0], ""),
        ];
        assert!(matches!(validate_corpus(&docs), Err(Error::DuplicateId(id)) if id == "a"));
    }
}
