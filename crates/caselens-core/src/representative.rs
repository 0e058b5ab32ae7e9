//! Representative-document selection.
//!
//! Finds the documents closest (Euclidean) to a reference point. The same
//! routine picks the document a cluster is named after (`n = 1`), the
//! documents whose text seeds the cluster label (`n = 3`), and can rank any
//! candidate set against a query vector.

use crate::models::Document;
use crate::vector::euclidean_distance;

/// A candidate together with its distance to the reference vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub document: &'a Document,
    pub distance: f64,
}

/// Return the `n` candidates nearest to `reference`, ascending by distance.
///
/// When `candidates.len() <= n` every candidate is returned, still sorted by
/// distance. Exactly equal distances keep their input order.
///
/// # Panics
///
/// Panics if a candidate's vector length differs from `reference.len()`.
pub fn nearest<'a>(candidates: &[&'a Document], reference: &[f32], n: usize) -> Vec<Nearest<'a>> {
    let mut scored: Vec<Nearest<'a>> = candidates
        .iter()
        .map(|&document| Nearest {
            document,
            distance: euclidean_distance(&document.vector, reference),
        })
        .collect();

    // `sort_by` is stable, which gives first-seen-wins on ties.
    scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    scored.truncate(n);
    scored
}

/// Convenience wrapper over [`nearest`] for `n = 1`.
pub fn closest<'a>(candidates: &[&'a Document], reference: &[f32]) -> Option<&'a Document> {
    nearest(candidates, reference, 1)
        .first()
        .map(|hit| hit.document)
}
