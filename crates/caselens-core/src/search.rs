//! Top-k similarity ranking.
//!
//! Two interchangeable strategies sit behind [`Ranker::rank`]:
//!
//! - **Brute force**: score every document in an in-memory corpus with
//!   [`dot_product`] and keep the best `k` ([`rank_documents`]).
//! - **Index backed**: delegate to a [`Store`] (SQLite, in-memory, ...) whose
//!   [`vector_search`](Store::vector_search) returns the same shape.
//!
//! Both produce `Vec<SimilarityResult>` sorted by score descending, with
//! ties kept in corpus order, so callers cannot tell which one is active.

use std::sync::Arc;

use anyhow::Result as AnyResult;

use crate::error::{Error, Result};
use crate::models::{Document, SimilarityResult};
use crate::store::Store;
use crate::vector::dot_product;

/// Sort `results` by score (descending, stable) and keep the first `k`.
pub fn top_k(mut results: Vec<SimilarityResult>, k: usize) -> Vec<SimilarityResult> {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(k);
    results
}

/// Rank `docs` against `query` by dot product and return the best `k`.
///
/// An empty candidate set yields an empty list. When `k` exceeds the number
/// of candidates every candidate is returned, sorted.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if a document's vector length differs from
/// the query's.
pub fn rank_documents(query: &[f32], docs: &[Document], k: usize) -> Result<Vec<SimilarityResult>> {
    if let Some(doc) = docs.iter().find(|d| d.vector.len() != query.len()) {
        return Err(Error::DimensionMismatch {
            id: "query".to_string(),
            expected: doc.vector.len(),
            found: query.len(),
        });
    }

    let scored = docs
        .iter()
        .map(|doc| SimilarityResult {
            document_id: doc.id.clone(),
            score: dot_product(query, &doc.vector),
        })
        .collect();

    Ok(top_k(scored, k))
}

/// A ranking strategy over one immutable corpus.
///
/// Cloning is cheap; concurrent queries share the same corpus or index.
#[derive(Clone)]
pub enum Ranker {
    BruteForce(Arc<[Document]>),
    IndexBacked(Arc<dyn Store>),
}

impl Ranker {
    pub fn brute_force(docs: Vec<Document>) -> Self {
        Ranker::BruteForce(docs.into())
    }

    pub fn index_backed<S: Store + 'static>(store: S) -> Self {
        Ranker::IndexBacked(Arc::new(store))
    }

    /// Short name for logs (`"brute"` or `"index"`).
    pub fn strategy(&self) -> &'static str {
        match self {
            Ranker::BruteForce(_) => "brute",
            Ranker::IndexBacked(_) => "index",
        }
    }

    /// Return the `k` documents most similar to `query`.
    pub async fn rank(&self, query: &[f32], k: usize) -> AnyResult<Vec<SimilarityResult>> {
        match self {
            Ranker::BruteForce(docs) => Ok(rank_documents(query, docs, k)?),
            Ranker::IndexBacked(store) => store.vector_search(query, k).await,
        }
    }

    /// Fetch one document by id, for query-by-id and result enrichment.
    pub async fn document(&self, id: &str) -> AnyResult<Option<Document>> {
        match self {
            Ranker::BruteForce(docs) => Ok(docs.iter().find(|d| d.id == id).cloned()),
            Ranker::IndexBacked(store) => store.get_document(id).await,
        }
    }
}
