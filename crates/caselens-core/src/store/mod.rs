//! Vector index abstraction.
//!
//! The [`Store`] trait is the boundary to a pre-built index of the corpus
//! (SQLite in the application, [`memory::InMemoryStore`] in tests). Its
//! [`vector_search`](Store::vector_search) must return exactly what
//! [`rank_documents`](crate::search::rank_documents) would for the same
//! corpus: dot-product scores, descending, insertion order on ties.
//!
//! Implementations must be `Send + Sync` to be shared across concurrent
//! queries.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Document, SimilarityResult};

/// Abstract storage backend for indexed documents.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`upsert_document`](Store::upsert_document) | Insert or replace a document |
/// | [`get_document`](Store::get_document) | Fetch a document by id |
/// | [`vector_search`](Store::vector_search) | Top-k dot-product search |
/// | [`count`](Store::count) | Number of indexed documents |
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert or replace a document. Replacing keeps the original position.
    async fn upsert_document(&self, doc: &Document) -> Result<()>;

    /// Retrieve a document, vector included, by id.
    async fn get_document(&self, id: &str) -> Result<Option<Document>>;

    /// Return the `limit` documents with the highest dot product against `query_vec`.
    async fn vector_search(&self, query_vec: &[f32], limit: usize) -> Result<Vec<SimilarityResult>>;

    /// Number of documents in the index.
    async fn count(&self) -> Result<usize>;
}
