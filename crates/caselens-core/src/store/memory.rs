//! In-memory [`Store`] implementation for tests and small corpora.
//!
//! Documents live in an insertion-ordered `Vec` behind a `std::sync::RwLock`.
//! Vector search is brute force through [`rank_documents`].

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::{Document, SimilarityResult};
use crate::search::rank_documents;

use super::Store;

/// In-memory store.
pub struct InMemoryStore {
    docs: RwLock<Vec<Document>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Document>>> {
        self.docs
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Document>>> {
        self.docs
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn upsert_document(&self, doc: &Document) -> Result<()> {
        let mut docs = self.write()?;
        match docs.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => *existing = doc.clone(),
            None => docs.push(doc.clone()),
        }
        Ok(())
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>> {
        Ok(self.read()?.iter().find(|d| d.id == id).cloned())
    }

    async fn vector_search(&self, query_vec: &[f32], limit: usize) -> Result<Vec<SimilarityResult>> {
        let docs = self.read()?;
        Ok(rank_documents(query_vec, &docs, limit)?)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let store = InMemoryStore::new();
        store
            .upsert_document(&Document::new("a", vec![1.0, 0.0], "first"))
            .await
            .unwrap();
        store
            .upsert_document(&Document::new("b", vec![1.0, 0.0], "second"))
            .await
            .unwrap();
        store
            .upsert_document(&Document::new("a", vec![1.0, 0.0], "updated"))
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        let a = store.get_document("a").await.unwrap().unwrap();
        assert_eq!(a.text, "updated");

        // "a" keeps its slot, so it still wins the tie.
        let hits = store.vector_search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits[0].document_id, "a");
        assert_eq!(hits[1].document_id, "b");
    }

    #[tokio::test]
    async fn test_missing_document() {
        let store = InMemoryStore::default();
        assert!(store.get_document("nope").await.unwrap().is_none());
        assert!(store.vector_search(&[1.0], 5).await.unwrap().is_empty());
    }
}
