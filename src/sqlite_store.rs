//! SQLite-backed [`Store`] implementation.
//!
//! Cases live in the `cases` table with their embedding as a little-endian
//! `f32` BLOB. Vector search scans rows in rowid (import) order and ranks
//! them with the same dot-product scoring and tie rule as the in-memory
//! strategy, so both return identical lists for the same corpus.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use caselens_core::models::{Document, Metadata, SimilarityResult};
use caselens_core::search::top_k;
use caselens_core::store::Store;
use caselens_core::vector::{blob_to_vec, dot_product, vec_to_blob};
use caselens_core::Error;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> Result<Document> {
    let id: String = row.get("id");
    let blob: Vec<u8> = row.get("embedding");
    let metadata_json: String = row.get("metadata_json");
    let metadata: Metadata = serde_json::from_str(&metadata_json)
        .with_context(|| format!("Corrupt metadata for case {}", id))?;

    Ok(Document {
        vector: blob_to_vec(&blob),
        text: row.get("text"),
        metadata,
        id,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn upsert_document(&self, doc: &Document) -> Result<()> {
        let metadata_json = serde_json::to_string(&doc.metadata)?;

        sqlx::query(
            r#"
            INSERT INTO cases (id, dims, embedding, text, metadata_json)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                dims = excluded.dims,
                embedding = excluded.embedding,
                text = excluded.text,
                metadata_json = excluded.metadata_json
            "#,
        )
        .bind(&doc.id)
        .bind(doc.vector.len() as i64)
        .bind(vec_to_blob(&doc.vector))
        .bind(&doc.text)
        .bind(&metadata_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>> {
        let row = sqlx::query(
            "SELECT id, embedding, text, metadata_json FROM cases WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn vector_search(&self, query_vec: &[f32], limit: usize) -> Result<Vec<SimilarityResult>> {
        let rows = sqlx::query("SELECT id, embedding FROM cases ORDER BY rowid ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut scored = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.get("id");
            let blob: Vec<u8> = row.get("embedding");
            let vector = blob_to_vec(&blob);

            if vector.len() != query_vec.len() {
                return Err(Error::DimensionMismatch {
                    id: "query".to_string(),
                    expected: vector.len(),
                    found: query_vec.len(),
                }
                .into());
            }

            scored.push(SimilarityResult {
                score: dot_product(query_vec, &vector),
                document_id: id,
            });
        }

        Ok(top_k(scored, limit))
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cases")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_path;
    use crate::migrate::migrate_pool;
    use caselens_core::search::Ranker;
    use tempfile::TempDir;

    async fn open_store(tmp: &TempDir) -> SqliteStore {
        let pool = connect_path(&tmp.path().join("cases.sqlite")).await.unwrap();
        migrate_pool(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    fn corpus() -> Vec<Document> {
        let mut docs = vec![
            Document::new("a", vec![1.0, 0.0, 0.0], "alpha"),
            Document::new("b", vec![0.0, 1.0, 0.0], "beta"),
            Document::new("c", vec![0.6, 0.8, 0.0], "gamma"),
            Document::new("d", vec![1.0, 0.0, 0.0], "delta"),
        ];
        docs[2]
            .metadata
            .insert("CaseTitle".to_string(), serde_json::json!("竊盜"));
        docs
    }

    #[tokio::test]
    async fn test_roundtrip_and_upsert() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;
        for doc in corpus() {
            store.upsert_document(&doc).await.unwrap();
        }
        assert_eq!(store.count().await.unwrap(), 4);

        let c = store.get_document("c").await.unwrap().unwrap();
        assert_eq!(c, corpus()[2]);

        let mut updated = corpus()[0].clone();
        updated.text = "alpha v2".to_string();
        store.upsert_document(&updated).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 4);
        assert_eq!(store.get_document("a").await.unwrap().unwrap().text, "alpha v2");
        assert!(store.get_document("zzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_matches_brute_force() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;
        for doc in corpus() {
            store.upsert_document(&doc).await.unwrap();
        }

        let brute = Ranker::brute_force(corpus());
        let index = Ranker::index_backed(store);
        for query in [[1.0, 0.0, 0.0], [0.2, 0.9, 0.1]] {
            for k in [1, 2, 10] {
                assert_eq!(
                    brute.rank(&query, k).await.unwrap(),
                    index.rank(&query, k).await.unwrap()
                );
            }
        }
    }

    #[tokio::test]
    async fn test_dimension_mismatch() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;
        store.upsert_document(&corpus()[0]).await.unwrap();
        assert!(store.vector_search(&[1.0, 0.0], 1).await.is_err());
    }
}
