//! Similarity search over the case corpus.
//!
//! A query is either a case id or free text:
//!
//! - If it is 18–30 ASCII digits and that case exists, the case's own
//!   embedding is the query vector ("more like this case").
//! - Otherwise the text goes through the configured [`EmbeddingProvider`].
//!
//! Ranking uses one of two interchangeable strategies, picked by
//! `retrieval.strategy` or `--strategy`:
//!
//! | Strategy | Source | Notes |
//! |----------|--------|-------|
//! | `brute` | corpus directory | loaded into memory at startup |
//! | `index` | SQLite `cases` table | requires `caselens import` first |
//!
//! Both return the same ranking for the same corpus.

use anyhow::{bail, Result};
use caselens_core::models::{DocumentView, SimilarityResult};
use caselens_core::search::Ranker;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db;
use crate::embedding::{create_provider, embed_query, EmbeddingProvider};
use crate::loader::load_corpus;
use crate::sqlite_store::SqliteStore;

/// Ranked hits plus the matching documents without their vectors.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub similarity: Vec<SimilarityResult>,
    pub documents: BTreeMap<String, DocumentView>,
}

/// True for strings of 18 to 30 ASCII digits, the shape of a case id.
pub fn is_case_id(query: &str) -> bool {
    (18..=30).contains(&query.len()) && query.bytes().all(|b| b.is_ascii_digit())
}

/// Build the ranker for `strategy` (`"brute"` or `"index"`).
pub async fn build_ranker(config: &Config, strategy: &str) -> Result<Ranker> {
    let ranker = match strategy {
        "brute" => {
            let report = load_corpus(
                &config.corpus.dir,
                config.corpus.dims,
                config.corpus.min_summary_bytes,
            )?;
            Ranker::brute_force(report.documents)
        }
        "index" => {
            if !config.db.path.exists() {
                bail!(
                    "Index not found at {}. Run `caselens import` first.",
                    config.db.path.display()
                );
            }
            let pool = db::connect(config).await?;
            Ranker::index_backed(SqliteStore::new(pool))
        }
        other => bail!("Unknown strategy: '{}'. Use brute or index.", other),
    };
    info!(strategy = ranker.strategy(), "ranker ready");
    Ok(ranker)
}

/// A ranker plus the query embedder; built once and shared by every query.
pub struct SearchEngine {
    ranker: Ranker,
    embedder: Box<dyn EmbeddingProvider>,
    dims: usize,
}

impl SearchEngine {
    pub fn new(ranker: Ranker, embedder: Box<dyn EmbeddingProvider>, dims: usize) -> Self {
        Self {
            ranker,
            embedder,
            dims,
        }
    }

    pub async fn from_config(config: &Config, strategy: Option<&str>) -> Result<Self> {
        let strategy = strategy.unwrap_or(config.retrieval.strategy.as_str());
        let ranker = build_ranker(config, strategy).await?;
        let embedder = create_provider(&config.embedding)?;
        Ok(Self::new(ranker, embedder, config.corpus.dims))
    }

    pub fn strategy(&self) -> &'static str {
        self.ranker.strategy()
    }

    async fn query_vector(&self, query: &str) -> Result<Vec<f32>> {
        if is_case_id(query) {
            if let Some(doc) = self.ranker.document(query).await? {
                debug!(id = query, "using stored case embedding as query");
                return Ok(doc.vector);
            }
            debug!(id = query, "case id not found, embedding as text");
        }
        embed_query(self.embedder.as_ref(), query, self.dims).await
    }

    /// Return the `limit` cases most similar to `query`.
    pub async fn search(&self, query: &str, limit: usize) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            bail!("query must not be empty");
        }

        let vector = self.query_vector(query).await?;
        let similarity = self.ranker.rank(&vector, limit).await?;

        let mut documents = BTreeMap::new();
        for hit in &similarity {
            match self.ranker.document(&hit.document_id).await {
                Ok(Some(doc)) => {
                    documents.insert(doc.id.clone(), doc.view());
                }
                Ok(None) => warn!(id = %hit.document_id, "ranked case has no document"),
                Err(e) => warn!(id = %hit.document_id, error = %e, "failed to load ranked case"),
            }
        }

        Ok(SearchResponse {
            similarity,
            documents,
        })
    }
}

pub async fn run_search(
    config: &Config,
    query: &str,
    limit: Option<usize>,
    strategy: Option<&str>,
    json: bool,
) -> Result<()> {
    let engine = SearchEngine::from_config(config, strategy).await?;
    let limit = limit.unwrap_or(config.retrieval.final_limit);
    let response = engine.search(query, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.similarity.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, hit) in response.similarity.iter().enumerate() {
        let title = response
            .documents
            .get(&hit.document_id)
            .and_then(|d| d.metadata.get("CaseTitle"))
            .and_then(|t| t.as_str())
            .unwrap_or("");
        println!("{}. [{:.4}] {}  {}", i + 1, hit.score, hit.document_id, title);
    }
    Ok(())
}
