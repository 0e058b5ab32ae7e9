//! `caselens import`: load the corpus directory into the SQLite index.

use anyhow::Result;
use caselens_core::store::Store;
use caselens_core::vector::validate_corpus;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::loader::load_corpus;
use crate::migrate::migrate_pool;
use crate::sqlite_store::SqliteStore;

/// Counts reported by [`import_corpus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub loaded: usize,
    pub skipped: usize,
    pub total_indexed: usize,
}

/// Upsert every usable case under `dir` into the configured database.
pub async fn import_corpus(config: &Config, dir: &Path) -> Result<ImportStats> {
    let report = load_corpus(dir, config.corpus.dims, config.corpus.min_summary_bytes)?;
    validate_corpus(&report.documents)?;

    let pool = db::connect(config).await?;
    migrate_pool(&pool).await?;
    let store = SqliteStore::new(pool);

    for doc in &report.documents {
        store.upsert_document(doc).await?;
    }

    let stats = ImportStats {
        loaded: report.documents.len(),
        skipped: report.skipped.len(),
        total_indexed: store.count().await?,
    };
    store.pool().close().await;

    info!(
        loaded = stats.loaded,
        skipped = stats.skipped,
        total = stats.total_indexed,
        "import finished"
    );
    Ok(stats)
}

pub async fn run_import(config: &Config, dir: Option<&Path>) -> Result<()> {
    let dir = dir.unwrap_or(config.corpus.dir.as_path());
    let stats = import_corpus(config, dir).await?;

    println!("Import complete:");
    println!("  loaded:  {}", stats.loaded);
    println!("  skipped: {}", stats.skipped);
    println!("  indexed: {}", stats.total_indexed);
    Ok(())
}
