//! `caselens cluster`: group the corpus and write the cluster files.
//!
//! Output layout in the target directory:
//!
//! | File | Content |
//! |------|---------|
//! | `cluster-index.json` | document id → cluster id |
//! | `cluster-<id>.json` | one [`Cluster`] record per cluster |
//!
//! All files are pretty-printed JSON.

use anyhow::{Context, Result};
use caselens_core::cluster::{build_clusters, ClusterOutcome, ClusterParams};
use caselens_core::models::{Cluster, ClusterIndex};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::labeler::create_labeler;
use crate::loader::load_corpus;

pub const INDEX_FILE_NAME: &str = "cluster-index.json";

pub fn cluster_file_name(cluster_id: &str) -> String {
    format!("cluster-{}.json", cluster_id)
}

/// Per-run overrides from the command line.
#[derive(Debug, Default, Clone)]
pub struct ClusterOverrides {
    pub clusters: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

/// Files written by [`write_outputs`], plus the clusters that failed.
#[derive(Debug, Default)]
pub struct WrittenFiles {
    pub written: Vec<PathBuf>,
    pub failed: Vec<String>,
}

/// Load the corpus, cluster it, label it, and write the result files.
pub async fn cluster_corpus(
    config: &Config,
    overrides: &ClusterOverrides,
) -> Result<(ClusterOutcome, WrittenFiles)> {
    let report = load_corpus(
        &config.corpus.dir,
        config.corpus.dims,
        config.corpus.min_summary_bytes,
    )?;
    info!(
        documents = report.documents.len(),
        skipped = report.skipped.len(),
        "corpus loaded"
    );

    let params = ClusterParams {
        k: overrides.clusters.unwrap_or(config.clustering.clusters),
        max_iterations: config.clustering.max_iterations,
        representatives: config.clustering.representatives,
        fallback_label: config.labeling.fallback_label.clone(),
    };
    let labeler = create_labeler(&config.labeling)?;

    let outcome = build_clusters(&report.documents, &params, labeler.as_ref()).await?;

    let output_dir = overrides
        .output_dir
        .as_deref()
        .unwrap_or(config.clustering.output_dir.as_path());
    let files = write_outputs(output_dir, &outcome.clusters, &outcome.index)?;

    Ok((outcome, files))
}

/// Write the index file and one file per cluster.
///
/// The index must be written; a cluster file that fails is logged and
/// reported in [`WrittenFiles::failed`] while the rest are still written.
pub fn write_outputs(dir: &Path, clusters: &[Cluster], index: &ClusterIndex) -> Result<WrittenFiles> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut files = WrittenFiles::default();

    let index_path = dir.join(INDEX_FILE_NAME);
    write_pretty_json(&index_path, index)
        .with_context(|| format!("Failed to write {}", index_path.display()))?;
    files.written.push(index_path);

    for cluster in clusters {
        let path = dir.join(cluster_file_name(&cluster.id));
        match write_pretty_json(&path, cluster) {
            Ok(()) => files.written.push(path),
            Err(e) => {
                warn!(cluster = %cluster.id, file = %path.display(), error = %e, "failed to write cluster file");
                files.failed.push(cluster.id.clone());
            }
        }
    }

    Ok(files)
}

fn write_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub async fn run_cluster(config: &Config, overrides: &ClusterOverrides) -> Result<()> {
    let (outcome, files) = cluster_corpus(config, overrides).await?;

    println!(
        "Clustered {} documents into {} clusters ({} iterations{}).",
        outcome.index.document_count(),
        outcome.clusters.len(),
        outcome.iterations,
        if outcome.converged { "" } else { ", not converged" }
    );
    for cluster in &outcome.clusters {
        println!(
            "  {}  {:>5} docs  {}",
            cluster.id,
            cluster.doc_ids.len(),
            cluster.name
        );
    }
    for warning in &outcome.warnings {
        println!("warning: {}", warning);
    }
    println!("Wrote {} files.", files.written.len());
    if !files.failed.is_empty() {
        println!("Failed to write clusters: {}", files.failed.join(", "));
    }
    Ok(())
}
