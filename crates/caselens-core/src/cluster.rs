//! Cluster building: k-means plus naming and labeling.
//!
//! [`build_clusters`] runs [`kmeans`] over the corpus, then for every
//! non-empty cluster:
//!
//! 1. names it after the member closest to the final centroid (that
//!    document's id becomes the cluster id);
//! 2. joins the text of the `representatives` closest members and asks the
//!    [`Labeler`] for a label, split into keywords by [`parse_keywords`];
//! 3. records its member ids in the [`ClusterIndex`].
//!
//! A labeler failure affects only the cluster being labeled: it receives
//! [`ClusterParams::fallback_label`] and a warning is recorded. Input errors
//! from validation or k-means abort the whole run.

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::Result;
use crate::keywords::parse_keywords;
use crate::kmeans::{kmeans, KMeansParams};
use crate::models::{Cluster, ClusterIndex, Document};
use crate::representative::{closest, nearest};
use crate::vector::validate_corpus;

/// Default keyword used when labeling fails.
pub const DEFAULT_FALLBACK_LABEL: &str = "unclassified";

/// External service that turns representative text into a short label.
///
/// Implementations may call a network API; errors are absorbed by
/// [`build_clusters`] and never abort a clustering run.
#[async_trait]
pub trait Labeler: Send + Sync {
    /// Return a label or a delimiter-separated keyword string for `text`.
    async fn label(&self, text: &str) -> AnyResult<String>;
}

/// Tuning for a clustering run.
#[derive(Debug, Clone)]
pub struct ClusterParams {
    pub k: usize,
    pub max_iterations: usize,
    /// How many central documents feed the labeler.
    pub representatives: usize,
    /// Keyword assigned when the labeler fails or returns nothing usable.
    pub fallback_label: String,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            k: 5,
            max_iterations: 100,
            representatives: 3,
            fallback_label: DEFAULT_FALLBACK_LABEL.to_string(),
        }
    }
}

/// Everything a clustering run produces.
#[derive(Debug, Clone)]
pub struct ClusterOutcome {
    /// One record per non-empty cluster, in k-means label order.
    pub clusters: Vec<Cluster>,
    pub index: ClusterIndex,
    pub iterations: usize,
    pub converged: bool,
    /// Labeling problems absorbed during the run, one line per cluster.
    pub warnings: Vec<String>,
}

/// Cluster `docs` and label every resulting group.
///
/// # Errors
///
/// Returns the input errors of [`validate_corpus`] and [`kmeans`]. Labeler
/// errors are reported in [`ClusterOutcome::warnings`] instead.
pub async fn build_clusters<L>(
    docs: &[Document],
    params: &ClusterParams,
    labeler: &L,
) -> Result<ClusterOutcome>
where
    L: Labeler + ?Sized,
{
    validate_corpus(docs)?;
    if params.representatives == 0 {
        return Err(crate::Error::InvalidParameter {
            name: "representatives",
            message: "must be at least 1",
        });
    }

    let vectors: Vec<&[f32]> = docs.iter().map(|d| d.vector.as_slice()).collect();
    let result = kmeans(
        &vectors,
        &KMeansParams {
            k: params.k,
            max_iterations: params.max_iterations,
        },
    )?;
    info!(
        documents = docs.len(),
        k = params.k,
        iterations = result.iterations,
        converged = result.converged,
        "k-means finished"
    );

    let mut buckets: Vec<Vec<&Document>> = vec![Vec::new(); params.k];
    for (doc, &label) in docs.iter().zip(&result.labels) {
        buckets[label].push(doc);
    }

    let mut clusters = Vec::new();
    let mut warnings = Vec::new();

    for (members, centroid) in buckets.into_iter().zip(result.centroids) {
        let Some(center) = closest(&members, &centroid) else {
            continue;
        };
        let id = center.id.clone();

        let content = nearest(&members, &centroid, params.representatives)
            .iter()
            .map(|hit| hit.document.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let keywords = match labeler.label(&content).await {
            Ok(response) => {
                let keywords = parse_keywords(&response);
                if keywords.is_empty() {
                    warn!(cluster = %id, "labeler returned an empty response, using fallback label");
                    warnings.push(format!("cluster {}: labeler returned an empty response", id));
                    vec![params.fallback_label.clone()]
                } else {
                    keywords
                }
            }
            Err(e) => {
                warn!(cluster = %id, error = %e, "labeling failed, using fallback label");
                warnings.push(format!("cluster {}: {}", id, e));
                vec![params.fallback_label.clone()]
            }
        };

        let name = if keywords.is_empty() {
            format!("Cluster {}", id)
        } else {
            keywords.join(" ")
        };

        clusters.push(Cluster {
            summary: format!("Summary for cluster {} with {} documents", id, members.len()),
            id,
            name,
            doc_ids: members.iter().map(|d| d.id.clone()).collect(),
            keywords,
            centroid,
        });
    }

    let index = ClusterIndex::from_clusters(&clusters);

    Ok(ClusterOutcome {
        clusters,
        index,
        iterations: result.iterations,
        converged: result.converged,
        warnings,
    })
}
