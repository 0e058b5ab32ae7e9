//! K-means partitioning with deterministic first-K seeding.
//!
//! # Algorithm
//!
//! 1. Seed centroid `j` with the vector of input `j`, for `j < K`.
//! 2. Repeat at most `max_iterations` times:
//!    - assign every vector to its nearest centroid (Euclidean, ties go to the
//!      lowest centroid index);
//!    - stop if no label changed since the previous pass;
//!    - replace each centroid with the mean of its members. A centroid with no
//!      members keeps its previous value.
//! 3. On convergence, refresh the centroids from the final assignment.
//!
//! Labels start at 0, so a pass that puts every vector in cluster 0 counts as
//! converged. Step 3 keeps the centroid equal to the member mean in that case.
//!
//! Sums are accumulated in `f64` in input order, so a run is reproducible
//! bit-for-bit given the same input order, `K`, and `max_iterations`.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Centroid;
use crate::vector::euclidean_distance;

/// Parameters for a k-means run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeansParams {
    /// Number of clusters, `1 ≤ k ≤ n`.
    pub k: usize,
    /// Upper bound on assignment passes, `≥ 1`.
    pub max_iterations: usize,
}

/// Outcome of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    /// Cluster index per input vector, each in `[0, k)`.
    pub labels: Vec<usize>,
    /// Final centroids, one per cluster.
    pub centroids: Vec<Centroid>,
    /// Number of assignment passes performed.
    pub iterations: usize,
    /// `false` if the run stopped at `max_iterations` with labels still moving.
    pub converged: bool,
}

impl KMeansResult {
    /// Member count per cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Partition `vectors` into `params.k` clusters.
///
/// # Errors
///
/// - [`Error::EmptyCorpus`] for no input.
/// - [`Error::InvalidClusterCount`] when `k == 0` or `k > vectors.len()`.
/// - [`Error::InvalidParameter`] when `max_iterations == 0`.
/// - [`Error::DimensionMismatch`] when vectors differ in length.
pub fn kmeans(vectors: &[&[f32]], params: &KMeansParams) -> Result<KMeansResult> {
    let n = vectors.len();
    if n == 0 {
        return Err(Error::EmptyCorpus);
    }
    if params.k == 0 || params.k > n {
        return Err(Error::InvalidClusterCount {
            requested: params.k,
            n_items: n,
        });
    }
    if params.max_iterations == 0 {
        return Err(Error::InvalidParameter {
            name: "max_iterations",
            message: "must be at least 1",
        });
    }
    let dims = vectors[0].len();
    if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dims) {
        return Err(Error::DimensionMismatch {
            id: format!("vector {}", i),
            expected: dims,
            found: v.len(),
        });
    }

    let k = params.k;
    let mut centroids: Vec<Centroid> = vectors[..k].iter().map(|v| v.to_vec()).collect();
    let mut labels = vec![0usize; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < params.max_iterations {
        iterations += 1;

        let mut changed = 0usize;
        for (label, vector) in labels.iter_mut().zip(vectors) {
            let best = nearest_centroid(vector, &centroids);
            if *label != best {
                *label = best;
                changed += 1;
            }
        }
        debug!(iteration = iterations, changed, "k-means assignment pass");

        if changed == 0 {
            converged = true;
            break;
        }

        update_centroids(vectors, &labels, &mut centroids);
    }

    if converged {
        update_centroids(vectors, &labels, &mut centroids);
    }

    Ok(KMeansResult {
        labels,
        centroids,
        iterations,
        converged,
    })
}

/// Index of the closest centroid; the lowest index wins ties.
fn nearest_centroid(vector: &[f32], centroids: &[Centroid]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (j, centroid) in centroids.iter().enumerate() {
        let dist = euclidean_distance(vector, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = j;
        }
    }
    best
}

/// Replace each non-empty cluster's centroid with the mean of its members.
fn update_centroids(vectors: &[&[f32]], labels: &[usize], centroids: &mut [Centroid]) {
    let dims = centroids.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0f64; dims]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (vector, &label) in vectors.iter().zip(labels) {
        counts[label] += 1;
        for (acc, &x) in sums[label].iter_mut().zip(vector.iter()) {
            *acc += f64::from(x);
        }
    }

    for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
        if count == 0 {
            continue;
        }
        for (c, &s) in centroid.iter_mut().zip(sum) {
            *c = (s / count as f64) as f32;
        }
    }
}
