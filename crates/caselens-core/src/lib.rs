//! # caselens core
//!
//! The numerical engine shared by clustering and similarity search:
//! vector math, deterministic k-means, representative-document selection,
//! cluster building, and top-k ranking.
//!
//! This crate contains no tokio, sqlx, HTTP, or filesystem dependencies.
//! Collaborators that talk to the outside world (the labeling service, a
//! persistent vector index) plug in through the [`cluster::Labeler`] and
//! [`store::Store`] traits.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`vector`] | Distance/similarity primitives, corpus validation, BLOB codec |
//! | [`kmeans`] | K-means partitioning with first-K seeding |
//! | [`representative`] | N documents closest to a reference vector |
//! | [`keywords`] | Splitting a label response into keywords |
//! | [`cluster`] | Named, keyworded clusters plus the document → cluster index |
//! | [`search`] | Brute-force and index-backed top-k ranking |
//! | [`store`] | Vector index abstraction and in-memory implementation |

pub mod cluster;
pub mod error;
pub mod keywords;
pub mod kmeans;
pub mod models;
pub mod representative;
pub mod search;
pub mod store;
pub mod vector;

pub use error::{Error, Result};
