//! # caselens
//!
//! Clustering and similarity search over legal case summaries that already
//! carry an embedding vector.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ <id>.json    │──▶│   import     │──▶│   SQLite     │
//! │ case files   │   │              │   │  cases table │
//! └──────┬───────┘   └──────────────┘   └──────┬───────┘
//!        │                                     │
//!        ▼                                     ▼
//!  ┌───────────┐                        ┌─────────────┐
//!  │  cluster  │                        │   search    │
//!  │ k-means + │                        │ brute/index │
//!  │  labeler  │                        └──────┬──────┘
//!  └───────────┘                        ┌──────┴──────┐
//!                                       ▼             ▼
//!                                   ┌──────┐     ┌────────┐
//!                                   │ CLI  │     │  HTTP  │
//!                                   └──────┘     └────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! caselens init                       # create database
//! caselens import                     # index the corpus directory
//! caselens cluster --clusters 8       # write cluster-*.json
//! caselens search "詐欺取財"
//! caselens serve                      # HTTP on 127.0.0.1:9989
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`loader`] | Case file loading and filtering |
//! | [`embedding`] | Query embedding providers |
//! | [`labeler`] | Chat-model cluster labeler |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite-backed vector store |
//! | [`import`] | Corpus import into SQLite |
//! | [`cluster_cmd`] | Clustering command and output files |
//! | [`search`] | Query-by-id and free-text similarity search |
//! | [`server`] | HTTP search server |
//!
//! Algorithms (k-means, representative selection, ranking) live in
//! `caselens-core`.

pub mod cluster_cmd;
pub mod config;
pub mod db;
pub mod embedding;
pub mod import;
pub mod labeler;
pub mod loader;
pub mod migrate;
pub mod search;
pub mod server;
pub mod sqlite_store;
