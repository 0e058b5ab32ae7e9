//! # caselens CLI
//!
//! ## Usage
//!
//! ```bash
//! caselens --config ./config/caselens.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `caselens init` | Create the SQLite database and run schema migrations |
//! | `caselens import [--dir DIR]` | Load case files into the index |
//! | `caselens cluster` | Cluster the corpus and write cluster files |
//! | `caselens search "<query>"` | Rank cases by similarity to an id or text |
//! | `caselens serve` | Start the HTTP search server |
//!
//! Logs go to stderr; set `RUST_LOG` or pass `-v` for more detail.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use caselens::cluster_cmd::{self, ClusterOverrides};
use caselens::{config, import, migrate, search, server};

/// caselens: cluster and search embedded legal case summaries.
#[derive(Parser)]
#[command(
    name = "caselens",
    about = "Clustering and similarity search over embedded legal case summaries",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/caselens.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// Load case files into the SQLite index.
    ///
    /// Files that cannot be parsed, lack an embedding of the configured
    /// dimension, or have too short a summary are skipped with a warning.
    Import {
        /// Corpus directory (defaults to `[corpus].dir`).
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Cluster the corpus with k-means and label each cluster.
    ///
    /// Writes `cluster-index.json` and one `cluster-<id>.json` per cluster.
    Cluster {
        /// Number of clusters (defaults to `[clustering].clusters`).
        #[arg(long)]
        clusters: Option<usize>,

        /// Output directory (defaults to `[clustering].output_dir`).
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Find the cases most similar to a case id or a piece of text.
    Search {
        /// An 18-30 digit case id, or free text to embed.
        query: String,

        /// Number of results (defaults to `[retrieval].final_limit`).
        #[arg(long)]
        limit: Option<usize>,

        /// Ranking strategy: `brute` or `index`.
        #[arg(long)]
        strategy: Option<String>,

        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP search server on `[server].bind`.
    Serve,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import { dir } => {
            import::run_import(&cfg, dir.as_deref()).await?;
        }
        Commands::Cluster {
            clusters,
            output_dir,
        } => {
            let overrides = ClusterOverrides {
                clusters,
                output_dir,
            };
            cluster_cmd::run_cluster(&cfg, &overrides).await?;
        }
        Commands::Search {
            query,
            limit,
            strategy,
            json,
        } => {
            search::run_search(&cfg, &query, limit, strategy.as_deref(), json).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
