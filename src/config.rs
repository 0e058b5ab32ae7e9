//! TOML configuration.
//!
//! Every section has defaults, so a minimal file only needs `[corpus].dir`:
//!
//! ```toml
//! [corpus]
//! dir = "./data/cases"
//! dims = 3072
//!
//! [db]
//! path = "./data/caselens.sqlite"
//!
//! [embedding]
//! provider = "openai"            # disabled | openai | ollama
//! model = "text-embedding-3-large"
//!
//! [labeling]
//! provider = "openai"            # disabled | openai
//! model = "gpt-4o"
//! fallback_label = "unclassified"
//!
//! [clustering]
//! clusters = 5
//! max_iterations = 100
//!
//! [retrieval]
//! final_limit = 5
//! strategy = "index"             # brute | index
//!
//! [server]
//! bind = "127.0.0.1:9989"
//! ```
//!
//! API keys are never stored in the file: `api_key_env` names the
//! environment variable that holds them.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub labeling: LabelingConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    /// Directory of `<id>.json` case files.
    pub dir: PathBuf,
    #[serde(default = "default_dims")]
    pub dims: usize,
    /// Cases whose summary is not longer than this many UTF-8 bytes are skipped.
    #[serde(default = "default_min_summary_bytes")]
    pub min_summary_bytes: usize,
}

fn default_dims() -> usize {
    3072
}
fn default_min_summary_bytes() -> usize {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/caselens.sqlite")
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_disabled")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    /// Base URL override (Ollama, or an OpenAI-compatible gateway).
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_disabled(),
            model: None,
            url: None,
            api_key_env: default_api_key_env(),
            max_input_chars: default_max_input_chars(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LabelingConfig {
    #[serde(default = "default_disabled")]
    pub provider: String,
    #[serde(default = "default_label_model")]
    pub model: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_title_prompt")]
    pub prompt: String,
    #[serde(default = "default_fallback_label")]
    pub fallback_label: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            provider: default_disabled(),
            model: default_label_model(),
            url: None,
            api_key_env: default_api_key_env(),
            system_prompt: default_system_prompt(),
            prompt: default_title_prompt(),
            fallback_label: default_fallback_label(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_disabled() -> String {
    "disabled".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_max_input_chars() -> usize {
    8191
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_label_model() -> String {
    "gpt-4o".to_string()
}
fn default_system_prompt() -> String {
    "You are a helpful assistant that creates concise titles in traditional Chinese.".to_string()
}
fn default_title_prompt() -> String {
    "請幫我用10個繁體中文字，為這篇內容下標題，請僅回傳標題即可".to_string()
}
fn default_fallback_label() -> String {
    caselens_core::cluster::DEFAULT_FALLBACK_LABEL.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClusteringConfig {
    #[serde(default = "default_clusters")]
    pub clusters: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_representatives")]
    pub representatives: usize,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            clusters: default_clusters(),
            max_iterations: default_max_iterations(),
            representatives: default_representatives(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_clusters() -> usize {
    5
}
fn default_max_iterations() -> usize {
    100
}
fn default_representatives() -> usize {
    3
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_final_limit")]
    pub final_limit: usize,
    /// `brute` ranks the corpus directory in memory; `index` uses SQLite.
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            final_limit: default_final_limit(),
            strategy: default_strategy(),
        }
    }
}

fn default_final_limit() -> usize {
    5
}
fn default_strategy() -> String {
    "index".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Page served at `/` when no query is given.
    #[serde(default = "default_index_html")]
    pub index_html: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            index_html: default_index_html(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:9989".to_string()
}
fn default_index_html() -> PathBuf {
    PathBuf::from("public/index.html")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.corpus.dims == 0 {
        bail!("corpus.dims must be > 0");
    }

    if config.clustering.clusters == 0 {
        bail!("clustering.clusters must be >= 1");
    }
    if config.clustering.max_iterations == 0 {
        bail!("clustering.max_iterations must be >= 1");
    }
    if config.clustering.representatives == 0 {
        bail!("clustering.representatives must be >= 1");
    }

    if config.retrieval.final_limit == 0 {
        bail!("retrieval.final_limit must be >= 1");
    }
    match config.retrieval.strategy.as_str() {
        "brute" | "index" => {}
        other => bail!(
            "Unknown retrieval strategy: '{}'. Must be brute or index.",
            other
        ),
    }

    if config.embedding.is_enabled() && config.embedding.model.is_none() {
        bail!(
            "embedding.model must be specified when provider is '{}'",
            config.embedding.provider
        );
    }
    match config.embedding.provider.as_str() {
        "disabled" | "openai" | "ollama" => {}
        other => bail!(
            "Unknown embedding provider: '{}'. Must be disabled, openai, or ollama.",
            other
        ),
    }

    match config.labeling.provider.as_str() {
        "disabled" | "openai" => {}
        other => bail!(
            "Unknown labeling provider: '{}'. Must be disabled or openai.",
            other
        ),
    }
    if config.labeling.fallback_label.trim().is_empty() {
        bail!("labeling.fallback_label must not be empty");
    }

    Ok(())
}
