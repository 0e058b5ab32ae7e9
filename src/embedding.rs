//! Query embedding providers.
//!
//! Case vectors arrive pre-computed in the corpus files; this module only
//! embeds free-text search queries so they can be ranked against them.
//!
//! - **[`DisabledProvider`]** returns errors; used when embeddings are not configured.
//! - **[`OpenAIProvider`]** calls the OpenAI embeddings API.
//! - **[`OllamaProvider`]** calls a local Ollama instance's `/api/embed` endpoint.
//!
//! # Retry Strategy
//!
//! Remote calls go through [`post_json_with_retry`]:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// A backend that turns text into a vector comparable with the corpus.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the model identifier (e.g. `"text-embedding-3-large"`).
    fn model_name(&self) -> &str;

    /// Embed one text. Input longer than the configured limit is truncated.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Cut `text` to at most `max_chars` characters, on a char boundary.
pub fn truncate_input(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Embed a query and check it against the corpus dimensionality.
pub async fn embed_query(
    provider: &dyn EmbeddingProvider,
    text: &str,
    dims: usize,
) -> Result<Vec<f32>> {
    let vector = provider.embed(text).await?;
    if vector.len() != dims {
        bail!(
            "{} returned a {}-dimensional vector, corpus uses {}",
            provider.model_name(),
            vector.len(),
            dims
        );
    }
    Ok(vector)
}

// ============ Disabled Provider ============

pub struct DisabledProvider;

#[async_trait]
impl EmbeddingProvider for DisabledProvider {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        bail!("Embedding provider is disabled; free-text queries need [embedding] configured")
    }
}

// ============ OpenAI Provider ============

/// Embedding provider using the OpenAI API (`POST /v1/embeddings`).
///
/// The API key is read once, from the environment variable named by
/// `embedding.api_key_env`, when the provider is built.
pub struct OpenAIProvider {
    client: reqwest::Client,
    model: String,
    base_url: String,
    api_key: String,
    max_input_chars: usize,
    max_retries: u32,
}

impl OpenAIProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow!("embedding.model required for OpenAI provider"))?;
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| anyhow!("{} environment variable not set", config.api_key_env))?;

        Ok(Self {
            client: http_client(config.timeout_secs)?,
            model,
            base_url: config
                .url
                .clone()
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            api_key,
            max_input_chars: config.max_input_chars,
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": truncate_input(text, self.max_input_chars),
        });
        let json = post_json_with_retry(
            &self.client,
            &format!("{}/v1/embeddings", self.base_url),
            Some(&self.api_key),
            &body,
            self.max_retries,
            "OpenAI",
        )
        .await?;
        parse_openai_response(&json)
    }
}

/// Extract `data[0].embedding` from an embeddings response.
fn parse_openai_response(json: &serde_json::Value) -> Result<Vec<f32>> {
    let embedding = json
        .get("data")
        .and_then(|d| d.as_array())
        .and_then(|d| d.first())
        .and_then(|item| item.get("embedding"))
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow!("Invalid OpenAI response: missing data[0].embedding"))?;

    to_f32_vec(embedding)
}

// ============ Ollama Provider ============

/// Embedding provider using a local Ollama instance (`POST /api/embed`).
pub struct OllamaProvider {
    client: reqwest::Client,
    model: String,
    url: String,
    max_input_chars: usize,
    max_retries: u32,
}

impl OllamaProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow!("embedding.model required for Ollama provider"))?;

        Ok(Self {
            client: http_client(config.timeout_secs)?,
            model,
            url: config
                .url
                .clone()
                .unwrap_or_else(|| OLLAMA_BASE_URL.to_string()),
            max_input_chars: config.max_input_chars,
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": [truncate_input(text, self.max_input_chars)],
        });
        let json = post_json_with_retry(
            &self.client,
            &format!("{}/api/embed", self.url),
            None,
            &body,
            self.max_retries,
            "Ollama",
        )
        .await?;
        parse_ollama_response(&json)
    }
}

fn parse_ollama_response(json: &serde_json::Value) -> Result<Vec<f32>> {
    let embedding = json
        .get("embeddings")
        .and_then(|e| e.as_array())
        .and_then(|e| e.first())
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow!("Invalid Ollama response: missing embeddings array"))?;

    to_f32_vec(embedding)
}

fn to_f32_vec(values: &[serde_json::Value]) -> Result<Vec<f32>> {
    values
        .iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| anyhow!("Invalid embedding component: {}", v))
        })
        .collect()
}

// ============ Shared HTTP ============

pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// POST a JSON body and return the parsed JSON response, retrying
/// rate limits, server errors, and network failures with exponential backoff.
pub(crate) async fn post_json_with_retry(
    client: &reqwest::Client,
    url: &str,
    bearer: Option<&str>,
    body: &serde_json::Value,
    max_retries: u32,
    service: &str,
) -> Result<serde_json::Value> {
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            debug!(service, attempt, delay_secs = delay.as_secs(), "retrying request");
            tokio::time::sleep(delay).await;
        }

        let mut request = client.post(url).json(body);
        if let Some(key) = bearer {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    return Ok(response.json().await?);
                }

                let body_text = response.text().await.unwrap_or_default();
                if status.as_u16() == 429 || status.is_server_error() {
                    warn!(service, %status, attempt, "transient API error");
                    last_err = Some(anyhow!("{} API error {}: {}", service, status, body_text));
                    continue;
                }

                bail!("{} API error {}: {}", service, status, body_text);
            }
            Err(e) => {
                warn!(service, error = %e, attempt, "request failed");
                last_err = Some(anyhow!("{} connection error ({}): {}", service, url, e));
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow!("{} request failed after retries", service)))
}

/// Create the [`EmbeddingProvider`] named by `embedding.provider`.
///
/// | Config Value | Provider |
/// |-------------|----------|
/// | `"disabled"` | [`DisabledProvider`] |
/// | `"openai"` | [`OpenAIProvider`] |
/// | `"ollama"` | [`OllamaProvider`] |
pub fn create_provider(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledProvider)),
        "openai" => Ok(Box::new(OpenAIProvider::new(config)?)),
        "ollama" => Ok(Box::new(OllamaProvider::new(config)?)),
        other => bail!("Unknown embedding provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_input_counts_chars() {
        assert_eq!(truncate_input("abcdef", 3), "abc");
        assert_eq!(truncate_input("abc", 10), "abc");
        assert_eq!(truncate_input("判決書內容", 2), "判決");
        assert_eq!(truncate_input("", 5), "");
    }

    #[test]
    fn test_parse_openai_response() {
        let json = serde_json::json!({
            "data": [{"index": 0, "embedding": [0.5, -1.0, 2.0]}]
        });
        assert_eq!(parse_openai_response(&json).unwrap(), vec![0.5, -1.0, 2.0]);
        assert!(parse_openai_response(&serde_json::json!({"data": []})).is_err());
    }

    #[test]
    fn test_parse_ollama_response() {
        let json = serde_json::json!({"embeddings": [[1.0, 2.0]]});
        assert_eq!(parse_ollama_response(&json).unwrap(), vec![1.0, 2.0]);
        let bad = serde_json::json!({"embeddings": [["x"]]});
        assert!(parse_ollama_response(&bad).is_err());
    }

    #[tokio::test]
    async fn test_disabled_provider_errors() {
        let provider = create_provider(&EmbeddingConfig::default()).unwrap();
        assert_eq!(provider.model_name(), "disabled");
        let err = embed_query(provider.as_ref(), "query", 3).await.unwrap_err();
        assert!(err.to_string().contains("disabled"));
    }

    #[test]
    fn test_openai_requires_key_env() {
        let config = EmbeddingConfig {
            provider: "openai".to_string(),
            model: Some("text-embedding-3-large".to_string()),
            api_key_env: "CASELENS_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..EmbeddingConfig::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("CASELENS_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
