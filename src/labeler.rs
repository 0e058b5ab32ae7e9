//! Cluster labeling through a chat-completions model.
//!
//! [`OpenAILabeler`] implements the core [`Labeler`] trait: it sends the
//! representative text of a cluster with a short title prompt and returns
//! the model's answer verbatim. Keyword splitting and fallback handling
//! happen in [`caselens_core::cluster::build_clusters`].

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use caselens_core::cluster::Labeler;

use crate::config::LabelingConfig;
use crate::embedding::{http_client, post_json_with_retry};

const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Labeler used when `labeling.provider = "disabled"`.
///
/// Every call fails, so every cluster receives the fallback label.
pub struct DisabledLabeler;

#[async_trait]
impl Labeler for DisabledLabeler {
    async fn label(&self, _text: &str) -> Result<String> {
        bail!("labeling provider is disabled")
    }
}

/// Labeler backed by `POST /v1/chat/completions`.
pub struct OpenAILabeler {
    client: reqwest::Client,
    model: String,
    base_url: String,
    api_key: String,
    system_prompt: String,
    prompt: String,
    max_retries: u32,
}

impl OpenAILabeler {
    pub fn new(config: &LabelingConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| anyhow!("{} environment variable not set", config.api_key_env))?;

        Ok(Self {
            client: http_client(config.timeout_secs)?,
            model: config.model.clone(),
            base_url: config
                .url
                .clone()
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            api_key,
            system_prompt: config.system_prompt.clone(),
            prompt: config.prompt.clone(),
            max_retries: config.max_retries,
        })
    }

    /// The cluster text and the title prompt go in as separate user turns,
    /// text first.
    fn request_body(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": self.system_prompt},
                {"role": "user", "content": text},
                {"role": "user", "content": self.prompt},
            ],
        })
    }
}

#[async_trait]
impl Labeler for OpenAILabeler {
    async fn label(&self, text: &str) -> Result<String> {
        let json = post_json_with_retry(
            &self.client,
            &format!("{}/v1/chat/completions", self.base_url),
            Some(&self.api_key),
            &self.request_body(text),
            self.max_retries,
            "OpenAI",
        )
        .await?;
        parse_chat_response(&json)
    }
}

/// Extract `choices[0].message.content`. An empty choice list is an error.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    let choice = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .ok_or_else(|| anyhow!("no completion choices returned"))?;

    choice
        .pointer("/message/content")
        .and_then(|c| c.as_str())
        .map(|c| c.trim().to_string())
        .ok_or_else(|| anyhow!("Invalid chat response: missing message content"))
}

/// Create the [`Labeler`] named by `labeling.provider`.
pub fn create_labeler(config: &LabelingConfig) -> Result<Box<dyn Labeler>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledLabeler)),
        "openai" => Ok(Box::new(OpenAILabeler::new(config)?)),
        other => bail!("Unknown labeling provider: {}", other),
    }
}
