use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{MAX_TOKENS, TEMPERATURE};
use crate::error::{Error, Result};

#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

/// OpenAI legacy completions endpoint. No timeout and no retries.
pub struct OpenAiCompletions {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletions {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl CompletionModel for OpenAiCompletions {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        debug!("Requesting completion from {} ({})", self.base_url, self.model);

        let response = self
            .client
            .post(format!("{}/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text.trim().to_string())
            .ok_or(Error::EmptyCompletion)
    }
}
