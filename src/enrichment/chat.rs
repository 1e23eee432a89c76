//! OpenAI-compatible chat completions client used as the feature service.
//!
//! Works with Groq (the default), OpenAI, OpenRouter and any other service
//! implementing the chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    prompt::{build_feature_prompt, parse_feature_response},
    service::FeatureService,
};
use crate::{config::ServiceConfig, data::types::SongFeatures, error::ServiceError};

/// Feature service backed by a chat completions endpoint
pub struct ChatFeatureService {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    api_key_var: String,
    timeout: Duration,
    temperature: Option<f32>,
}

impl ChatFeatureService {
    /// Create a client for `base_url` (e.g. "https://api.groq.com/openai/v1")
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            api_key_var: "GROQ_API_KEY".to_string(),
            timeout: Duration::from_secs(60),
            temperature: None,
        }
    }

    /// Create a client from configuration, reading the API key from the
    /// environment variable the configuration names
    ///
    /// A missing key is not an error here: lookups that never reach the
    /// service still work, and calls fail with [`ServiceError::MissingApiKey`].
    pub fn from_config(config: &ServiceConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        let mut service = Self::new(&config.base_url, &config.model, api_key);
        service.api_key_var = config.api_key_env.clone();
        service.timeout = Duration::from_secs(config.timeout_secs);
        service.temperature = config.temperature;
        service
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user message and return the first choice's content
    async fn complete(&self, prompt: String) -> Result<String, ServiceError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| ServiceError::MissingApiKey {
            var: self.api_key_var.clone(),
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage { role: "user".to_string(), content: prompt }],
            temperature: self.temperature,
        };

        debug!(model = %self.model, "Sending feature request to chat completions API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout
                } else {
                    ServiceError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ServiceError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status: status.as_u16(), message: body });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(format!("Failed to parse chat response: {}", e)))?;

        let choice = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::InvalidResponse("No choices in chat response".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl FeatureService for ChatFeatureService {
    fn name(&self) -> &str {
        "chat-completions"
    }

    async fn generate_features(&self, title: &str, artist: &str) -> Result<SongFeatures, ServiceError> {
        let content = self.complete(build_feature_prompt(title, artist)).await?;
        debug!(title, artist, chars = content.len(), "Received feature response");
        parse_feature_response(&content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
