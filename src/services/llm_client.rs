// src/services/llm_client.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{config::Config, error::AppError, message::ChatMessage};

const COMPLETIONS_PATH: &str = "/chat/completions";

/// One round trip to a chat-completion model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], tools: &[Value]) -> Result<ChatMessage, AppError>;
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

fn no_tools(tools: &&[Value]) -> bool {
    tools.is_empty()
}

fn build_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), COMPLETIONS_PATH)
}

impl LlmClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: build_endpoint(base_url),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            &config.base_url,
            config.api_key.clone(),
            config.model.clone(),
            config.llm_timeout,
        )
    }

    fn headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| AppError::Collaborator(format!("invalid api key header: {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, messages: &[ChatMessage], tools: &[Value]) -> Result<ChatMessage, AppError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            tools,
            tool_choice: (!tools.is_empty()).then_some("auto"),
        };

        debug!(model = %self.model, messages = messages.len(), tools = tools.len(), "requesting completion");

        let resp = self
            .http
            .post(&self.endpoint)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::Collaborator(format!("Provider error {}: {}", status, text)));
        }

        let body: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Collaborator(format!("Invalid provider response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AppError::Collaborator("Response has no choices".to_string()))
    }
}
