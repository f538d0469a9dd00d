// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! OpenAI-compatible chat completions client (hosted Open WebUI endpoint)

use super::response::extract_json;
use super::{ChatMessage, GenerationBackend, GenerationRequest};
use crate::errors::GenerationError;
use crate::logging::AppLogger;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub struct ChatCompletionsBackend {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsBackend {
    pub fn new(base_url: &str, api_key: String, model: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model: model.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(prompt)],
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::BackendUnavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                backend.name = "openai",
                http.status = %status,
                body = %text,
                "Generation backend returned an error status"
            );
            return Err(GenerationError::BackendUnavailable(format!("HTTP {}", status)));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            GenerationError::BackendUnavailable(format!("unreadable completion: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::BackendUnavailable("completion carried no message content".into())
            })
    }
}

#[async_trait]
impl GenerationBackend for ChatCompletionsBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError> {
        debug!(
            request.id = %request.request_id,
            plan.kind = request.kind.as_str(),
            endpoint = %self.endpoint,
            "Calling chat completions endpoint"
        );

        let started = Instant::now();
        let result = self.complete(&request.prompt).await;
        AppLogger::log_backend_call(
            self.name(),
            &self.model,
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );

        extract_json(&result?)
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
