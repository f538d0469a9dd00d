// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Local Ollama runtime client

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

pub struct OllamaBackend {
    client: Client,
    endpoint: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    /// Constrains the model to emit JSON
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

impl OllamaBackend {
    pub fn new(host: &str, model: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", host.trim_end_matches('/')),
            model: model.to_string(),
        })
    }

    async fn chat(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = OllamaChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(prompt)],
            stream: false,
            format: "json",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::BackendUnavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                backend.name = "ollama",
                http.status = %status,
                body = %text,
                "Ollama returned an error status"
            );
            return Err(GenerationError::BackendUnavailable(format!("HTTP {}", status)));
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::BackendUnavailable(format!("unreadable reply: {}", e)))?;

        parsed
            .message
            .map(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::BackendUnavailable("reply carried no message".into()))
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError> {
        debug!(
            request.id = %request.request_id,
            plan.kind = request.kind.as_str(),
            model = %self.model,
            "Calling Ollama"
        );

        let started = Instant::now();
        let result = self.chat(&request.prompt).await;
        AppLogger::log_backend_call(
            self.name(),
            &self.model,
            result.is_ok(),
            started.elapsed().as_millis() as u64,
        );

        extract_json(&result?)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
