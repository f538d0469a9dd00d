// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Live generation backends

use crate::config::{BackendConfig, BackendKind};
use crate::errors::GenerationError;
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub mod ollama;
pub mod openai;
pub mod prompts;
pub mod response;

pub use ollama::OllamaBackend;
pub use openai::ChatCompletionsBackend;

/// Which plan a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    Daily,
    Weekly,
}

impl PlanKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

/// Prompt handed to a backend
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub request_id: String,
    pub kind: PlanKind,
    pub prompt: String,
}

/// A service able to turn a prompt into a JSON plan
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate a plan and return the JSON object found in the reply
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError>;

    fn name(&self) -> &str;

    fn model(&self) -> &str;
}

/// Single user turn, shared by both chat APIs
#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

/// Build the backend selected by configuration; `None` means mock only
pub fn create_backend(config: &BackendConfig) -> Result<Option<Arc<dyn GenerationBackend>>> {
    match config.kind {
        BackendKind::None => Ok(None),
        BackendKind::OpenAi => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("An API key is required for the openai backend"))?;
            Ok(Some(Arc::new(ChatCompletionsBackend::new(
                config.base_url(),
                api_key,
                config.model(),
                config.request_timeout_seconds,
            )?)))
        }
        BackendKind::Ollama => Ok(Some(Arc::new(OllamaBackend::new(
            config.base_url(),
            config.model(),
            config.request_timeout_seconds,
        )?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_backend_follows_kind() {
        let mut config = BackendConfig::default();
        assert!(create_backend(&config).unwrap().is_none());

        config.kind = BackendKind::Ollama;
        let backend = create_backend(&config).unwrap().unwrap();
        assert_eq!(backend.name(), "ollama");
        assert_eq!(backend.model(), "llama3");

        config.kind = BackendKind::OpenAi;
        assert!(create_backend(&config).is_err());

        config.api_key = Some("test-key".to_string());
        let backend = create_backend(&config).unwrap().unwrap();
        assert_eq!(backend.name(), "openai");
    }
}
