// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration for worker deployments

use crate::constants::{defaults, env_keys};
use crate::planner::GeneratorSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// What to do when the live generation backend fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendFailurePolicy {
    /// Surface the failure as a server error
    #[default]
    Fail,
    /// Serve a mock plan instead
    FallbackToMock,
}

impl FromStr for BackendFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "fallback_to_mock" | "fallback" => Ok(Self::FallbackToMock),
            other => Err(anyhow::anyhow!(
                "Unknown backend failure policy '{}', expected fail or fallback_to_mock",
                other
            )),
        }
    }
}

/// How to treat sport-type tokens the planner has no catalog for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportTypePolicy {
    /// Keep the token verbatim and plan with the STRENGTH catalog
    #[default]
    PassThrough,
    /// Reject the request as an invalid value
    Reject,
}

impl FromStr for SportTypePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pass_through" | "passthrough" => Ok(Self::PassThrough),
            "reject" => Ok(Self::Reject),
            other => Err(anyhow::anyhow!(
                "Unknown sport type policy '{}', expected pass_through or reject",
                other
            )),
        }
    }
}

/// Which live generation backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// No live backend, mock synthesis only
    #[default]
    None,
    /// OpenAI-compatible chat completions endpoint (hosted Open WebUI)
    #[serde(rename = "openai")]
    OpenAi,
    /// Local Ollama runtime
    Ollama,
}

impl BackendKind {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::None => "",
            Self::OpenAi => defaults::OPENAI_BASE_URL,
            Self::Ollama => defaults::OLLAMA_HOST,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::None => "mock",
            Self::OpenAi => defaults::OPENAI_MODEL,
            Self::Ollama => defaults::OLLAMA_MODEL,
        }
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" | "mock" => Ok(Self::None),
            "openai" | "open_webui" | "cloud" => Ok(Self::OpenAi),
            "ollama" | "local" => Ok(Self::Ollama),
            other => Err(anyhow::anyhow!(
                "Unknown LLM backend '{}', expected none, openai or ollama",
                other
            )),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listener and request policy
    pub server: HttpConfig,
    /// Generation behaviour
    pub generation: GenerationConfig,
    /// Live backend connection
    pub backend: BackendConfig,
    /// Built-in knowledge base
    pub knowledge: KnowledgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Reject requests without an Authorization header
    pub require_authorization: bool,
    /// CORS allowed origins
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Always synthesize plans locally
    pub mock_mode: bool,
    pub on_backend_failure: BackendFailurePolicy,
    pub sport_type_policy: SportTypePolicy,
    /// Used when a request carries no duration
    pub default_duration_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Base URL; falls back to the default of `kind`
    pub base_url: Option<String>,
    /// Bearer key for the hosted endpoint
    pub api_key: Option<String>,
    /// Model name; falls back to the default of `kind`
    pub model: Option<String>,
    /// Upper bound for one backend call
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Serve and use the built-in fitness knowledge base
    pub enabled: bool,
    /// Snippets added to a backend prompt
    pub default_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: HttpConfig::default(),
            generation: GenerationConfig::default(),
            backend: BackendConfig::default(),
            knowledge: KnowledgeConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::HTTP_PORT,
            require_authorization: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mock_mode: true,
            on_backend_failure: BackendFailurePolicy::default(),
            sport_type_policy: SportTypePolicy::default(),
            default_duration_minutes: defaults::DURATION_MINUTES,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::None,
            base_url: None,
            api_key: None,
            model: None,
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_limit: defaults::KNOWLEDGE_LIMIT,
        }
    }
}

impl BackendConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.kind.default_base_url())
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| self.kind.default_model())
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        // Load .env file if it exists
        if let Err(e) = dotenv::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let kind: BackendKind = var_or(env_keys::LLM_BACKEND, "none").parse()?;
        let base_url = match kind {
            BackendKind::Ollama => lookup(env_keys::OLLAMA_HOST).or_else(|| lookup(env_keys::LLM_BASE_URL)),
            _ => lookup(env_keys::LLM_BASE_URL),
        };

        let config = ServerConfig {
            server: HttpConfig {
                host: var_or(env_keys::HOST, defaults::HOST),
                port: var_or(env_keys::PORT, &defaults::HTTP_PORT.to_string())
                    .parse()
                    .context("Invalid PORT value")?,
                require_authorization: var_or(env_keys::REQUIRE_AUTHORIZATION, "true")
                    .parse()
                    .context("Invalid REQUIRE_AUTHORIZATION value")?,
                cors_origins: parse_origins(&var_or(env_keys::CORS_ORIGINS, "*")),
            },
            generation: GenerationConfig {
                mock_mode: var_or(env_keys::MOCK_MODE, "true")
                    .to_lowercase()
                    .parse()
                    .context("Invalid MOCK_MODE value")?,
                on_backend_failure: var_or(env_keys::ON_BACKEND_FAILURE, "fail")
                    .parse()
                    .context("Invalid ON_BACKEND_FAILURE value")?,
                sport_type_policy: var_or(env_keys::SPORT_TYPE_POLICY, "pass_through")
                    .parse()
                    .context("Invalid SPORT_TYPE_POLICY value")?,
                default_duration_minutes: var_or(
                    env_keys::DEFAULT_DURATION_MINUTES,
                    &defaults::DURATION_MINUTES.to_string(),
                )
                .parse()
                .context("Invalid DEFAULT_DURATION_MINUTES value")?,
            },
            backend: BackendConfig {
                kind,
                base_url,
                api_key: lookup(env_keys::CHAIR_API_KEY).or_else(|| lookup(env_keys::LLM_API_KEY)),
                model: lookup(env_keys::MODEL_NAME),
                request_timeout_seconds: var_or(
                    env_keys::LLM_TIMEOUT_SECONDS,
                    &defaults::REQUEST_TIMEOUT_SECONDS.to_string(),
                )
                .parse()
                .context("Invalid LLM_TIMEOUT_SECONDS value")?,
            },
            knowledge: KnowledgeConfig {
                enabled: var_or(env_keys::KNOWLEDGE_BASE_ENABLED, "true")
                    .to_lowercase()
                    .parse()
                    .context("Invalid KNOWLEDGE_BASE_ENABLED value")?,
                default_limit: var_or(
                    env_keys::KNOWLEDGE_SEARCH_LIMIT,
                    &defaults::KNOWLEDGE_LIMIT.to_string(),
                )
                .parse()
                .context("Invalid KNOWLEDGE_SEARCH_LIMIT value")?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("PORT cannot be 0"));
        }

        if self.server.cors_origins.is_empty() {
            return Err(anyhow::anyhow!("CORS_ORIGINS cannot be empty"));
        }

        if self.generation.default_duration_minutes <= 0 {
            return Err(anyhow::anyhow!("DEFAULT_DURATION_MINUTES must be positive"));
        }

        if self.backend.kind != BackendKind::None {
            url::Url::parse(self.backend.base_url())
                .with_context(|| format!("Invalid backend base URL: {}", self.backend.base_url()))?;

            if self.backend.request_timeout_seconds == 0 {
                return Err(anyhow::anyhow!("LLM_TIMEOUT_SECONDS must be positive"));
            }
        }

        if self.backend.kind == BackendKind::OpenAi && self.backend.api_key.is_none() {
            return Err(anyhow::anyhow!(
                "CHAIR_API_KEY is required for the openai backend"
            ));
        }

        if !self.generation.mock_mode && self.backend.kind == BackendKind::None {
            warn!(
                "Mock mode is disabled but no LLM backend is configured; requests will {}",
                match self.generation.on_backend_failure {
                    BackendFailurePolicy::Fail => "fail with 503",
                    BackendFailurePolicy::FallbackToMock => "fall back to mock plans",
                }
            );
        }

        Ok(())
    }

    /// Settings handed to the plan generator
    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            mock_mode: self.generation.mock_mode,
            on_backend_failure: self.generation.on_backend_failure,
            sport_type_policy: self.generation.sport_type_policy,
            default_duration_minutes: self.generation.default_duration_minutes,
            knowledge_limit: self.knowledge.default_limit,
        }
    }

    /// Get a summary of the configuration for logging (without secrets)
    pub fn summary(&self) -> String {
        format!(
            "GenAI Workout Worker Configuration:\n\
             - Listen: {}:{}\n\
             - Authorization: {}\n\
             - Mock Mode: {}\n\
             - Backend: {} ({})\n\
             - Model: {}\n\
             - API Key: {}\n\
             - On Backend Failure: {:?}\n\
             - Sport Type Policy: {:?}\n\
             - Knowledge Base: {}",
            self.server.host,
            self.server.port,
            if self.server.require_authorization { "Required" } else { "Permissive" },
            if self.generation.mock_mode { "Enabled" } else { "Disabled" },
            self.backend.kind,
            if self.backend.kind == BackendKind::None { "-" } else { self.backend.base_url() },
            self.backend.model(),
            if self.backend.api_key.is_some() { "Configured" } else { "Not set" },
            self.generation.on_backend_failure,
            self.generation.sport_type_policy,
            if self.knowledge.enabled { "Enabled" } else { "Disabled" }
        )
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_string()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://app.example.com"),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.server.port, defaults::HTTP_PORT);
        assert!(config.server.require_authorization);
        assert!(config.generation.mock_mode);
        assert_eq!(config.generation.on_backend_failure, BackendFailurePolicy::Fail);
        assert_eq!(config.generation.sport_type_policy, SportTypePolicy::PassThrough);
        assert_eq!(config.backend.kind, BackendKind::None);
        assert_eq!(config.backend.model(), "mock");
    }

    #[test]
    fn test_ollama_backend_from_environment() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("LLM_BACKEND", "ollama"),
            ("OLLAMA_HOST", "http://ollama:11434"),
            ("MODEL_NAME", "llama3.1"),
            ("MOCK_MODE", "False"),
            ("ON_BACKEND_FAILURE", "fallback_to_mock"),
            ("PORT", "8001"),
        ]))
        .unwrap();

        assert_eq!(config.backend.kind, BackendKind::Ollama);
        assert_eq!(config.backend.base_url(), "http://ollama:11434");
        assert_eq!(config.backend.model(), "llama3.1");
        assert!(!config.generation.mock_mode);
        assert_eq!(
            config.generation.on_backend_failure,
            BackendFailurePolicy::FallbackToMock
        );
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    fn test_openai_backend_requires_api_key() {
        let result = ServerConfig::from_lookup(lookup_from(&[("LLM_BACKEND", "openai")]));
        assert!(result.is_err());

        let config = ServerConfig::from_lookup(lookup_from(&[
            ("LLM_BACKEND", "openai"),
            ("CHAIR_API_KEY", "test-api-key"),
        ]))
        .unwrap();
        assert_eq!(config.backend.base_url(), defaults::OPENAI_BASE_URL);
        assert_eq!(config.backend.model(), defaults::OPENAI_MODEL);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[("SPORT_TYPE_POLICY", "lenient")])).is_err());
        assert!(
            ServerConfig::from_lookup(lookup_from(&[("DEFAULT_DURATION_MINUTES", "0")])).is_err()
        );
        assert!(ServerConfig::from_lookup(lookup_from(&[
            ("LLM_BACKEND", "ollama"),
            ("OLLAMA_HOST", "not a url"),
        ]))
        .is_err());
    }

    #[test]
    fn test_summary_hides_api_key() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("LLM_BACKEND", "openai"),
            ("CHAIR_API_KEY", "super-secret-key"),
        ]))
        .unwrap();

        let summary = config.summary();
        assert!(summary.contains("openai"));
        assert!(summary.contains("Configured"));
        assert!(!summary.contains("super-secret-key"));
    }
}
