// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the workout worker

pub mod environment;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub use environment::{
    BackendConfig, BackendFailurePolicy, BackendKind, GenerationConfig, HttpConfig,
    KnowledgeConfig, ServerConfig, SportTypePolicy,
};

impl ServerConfig {
    /// Load configuration from an explicit TOML file, the user config
    /// directory, or the environment, in that order
    pub fn load(path: Option<String>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from_file(&config_path);
        }

        match Self::default_config_path() {
            Some(default_path) if default_path.exists() => {
                Self::load_from_file(&default_path.to_string_lossy())
            }
            _ => Self::from_env(),
        }
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: ServerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config.validate()?;
        info!("Configuration loaded from {}", path);
        Ok(config)
    }

    /// `<config dir>/flexfit-genai-worker/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("flexfit-genai-worker").join("config.toml"))
    }

    /// Write the configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().context("Invalid config path")?;
        fs::create_dir_all(parent)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }
}
