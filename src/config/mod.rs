mod amap;
mod api;
mod defaults;
mod storage;
mod validation;

use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

pub use amap::{AmapConfig, AmapFileConfig};
pub use api::{ApiConfig, ModelConfig, SessionConfig};
pub use storage::{StorageConfig, StorageFileConfig};
pub use validation::expand_env_var_in_string;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default = "defaults::default_tools_enabled")]
    pub enabled: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::default_tools_enabled(),
        }
    }
}

pub struct Config {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub stream_timeout: u64,
    pub verbose: bool,
    pub tools_enabled: bool,
    pub amap: AmapConfig,
    pub storage: StorageConfig,
    prompts: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub amap: AmapFileConfig,
    #[serde(default)]
    pub storage: StorageFileConfig,
    #[serde(default)]
    pub prompts: HashMap<String, String>,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self, String> {
        // Load the file configuration first
        let file_config = FileConfig::load().unwrap_or_default();

        // API key is required and comes from the environment only
        let api_key =
            env::var("AI_API_KEY").map_err(|_| "AI_API_KEY environment variable not set")?;

        // API endpoint: env var > config file > default
        let api_endpoint = env::var("AI_API_ENDPOINT")
            .ok()
            .or_else(|| {
                file_config
                    .api
                    .endpoint
                    .as_deref()
                    .map(expand_env_var_in_string)
            })
            .map(|endpoint| {
                // Accept both a base URL and a full completions URL
                if endpoint.ends_with("/chat/completions") {
                    endpoint
                } else if endpoint.ends_with("/v1") || endpoint.ends_with("compatible-mode/v1") {
                    format!("{}/chat/completions", endpoint)
                } else {
                    format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'))
                }
            })
            .unwrap_or_else(|| defaults::API_ENDPOINT.to_string());

        // Model: env var > config file > default
        let model = env::var("AI_MODEL")
            .ok()
            .or(file_config.model.default_model.clone())
            .unwrap_or_else(|| defaults::MODEL.to_string());

        // Stream timeout: env var > config file > default
        let stream_timeout = env::var("AI_STREAM_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.api.stream_timeout)
            .unwrap_or_else(defaults::default_stream_timeout);

        // Verbose: CLI flag > env var > config file
        let verbose = args.verbose
            || env::var("AI_VERBOSE")
                .ok()
                .map(|v| v == "true")
                .or(file_config.session.verbose)
                .unwrap_or(false);

        // Tools: --no-tools wins, then env var, then config file
        let tools_enabled = if args.no_tools {
            false
        } else {
            match env::var("AI_TOOLS_ENABLED").ok() {
                Some(v) => matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"),
                None => file_config.tools.enabled,
            }
        };

        let amap = AmapConfig {
            key: env::var("AMAP_API_KEY")
                .ok()
                .or_else(|| file_config.amap.key.as_deref().map(expand_env_var_in_string))
                .unwrap_or_default()
                .trim()
                .to_string(),
            endpoint: file_config
                .amap
                .endpoint
                .clone()
                .unwrap_or_else(|| defaults::AMAP_ENDPOINT.to_string()),
        };

        let storage_defaults = StorageConfig::default();
        let storage = StorageConfig {
            history_file: env::var("AI_HISTORY_FILE")
                .ok()
                .map(PathBuf::from)
                .or(file_config.storage.history_file.clone())
                .unwrap_or(storage_defaults.history_file),
            memory_file: env::var("AI_MEMORY_FILE")
                .ok()
                .map(PathBuf::from)
                .or(file_config.storage.memory_file.clone())
                .unwrap_or(storage_defaults.memory_file),
        };

        Ok(Config {
            api_key,
            api_endpoint,
            model,
            stream_timeout,
            verbose,
            tools_enabled,
            amap,
            storage,
            prompts: file_config.prompts,
        })
    }

    /// System prompt for a category: a config-file override if present,
    /// otherwise the built-in prompt for that category.
    pub fn system_prompt(&self, category: &str) -> String {
        self.prompts
            .get(category)
            .cloned()
            .unwrap_or_else(|| defaults::system_prompt(category).to_string())
    }

    pub fn get_current_date() -> String {
        chrono::Local::now().format("%A, %B %d, %Y").to_string()
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        let config_paths = Self::get_config_paths();

        for path in config_paths {
            if path.exists() {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

                let extension = path.extension().and_then(|s| s.to_str());
                let config: FileConfig = if extension == Some("yaml") || extension == Some("yml") {
                    serde_yaml::from_str(&contents).with_context(|| {
                        format!("Failed to parse YAML config file: {}", path.display())
                    })?
                } else {
                    serde_json::from_str(&contents).with_context(|| {
                        format!("Failed to parse JSON config file: {}", path.display())
                    })?
                };

                return Ok(config);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Current directory (local override)
        paths.push(PathBuf::from(".wayfarer.yaml"));
        paths.push(PathBuf::from(".wayfarer.yml"));
        paths.push(PathBuf::from(".wayfarer.json"));

        // 2. User's config directory
        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("wayfarer");
            paths.push(config_dir.join("wayfarer.yaml"));
            paths.push(config_dir.join("wayfarer.yml"));
            paths.push(config_dir.join("wayfarer.json"));
        }

        paths
    }
}
