use crate::error::{CorrectorError, Result};
use crate::prompt::DEFAULT_PROMPT_TEMPLATE;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub oracle: OracleConfig,
    pub brands: BrandsConfig,
    #[serde(default)]
    pub correction: CorrectionConfig,
}

#[derive(Debug, Deserialize)]
pub struct OracleConfig {
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct BrandsConfig {
    /// Canonical brand spellings, in the order they appear in the prompt.
    pub known: Vec<String>,
    /// Optional brand directory page scraped for extra names.
    pub directory_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CorrectionConfig {
    #[serde(default = "default_target_column")]
    pub target_column: String,
    #[serde(default = "default_autofit")]
    pub autofit: bool,
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            target_column: default_target_column(),
            autofit: default_autofit(),
            prompt_template: default_prompt_template(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

fn default_target_column() -> String {
    "brand".to_string()
}

fn default_autofit() -> bool {
    true
}

fn default_prompt_template() -> String {
    DEFAULT_PROMPT_TEMPLATE.to_string()
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CorrectorError::Config(format!("Failed to read config file '{}': {}", config_path, e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        if config.brands.known.is_empty() && config.brands.directory_url.is_none() {
            return Err(CorrectorError::Config(
                "brands.known is empty and no directory_url is set".to_string(),
            ));
        }
        Ok(config)
    }
}
