//! Tripwise configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Tripwise configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Language model configuration
    pub llm: LlmConfig,

    /// Wizard defaults
    pub wizard: WizardConfig,

    /// Prompt template overrides
    pub prompts: PromptsConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// A missing API key is reported here so callers can surface it once;
    /// the wizard itself keeps running without one.
    pub fn validate(&self) -> Result<()> {
        self.llm.get_api_key().map(|_| ())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tripwise.yml
        let local_config = PathBuf::from(".tripwise.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tripwise/tripwise.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tripwise").join("tripwise.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed: the full load reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Language model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "gemini" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// File containing the API key, used when the environment variable is unset
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// Output token cap; provider default when unset
    #[serde(rename = "max-output-tokens")]
    pub max_output_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key_file: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_ms: 120_000,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

/// Where the API key was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    Env(String),
    File(PathBuf),
}

impl std::fmt::Display for ApiKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKeySource::Env(var) => write!(f, "environment variable {}", var),
            ApiKeySource::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: environment variable first, then the key file
    pub fn get_api_key(&self) -> Result<String> {
        self.resolve_api_key().map(|(key, _)| key)
    }

    /// Report which source would supply the API key
    pub fn api_key_source(&self) -> Result<ApiKeySource> {
        self.resolve_api_key().map(|(_, source)| source)
    }

    fn resolve_api_key(&self) -> Result<(String, ApiKeySource)> {
        if let Ok(key) = std::env::var(&self.api_key_env)
            && !key.trim().is_empty()
        {
            return Ok((key.trim().to_string(), ApiKeySource::Env(self.api_key_env.clone())));
        }

        if let Some(file) = &self.api_key_file {
            let path = expand_tilde(file);
            let key = fs::read_to_string(&path).context(format!("Failed to read API key file {}", path.display()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(eyre::eyre!("API key file {} is empty", path.display()));
            }
            return Ok((key.to_string(), ApiKeySource::File(path)));
        }

        Err(eyre::eyre!(
            "LLM API key not found. Set the {} environment variable.",
            self.api_key_env
        ))
    }
}

/// Defaults used to prefill the first wizard form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Trip-type text that means "not yet specified"
    #[serde(rename = "trip-type-placeholder")]
    pub trip_type_placeholder: String,

    /// Prefilled starting destination
    #[serde(rename = "default-start-destination")]
    pub default_start_destination: String,

    /// Prefilled budget
    #[serde(rename = "default-budget")]
    pub default_budget: f64,

    /// End date is prefilled this many days after today
    #[serde(rename = "default-trip-days")]
    pub default_trip_days: u32,

    /// Currency label for the budget
    pub currency: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            trip_type_placeholder: "e.g., Relaxing beach holiday for a couple".to_string(),
            default_start_destination: "London, UK".to_string(),
            default_budget: 1000.0,
            default_trip_days: 7,
            currency: "USD".to_string(),
        }
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory checked before the built-in lookup chain
    pub dir: Option<PathBuf>,
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
