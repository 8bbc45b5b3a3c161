//! Configuration management for the travel planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::PlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the travel planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Gemini generation API configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Gemini API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Gemini API key; generation is disabled when absent
    pub api_key: Option<String>,
    /// Base URL for the generative language API
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Sampling temperature
    #[serde(default = "default_gemini_temperature")]
    pub temperature: f64,
    /// Request timeout in seconds
    #[serde(default = "default_gemini_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_gemini_max_retries")]
    pub max_retries: u32,
    /// Initial backoff delay in seconds
    #[serde(default = "default_retry_initial")]
    pub retry_initial_seconds: u64,
    /// Maximum backoff delay in seconds
    #[serde(default = "default_retry_max")]
    pub retry_max_seconds: u64,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the server listens on
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory holding the static frontend
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_temperature() -> f64 {
    0.7
}

fn default_gemini_timeout() -> u32 {
    60
}

fn default_gemini_max_retries() -> u32 {
    5
}

fn default_retry_initial() -> u64 {
    1
}

fn default_retry_max() -> u64 {
    60
}

fn default_server_port() -> u16 {
    8080
}

fn default_frontend_dir() -> String {
    "frontend/dist".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            temperature: default_gemini_temperature(),
            timeout_seconds: default_gemini_timeout(),
            max_retries: default_gemini_max_retries(),
            retry_initial_seconds: default_retry_initial(),
            retry_max_seconds: default_retry_max(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            frontend_dir: default_frontend_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with TRAVEL_PLANNER_ prefix
        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_PLANNER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-planner").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.gemini.base_url.is_empty() {
            self.gemini.base_url = default_gemini_base_url();
        }
        if self.gemini.model.is_empty() {
            self.gemini.model = default_gemini_model();
        }
        if self.gemini.timeout_seconds == 0 {
            self.gemini.timeout_seconds = default_gemini_timeout();
        }
        if self.gemini.retry_initial_seconds == 0 {
            self.gemini.retry_initial_seconds = default_retry_initial();
        }
        if self.gemini.retry_max_seconds == 0 {
            self.gemini.retry_max_seconds = default_retry_max();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
        if self.server.frontend_dir.is_empty() {
            self.server.frontend_dir = default_frontend_dir();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // The key is optional; without it the page renders a configuration error
        if let Some(api_key) = &self.gemini.api_key {
            if api_key.is_empty() {
                return Err(PlannerError::config(
                    "Gemini API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() < 8 {
                return Err(PlannerError::config(
                    "Gemini API key appears to be invalid (too short). Please check your API key."
                ).into());
            }

            if api_key.len() > 200 {
                return Err(PlannerError::config(
                    "Gemini API key appears to be invalid (too long). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            return Err(PlannerError::config(
                "Gemini temperature must be between 0.0 and 2.0",
            )
            .into());
        }

        if self.gemini.timeout_seconds > 300 {
            return Err(PlannerError::config(
                "Gemini API timeout cannot exceed 300 seconds",
            )
            .into());
        }

        if self.gemini.max_retries > 10 {
            return Err(PlannerError::config(
                "Gemini API max retries cannot exceed 10",
            )
            .into());
        }

        if self.gemini.retry_initial_seconds > self.gemini.retry_max_seconds {
            return Err(PlannerError::config(
                "Retry initial delay cannot exceed the maximum delay",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.gemini.base_url.starts_with("http://")
            && !self.gemini.base_url.starts_with("https://")
        {
            return Err(PlannerError::config(
                "Gemini API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
