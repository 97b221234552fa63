//! Configuration management for the Salon Inventory client
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with SALON_ prefix

use std::path::PathBuf;
use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::Language;

/// Main client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Backend API configuration
    pub api: ApiConfig,

    /// Session persistence
    pub session: SessionConfig,

    /// Supply workflow behaviour
    pub workflow: WorkflowConfig,

    /// Interface settings
    pub ui: UiConfig,

    /// Report export settings
    pub report: ReportConfig,

    /// Credentials used when no stored session is available
    #[serde(default)]
    pub login: Option<LoginConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL including the version prefix
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// File holding the bearer token between runs
    pub token_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowConfig {
    /// Undo compensable steps when a supply confirmation partially fails
    pub compensate_on_failure: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    /// Language code, `uk` or `en`
    pub language: String,
}

impl UiConfig {
    pub fn language(&self) -> Language {
        Language::from_code(&self.language).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Directory where CSV reports are written
    pub output_dir: PathBuf,

    /// Days covered by the default usage report
    pub default_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginConfig {
    pub email: String,
    pub password: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("SALON_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("api.base_url", "http://localhost:8080/api/v1")?
            .set_default("api.timeout_secs", 10)?
            .set_default("session.token_file", ".salon-session")?
            .set_default("workflow.compensate_on_failure", true)?
            .set_default("ui.language", "uk")?
            .set_default("report.output_dir", ".")?
            .set_default("report.default_days", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SALON_ prefix)
            .add_source(
                Environment::with_prefix("SALON")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
