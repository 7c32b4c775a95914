//! Configuration for spam-detector

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{DetectorError, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub datasets: DatasetsConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "127.0.0.1:5000")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Open a browser window on the form once the server is up
    #[serde(default = "default_true")]
    pub open_browser: bool,
    /// Delay before opening the browser, in milliseconds
    #[serde(default = "default_browser_delay")]
    pub browser_delay_ms: u64,
}

/// Training dataset locations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatasetsConfig {
    #[serde(default)]
    pub category: CategoryDatasetConfig,
    #[serde(default)]
    pub indicator: IndicatorDatasetConfig,
}

/// Dataset whose label column holds "spam" / "ham"
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryDatasetConfig {
    #[serde(default = "default_category_path")]
    pub path: String,
    /// First row is a header and is skipped
    #[serde(default)]
    pub has_header: bool,
    /// Zero-based label column
    #[serde(default)]
    pub label_column: usize,
    /// Zero-based text column
    #[serde(default = "default_one")]
    pub text_column: usize,
}

/// Dataset whose label column holds a 0/1 spam indicator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndicatorDatasetConfig {
    #[serde(default = "default_indicator_path")]
    pub path: String,
    /// Header name of the text column
    #[serde(default = "default_text_column")]
    pub text_column: String,
    /// Header name of the indicator column
    #[serde(default = "default_indicator_column")]
    pub indicator_column: String,
}

/// Logistic regression hyperparameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Inverse regularization strength
    #[serde(default = "default_c")]
    pub c: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Stop once the gradient's max-norm falls below this value
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// L-BFGS correction pairs kept
    #[serde(default = "default_history")]
    pub history: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_listen_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_true() -> bool {
    true
}

fn default_browser_delay() -> u64 {
    1000
}

fn default_category_path() -> String {
    "email.csv".to_string()
}

fn default_one() -> usize {
    1
}

fn default_indicator_path() -> String {
    "spam.csv".to_string()
}

fn default_text_column() -> String {
    "text".to_string()
}

fn default_indicator_column() -> String {
    "spam".to_string()
}

fn default_c() -> f64 {
    1.0
}

fn default_max_iterations() -> usize {
    100
}

fn default_tolerance() -> f64 {
    1e-4
}

fn default_history() -> usize {
    10
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            open_browser: true,
            browser_delay_ms: default_browser_delay(),
        }
    }
}

impl Default for CategoryDatasetConfig {
    fn default() -> Self {
        Self {
            path: default_category_path(),
            has_header: false,
            label_column: 0,
            text_column: 1,
        }
    }
}

impl Default for IndicatorDatasetConfig {
    fn default() -> Self {
        Self {
            path: default_indicator_path(),
            text_column: default_text_column(),
            indicator_column: default_indicator_column(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            c: default_c(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            history: default_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DetectorError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| DetectorError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;

        if !(self.model.c > 0.0) {
            return Err(DetectorError::Config(format!(
                "model.c must be positive, got {}",
                self.model.c
            )));
        }
        if !(self.model.tolerance >= 0.0) {
            return Err(DetectorError::Config(format!(
                "model.tolerance must be a non-negative number, got {}",
                self.model.tolerance
            )));
        }
        if self.model.max_iterations == 0 {
            return Err(DetectorError::Config(
                "model.max_iterations must be at least 1".to_string(),
            ));
        }
        if self.model.history == 0 {
            return Err(DetectorError::Config(
                "model.history must be at least 1".to_string(),
            ));
        }
        if self.datasets.category.label_column == self.datasets.category.text_column {
            return Err(DetectorError::Config(
                "datasets.category label and text columns must differ".to_string(),
            ));
        }

        Ok(())
    }

    /// Parsed listen address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.server.listen_addr.parse().map_err(|e| {
            DetectorError::Config(format!(
                "Invalid listen address '{}': {}",
                self.server.listen_addr, e
            ))
        })
    }
}
