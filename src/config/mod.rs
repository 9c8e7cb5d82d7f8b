//! Configuration module for the Moonshot SDK
//!
//! Provides configuration with support for:
//! - YAML/TOML/JSON config files
//! - Environment variable overrides
//! - Validation

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{SdkError, SdkResult};
use crate::sdk::ClientConfig;

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "MOONSHOT_BASE_URL";
/// Environment variable overriding the request timeout, in seconds
pub const ENV_TIMEOUT_SECS: &str = "MOONSHOT_TIMEOUT_SECS";
/// Environment variable naming the default model
pub const ENV_MODEL: &str = "MOONSHOT_MODEL";
/// Environment variable seeding reply selection
pub const ENV_SEED: &str = "MOONSHOT_SEED";
/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "MOONSHOT_LOG_LEVEL";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonshotConfig {
    /// Client settings
    pub client: ClientConfig,
    /// Telemetry settings
    pub telemetry: TelemetryConfig,
}

impl MoonshotConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SdkResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| SdkError::Config(format!("YAML parse error: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| SdkError::Config(format!("TOML parse error: {}", e)))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| SdkError::Config(format!("JSON parse error: {}", e)))?,
            _ => {
                return Err(SdkError::Config(
                    "Unsupported config file format. Use .yaml, .toml, or .json".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults plus `MOONSHOT_*` environment variables
    pub fn from_env() -> SdkResult<Self> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> SdkResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.client.base_url = url;
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| SdkError::Config(format!("Invalid timeout: {}", secs)))?;
            self.client.timeout = Duration::from_secs(secs);
        }

        if let Some(model) = lookup(ENV_MODEL) {
            self.client.default_model = Some(model);
        }

        if let Some(seed) = lookup(ENV_SEED) {
            self.client.selector_seed = Some(
                seed.trim()
                    .parse()
                    .map_err(|_| SdkError::Config("Invalid seed value".to_string()))?,
            );
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.telemetry.log_level = level;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> SdkResult<()> {
        self.client.validate()?;
        self.telemetry.validate()
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Enable telemetry
    pub enabled: bool,
    /// Log level or `EnvFilter` directive
    pub log_level: String,
    /// Enable JSON logging
    pub json_logs: bool,
    /// Service name attached to log output
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
            json_logs: false,
            service_name: "moonshot-sdk".to_string(),
        }
    }
}

impl TelemetryConfig {
    pub fn validate(&self) -> SdkResult<()> {
        if self.log_level.trim().is_empty() {
            return Err(SdkError::Config("log_level must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Helper module for Duration serialization
pub(crate) mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
        let s = s.trim();
        let invalid = || format!("Invalid duration: {}", s);
        // "ms" before "s" and "m"
        if let Some(millis) = s.strip_suffix("ms") {
            millis.trim().parse::<u64>().map(Duration::from_millis).map_err(|_| invalid())
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| invalid())
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| invalid())
        } else {
            s.parse::<u64>().map(Duration::from_secs).map_err(|_| invalid())
        }
    }
}
