//! SDK Configuration
//!
//! Configuration options for the Moonshot client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::humantime_serde;
use crate::error::{SdkError, SdkResult};
use crate::types::MaxTokenPolicy;

/// Default service endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.moonshot.cn";

/// Client configuration.
///
/// Holds no credential: keys are supplied per call through
/// [`RequestContext`](super::RequestContext).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the service, without the `/v1` prefix
    pub base_url: String,

    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Connection timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Model used when a request does not name one
    pub default_model: Option<String>,

    /// Max-token policy applied to builders created by the client
    pub default_max_token_policy: MaxTokenPolicy,

    /// Seed for reply selection; `None` uses the thread RNG
    pub selector_seed: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("moonshot-sdk/{}", crate::VERSION),
            default_model: None,
            default_max_token_policy: MaxTokenPolicy::Default,
            selector_seed: None,
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration with the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the default model
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Set the default max-token policy
    pub fn default_max_token_policy(mut self, policy: MaxTokenPolicy) -> Self {
        self.default_max_token_policy = policy;
        self
    }

    /// Make reply selection reproducible
    pub fn selector_seed(mut self, seed: u64) -> Self {
        self.selector_seed = Some(seed);
        self
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Full URL for an API path such as `/v1/models`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    pub fn validate(&self) -> SdkResult<()> {
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SdkError::Config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout.is_zero() {
            return Err(SdkError::Config("timeout must be greater than 0".to_string()));
        }
        if self.connect_timeout.is_zero() {
            return Err(SdkError::Config("connect_timeout must be greater than 0".to_string()));
        }
        Ok(())
    }
}
