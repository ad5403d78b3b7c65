//! Configuration for talking to the analysis service.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. The orchestrator itself has no knobs: no retries,
//! no timeouts of its own. Everything tunable belongs to the transport.

use crate::error::AnalysisError;
use crate::progress::ProgressCallback;
use crate::transport::Transport;
use std::fmt;
use std::sync::Arc;

/// Environment variable holding the service base URL.
pub const API_URL_ENV: &str = "FAKEFINDER_API_URL";

/// Used when [`API_URL_ENV`] is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Configuration for an [`crate::analyzer::Analyzer`].
///
/// # Example
/// ```rust
/// use fakefinder::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://fakefinder.example.org")
///     .timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "https://fakefinder.example.org");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Service root, without trailing slash. Default: `$FAKEFINDER_API_URL`
    /// or `http://localhost:8000`.
    pub base_url: String,

    /// Per-request timeout in seconds. Default: none (reqwest's default).
    pub timeout_secs: Option<u64>,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Pre-constructed transport. Takes precedence over `base_url`.
    pub transport: Option<Arc<dyn Transport>>,

    /// Receives stage events while a pipeline runs.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: None,
            user_agent: concat!("fakefinder/", env!("CARGO_PKG_VERSION")).to_string(),
            transport: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("transport", &self.transport.as_ref().map(|_| "<dyn Transport>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn AnalysisProgressCallback>"),
            )
            .finish()
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults, with the base URL taken from [`API_URL_ENV`] when set.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                builder = builder.base_url(url);
            }
        }
        builder.build()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim().to_string();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs.max(1));
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating the base URL.
    ///
    /// The URL is only checked when no pre-built transport was supplied.
    pub fn build(mut self) -> Result<ClientConfig, AnalysisError> {
        if self.config.transport.is_none() {
            let parsed = reqwest::Url::parse(&self.config.base_url).map_err(|e| {
                AnalysisError::Internal(format!(
                    "Invalid service URL '{}': {e}",
                    self.config.base_url
                ))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(AnalysisError::Internal(format!(
                    "Invalid service URL '{}': scheme must be http or https",
                    self.config.base_url
                )));
            }
        }
        let trimmed = self.config.base_url.trim_end_matches('/').len();
        self.config.base_url.truncate(trimmed);
        Ok(self.config)
    }
}
