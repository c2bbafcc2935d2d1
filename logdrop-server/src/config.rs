//! Server configuration
//!
//! Built once at startup from command-line flags / environment variables and
//! handed to the router, the Loki client and the sample import job.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LOKI_URL: &str = "http://localhost:3100";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_STATIC_DIR: &str = "./static";
pub const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SAMPLE_IMPORT_DELAY_SECS: u64 = 5;

/// Importer configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Loki base URL (e.g., "http://localhost:3100")
    pub loki_url: String,

    /// Interface the HTTP server binds to
    pub bind_host: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Directory holding `index.html` and the other UI assets
    pub static_dir: PathBuf,

    /// Upper bound on a single push to Loki
    pub push_timeout: Duration,

    /// Whether to push the sample batch after startup
    pub sample_import_enabled: bool,

    /// How long after startup the sample batch is pushed
    pub sample_import_delay: Duration,

    /// Maximum accepted request body size; unlimited when `None`
    pub max_upload_bytes: Option<usize>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(loki_url: impl Into<String>) -> Self {
        Self {
            loki_url: loki_url.into(),
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            push_timeout: Duration::from_secs(DEFAULT_PUSH_TIMEOUT_SECS),
            sample_import_enabled: true,
            sample_import_delay: Duration::from_secs(DEFAULT_SAMPLE_IMPORT_DELAY_SECS),
            max_upload_bytes: None,
        }
    }

    /// Address to bind the listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.loki_url.is_empty() {
            anyhow::bail!("loki_url cannot be empty");
        }

        if !self.loki_url.starts_with("http://") && !self.loki_url.starts_with("https://") {
            anyhow::bail!("loki_url must start with http:// or https://");
        }

        if self.push_timeout.is_zero() {
            anyhow::bail!("push_timeout must be greater than 0");
        }

        if self.max_upload_bytes == Some(0) {
            anyhow::bail!("max_upload_bytes must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_LOKI_URL)
    }
}
