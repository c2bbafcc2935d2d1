//! Logdrop Loki Client
//!
//! HTTP client that formats log batches into Loki push requests and sends
//! them to `POST /loki/api/v1/push`.
//!
//! # Example
//!
//! ```no_run
//! use logdrop_client::LokiClient;
//! use logdrop_core::LogBatch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LokiClient::new("http://localhost:3100");
//!
//!     let batch = LogBatch::new("checkout", ["INFO order placed", "INFO order shipped"])?;
//!     client.push_batch(&batch).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
mod push;
mod sink;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use sink::LogSink;

use std::time::Duration;

use logdrop_core::dto::push::PUSH_PATH;
use reqwest::Client;

/// HTTP client for the Loki push API
#[derive(Debug, Clone)]
pub struct LokiClient {
    /// Base URL of Loki (e.g., "http://localhost:3100")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl LokiClient {
    /// Create a new client with reqwest defaults (no request timeout)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client whose requests give up after `timeout`
    ///
    /// # Example
    /// ```
    /// use logdrop_client::LokiClient;
    /// use std::time::Duration;
    ///
    /// let client = LokiClient::with_timeout("http://localhost:3100", Duration::from_secs(30)).unwrap();
    /// assert_eq!(client.push_url(), "http://localhost:3100/loki/api/v1/push");
    /// ```
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a new client around a preconfigured reqwest `Client`
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of Loki
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the push endpoint
    pub fn push_url(&self) -> String {
        format!("{}{}", self.base_url, PUSH_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = LokiClient::new("http://localhost:3100");
        assert_eq!(client.base_url(), "http://localhost:3100");
        assert_eq!(client.push_url(), "http://localhost:3100/loki/api/v1/push");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = LokiClient::new("http://loki:3100/");
        assert_eq!(client.base_url(), "http://loki:3100");
        assert_eq!(client.push_url(), "http://loki:3100/loki/api/v1/push");
    }

    #[test]
    fn test_client_with_timeout() {
        let client = LokiClient::with_timeout("http://localhost:3100", Duration::from_secs(5));
        assert!(client.is_ok());
    }
}
