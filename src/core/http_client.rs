//! # HTTP Client Factory
//!
//! Centralized HTTP client creation so the raw probes and the chat client
//! share consistent settings.

use crate::config::Config;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// HTTP client configuration errors
#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("Failed to build HTTP client: {0}")]
    BuildError(#[from] reqwest::Error),
}

/// HTTP client builder with configurable options
pub struct HttpClientBuilder {
    timeout: Duration,
    connect_timeout: Duration,
}

impl HttpClientBuilder {
    /// Create a new HTTP client builder with default configuration
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Create HTTP client builder from probe configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Build the HTTP client
    pub fn build(self) -> Result<Client, HttpClientError> {
        Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(HttpClientError::from)
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_client_builder() {
        let client = HttpClientBuilder::new().build().unwrap();
        // Basic smoke test - if it builds, the configuration is valid
        assert!(client.get("http://localhost:8787/").build().is_ok());
    }

    #[test]
    fn test_builder_from_config() {
        let config = Config::for_test();
        let client = HttpClientBuilder::from_config(&config).build().unwrap();
        assert!(client.get("http://localhost:8787/health").build().is_ok());
    }

    #[test]
    fn test_custom_timeout() {
        let client = HttpClientBuilder::new()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert!(client.get("http://localhost:8787/").build().is_ok());
    }
}
