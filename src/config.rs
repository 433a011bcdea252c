use clap::Parser;
use url::Url;

/// # proxy-probe Configuration
///
/// Configuration for a probe run, supporting command-line arguments,
/// environment variables, and .env file loading.
#[derive(Debug, Clone, Parser)]
#[command(name = "proxy-probe")]
#[command(about = "Smoke-test harness for OpenAI-compatible LLM proxy deployments")]
#[command(version)]
pub struct Config {
    /// Base URL of the deployment under test
    #[arg(short, long, env = "PROBE_URL", default_value = "http://localhost:8787")]
    pub url: String,

    /// API key, used as bearer credential for direct HTTP calls and the chat client
    #[arg(short, long, env = "PROBE_KEY", default_value = "your-api-key")]
    pub key: String,

    /// Model identifier sent with chat probes
    #[arg(short, long, env = "PROBE_MODEL", default_value = "google/gemini-2.5-flash")]
    pub model: String,

    /// HTTP client timeout in seconds
    #[arg(long, env = "PROBE_TIMEOUT", default_value = "30")]
    pub timeout_secs: u64,

    /// Log level for diagnostics (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Config {
    /// Parse configuration from command line arguments and environment variables.
    ///
    /// This method:
    /// 1. Loads environment variables from .env file if it exists
    /// 2. Parses command line arguments
    /// 3. Sets up logging
    /// 4. Validates configuration
    pub fn parse_args() -> Self {
        // Load .env file if it exists (ignore errors if file doesn't exist)
        let _ = dotenv::dotenv();

        let config = Self::parse();

        config.setup_logging();

        if let Err(err) = config.validate() {
            eprintln!("Configuration validation failed: {}", err);
            std::process::exit(1);
        }

        config
    }

    /// Base URL with a trailing slash stripped.
    pub fn base_url(&self) -> String {
        self.url.trim_end_matches('/').to_string()
    }

    /// Create a test configuration with minimal required fields.
    /// This is used for testing purposes only.
    pub fn for_test() -> Self {
        Self {
            url: "http://localhost:8787".to_string(),
            key: "test-key".to_string(),
            model: "test-model".to_string(),
            timeout_secs: 30,
            log_level: "warn".to_string(),
        }
    }

    /// Set up the tracing subscriber with the configured log level.
    ///
    /// Probe results go to stdout through the report module; tracing is
    /// diagnostics only.
    fn setup_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(&self.log_level)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .try_init();
    }

    /// Validate configuration values and provide helpful error messages.
    pub fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("URL cannot be empty. Please specify the deployment URL.".to_string());
        }

        match Url::parse(&self.url) {
            Ok(url) => {
                if !["http", "https"].contains(&url.scheme()) {
                    return Err(format!(
                        "Invalid URL scheme '{}'. Only 'http' and 'https' are supported.",
                        url.scheme()
                    ));
                }
                if url.host().is_none() {
                    return Err(
                        "URL must include a host (e.g., 'http://localhost:8787').".to_string()
                    );
                }
            }
            Err(err) => {
                return Err(format!(
                    "Invalid URL format '{}': {}. \
                    Please provide a valid URL (e.g., 'http://localhost:8787').",
                    self.url, err
                ));
            }
        }

        if self.key.is_empty() {
            return Err("API key cannot be empty.".to_string());
        }

        if self.model.is_empty() {
            return Err("Model ID cannot be empty. Please specify a valid model identifier.".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("HTTP client timeout must be greater than 0 seconds.".to_string());
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log level '{}'. Valid options are: {}",
                self.log_level,
                valid_log_levels.join(", ")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let mut config = Config::for_test();
        config.url = "http://localhost:8787/".to_string();
        assert_eq!(config.base_url(), "http://localhost:8787");
    }

    #[test]
    fn test_base_url_without_trailing_slash_unchanged() {
        let config = Config::for_test();
        assert_eq!(config.base_url(), "http://localhost:8787");
    }

    #[test]
    fn test_validate_accepts_default_config() {
        assert!(Config::for_test().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let mut config = Config::for_test();
        config.url = "ftp://localhost:8787".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let mut config = Config::for_test();
        config.key = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = Config::for_test();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }
}
