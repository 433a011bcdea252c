use thiserror::Error;

/// Errors a probe can hit while talking to the deployment under test.
///
/// Every probe catches these at its own boundary and converts them into a
/// printed diagnostic plus a failed outcome; nothing here escapes the driver.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("unexpected status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("stream failed: {0}")]
    Stream(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for ProbeError {
    /// Convert reqwest HTTP client errors with appropriate categorization.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Http("request timeout - deployment did not respond in time".to_string())
        } else if err.is_connect() {
            ProbeError::Http("connection failed - unable to reach deployment".to_string())
        } else if err.is_decode() {
            ProbeError::Decode(format!("{}", err))
        } else if let Some(status) = err.status() {
            ProbeError::Api {
                status: status.as_u16(),
                message: format!("{}", err),
            }
        } else {
            ProbeError::Http(format!("{}", err))
        }
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        ProbeError::Decode(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for ProbeError {
    fn from(err: url::ParseError) -> Self {
        ProbeError::InvalidConfig(format!("invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_carries_status() {
        let err = ProbeError::Api {
            status: 401,
            message: "missing bearer token".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("missing bearer token"));
    }

    #[test]
    fn test_json_error_converts_to_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        match ProbeError::from(json_err) {
            ProbeError::Decode(_) => {}
            other => panic!("expected Decode, got {:?}", other),
        }
    }
}
