//! # Schemas Module
//!
//! Data structures for the OpenAI-compatible surface the probes exercise.
//! These are client-side shapes: requests are serialized, responses are
//! deserialized leniently, with optional fields defaulting at display time.

use serde::{Deserialize, Serialize};

/// # Chat Completion Request
///
/// OpenAI-compatible chat completion request with the parameters the
/// probes exercise. Optional fields are omitted from the wire when unset.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// List of messages in the conversation
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Whether to stream the response (Server-Sent Events)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatCompletionRequest {
    /// Create a non-streaming request for the given model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
            stream: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_streaming(mut self) -> Self {
        self.stream = Some(true);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: Option<String>,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, empty when the deployment sent none.
    pub fn content(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: Message,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// # Streaming Response Structures
///
/// Client-side view of OpenAI's Server-Sent Events format for streaming
/// chat completions. Each chunk carries a partial delta.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

impl ChatCompletionChunk {
    /// Content delta of the first choice, if any.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub index: u32,
    pub delta: StreamDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// # Model Listing
///
/// Shape of `GET /v1/models`. Entries may omit `id`.
#[derive(Debug, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    #[serde(default)]
    pub id: Option<String>,
}

/// Shape of `GET /`. Both fields are optional in the contract.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Shape of `GET /health`. The timestamp may be a string or a number,
/// so it is kept as a raw JSON value for display.
#[derive(Debug, Default, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_unset_optionals() {
        let req = ChatCompletionRequest::new("m", vec![Message::user("hi")]);
        let json = serde_json::to_value(&req).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("max_tokens"));
        assert!(!obj.contains_key("temperature"));
        assert!(!obj.contains_key("stream"));
    }

    #[test]
    fn test_request_builder_sets_parameters() {
        let req = ChatCompletionRequest::new("m", vec![Message::user("hi")])
            .with_max_tokens(20)
            .with_temperature(1.5)
            .with_streaming();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["max_tokens"], 20);
        assert_eq!(json["stream"], true);
    }

    #[test]
    fn test_response_content_of_first_choice() {
        let resp: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "id": "chatcmpl-1",
            "model": "test-model",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hello World"}, "finish_reason": "stop"}
            ]
        }))
        .unwrap();
        assert_eq!(resp.content(), "Hello World");
        assert!(resp.usage.is_none());
    }

    #[test]
    fn test_response_content_defaults_empty() {
        let resp: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": []
        }))
        .unwrap();
        assert_eq!(resp.content(), "");
    }

    #[test]
    fn test_chunk_delta_content() {
        let chunk: ChatCompletionChunk = serde_json::from_str(
            r#"{"id":"c1","choices":[{"index":0,"delta":{"content":"Hi"},"finish_reason":null}]}"#,
        )
        .unwrap();
        assert_eq!(chunk.delta_content(), Some("Hi"));
    }

    #[test]
    fn test_health_status_numeric_timestamp() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status":"ok","timestamp":1735689600}"#).unwrap();
        assert_eq!(health.status.as_deref(), Some("ok"));
        assert!(health.timestamp.is_some());
    }
}
