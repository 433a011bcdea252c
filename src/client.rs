//! # OpenAI-Compatible Chat Client
//!
//! Thin client over the deployment's `/v1` surface: non-streaming chat
//! completions, SSE streaming completions, and model listing. All requests
//! carry the configured key as bearer credential.

use crate::error::ProbeError;
use crate::schemas::{ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ModelList};
use futures_util::StreamExt;
use reqwest::Client;
use tracing::debug;

/// Statistics collected while consuming a streaming completion.
#[derive(Debug, Default)]
pub struct StreamStats {
    /// Number of data chunks received (excluding the `[DONE]` terminator)
    pub chunks: usize,
    /// Concatenated content deltas
    pub content: String,
}

/// Client for the OpenAI-compatible endpoints under `{base_url}/v1`.
pub struct ChatClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    /// Create a client targeting `{base_url}/v1`.
    ///
    /// `base_url` is expected to already have its trailing slash stripped.
    pub fn new(base_url: &str, api_key: &str, http: Client) -> Self {
        Self {
            http,
            base_url: format!("{}/v1", base_url),
            api_key: api_key.to_string(),
        }
    }

    /// Send a non-streaming chat completion request.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProbeError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json::<ChatCompletionResponse>().await?)
    }

    /// Send a streaming chat completion request, invoking `on_delta` for
    /// each content fragment as it arrives.
    ///
    /// The stream is consumed until the `data: [DONE]` terminator or the
    /// end of the body, whichever comes first.
    pub async fn chat_completion_stream(
        &self,
        request: &ChatCompletionRequest,
        mut on_delta: impl FnMut(&str),
    ) -> Result<StreamStats, ProbeError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {} (streaming)", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let mut stats = StreamStats::default();
        let mut buffer = String::new();
        let mut body = response.bytes_stream();

        'outer: while let Some(chunk) = body.next().await {
            let bytes = chunk.map_err(|e| ProbeError::Stream(format!("{}", e)))?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            for payload in drain_sse_payloads(&mut buffer) {
                if payload == "[DONE]" {
                    break 'outer;
                }
                stats.chunks += 1;
                let parsed: ChatCompletionChunk = serde_json::from_str(&payload)
                    .map_err(|e| ProbeError::Stream(format!("bad chunk: {}", e)))?;
                if let Some(delta) = parsed.delta_content() {
                    stats.content.push_str(delta);
                    on_delta(delta);
                }
            }
        }

        Ok(stats)
    }

    /// List available models via `GET /v1/models`.
    pub async fn list_models(&self) -> Result<ModelList, ProbeError> {
        let url = format!("{}/models", self.base_url);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json::<ModelList>().await?)
    }
}

/// Drain complete SSE events from `buffer`, returning their `data:` payloads.
///
/// Events are separated by a blank line; incomplete trailing data stays in
/// the buffer for the next network read.
fn drain_sse_payloads(buffer: &mut String) -> Vec<String> {
    let mut payloads = Vec::new();

    while let Some(boundary) = buffer.find("\n\n") {
        let frame: String = buffer.drain(..boundary + 2).collect();
        for line in frame.lines() {
            if let Some(data) = line.strip_prefix("data:") {
                payloads.push(data.trim().to_string());
            }
        }
    }

    payloads
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_complete_frames() {
        let mut buf = "data: {\"a\":1}\n\ndata: [DONE]\n\n".to_string();
        let payloads = drain_sse_payloads(&mut buf);
        assert_eq!(payloads, vec!["{\"a\":1}".to_string(), "[DONE]".to_string()]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_incomplete_frame_stays_buffered() {
        let mut buf = "data: {\"a\":1}\n\ndata: {\"b\":".to_string();
        let payloads = drain_sse_payloads(&mut buf);
        assert_eq!(payloads, vec!["{\"a\":1}".to_string()]);
        assert_eq!(buf, "data: {\"b\":");
    }

    #[test]
    fn test_comment_lines_ignored() {
        let mut buf = ": ping\ndata: {\"a\":1}\n\n".to_string();
        let payloads = drain_sse_payloads(&mut buf);
        assert_eq!(payloads, vec!["{\"a\":1}".to_string()]);
    }

    #[test]
    fn test_split_across_reads() {
        let mut buf = "data: {\"a\"".to_string();
        assert!(drain_sse_payloads(&mut buf).is_empty());
        buf.push_str(":1}\n\n");
        assert_eq!(drain_sse_payloads(&mut buf), vec!["{\"a\":1}".to_string()]);
    }
}
