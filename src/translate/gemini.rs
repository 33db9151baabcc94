//! Streaming translation client for the Google Gemini API.
//!
//! Uses the `streamGenerateContent` endpoint with SSE framing so the caller
//! can consume the translation incrementally while it is generated.

use crate::error::{Result, SubtransError};
use crate::translate::{FragmentStream, Translator};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::pin::Pin;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Translator backed by the Gemini streaming API.
pub struct GeminiTranslator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiTranslator {
    /// Create a new Gemini translator with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: "gemini-2.5-flash".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a different model (e.g., "gemini-2.0-flash").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different API base URL. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GenerateContentChunk {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: String,
}

/// Byte stream plus the SSE line buffer carried between chunks.
struct SseState {
    inner: Pin<Box<dyn Stream<Item = reqwest::Result<Vec<u8>>> + Send>>,
    buffer: String,
    pending: VecDeque<String>,
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn submit(&self, prompt: &str) -> Result<FragmentStream> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("Submitting prompt ({} chars) to {}", prompt.len(), self.model);

        let response = self
            .client
            .post(self.stream_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| SubtransError::Api(format!("Translation request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status, &body));
        }

        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()))
            .fuse();

        let state = SseState {
            inner: Box::pin(bytes),
            buffer: String::new(),
            pending: VecDeque::new(),
        };

        let fragments = futures::stream::try_unfold(state, |mut state| async move {
            loop {
                if let Some(fragment) = state.pending.pop_front() {
                    return Ok(Some((fragment, state)));
                }

                match state.inner.next().await {
                    Some(Ok(chunk)) => {
                        state.buffer.push_str(&String::from_utf8_lossy(&chunk));
                        while let Some(pos) = state.buffer.find('\n') {
                            let line: String = state.buffer.drain(..=pos).collect();
                            if let Some(text) = parse_sse_line(line.trim())? {
                                state.pending.push_back(text);
                            }
                        }
                    }
                    Some(Err(e)) => {
                        return Err(SubtransError::Api(format!("Stream error: {}", e)));
                    }
                    None => {
                        // Flush a final line that arrived without a newline
                        let tail = std::mem::take(&mut state.buffer);
                        if let Some(text) = parse_sse_line(tail.trim())? {
                            state.pending.push_back(text);
                            continue;
                        }
                        return Ok(None);
                    }
                }
            }
        });

        Ok(Box::pin(fragments))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Extract the text fragment from one SSE line, if it carries one.
fn parse_sse_line(line: &str) -> Result<Option<String>> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return Ok(None);
    }

    let chunk: GenerateContentChunk = serde_json::from_str(data)
        .map_err(|e| SubtransError::Api(format!("Malformed stream chunk: {}", e)))?;

    if let Some(error) = chunk.error {
        return Err(classify_error_message(&error.message));
    }

    let text = chunk
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .and_then(|p| p.into_iter().next())
        .and_then(|p| p.text);

    Ok(text)
}

/// Map an HTTP-level failure onto the closed error set.
fn classify_api_error(status: StatusCode, body: &str) -> SubtransError {
    if body.contains("API_KEY_INVALID") || body.contains("API key not valid") {
        return SubtransError::InvalidApiKey(
            "The provided API key is invalid. Please check your configuration.".to_string(),
        );
    }

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || status == StatusCode::NOT_FOUND
        || body.contains("Requested entity was not found")
    {
        return SubtransError::Unauthorized(format!(
            "API rejected the request ({}). Please verify your API key and model name.",
            status
        ));
    }

    SubtransError::Api(format!("Translation API error ({}): {}", status, body))
}

/// Map an in-stream error payload onto the closed error set.
fn classify_error_message(message: &str) -> SubtransError {
    if message.contains("API_KEY_INVALID") || message.contains("API key not valid") {
        SubtransError::InvalidApiKey(message.to_string())
    } else if message.contains("Requested entity was not found") {
        SubtransError::Unauthorized(message.to_string())
    } else {
        SubtransError::Api(format!("Gemini error: {}", message))
    }
}
