//! Client for Groq's OpenAI-compatible chat completions endpoint.

use std::time::Duration;

use archcouncil_core::{CouncilError, Credential};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generator::{GenerationRequest, TextGenerator};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Async HTTP implementation of [`TextGenerator`].
pub struct GroqClient {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl GroqClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CouncilError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CouncilError::Request(format!("build http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
        credential: &Credential,
    ) -> Result<String, CouncilError> {
        let body = ChatRequest {
            model: request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.role,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            temperature: request.temperature,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CouncilError::Request(format!(
                        "timed out after {}s",
                        self.timeout.as_secs_f32()
                    ))
                } else {
                    CouncilError::Request(format!("connection failed: {e}"))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error_with_status(status, resp).await);
        }

        let text = resp
            .text()
            .await
            .map_err(|e| CouncilError::Request(format!("read body: {e}")))?;
        extract_content(&text)
    }
}

fn extract_content(body: &str) -> Result<String, CouncilError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        debug!("unparseable completion body: {body}");
        CouncilError::Response(format!("json decode: {e}"))
    })?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CouncilError::Response("no choices in response".into()))?
        .message
        .content
        .unwrap_or_default();
    if content.trim().is_empty() {
        return Err(CouncilError::Response("model returned empty text".into()));
    }
    Ok(content)
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> CouncilError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or(body);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        CouncilError::Authentication(format!("{status}: {msg}"))
    } else {
        CouncilError::Request(format!("{status}: {msg}"))
    }
}
