use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::domain::ChatRole;
use tracing::debug;
use url::Url;

use crate::{prompts::system_instruction, CompletionBackend, CompletionError, CompletionRequest};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Url,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: default_base_url(),
        }
    }
}

pub fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|e| unreachable!("static base url: {e}"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: text.to_string(),
        }],
    }
}

fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    }
}

/// Google Generative Language `generateContent` client.
pub struct GeminiBackend {
    http: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    pub fn new(config: GeminiConfig) -> Result<Self, CompletionError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.as_str().trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|msg| text_content(Some(role_name(msg.role)), &msg.text))
            .collect();
        contents.push(text_content(Some("user"), &request.message));

        let body = GenerateContentRequest {
            system_instruction: text_content(None, &system_instruction(request.language)),
            contents,
        };

        debug!(
            model = %self.config.model,
            history = request.history.len(),
            "sending completion request"
        );
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        Ok(text)
    }
}

#[cfg(test)]
#[path = "tests/gemini_tests.rs"]
mod tests;
