//! OpenAI-compatible chat completions backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{decode_json, parse_reply, LlmProvider, ProviderSettings, TEMPERATURE};
use crate::commit::StructuredCommit;
use crate::error::LlmError;

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// User turn sent after the system prompt.
pub const USER_MESSAGE: &str = "Start writing a git commit";

#[derive(Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

#[derive(Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct NonStreamResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

/// Strict JSON schema for `response_format`.
///
/// Strict mode wants every property listed as required, so the optional
/// ones are nullable instead. `emoji` is left out when emoji are off.
pub fn response_schema(emoji: bool) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = vec!["typ", "msg", "scope"];
    properties.insert(
        "typ".into(),
        json!({ "type": "string", "description": "type of commit" }),
    );
    properties.insert(
        "msg".into(),
        json!({ "type": "string", "description": "msg of commit" }),
    );
    properties.insert(
        "scope".into(),
        json!({ "type": ["string", "null"], "description": "scope of commit" }),
    );
    if emoji {
        properties.insert(
            "emoji".into(),
            json!({ "type": ["string", "null"], "description": "emoji of commit" }),
        );
        required.push("emoji");
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

/// Talks to OpenAI or any server exposing the same chat completions API.
pub struct OpenAiProvider {
    client: Client,
    settings: ProviderSettings,
}

impl OpenAiProvider {
    pub fn new(client: Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    fn base_url(&self) -> String {
        self.settings.base_url_or(OPENAI_API_URL)
    }

    fn request_body(&self, prompt: &str) -> ChatRequest {
        let response_format = self.settings.constrain_output().then(|| {
            json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "git_commit",
                    "strict": true,
                    "schema": response_schema(self.settings.emoji),
                },
            })
        });

        ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: prompt.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: USER_MESSAGE.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            response_format,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, prompt: &str) -> Result<StructuredCommit, LlmError> {
        let url = format!("{}/chat/completions", self.base_url());
        debug!(%url, prompt_bytes = prompt.len(), "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;
        let body: NonStreamResponse = decode_json(response).await?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        parse_reply(&content, self.settings.emoji)
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/models", self.base_url());
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.settings.api_key)
            .send()
            .await?;
        let list: ModelList = decode_json(response).await?;

        debug!(count = list.data.len(), "listed models");
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}
