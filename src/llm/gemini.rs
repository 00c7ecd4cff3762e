//! Gemini REST backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{decode_json, parse_reply, LlmProvider, ProviderSettings, TEMPERATURE};
use crate::commit::StructuredCommit;
use crate::error::LlmError;

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ModelEntry {
    name: String,
}

/// Response schema in Gemini's OpenAPI subset.
///
/// `emoji` is left out entirely when emoji are off so the model has no
/// slot to put one in.
pub fn response_schema(emoji: bool) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "typ".into(),
        json!({ "type": "STRING", "description": "type of commit" }),
    );
    properties.insert(
        "msg".into(),
        json!({ "type": "STRING", "description": "msg of commit" }),
    );
    properties.insert(
        "scope".into(),
        json!({ "type": "STRING", "description": "scope of commit" }),
    );
    if emoji {
        properties.insert(
            "emoji".into(),
            json!({ "type": "STRING", "description": "emoji of commit" }),
        );
    }
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": ["typ", "msg"],
    })
}

/// Talks to the Gemini API (or a compatible proxy set via `custom_url`).
pub struct GeminiProvider {
    client: Client,
    settings: ProviderSettings,
}

impl GeminiProvider {
    pub fn new(client: Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    fn base_url(&self) -> String {
        self.settings.base_url_or(GEMINI_API_URL)
    }

    fn request_body(&self, prompt: &str) -> GenerateRequest {
        let constrain = self.settings.constrain_output();
        GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: constrain.then(|| "application/json".to_string()),
                response_schema: constrain.then(|| response_schema(self.settings.emoji)),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<StructuredCommit, LlmError> {
        let model = self.settings.model.trim_start_matches("models/");
        let url = format!("{}/models/{}:generateContent", self.base_url(), model);
        debug!(%url, prompt_bytes = prompt.len(), "sending gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;
        let body: GenerateResponse = decode_json(response).await?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .concat()
            })
            .unwrap_or_default();

        parse_reply(&text, self.settings.emoji)
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/models", self.base_url());
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header("x-goog-api-key", &self.settings.api_key);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListModelsResponse = decode_json(request.send().await?).await?;
            models.extend(page.models.into_iter().map(|m| m.name));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = models.len(), "listed gemini models");
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_omits_emoji_when_disabled() {
        let schema = response_schema(false);
        assert!(schema["properties"].get("emoji").is_none());
        assert_eq!(schema["required"], json!(["typ", "msg"]));

        let schema = response_schema(true);
        assert_eq!(schema["properties"]["emoji"]["type"], "STRING");
    }
}
