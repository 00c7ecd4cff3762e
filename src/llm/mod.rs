//! LLM provider abstraction.
//!
//! Two backends sit behind [`LlmProvider`]:
//!
//! - [`gemini::GeminiProvider`]: Gemini `generateContent` with a response schema
//! - [`openai::OpenAiProvider`]: any OpenAI-compatible `chat/completions` endpoint
//!
//! [`create_provider`] picks one from [`Config::provider_kind`]. Neither
//! backend retries; a failed call surfaces to the caller as an [`LlmError`].

pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::commit::StructuredCommit;
use crate::config::{Config, ProviderKind};
use crate::error::LlmError;
use crate::thinking::{split_thinking, thinking_body};

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Sampling temperature for every generation call.
///
/// Kept high so a regenerate produces a noticeably different candidate.
pub const TEMPERATURE: f32 = 1.0;

/// A backend able to turn a prompt into a structured commit.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends `prompt` and parses the reply into a commit.
    async fn generate(&self, prompt: &str) -> Result<StructuredCommit, LlmError>;

    /// Lists model identifiers available to the configured credentials.
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;
}

/// Connection and output settings shared by both backends.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub emoji: bool,
    pub chain_of_thought: bool,
}

impl ProviderSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.key.clone(),
            model: config.model.clone(),
            base_url: config.custom_base_url().map(String::from),
            emoji: config.emoji,
            chain_of_thought: config.cot,
        }
    }

    /// Configured base URL or `default`, without a trailing slash.
    pub(crate) fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }

    /// Whether the request should pin the reply to the JSON schema.
    ///
    /// A pinned reply cannot carry a `<thinking>` preamble.
    pub(crate) fn constrain_output(&self) -> bool {
        !self.chain_of_thought
    }
}

/// Builds the provider selected by `config`.
pub fn create_provider(config: &Config, client: Client) -> Box<dyn LlmProvider> {
    let settings = ProviderSettings::from_config(config);
    match config.provider_kind() {
        ProviderKind::Gemini => {
            debug!(model = %settings.model, "using gemini provider");
            Box::new(GeminiProvider::new(client, settings))
        }
        ProviderKind::OpenAiCompatible => {
            debug!(model = %settings.model, "using openai-compatible provider");
            Box::new(OpenAiProvider::new(client, settings))
        }
    }
}

/// Maps non-success HTTP statuses to errors, keeping the response body.
async fn check_status(response: Response) -> Result<Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(LlmError::Auth {
            status: status.as_u16(),
            body,
        }),
        _ => Err(LlmError::Api {
            status: status.as_u16(),
            body,
        }),
    }
}

/// Checks the status, then decodes the body as `T`.
///
/// A 2xx body that is not the expected envelope (a proxy login page, say)
/// is a parse failure carrying the raw text, not a network failure.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, LlmError> {
    let body = check_status(response).await?.text().await?;
    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(source) => Err(LlmError::Parse { raw: body, source }),
    }
}

/// Parses a raw model reply into a commit.
///
/// Any `<thinking>` blocks are split off and kept on the commit. The JSON
/// object may be wrapped in a markdown fence. The emoji is dropped when
/// emoji are disabled, whatever the model sent.
pub fn parse_reply(raw: &str, emoji_enabled: bool) -> Result<StructuredCommit, LlmError> {
    if raw.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    let thinking = thinking_body(raw);
    let (_, rest) = split_thinking(raw);
    let json = extract_json_object(&rest);
    if json.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    let mut commit: StructuredCommit =
        serde_json::from_str(json).map_err(|source| LlmError::Parse {
            raw: raw.to_string(),
            source,
        })?;
    commit = commit.normalize(emoji_enabled);

    if commit.kind.is_empty() {
        return Err(LlmError::MissingField {
            field: "typ",
            raw: raw.to_string(),
        });
    }
    if commit.message.is_empty() {
        return Err(LlmError::MissingField {
            field: "msg",
            raw: raw.to_string(),
        });
    }
    if !commit.is_known_type() {
        debug!(kind = %commit.kind, "model used a commit type outside the taxonomy");
    }

    commit.thinking = thinking;
    Ok(commit)
}

fn extract_json_object(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_prefix("```").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    let text = text.trim();

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let commit = parse_reply(r#"{"typ":"feat","msg":"add health check","scope":"api"}"#, false)
            .unwrap();
        assert_eq!(commit.to_string(), "feat(api): add health check");
        assert_eq!(commit.thinking, None);
    }

    #[test]
    fn drops_emoji_when_disabled() {
        let raw = r#"{"typ":"feat","msg":"add health check","emoji":"✨"}"#;
        assert_eq!(parse_reply(raw, false).unwrap().to_string(), "feat: add health check");
        assert_eq!(parse_reply(raw, true).unwrap().to_string(), "feat ✨: add health check");
    }

    #[test]
    fn accepts_null_optionals() {
        let raw = r#"{"typ":"fix","msg":"handle empty input","scope":null,"emoji":null}"#;
        assert_eq!(parse_reply(raw, true).unwrap().to_string(), "fix: handle empty input");
    }

    #[test]
    fn splits_thinking_and_fenced_json() {
        let raw = "<thinking>\n1. parser change\n</thinking>\n```json\n{\"typ\":\"fix\",\"msg\":\"handle empty input\"}\n```";
        let commit = parse_reply(raw, false).unwrap();
        assert_eq!(commit.to_string(), "fix: handle empty input");
        assert_eq!(commit.thinking.as_deref(), Some("1. parser change"));
    }

    #[test]
    fn blank_reply_is_empty_response() {
        assert!(matches!(parse_reply("  \n", false), Err(LlmError::EmptyResponse)));
        assert!(matches!(
            parse_reply("<thinking>only thoughts</thinking>", false),
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            parse_reply("sure! here is your commit", false),
            Err(LlmError::Parse { .. })
        ));
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = parse_reply(r#"{"typ":"feat"}"#, false).unwrap_err();
        assert!(matches!(err, LlmError::MissingField { field: "msg", .. }));

        let err = parse_reply(r#"{"msg":"add thing","typ":" "}"#, false).unwrap_err();
        assert!(matches!(err, LlmError::MissingField { field: "typ", .. }));
    }

    #[test]
    fn chain_of_thought_disables_schema_constraint() {
        let mut settings = ProviderSettings::from_config(&Config::default());
        assert!(settings.constrain_output());
        settings.chain_of_thought = true;
        assert!(!settings.constrain_output());
    }

    #[test]
    fn base_url_trims_trailing_slash() {
        let mut settings = ProviderSettings::from_config(&Config::default());
        assert_eq!(settings.base_url_or("https://api.example.com/v1/"), "https://api.example.com/v1");
        settings.base_url = Some("http://localhost:1234/".into());
        assert_eq!(settings.base_url_or("https://api.example.com/v1"), "http://localhost:1234");
    }
}
