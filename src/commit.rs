//! Commit types and the structured commit returned by providers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Conventional commit types offered to the model, with their meaning and gitmoji.
pub const COMMIT_TYPES: &[(&str, &str, &str)] = &[
    ("feat", "A new feature", ":sparkles:"),
    ("fix", "A bug fix", ":bug:"),
    ("docs", "Documentation only changes", ":memo:"),
    (
        "style",
        "Changes that do not affect the meaning of the code (white-space formatting missing semi-colons etc)",
        ":lipstick:",
    ),
    (
        "refactor",
        "A code change that neither fixes a bug nor adds a feature",
        ":recycle:",
    ),
    ("perf", "A code change that improves performance", ":zap:"),
    (
        "test",
        "Adding missing tests or correcting existing tests",
        ":white_check_mark:",
    ),
    (
        "build",
        "Changes that affect the build system or external dependencies",
        ":package:",
    ),
    (
        "ci",
        "Changes to our CI configuration files and scripts",
        ":ferris_wheel:",
    ),
    (
        "chore",
        "Other changes that don't modify src or test files",
        ":hammer:",
    ),
    ("revert", "Reverts a previous commit", ":rewind:"),
];

/// A commit message as the model describes it.
///
/// Field names follow the JSON the model is asked for: `typ`, `msg`,
/// `scope`, `emoji`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredCommit {
    #[serde(rename = "typ", default)]
    pub kind: String,

    #[serde(rename = "msg", default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,

    /// Chain of thought the model wrote before its answer, if any.
    #[serde(skip)]
    pub thinking: Option<String>,
}

impl StructuredCommit {
    pub fn is_known_type(&self) -> bool {
        COMMIT_TYPES.iter().any(|(name, _, _)| *name == self.kind)
    }

    /// Drops blank optional fields, and the emoji entirely when emoji are off.
    pub fn normalize(mut self, emoji_enabled: bool) -> Self {
        self.kind = self.kind.trim().to_string();
        self.message = self.message.trim().to_string();
        self.scope = non_blank(self.scope);
        self.emoji = if emoji_enabled {
            non_blank(self.emoji)
        } else {
            None
        };
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl fmt::Display for StructuredCommit {
    /// Renders `type emoji(scope): message`, leaving out absent parts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.as_deref().filter(|s| !s.is_empty());
        let emoji = self.emoji.as_deref().filter(|e| !e.is_empty());

        match (emoji, scope) {
            (Some(emoji), Some(scope)) => {
                write!(f, "{} {}({}): {}", self.kind, emoji, scope, self.message)
            }
            (None, Some(scope)) => write!(f, "{}({}): {}", self.kind, scope, self.message),
            (Some(emoji), None) => write!(f, "{} {}: {}", self.kind, emoji, self.message),
            (None, None) => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(scope: Option<&str>, emoji: Option<&str>) -> StructuredCommit {
        StructuredCommit {
            kind: "feat".into(),
            message: "add health check".into(),
            scope: scope.map(String::from),
            emoji: emoji.map(String::from),
            thinking: None,
        }
    }

    #[test]
    fn renders_scope_only() {
        assert_eq!(commit(Some("api"), None).to_string(), "feat(api): add health check");
    }

    #[test]
    fn empty_emoji_renders_like_missing() {
        assert_eq!(
            commit(Some("api"), Some("")).to_string(),
            "feat(api): add health check"
        );
    }

    #[test]
    fn renders_emoji_and_scope() {
        assert_eq!(
            commit(Some("api"), Some("✨")).to_string(),
            "feat ✨(api): add health check"
        );
    }

    #[test]
    fn renders_emoji_only() {
        assert_eq!(commit(None, Some("✨")).to_string(), "feat ✨: add health check");
    }

    #[test]
    fn renders_bare() {
        assert_eq!(commit(None, None).to_string(), "feat: add health check");
    }

    #[test]
    fn normalize_drops_emoji_when_disabled() {
        let normalized = commit(Some("api"), Some("✨")).normalize(false);
        assert_eq!(normalized.emoji, None);
        assert_eq!(normalized.to_string(), "feat(api): add health check");
    }

    #[test]
    fn normalize_clears_blank_scope() {
        let normalized = commit(Some("  "), Some("✨")).normalize(true);
        assert_eq!(normalized.scope, None);
        assert_eq!(normalized.to_string(), "feat ✨: add health check");
    }

    #[test]
    fn taxonomy_has_eleven_types() {
        assert_eq!(COMMIT_TYPES.len(), 11);
        assert!(commit(None, None).is_known_type());
    }
}
