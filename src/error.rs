//! Error types for geminic modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from git shell-outs.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git is not installed. {0}")]
    NotInstalled(String),

    #[error("current directory is not a git repository. {0}")]
    NotARepository(String),

    #[error("Failed to spawn git: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("`git {command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("failed to commit changes. {0}")]
    CommitFailed(String),
}

/// Errors from loading, saving, or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("api key must be set, use `geminic config` to set it")]
    MissingKey,

    #[error("model must be set, use `geminic config` to set it")]
    MissingModel,
}

/// Errors from an LLM provider call.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Provider rejected the credentials ({status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Provider returned an error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Request to provider failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider returned a blank reply")]
    EmptyResponse,

    #[error("Could not parse provider reply: {source} - raw: {raw}")]
    Parse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Provider reply is missing required field `{field}` - raw: {raw}")]
    MissingField { field: &'static str, raw: String },

    #[error("Provider timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors from interactive terminal prompts.
#[derive(Error, Debug)]
pub enum UiError {
    #[error("Prompt cancelled")]
    Cancelled,

    #[error("Failed to get user input: {0}")]
    Dialog(#[from] dialoguer::Error),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that end a commit session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Ui(#[from] UiError),

    #[error("no staged changes found. stage your changes manually")]
    NoStagedChanges,
}
