//! The commit session: preflight, diff, generate, review, act.
//!
//! ```text
//! Preflight -> Diffing -> Generating -> Presenting -> Committed | Cancelled
//!                             ^              |
//!                             +-- regenerate-+
//! ```
//!
//! Any error ends the session. Nothing is committed unless the user picks
//! confirm, or confirms an edit.

use std::time::Duration;

use console::style;
use tracing::{debug, info};

use crate::commit::StructuredCommit;
use crate::config::Config;
use crate::error::{LlmError, SessionError};
use crate::git::GitRepo;
use crate::llm::LlmProvider;
use crate::prompt::{build_prompt, collect_directory_listings, CommitRequest};
use crate::ui::{spinner, Decision, Prompter};

/// How a session ended, when it ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A commit was created with this message.
    Committed(String),
    /// The user backed out; nothing was committed.
    Cancelled,
}

/// One run of the commit workflow over explicit collaborators.
pub struct CommitSession<'a> {
    config: &'a Config,
    git: &'a dyn GitRepo,
    provider: &'a dyn LlmProvider,
}

impl<'a> CommitSession<'a> {
    pub fn new(config: &'a Config, git: &'a dyn GitRepo, provider: &'a dyn LlmProvider) -> Self {
        Self {
            config,
            git,
            provider,
        }
    }

    /// Runs the session to completion.
    ///
    /// `hint` is the user's own description of the change, if any.
    pub async fn run(
        &self,
        hint: Option<String>,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, SessionError> {
        self.git.verify_installed().await?;
        let root = self.git.verify_repository().await?;
        self.config.validate()?;

        let staged = self.git.staged_changes().await?;
        if staged.is_empty() {
            return Err(SessionError::NoStagedChanges);
        }

        println!("Detected {} staged file(s):", staged.files.len());
        for (idx, file) in staged.files.iter().enumerate() {
            println!("\t{}. {}", idx + 1, style(file).bold());
        }

        let related = collect_directory_listings(&staged.files, &root);
        let request = CommitRequest::new(hint, staged.diff, staged.files).with_related(related);
        let prompt = build_prompt(&request, self.config);
        debug!(prompt_bytes = prompt.len(), "prompt built");

        let mut attempt = 1usize;
        loop {
            let commit = self.generate(&prompt).await?;
            let message = commit.to_string();
            let thinking = commit.thinking.as_deref().filter(|_| self.config.cot);
            prompter.present(&message, thinking);

            match prompter.decide()? {
                Decision::Confirm => {
                    self.git.commit(&message).await?;
                    info!(attempt, "committed generated message");
                    return Ok(Outcome::Committed(message));
                }
                Decision::Regenerate => {
                    attempt += 1;
                    debug!(attempt, "regenerating");
                }
                Decision::Edit => {
                    return match prompter.edit(&message)? {
                        Some(edited) => {
                            self.git.commit(&edited).await?;
                            info!(attempt, "committed edited message");
                            Ok(Outcome::Committed(edited))
                        }
                        None => Ok(Outcome::Cancelled),
                    };
                }
                Decision::Cancel => return Ok(Outcome::Cancelled),
                Decision::Unknown(choice) => {
                    println!(
                        "{} Unrecognized choice '{}', cancelling",
                        style("⚠").yellow(),
                        choice
                    );
                    return Ok(Outcome::Cancelled);
                }
            }
        }
    }

    /// Calls the provider behind a spinner, bounded by the configured timeout.
    async fn generate(&self, prompt: &str) -> Result<StructuredCommit, LlmError> {
        let spinner = spinner("Generating commit message...");

        let result = match self.config.timeout_secs {
            0 => self.provider.generate(prompt).await,
            secs => tokio::time::timeout(Duration::from_secs(secs), self.provider.generate(prompt))
                .await
                .unwrap_or(Err(LlmError::Timeout(secs))),
        };

        spinner.finish_and_clear();
        result
    }
}
