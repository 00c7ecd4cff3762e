//! User interaction and prompts.
//!
//! - [`Prompter`]: the decisions a commit session asks for, with
//!   [`TerminalPrompter`] as the interactive implementation
//! - [`spinner`]: indeterminate progress while the provider works
//! - [`config_form`], [`local_config_form`], [`select_model`]: the
//!   `config` and `models` subcommand forms

use console::style;
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::config::{Config, LocalConfig, ProviderKind};
use crate::error::UiError;

/// User's choice after reviewing a generated message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Commit the message as shown.
    Confirm,
    /// Ask the provider for another candidate.
    Regenerate,
    /// Edit the message, then confirm or drop it.
    Edit,
    /// Leave without committing.
    Cancel,
    /// Anything else the user typed.
    Unknown(String),
}

impl Decision {
    /// Accepts single keys (`y/r/e/n`) or the full words.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Decision::Confirm,
            "r" | "roll" | "regenerate" => Decision::Regenerate,
            "e" | "edit" => Decision::Edit,
            "n" | "no" | "q" | "quit" => Decision::Cancel,
            other => Decision::Unknown(other.to_string()),
        }
    }
}

/// Interactive steps of the commit session.
pub trait Prompter {
    /// Shows a generated message, with the model's reasoning if given.
    fn present(&mut self, message: &str, thinking: Option<&str>);

    /// Asks what to do with the message just presented.
    fn decide(&mut self) -> Result<Decision, UiError>;

    /// Lets the user edit `message`. `None` means the edit was declined.
    fn edit(&mut self, message: &str) -> Result<Option<String>, UiError>;
}

/// [`Prompter`] reading from the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn present(&mut self, message: &str, thinking: Option<&str>) {
        println!();
        if let Some(thinking) = thinking {
            print!("{}", style(format_text("Thinking", thinking)).dim());
            println!();
        }
        print!("{}", format_text("Generated commit message", message));
    }

    fn decide(&mut self) -> Result<Decision, UiError> {
        println!();
        println!("  {} Commit", style("[y]").cyan().bold());
        println!("  {} Regenerate", style("[r]").cyan().bold());
        println!("  {} Edit", style("[e]").cyan().bold());
        println!("  {} Cancel", style("[n]").cyan().bold());
        println!();

        print!("{} ", style("Choice:").bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Err(UiError::Cancelled);
        }
        Ok(Decision::parse(&input))
    }

    fn edit(&mut self, message: &str) -> Result<Option<String>, UiError> {
        let edited = dialoguer::Editor::new()
            .extension(".txt")
            .edit(message)?
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| message.to_string());

        println!();
        print!("{}", format_text("Edited commit message", &edited));

        let confirmed = Confirm::new()
            .with_prompt("Confirm edit?")
            .default(true)
            .interact()?;

        Ok(confirmed.then_some(edited))
    }
}

/// Frames `content` under `title` with a left bar, one line per input line.
pub fn format_text(title: &str, content: &str) -> String {
    let mut text = format!("┃ {}\n", title);
    for line in content.lines() {
        text.push_str(&format!("┃ {}\n", line.trim()));
    }
    text
}

/// Starts a ticking spinner with `message`.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Interactive editor for the global configuration.
pub fn config_form(current: &Config) -> Result<Config, UiError> {
    let mut config = current.clone();

    let providers = [ProviderKind::Gemini, ProviderKind::OpenAiCompatible];
    let labels = ["Gemini", "OpenAI compatible"];
    let selected = providers
        .iter()
        .position(|p| *p == current.provider_kind())
        .unwrap_or(1);
    let index = Select::new()
        .with_prompt("Which provider do you want to use?")
        .items(&labels)
        .default(selected)
        .interact_opt()?
        .ok_or(UiError::Cancelled)?;
    config.model_provider = providers[index].as_config_value().to_string();

    let key_prompt = if current.key.is_empty() {
        "What is your API key?"
    } else {
        "What is your API key? (leave blank to keep the current one)"
    };
    let key = Password::new()
        .with_prompt(key_prompt)
        .allow_empty_password(true)
        .interact()?;
    if !key.trim().is_empty() {
        config.key = key.trim().to_string();
    }

    config.model = Input::<String>::new()
        .with_prompt("Which model do you want to use?")
        .default(current.model.clone())
        .allow_empty(true)
        .interact_text()?
        .trim()
        .to_string();

    config.emoji = Confirm::new()
        .with_prompt("Do you want to enable emoji?")
        .default(current.emoji)
        .interact()?;

    config.custom_url = Input::<String>::new()
        .with_prompt("Custom backend connection (leave blank to disable)")
        .default(current.custom_url.clone())
        .allow_empty(true)
        .interact_text()?
        .trim()
        .to_string();

    config.i18n = Input::<String>::new()
        .with_prompt("i18n")
        .default(current.locale().to_string())
        .interact_text()?
        .trim()
        .to_string();

    config.cot = Confirm::new()
        .with_prompt("Show the model's chain of thought?")
        .default(current.cot)
        .interact()?;

    Ok(config)
}

/// Interactive editor for the project-local `geminic.toml`.
pub fn local_config_form(current: &LocalConfig, global: &Config) -> Result<LocalConfig, UiError> {
    let emoji = Confirm::new()
        .with_prompt("Do you want to enable emoji in this project?")
        .default(current.emoji.unwrap_or(global.emoji))
        .interact()?;

    let i18n = Input::<String>::new()
        .with_prompt("i18n")
        .default(
            current
                .i18n
                .clone()
                .unwrap_or_else(|| global.locale().to_string()),
        )
        .interact_text()?
        .trim()
        .to_string();

    Ok(LocalConfig {
        emoji: Some(emoji),
        i18n: (!i18n.is_empty()).then_some(i18n),
    })
}

/// Lets the user pick one of `models`, starting on `current` when listed.
pub fn select_model(models: &[String], current: &str) -> Result<String, UiError> {
    let default = models
        .iter()
        .position(|m| m.trim_start_matches("models/") == current)
        .unwrap_or(0);

    let index = Select::new()
        .with_prompt("Select a model")
        .items(models)
        .default(default)
        .max_length(15)
        .interact_opt()?
        .ok_or(UiError::Cancelled)?;

    Ok(models[index].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_words() {
        assert_eq!(Decision::parse("y\n"), Decision::Confirm);
        assert_eq!(Decision::parse("Yes"), Decision::Confirm);
        assert_eq!(Decision::parse("r"), Decision::Regenerate);
        assert_eq!(Decision::parse("roll"), Decision::Regenerate);
        assert_eq!(Decision::parse(" e "), Decision::Edit);
        assert_eq!(Decision::parse("n"), Decision::Cancel);
        assert_eq!(Decision::parse("maybe"), Decision::Unknown("maybe".into()));
    }

    #[test]
    fn format_text_frames_each_line() {
        assert_eq!(
            format_text("Generated commit message", "feat: add x\n  body"),
            "┃ Generated commit message\n┃ feat: add x\n┃ body\n"
        );
    }
}
