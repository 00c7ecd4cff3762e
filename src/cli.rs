//! Command-line interface definitions for geminic.
//!
//! # Commands
//!
//! - Default (no subcommand): generate a message for the staged changes and commit
//! - `config`: edit the global configuration (`config local` for `./geminic.toml`)
//! - `models`: pick a model from the provider's listing
//! - `version`: print the version

use clap::{Parser, Subcommand};

/// Main CLI structure for geminic.
#[derive(Parser, Debug)]
#[command(name = "geminic")]
#[command(about = "Using Gemini to write git commits", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Your own description of the change, used as the basis of the message
    #[arg(short = 'c', long = "commit")]
    pub commit: Option<String>,

    /// Show debug logs on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set the config file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Select a model from the configured provider
    Models,
    /// Print the version of geminic
    Version,
}

/// Configuration subcommand actions.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Set the project-local config (./geminic.toml)
    Local,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_takes_commit_hint() {
        let cli = Cli::try_parse_from(["geminic", "-c", "rename the parser"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.commit.as_deref(), Some("rename the parser"));
    }

    #[test]
    fn config_local_subcommand() {
        let cli = Cli::try_parse_from(["geminic", "config", "local"]).unwrap();
        match cli.command {
            Some(Commands::Config { action }) => assert_eq!(action, Some(ConfigAction::Local)),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["geminic", "config"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config { action: None })));
    }

    #[test]
    fn models_and_version_subcommands() {
        let cli = Cli::try_parse_from(["geminic", "models", "-v"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Models)));
        assert!(cli.verbose);

        let cli = Cli::try_parse_from(["geminic", "version"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Version)));
    }
}
