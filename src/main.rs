//! geminic - CLI entry point.

use anyhow::Result;
use clap::Parser;
use console::style;
use reqwest::Client;
use tracing_subscriber::EnvFilter;

use geminic::cli::{Cli, Commands, ConfigAction};
use geminic::config::{
    config_or_default, load_config, load_global_config, load_local_config, local_config_path,
    save_config, save_local_config, Config,
};
use geminic::git::GitCli;
use geminic::llm::create_provider;
use geminic::session::{CommitSession, Outcome};
use geminic::ui::{config_form, local_config_form, select_model, spinner, TerminalPrompter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}", report(&e));
        std::process::exit(1);
    }
}

/// Each error's message already carries its cause, so only the outer
/// message is printed.
fn report(e: &anyhow::Error) -> String {
    format!("{} {}", style("✗").red(), e)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "geminic=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Some(Commands::Version) => {
            println!("geminic version {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(command) => command,
        None => {
            let config = load_config();
            init_logging(cli.verbose || config.as_ref().map(|c| c.verbose).unwrap_or(false));
            return generate_commit(&config?, cli.commit).await;
        }
    };

    let global = load_global_config();
    init_logging(cli.verbose || global.as_ref().map(|c| c.verbose).unwrap_or(false));

    match command {
        Commands::Config { action: None } => {
            let updated = config_form(&config_or_default(global))?;
            let path = save_config(&updated)?;
            println!("{} Configuration saved to {}", style("✓").green(), path.display());
            Ok(())
        }
        Commands::Config {
            action: Some(ConfigAction::Local),
        } => {
            let global = global?;
            let local = load_local_config(&local_config_path())?;
            let updated = local_config_form(&local, &global)?;
            let path = save_local_config(&updated)?;
            println!("{} Configuration saved to {}", style("✓").green(), path.display());
            Ok(())
        }
        Commands::Models => pick_model(global?).await,
        Commands::Version => Ok(()),
    }
}

async fn generate_commit(config: &Config, hint: Option<String>) -> Result<()> {
    let client = Client::builder().build()?;
    let provider = create_provider(config, client);
    let git = GitCli;
    let session = CommitSession::new(config, &git, provider.as_ref());

    match session.run(hint, &mut TerminalPrompter).await? {
        Outcome::Committed(_) => println!("{} Committed", style("✓").green()),
        Outcome::Cancelled => println!("{} Cancelled", style("—").dim()),
    }
    Ok(())
}

async fn pick_model(mut global: Config) -> Result<()> {
    let effective = load_config()?;
    if effective.key.trim().is_empty() {
        return Err(geminic::error::ConfigError::MissingKey.into());
    }

    let client = Client::builder().build()?;
    let provider = create_provider(&effective, client);

    let loading = spinner("Fetching models...");
    let models = provider.list_models().await;
    loading.finish_and_clear();
    let models = models?;

    if models.is_empty() {
        println!("{} Provider returned no models", style("⚠").yellow());
        return Ok(());
    }

    let picked = select_model(&models, &global.model)?;
    global.set_model(&picked);
    let path = save_config(&global)?;
    println!(
        "{} {} set to {} ({})",
        style("✓").green(),
        style("model").cyan(),
        style(&global.model).yellow(),
        path.display()
    );
    Ok(())
}
