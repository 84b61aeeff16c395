// Command handlers module
pub mod completions;
pub mod config;
pub mod list;
pub mod movie_size;
pub mod show_size;
pub mod sync;
pub mod version;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::core::session::{DeleteOutcome, OutcomeStatus};
use crate::core::{Config, PlexClient};
use crate::ui::prompts;

/// Load the config from `--config` when given, else by discovery.
/// Environment overrides apply either way.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_overrides(
                std::env::var("PLEX_URL").ok(),
                std::env::var("PLEX_TOKEN").ok(),
            );
            config
        }
        None => Config::load()?,
    };

    match &config.source {
        Some(path) => log::debug!("Using config file {}", path.display()),
        None => log::debug!("No config file found, using defaults"),
    }

    Ok(config)
}

/// Build a Plex client from the loaded config
pub fn connect_plex(config: &Config) -> Result<PlexClient> {
    let token = config.plex_token()?;
    let client = PlexClient::new(&config.plex.url, token)
        .with_context(|| format!("Failed to set up Plex client for {}", config.plex.url))?;
    Ok(client)
}

/// Print the outcome summary after the ranking table closes
pub fn print_delete_summary(outcomes: &[DeleteOutcome]) {
    if outcomes.is_empty() {
        return;
    }

    let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
    for outcome in outcomes {
        match &outcome.status {
            OutcomeStatus::Succeeded => {
                println!("  {} {}", "✓".green(), outcome.title)
            }
            OutcomeStatus::Failed(reason) => {
                println!("  {} {}: {}", "✗".red(), outcome.title, reason.dimmed())
            }
        }
    }
    prompts::info(&format!(
        "{} deleted, {} failed",
        succeeded,
        outcomes.len() - succeeded
    ));
}
