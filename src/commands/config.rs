use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::core::Config;
use crate::ui::prompts;

pub fn execute(matches: &ArgMatches, explicit: Option<&Path>) -> Result<()> {
    if matches.get_flag("show") {
        return show_config(explicit);
    }

    let target = match matches.get_one::<String>("path") {
        Some(path) => PathBuf::from(path),
        None => match explicit {
            Some(path) => path.to_path_buf(),
            None => Config::default_path()?,
        },
    };

    if target.exists() {
        let question = format!("Config file {} already exists. Overwrite it?", target.display());
        if !prompts::confirm(&question, false)? {
            prompts::dimmed("Keeping the existing config file.");
            return Ok(());
        }
    }

    let written = Config::create_default(Some(target))
        .context("Failed to write default config file")?;

    println!(
        "{} {}",
        "✓ Config file created:".green().bold(),
        written.display().to_string().white()
    );
    prompts::dimmed("Edit [plex] token and the [[sync.libraries]] entries before running sync.");

    Ok(())
}

fn show_config(explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Config::discover_path(),
    };

    let Some(path) = path else {
        prompts::warn("No config file found.");
        prompts::dimmed("Run 'plex-sync config' to create one.");
        return Ok(());
    };

    let config = super::load_config(Some(&path))?;
    println!("{} {}", "Config file:".white().bold(), path.display());
    println!("  {} {}", "Plex URL:".cyan(), config.plex.url);
    println!(
        "  {} {}",
        "Plex token:".cyan(),
        if config.plex.token.is_empty() { "(not set)" } else { "(set)" }
    );
    println!("  {} {}", "Cache file:".cyan(), config.cache_path()?.display());
    println!(
        "  {} {}",
        "Sync libraries:".cyan(),
        config.sync.libraries.len()
    );
    for (name, service) in [("Sonarr", &config.sonarr), ("Radarr", &config.radarr)] {
        let state = if service.enabled { "enabled".green() } else { "disabled".dimmed() };
        println!("  {} {}", format!("{}:", name).cyan(), state);
    }

    Ok(())
}
