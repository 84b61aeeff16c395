use anyhow::Result;
use clap::{ArgMatches, Command};
use clap_complete::{generate, Shell};
use std::io;

use crate::error::SyncError;

pub const SUPPORTED_SHELLS: [&str; 5] = ["bash", "zsh", "fish", "powershell", "elvish"];

/// Parse a shell name, case-insensitively
pub fn parse_shell(name: &str) -> Option<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "powershell" => Some(Shell::PowerShell),
        "elvish" => Some(Shell::Elvish),
        _ => None,
    }
}

/// Generate shell completions for the specified shell
pub fn execute(matches: &ArgMatches, cli: &mut Command) -> Result<()> {
    let shell_str = matches
        .get_one::<String>("shell")
        .ok_or_else(|| SyncError::config("shell argument is required"))?;

    let shell = parse_shell(shell_str).ok_or_else(|| {
        SyncError::config(format!(
            "Unsupported shell: {} (supported: {})",
            shell_str,
            SUPPORTED_SHELLS.join(", ")
        ))
    })?;

    generate(shell, cli, "plex-sync", &mut io::stdout());
    Ok(())
}
