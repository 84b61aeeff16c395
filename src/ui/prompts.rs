// UI prompts and user interaction module

use colored::Colorize;
use dialoguer::Confirm;

/// Ask the user for a yes/no answer, falling back to `default` on Enter
pub fn confirm(message: &str, default: bool) -> anyhow::Result<bool> {
    let answer = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(answer)
}

/// Display a warning message
pub fn warn(message: &str) {
    println!("{}", format!("⚠️  Warning: {}", message).yellow().bold());
}

/// Display an info message
pub fn info(message: &str) {
    println!("{}", message.cyan());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{}", message.green().bold());
}

/// Display an error message
pub fn error(message: &str) {
    println!("{}", message.red().bold());
}

/// Display a dimmed/secondary message
pub fn dimmed(message: &str) {
    println!("{}", message.dimmed());
}

/// Display a bold white message
pub fn bold(message: &str) {
    println!("{}", message.white().bold());
}
