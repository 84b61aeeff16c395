// plex-sync library - public API

// Re-export error types
pub mod error;
pub use error::{Result, SyncError};

// Module declarations
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::Config;

/// Initialize logging: `warn` by default, `debug` with `--verbose`.
/// `RUST_LOG` still takes precedence.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}
