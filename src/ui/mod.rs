// UI and formatting module

pub mod formatters;
pub mod prompts;
pub mod ranking_tui;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_gb, format_rating, format_runtime, format_size, truncate_to_width};
pub use prompts::{bold, confirm, dimmed, error, info, success, warn};
