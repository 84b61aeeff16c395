//! Terminal User Interface for ranked media tables.
//!
//! Renders a [`SelectionSession`](crate::core::session::SelectionSession)
//! with ratatui and feeds it key presses.

mod app;
mod event_handler;
mod render;

pub use app::{run_ranking_app, RankingApp, RankingView};
pub use event_handler::{map_key, RankingEvent};
