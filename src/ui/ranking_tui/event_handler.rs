use crossterm::event::KeyCode;

use crate::core::session::{SessionInput, SessionState};

/// Events that can occur in the ranking TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingEvent {
    /// Forwarded to the selection session
    Session(SessionInput),
    /// Write a re-encode script for the current selection
    Reencode,
    /// Flip between the show and season tables
    SwitchView,
    /// No action
    None,
}

/// Translate a key press into an event for the current session state
pub fn map_key(state: SessionState, code: KeyCode) -> RankingEvent {
    match state {
        SessionState::Browsing => match code {
            KeyCode::Up | KeyCode::Char('k') => RankingEvent::Session(SessionInput::Up),
            KeyCode::Down | KeyCode::Char('j') => RankingEvent::Session(SessionInput::Down),
            KeyCode::PageUp => RankingEvent::Session(SessionInput::PageUp),
            KeyCode::PageDown => RankingEvent::Session(SessionInput::PageDown),
            KeyCode::Home => RankingEvent::Session(SessionInput::Home),
            KeyCode::End => RankingEvent::Session(SessionInput::End),
            KeyCode::Char(' ') => RankingEvent::Session(SessionInput::Toggle),
            KeyCode::Char('d') => RankingEvent::Session(SessionInput::Confirm),
            KeyCode::Char('r') => RankingEvent::Reencode,
            KeyCode::Char('s') => RankingEvent::SwitchView,
            KeyCode::Char('q') => RankingEvent::Session(SessionInput::Quit),
            _ => RankingEvent::None,
        },
        SessionState::ConfirmPending => match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                RankingEvent::Session(SessionInput::Affirm)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                RankingEvent::Session(SessionInput::Decline)
            }
            _ => RankingEvent::None,
        },
        SessionState::Reporting => RankingEvent::Session(SessionInput::Dismiss),
        SessionState::Deleting | SessionState::Exit => RankingEvent::None,
    }
}
