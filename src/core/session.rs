//! Interactive selection and deletion over a ranked table.
//!
//! The session is a plain state machine fed with [`SessionInput`] events, so
//! the terminal front-end and the tests drive it the same way.
//!
//! ```text
//! Browsing --confirm--> ConfirmPending --affirm--> Deleting --> Reporting --any--> Browsing
//!                             |                                      |
//!                             +--decline--> Browsing                 +--quit--> Exit
//! ```

use std::collections::BTreeSet;

use crate::core::arr::ManagementService;
use crate::core::ranker::RankedItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Browsing,
    ConfirmPending,
    Deleting,
    Reporting,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Toggle,
    Confirm,
    Affirm,
    Decline,
    /// Acknowledge the delete report
    Dismiss,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub id: String,
    pub title: String,
    pub status: OutcomeStatus,
}

impl DeleteOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == OutcomeStatus::Succeeded
    }
}

/// The collaborator deletions go through, or why there is none
pub enum Deleter<'a> {
    Available(&'a dyn ManagementService),
    Unavailable(String),
}

const PAGE_SIZE: usize = 10;

pub struct SelectionSession<'a> {
    rows: Vec<RankedItem>,
    cursor: usize,
    selection: BTreeSet<String>,
    state: SessionState,
    deleter: Deleter<'a>,
    outcomes: Vec<DeleteOutcome>,
    notice: Option<String>,
}

impl<'a> SelectionSession<'a> {
    pub fn new(rows: Vec<RankedItem>, deleter: Deleter<'a>) -> Self {
        // An unavailable service is announced once, not per item
        let notice = match &deleter {
            Deleter::Unavailable(reason) => Some(format!("Deletion disabled: {}", reason)),
            Deleter::Available(_) => None,
        };

        Self {
            rows,
            cursor: 0,
            selection: BTreeSet::new(),
            state: SessionState::Browsing,
            deleter,
            outcomes: Vec::new(),
            notice,
        }
    }

    pub fn rows(&self) -> &[RankedItem] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn is_selected(&self, row: &RankedItem) -> bool {
        self.selection.contains(row.id())
    }

    /// Outcomes of the most recent batch
    pub fn outcomes(&self) -> &[DeleteOutcome] {
        &self.outcomes
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn can_delete(&self) -> bool {
        matches!(self.deleter, Deleter::Available(_))
    }

    pub fn service_name(&self) -> Option<&str> {
        match &self.deleter {
            Deleter::Available(service) => Some(service.name()),
            Deleter::Unavailable(_) => None,
        }
    }

    /// Rows whose identifier is selected, first row per identifier
    pub fn selected_rows(&self) -> Vec<&RankedItem> {
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .filter(|row| self.selection.contains(row.id()) && seen.insert(row.id()))
            .collect()
    }

    /// Backing files of every selected item
    pub fn selected_files(&self) -> Vec<String> {
        self.selected_rows()
            .into_iter()
            .flat_map(|row| row.files().iter().cloned())
            .collect()
    }

    pub fn selected_bytes(&self) -> u64 {
        self.selected_rows().iter().map(|row| row.size_bytes()).sum()
    }

    /// Swap in a different set of rows and hand back the old ones.
    /// Only allowed while browsing; the cursor and selection start over.
    pub fn replace_rows(&mut self, rows: Vec<RankedItem>) -> Option<Vec<RankedItem>> {
        if self.state != SessionState::Browsing {
            return None;
        }
        self.cursor = 0;
        self.selection.clear();
        Some(std::mem::replace(&mut self.rows, rows))
    }

    /// Apply one input and return the resulting state
    pub fn handle(&mut self, input: SessionInput) -> SessionState {
        if input == SessionInput::Quit {
            self.selection.clear();
            self.state = SessionState::Exit;
            return self.state;
        }

        match self.state {
            SessionState::Browsing => self.handle_browsing(input),
            SessionState::ConfirmPending => match input {
                SessionInput::Affirm => self.run_batch(),
                SessionInput::Decline => self.state = SessionState::Browsing,
                _ => {}
            },
            SessionState::Reporting => {
                self.state = SessionState::Browsing;
            }
            SessionState::Deleting | SessionState::Exit => {}
        }

        self.state
    }

    fn handle_browsing(&mut self, input: SessionInput) {
        let last = self.rows.len().saturating_sub(1);
        match input {
            SessionInput::Up => self.cursor = self.cursor.saturating_sub(1),
            SessionInput::Down => self.cursor = (self.cursor + 1).min(last),
            SessionInput::PageUp => self.cursor = self.cursor.saturating_sub(PAGE_SIZE),
            SessionInput::PageDown => self.cursor = (self.cursor + PAGE_SIZE).min(last),
            SessionInput::Home => self.cursor = 0,
            SessionInput::End => self.cursor = last,
            SessionInput::Toggle => self.toggle_current(),
            SessionInput::Confirm => {
                if self.can_delete() && !self.selection.is_empty() {
                    self.state = SessionState::ConfirmPending;
                }
            }
            _ => {}
        }
    }

    /// Flip the row under the cursor in or out of the selection
    pub fn toggle_current(&mut self) {
        if !self.can_delete() {
            return;
        }
        let Some(row) = self.rows.get(self.cursor) else {
            return;
        };
        let id = row.id().to_string();
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    /// Issue one delete per selected identifier, in row order, and record each outcome.
    /// The batch always runs to completion before the next input is looked at.
    fn run_batch(&mut self) {
        let Deleter::Available(service) = &self.deleter else {
            self.state = SessionState::Browsing;
            return;
        };
        let service = *service;

        self.state = SessionState::Deleting;

        let targets: Vec<_> = self
            .selected_rows()
            .into_iter()
            .map(|row| (row.delete_target(), row.title()))
            .collect();

        let mut outcomes = Vec::with_capacity(self.selection.len());
        for (target, title) in targets {
            let status = match service.delete_item(&target) {
                Ok(()) => OutcomeStatus::Succeeded,
                Err(e) => {
                    log::warn!("Failed to delete '{}': {}", title, e);
                    OutcomeStatus::Failed(e.to_string())
                }
            };
            outcomes.push(DeleteOutcome {
                id: target.id,
                title,
                status,
            });
        }

        // Selected identifiers with no row left still get an outcome
        for id in &self.selection {
            if !outcomes.iter().any(|outcome| &outcome.id == id) {
                outcomes.push(DeleteOutcome {
                    id: id.clone(),
                    title: id.clone(),
                    status: OutcomeStatus::Failed("item is no longer listed".to_string()),
                });
            }
        }

        let deleted: BTreeSet<&str> = outcomes
            .iter()
            .filter(|outcome| outcome.succeeded())
            .map(|outcome| outcome.id.as_str())
            .collect();
        self.rows.retain(|row| !deleted.contains(row.id()));
        for (idx, row) in self.rows.iter_mut().enumerate() {
            row.rank = idx + 1;
        }
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));

        self.selection.clear();
        self.outcomes = outcomes;
        self.state = SessionState::Reporting;
    }
}
