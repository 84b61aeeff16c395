use std::cell::RefCell;

use plex_sync::core::arr::ManagementService;
use plex_sync::core::media::MovieRecord;
use plex_sync::core::ranker::{rank_movies, DeleteTarget, RankedItem, WatchFilter};
use plex_sync::core::session::{Deleter, OutcomeStatus, SelectionSession, SessionInput, SessionState};
use plex_sync::{Result, SyncError};

const GB: u64 = 1024 * 1024 * 1024;

struct FakeRadarr {
    failing: Vec<String>,
    deleted: RefCell<Vec<String>>,
}

impl FakeRadarr {
    fn failing_on(titles: &[&str]) -> Self {
        Self {
            failing: titles.iter().map(|t| t.to_string()).collect(),
            deleted: RefCell::new(Vec::new()),
        }
    }
}

impl ManagementService for FakeRadarr {
    fn name(&self) -> &str {
        "Radarr"
    }

    fn delete_item(&self, target: &DeleteTarget) -> Result<()> {
        if self.failing.contains(&target.title) {
            return Err(SyncError::management("Radarr delete failed with HTTP 500"));
        }
        self.deleted.borrow_mut().push(target.title.clone());
        Ok(())
    }
}

fn ranked(titles: &[&str]) -> Vec<RankedItem> {
    let movies: Vec<MovieRecord> = titles
        .iter()
        .enumerate()
        .map(|(idx, title)| MovieRecord {
            id: format!("m{}", idx),
            library: "Movies".into(),
            title: title.to_string(),
            year: Some(2010),
            size_bytes: (titles.len() - idx) as u64 * GB,
            runtime_minutes: Some(120.0),
            watched: true,
            critic_rating: Some(7.5),
            audience_rating: None,
            files: vec![format!("/movies/{}.mkv", title)],
        })
        .collect();
    rank_movies(&movies, WatchFilter::Watched, 50)
}

fn feed(session: &mut SelectionSession, inputs: &[SessionInput]) -> SessionState {
    let mut state = session.state();
    for input in inputs {
        state = session.handle(*input);
    }
    state
}

#[test]
fn test_partial_failure_keeps_failed_item() {
    let radarr = FakeRadarr::failing_on(&["B"]);
    let mut session = SelectionSession::new(ranked(&["A", "B", "C"]), Deleter::Available(&radarr));

    let state = feed(
        &mut session,
        &[
            SessionInput::Toggle,
            SessionInput::Down,
            SessionInput::Toggle,
            SessionInput::Confirm,
            SessionInput::Affirm,
        ],
    );
    assert_eq!(state, SessionState::Reporting);

    let outcomes = session.outcomes();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().any(|o| o.title.starts_with("A") && o.succeeded()));
    assert!(outcomes
        .iter()
        .any(|o| o.title.starts_with("B") && matches!(o.status, OutcomeStatus::Failed(_))));
    assert!(session.selection().is_empty());

    assert_eq!(session.handle(SessionInput::Dismiss), SessionState::Browsing);
    let titles: Vec<String> = session.rows().iter().map(|r| r.title()).collect();
    assert_eq!(titles, vec!["B (2010)", "C (2010)"]);
    assert_eq!(session.rows()[0].rank, 1);
    assert_eq!(*radarr.deleted.borrow(), vec!["A"]);
}

#[test]
fn test_every_selected_item_gets_one_outcome() {
    let radarr = FakeRadarr::failing_on(&["B", "D"]);
    let mut session =
        SelectionSession::new(ranked(&["A", "B", "C", "D", "E"]), Deleter::Available(&radarr));

    let mut inputs = Vec::new();
    for _ in 0..5 {
        inputs.push(SessionInput::Toggle);
        inputs.push(SessionInput::Down);
    }
    inputs.push(SessionInput::Confirm);
    inputs.push(SessionInput::Affirm);
    feed(&mut session, &inputs);

    assert_eq!(session.outcomes().len(), 5);
    assert_eq!(session.outcomes().iter().filter(|o| o.succeeded()).count(), 3);
    assert_eq!(session.rows().len(), 2);
}

#[test]
fn test_decline_keeps_selection_and_empty_confirm_is_noop() {
    let radarr = FakeRadarr::failing_on(&[]);
    let mut session = SelectionSession::new(ranked(&["A", "B"]), Deleter::Available(&radarr));

    assert_eq!(session.handle(SessionInput::Confirm), SessionState::Browsing);

    feed(&mut session, &[SessionInput::Toggle, SessionInput::Confirm]);
    assert_eq!(session.state(), SessionState::ConfirmPending);
    assert_eq!(session.handle(SessionInput::Decline), SessionState::Browsing);
    assert_eq!(session.selection().len(), 1);
    assert!(radarr.deleted.borrow().is_empty());
}

#[test]
fn test_toggle_twice_restores_selection() {
    let radarr = FakeRadarr::failing_on(&[]);
    let mut session = SelectionSession::new(ranked(&["A", "B"]), Deleter::Available(&radarr));

    session.handle(SessionInput::Toggle);
    let before = session.selection().clone();
    session.handle(SessionInput::Down);
    session.handle(SessionInput::Toggle);
    session.handle(SessionInput::Toggle);
    assert_eq!(session.selection(), &before);
}

#[test]
fn test_unavailable_service_disables_deletion() {
    let mut session = SelectionSession::new(
        ranked(&["A", "B"]),
        Deleter::Unavailable("Radarr is not configured".into()),
    );

    assert_eq!(session.notice(), Some("Deletion disabled: Radarr is not configured"));
    feed(&mut session, &[SessionInput::Toggle, SessionInput::Confirm]);
    assert_eq!(session.state(), SessionState::Browsing);
    assert!(session.selection().is_empty());
    assert_eq!(session.handle(SessionInput::Quit), SessionState::Exit);
}
