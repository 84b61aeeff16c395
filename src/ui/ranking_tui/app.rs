use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::ranker::RankedItem;
use crate::core::reencode;
use crate::core::session::{
    DeleteOutcome, Deleter, SelectionSession, SessionInput, SessionState,
};

use super::event_handler::{map_key, RankingEvent};
use super::render::render_ui;

/// What kind of rows the table shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingView {
    Movies,
    Shows,
    Seasons,
}

impl RankingView {
    /// Used in the re-encode script file name
    pub fn script_label(&self) -> &'static str {
        match self {
            RankingView::Movies => "movies",
            RankingView::Shows | RankingView::Seasons => "shows",
        }
    }

    pub fn measure_header(&self) -> &'static str {
        match self {
            RankingView::Movies => "Duration",
            RankingView::Shows | RankingView::Seasons => "Episodes",
        }
    }

    pub fn efficiency_header(&self) -> &'static str {
        match self {
            RankingView::Movies => "GB/min",
            RankingView::Shows | RankingView::Seasons => "GB/ep",
        }
    }
}

/// The table the `s` key flips to, e.g. shows and their seasons
pub struct AlternateView {
    pub view: RankingView,
    pub title: String,
    pub rows: Vec<RankedItem>,
}

/// Ranking application state
pub struct RankingApp<'a> {
    pub session: SelectionSession<'a>,
    pub view: RankingView,
    pub title: String,
    pub status: Option<String>,
    pub busy: bool,
    script_dir: PathBuf,
    history: Vec<DeleteOutcome>,
    alternate: Option<AlternateView>,
}

impl<'a> RankingApp<'a> {
    pub fn new(
        rows: Vec<RankedItem>,
        deleter: Deleter<'a>,
        view: RankingView,
        title: impl Into<String>,
        script_dir: PathBuf,
    ) -> Self {
        Self {
            session: SelectionSession::new(rows, deleter),
            view,
            title: title.into(),
            status: None,
            busy: false,
            script_dir,
            history: Vec::new(),
            alternate: None,
        }
    }

    pub fn with_alternate(
        mut self,
        view: RankingView,
        title: impl Into<String>,
        rows: Vec<RankedItem>,
    ) -> Self {
        self.alternate = Some(AlternateView {
            view,
            title: title.into(),
            rows,
        });
        self
    }

    pub fn can_switch_view(&self) -> bool {
        self.alternate.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.session.state() == SessionState::Exit
    }

    /// Every delete outcome recorded during this run
    pub fn history(&self) -> &[DeleteOutcome] {
        &self.history
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: RankingEvent) {
        match event {
            RankingEvent::Session(input) => {
                let before = self.session.state();
                let after = self.session.handle(input);
                if input == SessionInput::Affirm && after == SessionState::Reporting {
                    self.history.extend(self.session.outcomes().iter().cloned());
                }
                if before == SessionState::Browsing && after == SessionState::Browsing {
                    self.status = None;
                }
            }
            RankingEvent::Reencode => self.write_reencode_script(),
            RankingEvent::SwitchView => self.switch_view(),
            RankingEvent::None => {}
        }
        self.busy = false;
    }

    /// Flip to the alternate table. Items deleted earlier in the run are
    /// dropped from it and the selection starts over.
    fn switch_view(&mut self) {
        if self.session.state() != SessionState::Browsing {
            return;
        }
        let Some(next) = self.alternate.take() else {
            self.status = Some("No other view for this table".to_string());
            return;
        };

        let deleted: BTreeSet<&str> = self
            .history
            .iter()
            .filter(|outcome| outcome.succeeded())
            .map(|outcome| outcome.id.as_str())
            .collect();
        let mut rows = next.rows;
        rows.retain(|row| !deleted.contains(row.id()));
        for (idx, row) in rows.iter_mut().enumerate() {
            row.rank = idx + 1;
        }

        let previous = self.session.replace_rows(rows).unwrap_or_default();
        self.alternate = Some(AlternateView {
            view: self.view,
            title: std::mem::replace(&mut self.title, next.title),
            rows: previous,
        });
        self.view = next.view;
        self.status = None;
    }

    fn write_reencode_script(&mut self) {
        if self.session.selection().is_empty() {
            self.status = Some("Select items first to build a re-encode script".to_string());
            return;
        }

        let files = self.session.selected_files();
        self.status = Some(
            match reencode::write_script(&self.script_dir, self.view.script_label(), &files) {
                Ok(path) => {
                    log::info!("Wrote re-encode script {}", path.display());
                    format!("Re-encode script written: {}", path.display())
                }
                Err(e) => format!("Could not write re-encode script: {}", e),
            },
        );
    }
}

/// Run the ranking TUI and return every delete outcome of the run
pub fn run_ranking_app(mut app: RankingApp<'_>) -> Result<Vec<DeleteOutcome>> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result?;
    Ok(app.history)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut RankingApp<'_>,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| render_ui(frame, app))?;

        if let Event::Key(key) = event::read().context("Event read failed")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let ranking_event = map_key(app.session.state(), key.code);

            // Show the busy banner while the batch runs
            if ranking_event == RankingEvent::Session(SessionInput::Affirm) {
                app.busy = true;
                terminal.draw(|frame| render_ui(frame, app))?;
            }
            app.handle_event(ranking_event);
        }
    }
    Ok(())
}
