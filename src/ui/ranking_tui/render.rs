use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use super::app::RankingApp;
use crate::core::ranker::{RankSubject, RankedItem};
use crate::core::session::{OutcomeStatus, SessionState};
use crate::ui::formatters::{
    format_gb, format_rating, format_runtime, format_size, truncate_to_width,
};

const TITLE_WIDTH: usize = 48;
const LIBRARY_WIDTH: usize = 16;

/// Main render function
pub fn render_ui(frame: &mut Frame, app: &RankingApp) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Table
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_table(frame, chunks[1], app);
    render_footer(frame, chunks[2], app);

    match app.session.state() {
        SessionState::ConfirmPending | SessionState::Deleting => {
            render_confirm_popup(frame, area, app)
        }
        SessionState::Reporting => render_report_popup(frame, area, app),
        SessionState::Browsing | SessionState::Exit => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &RankingApp) {
    let selected = app.session.selected_rows().len();
    let text = format!(
        " {} rows │ {} selected ({}) ",
        app.session.rows().len(),
        selected,
        format_size(app.session.selected_bytes())
    );

    let block = Block::default()
        .title(format!(" {} ", app.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let para = Paragraph::new(text).block(block);
    frame.render_widget(para, area);
}

fn measure_cell(item: &RankedItem) -> String {
    match &item.subject {
        RankSubject::Movie(movie) => format_runtime(movie.runtime_minutes),
        RankSubject::Show(show) => show.episode_count.to_string(),
        RankSubject::Season(row) => row.episode_count.to_string(),
    }
}

fn render_table(frame: &mut Frame, area: Rect, app: &RankingApp) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("✓").style(bold),
        Cell::from("Rank").style(bold),
        Cell::from("Library").style(bold),
        Cell::from("Title").style(bold),
        Cell::from(app.view.measure_header()).style(bold),
        Cell::from("Size (GB)").style(bold),
        Cell::from(app.view.efficiency_header()).style(bold),
        Cell::from("Rating").style(bold),
        Cell::from("Audience").style(bold),
    ])
    .height(1);

    let rows: Vec<Row> = app
        .session
        .rows()
        .iter()
        .map(|item| {
            let selected = app.session.is_selected(item);
            let (rating, audience) = item.ratings();
            let style = if selected {
                Style::default().fg(Color::LightRed)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(if selected { "[x]" } else { "[ ]" }),
                Cell::from(item.rank.to_string()),
                Cell::from(truncate_to_width(item.library(), LIBRARY_WIDTH)),
                Cell::from(truncate_to_width(&item.title(), TITLE_WIDTH)),
                Cell::from(measure_cell(item)),
                Cell::from(format_gb(item.size_gb())),
                Cell::from(format!("{:.3}", item.efficiency_gb())),
                Cell::from(format_rating(rating)),
                Cell::from(format_rating(audience)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(LIBRARY_WIDTH as u16),
            Constraint::Min(20),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL))
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    if !app.session.rows().is_empty() {
        state.select(Some(app.session.cursor()));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &RankingApp) {
    let actions = if app.session.can_delete() {
        "Space: Select │ d: Delete │ r: Re-encode script │ "
    } else {
        ""
    };
    let switch = if app.can_switch_view() { "s: Shows/Seasons │ " } else { "" };
    let keys = format!(" ↑↓/jk: Move │ PgUp/PgDn │ {}{}q: Quit ", actions, switch);

    let message = app
        .status
        .as_deref()
        .or_else(|| app.session.notice())
        .unwrap_or("");

    let lines = vec![
        Line::from(Span::styled(keys, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Yellow),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_confirm_popup(frame: &mut Frame, area: Rect, app: &RankingApp) {
    let selected = app.session.selected_rows();
    let service = app.session.service_name().unwrap_or("the management service");

    let mut lines = vec![
        Line::from(format!(
            "Delete {} item(s), {} total, via {}?",
            selected.len(),
            format_size(app.session.selected_bytes()),
            service
        )),
        Line::from("Files are removed and the items are excluded from future downloads."),
        Line::from(""),
    ];
    for row in selected.iter().take(10) {
        lines.push(Line::from(format!("  • {}", row.title())));
    }
    if selected.len() > 10 {
        lines.push(Line::from(format!("  … and {} more", selected.len() - 10)));
    }
    lines.push(Line::from(""));
    lines.push(if app.busy {
        Line::from(Span::styled(
            "Deleting...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from("y/Enter: Delete │ n/Esc: Cancel")
    });

    let block = Block::default()
        .title(" Confirm deletion ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let popup_area = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}

fn render_report_popup(frame: &mut Frame, area: Rect, app: &RankingApp) {
    let outcomes = app.session.outcomes();
    let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();

    let mut lines = vec![
        Line::from(format!(
            "{} deleted, {} failed",
            succeeded,
            outcomes.len() - succeeded
        )),
        Line::from(""),
    ];
    for outcome in outcomes {
        lines.push(match &outcome.status {
            OutcomeStatus::Succeeded => Line::from(Span::styled(
                format!("✓ {}", outcome.title),
                Style::default().fg(Color::Green),
            )),
            OutcomeStatus::Failed(reason) => Line::from(Span::styled(
                format!("✗ {}: {}", outcome.title, reason),
                Style::default().fg(Color::Red),
            )),
        });
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Press any key to continue"));

    let block = Block::default()
        .title(" Deletion report ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let popup_area = centered_rect(70, 60, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
