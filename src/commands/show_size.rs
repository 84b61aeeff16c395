use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::Path;

use crate::core::arr::{connect_management, ArrKind, ManagementAvailability};
use crate::core::catalog::{libraries_of_kind, Catalog};
use crate::core::media::{LibraryKind, ShowAggregate};
use crate::core::ranker::{rank_seasons, rank_shows, DEFAULT_RANK_LIMIT};
use crate::core::session::Deleter;
use crate::error::SyncError;
use crate::ui::prompts;
use crate::ui::ranking_tui::{run_ranking_app, RankingApp, RankingView};

pub fn execute(matches: &ArgMatches, explicit: Option<&Path>) -> Result<()> {
    let limit = matches
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or(DEFAULT_RANK_LIMIT);
    if limit == 0 {
        return Err(SyncError::config("--limit must be at least 1").into());
    }
    let watched_only = matches.get_flag("watched");
    let view = if matches.get_flag("seasons") {
        RankingView::Seasons
    } else {
        RankingView::Shows
    };

    let config = super::load_config(explicit)?;
    let plex = super::connect_plex(&config)?;

    prompts::info("Fetching shows from Plex (this reads every episode)...");
    let shows = collect_shows(&plex)?;
    let show_rows = rank_shows(&shows, watched_only, limit);
    let season_rows = rank_seasons(&shows, watched_only, limit);
    let (rows, alternate_view, alternate_rows) = match view {
        RankingView::Seasons => (season_rows, RankingView::Shows, show_rows),
        _ => (show_rows, RankingView::Seasons, season_rows),
    };
    if rows.is_empty() {
        prompts::warn("No shows with media found.");
        return Ok(());
    }

    let sonarr = connect_management(ArrKind::Sonarr, &config.sonarr);
    let deleter = match &sonarr {
        ManagementAvailability::Available(client) => Deleter::Available(client),
        ManagementAvailability::Unavailable(reason) => {
            prompts::warn(&format!("Deletion disabled: {}", reason));
            Deleter::Unavailable(reason.clone())
        }
    };

    let scope = if watched_only { "fully watched " } else { "" };
    let title = |view: RankingView, count: usize| {
        let unit = if view == RankingView::Seasons { "seasons" } else { "shows" };
        format!("Top {} largest {}{}", count, scope, unit)
    };
    let main_title = title(view, rows.len());
    let alternate_title = title(alternate_view, alternate_rows.len());
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let app = RankingApp::new(rows, deleter, view, main_title, cwd).with_alternate(
        alternate_view,
        alternate_title,
        alternate_rows,
    );
    let outcomes = run_ranking_app(app)?;

    super::print_delete_summary(&outcomes);
    Ok(())
}

/// Aggregated shows from every show library, in catalog order
pub fn collect_shows(catalog: &dyn Catalog) -> Result<Vec<ShowAggregate>> {
    let mut shows = Vec::new();
    for library in libraries_of_kind(catalog, LibraryKind::Episodic)? {
        log::debug!("Reading show library '{}'", library.name);
        shows.extend(catalog.list_shows(&library)?);
    }
    Ok(shows)
}
