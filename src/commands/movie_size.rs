use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::Path;

use crate::core::arr::{connect_management, ArrKind, ManagementAvailability};
use crate::core::catalog::{libraries_of_kind, Catalog};
use crate::core::media::{LibraryKind, MovieRecord};
use crate::core::ranker::{rank_movies, WatchFilter, DEFAULT_RANK_LIMIT};
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
    let filter = if matches.get_flag("unwatched") {
        WatchFilter::Unwatched
    } else {
        WatchFilter::Watched
    };

    let config = super::load_config(explicit)?;
    let plex = super::connect_plex(&config)?;

    prompts::info("Fetching movies from Plex...");
    let movies = collect_movies(&plex)?;
    let rows = rank_movies(&movies, filter, limit);
    if rows.is_empty() {
        prompts::warn(&format!("No {} movies with size and runtime found.", filter.label()));
        return Ok(());
    }

    let radarr = connect_management(ArrKind::Radarr, &config.radarr);
    let deleter = match &radarr {
        ManagementAvailability::Available(client) => Deleter::Available(client),
        ManagementAvailability::Unavailable(reason) => {
            prompts::warn(&format!("Deletion disabled: {}", reason));
            Deleter::Unavailable(reason.clone())
        }
    };

    let title = format!("Top {} largest {} movies", rows.len(), filter.label());
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let app = RankingApp::new(rows, deleter, RankingView::Movies, title, cwd);
    let outcomes = run_ranking_app(app)?;

    super::print_delete_summary(&outcomes);
    Ok(())
}

/// Movies from every movie library, in catalog order
pub fn collect_movies(catalog: &dyn Catalog) -> Result<Vec<MovieRecord>> {
    let mut movies = Vec::new();
    for library in libraries_of_kind(catalog, LibraryKind::Movie)? {
        log::debug!("Reading movie library '{}'", library.name);
        movies.extend(catalog.list_movies(&library)?);
    }
    Ok(movies)
}
