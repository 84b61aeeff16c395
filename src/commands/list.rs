use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;
use std::path::Path;

use crate::core::catalog::{find_library, libraries_of_kind, Catalog};
use crate::core::media::{display_title, LibraryKind, LibraryRef};
use crate::core::selector::display_order;
use crate::error::SyncError;
use crate::ui::formatters::{format_runtime, format_size};
use crate::ui::prompts;

pub fn execute(matches: &ArgMatches, explicit: Option<&Path>) -> Result<()> {
    let config = super::load_config(explicit)?;
    let plex = super::connect_plex(&config)?;

    match matches.subcommand() {
        Some(("libraries", _)) => list_libraries(&plex),
        Some(("library", sub)) => {
            let name = sub
                .get_one::<String>("name")
                .ok_or_else(|| SyncError::config("Library name is required"))?;
            list_library(&plex, name)
        }
        Some(("unwatched", sub)) => {
            let show = sub
                .get_one::<String>("show")
                .ok_or_else(|| SyncError::config("Show name is required"))?;
            let library = sub.get_one::<String>("library").map(String::as_str);
            list_unwatched(&plex, show, library)
        }
        _ => {
            println!("Use 'plex-sync list --help' for more information.");
            Ok(())
        }
    }
}

pub fn list_libraries(catalog: &dyn Catalog) -> Result<()> {
    let libraries = catalog.list_libraries()?;
    if libraries.is_empty() {
        prompts::warn("The server has no show or movie libraries.");
        return Ok(());
    }

    prompts::bold("Libraries:");
    for library in &libraries {
        println!(
            "  {} {}",
            library.name.white().bold(),
            format!("({})", library.kind.label()).dimmed()
        );
    }
    Ok(())
}

pub fn list_library(catalog: &dyn Catalog, name: &str) -> Result<()> {
    let library = find_library(catalog, name)?;
    println!();
    println!("{}", format!("Library: {}", library.name).white().bold());

    match library.kind {
        LibraryKind::Movie => list_unwatched_movies(catalog, &library),
        LibraryKind::Episodic => list_shows_with_unwatched(catalog, &library),
    }
}

fn list_unwatched_movies(catalog: &dyn Catalog, library: &LibraryRef) -> Result<()> {
    let movies: Vec<_> = catalog
        .list_movies(library)?
        .into_iter()
        .filter(|movie| !movie.watched)
        .collect();

    for movie in &movies {
        println!(
            "  {} {} {}",
            display_title(&movie.title, movie.year),
            format!("[{}]", format_runtime(movie.runtime_minutes)).dimmed(),
            format_size(movie.size_bytes).dimmed()
        );
    }

    let total: u64 = movies.iter().map(|movie| movie.size_bytes).sum();
    println!();
    prompts::info(&format!(
        "{} unwatched movies, {} total",
        movies.len(),
        format_size(total)
    ));
    Ok(())
}

fn list_shows_with_unwatched(catalog: &dyn Catalog, library: &LibraryRef) -> Result<()> {
    let shows = catalog.list_shows(library)?;
    let mut show_count = 0;
    let mut unwatched_total = 0;

    for show in &shows {
        let unwatched = show.episode_count.saturating_sub(show.watched_episodes);
        if unwatched == 0 {
            continue;
        }
        show_count += 1;
        unwatched_total += unwatched;
        println!(
            "  {} - {} episodes - {} unwatched",
            display_title(&show.title, show.year),
            show.episode_count,
            unwatched.to_string().yellow()
        );
    }

    println!();
    prompts::info(&format!(
        "{} shows with {} unwatched episodes",
        show_count, unwatched_total
    ));
    Ok(())
}

pub fn list_unwatched(catalog: &dyn Catalog, show: &str, library: Option<&str>) -> Result<()> {
    let library = match library {
        Some(name) => find_library(catalog, name)?,
        None => libraries_of_kind(catalog, LibraryKind::Episodic)?
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::not_found("No show library on the server"))?,
    };

    let episodes: Vec<_> = catalog
        .list_show_episodes(&library, show)?
        .into_iter()
        .filter(|episode| !episode.watched)
        .collect();

    if episodes.is_empty() {
        prompts::success(&format!("No unwatched episodes of '{}'.", show));
        return Ok(());
    }

    prompts::bold(&format!("Unwatched episodes of {}:", show));
    for episode in display_order(&episodes) {
        println!(
            "  {} {}",
            episode.code().cyan(),
            episode.title
        );
        if let Some(file) = episode.files.first() {
            println!("      {}", file.dimmed());
        }
    }
    println!();
    prompts::info(&format!("{} unwatched episodes", episodes.len()));
    Ok(())
}
