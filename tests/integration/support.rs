//! Fakes shared by the integration tests.

use chrono::{DateTime, NaiveDate, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use plex_sync::core::catalog::{titles_match, Catalog};
use plex_sync::core::media::{EpisodeRecord, LibraryKind, LibraryRef, MovieRecord, ShowAggregate};
use plex_sync::core::transfer::{Transfer, TransferOptions};
use plex_sync::{Result, SyncError};

pub fn episode(
    show: &str,
    season: u32,
    number: u32,
    aired: Option<&str>,
    watched: bool,
) -> EpisodeRecord {
    EpisodeRecord {
        show: show.to_string(),
        title: format!("Episode {}", number),
        season: Some(season),
        episode: Some(number),
        air_date: aired.map(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        added_at: DateTime::<Utc>::from_timestamp(1_600_000_000 + number as i64, 0).unwrap(),
        watched,
        files: vec![format!("/data/tv/{}/S{:02}E{:02}.mkv", show, season, number)],
    }
}

/// In-memory catalog that counts every call
#[derive(Default)]
pub struct FakeCatalog {
    pub libraries: Vec<LibraryRef>,
    pub episodes: HashMap<String, Vec<EpisodeRecord>>,
    /// Library name to show name to episodes, checked before `episodes`
    pub library_episodes: HashMap<String, HashMap<String, Vec<EpisodeRecord>>>,
    pub movies: Vec<MovieRecord>,
    pub reject_credentials: bool,
    pub calls: Cell<usize>,
}

impl FakeCatalog {
    pub fn with_show_library(name: &str) -> Self {
        Self {
            libraries: vec![
                LibraryRef {
                    id: "1".into(),
                    name: name.into(),
                    kind: LibraryKind::Episodic,
                },
                LibraryRef {
                    id: "2".into(),
                    name: "Movies".into(),
                    kind: LibraryKind::Movie,
                },
            ],
            ..Default::default()
        }
    }

    /// Catalog whose server turns every request away with HTTP 401
    pub fn rejecting_credentials() -> Self {
        Self {
            reject_credentials: true,
            ..Self::with_show_library("TV Shows")
        }
    }

    pub fn add_show(&mut self, name: &str, episodes: Vec<EpisodeRecord>) {
        self.episodes.insert(name.to_string(), episodes);
    }

    pub fn add_library(&mut self, name: &str, kind: LibraryKind) {
        self.libraries.push(LibraryRef {
            id: (self.libraries.len() + 1).to_string(),
            name: name.into(),
            kind,
        });
    }

    /// Register a show under one library only
    pub fn add_show_in(&mut self, library: &str, name: &str, episodes: Vec<EpisodeRecord>) {
        self.library_episodes
            .entry(library.to_string())
            .or_default()
            .insert(name.to_string(), episodes);
    }

    fn tick(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl Catalog for FakeCatalog {
    fn list_libraries(&self) -> Result<Vec<LibraryRef>> {
        self.tick();
        if self.reject_credentials {
            return Err(SyncError::authentication(
                "Unauthorized access to Plex server. Check your token and URL.",
            ));
        }
        Ok(self.libraries.clone())
    }

    fn list_show_episodes(&self, library: &LibraryRef, show_name: &str) -> Result<Vec<EpisodeRecord>> {
        self.tick();
        let shows = self
            .library_episodes
            .get(&library.name)
            .unwrap_or(&self.episodes);
        shows
            .iter()
            .find(|(name, _)| titles_match(name, show_name))
            .map(|(_, episodes)| episodes.clone())
            .ok_or_else(|| SyncError::not_found(format!("Show '{}'", show_name)))
    }

    fn list_movies(&self, _library: &LibraryRef) -> Result<Vec<MovieRecord>> {
        self.tick();
        Ok(self.movies.clone())
    }

    fn list_shows(&self, _library: &LibraryRef) -> Result<Vec<ShowAggregate>> {
        self.tick();
        Ok(Vec::new())
    }
}

/// Transfer collaborator that records sources and fails on request
#[derive(Default)]
pub struct RecordingTransfer {
    pub fail_sources: Vec<String>,
    pub calls: RefCell<Vec<(String, PathBuf)>>,
}

impl RecordingTransfer {
    pub fn failing_on(source: &str) -> Self {
        Self {
            fail_sources: vec![source.to_string()],
            ..Default::default()
        }
    }

    pub fn sources(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(source, _)| source.clone()).collect()
    }
}

impl Transfer for RecordingTransfer {
    fn transfer(&self, source: &str, dest: &Path, _options: &TransferOptions) -> Result<()> {
        self.calls
            .borrow_mut()
            .push((source.to_string(), dest.to_path_buf()));
        if self.fail_sources.iter().any(|s| s == source) {
            return Err(SyncError::transfer(source, "rsync exited with status 23"));
        }
        Ok(())
    }
}
