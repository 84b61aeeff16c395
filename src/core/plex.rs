//! Plex Media Server client.
//!
//! Talks to the JSON flavour of the Plex HTTP API and converts its metadata
//! into the catalog snapshot types.

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

use crate::core::catalog::{titles_match, Catalog};
use crate::core::media::{
    EpisodeRecord, LibraryKind, LibraryRef, MovieRecord, SeasonSize, ShowAggregate,
};
use crate::error::{Result, SyncError};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    container: T,
}

#[derive(Debug, Default, Deserialize)]
struct SectionContainer {
    #[serde(default, rename = "Directory")]
    directories: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct Section {
    key: String,
    title: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataContainer {
    #[serde(default, rename = "Metadata")]
    metadata: Vec<Metadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub rating_key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub grandparent_title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub parent_index: Option<u32>,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub originally_available_at: Option<String>,
    #[serde(default)]
    pub added_at: Option<i64>,
    #[serde(default)]
    pub view_count: Option<u32>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub audience_rating: Option<f64>,
    #[serde(default, rename = "Media")]
    pub media: Vec<Media>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Media {
    #[serde(default, rename = "Part")]
    pub parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl Metadata {
    fn watched(&self) -> bool {
        self.view_count.unwrap_or(0) > 0
    }

    fn files(&self) -> Vec<String> {
        self.media
            .iter()
            .flat_map(|media| media.parts.iter())
            .filter_map(|part| part.file.clone())
            .collect()
    }

    fn size_bytes(&self) -> u64 {
        self.media
            .iter()
            .flat_map(|media| media.parts.iter())
            .filter_map(|part| part.size)
            .sum()
    }
}

pub fn episode_from_metadata(show: &str, meta: &Metadata) -> EpisodeRecord {
    EpisodeRecord {
        show: meta
            .grandparent_title
            .clone()
            .unwrap_or_else(|| show.to_string()),
        title: meta.title.clone(),
        season: meta.parent_index,
        episode: meta.index,
        air_date: meta
            .originally_available_at
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()),
        added_at: meta
            .added_at
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        watched: meta.watched(),
        files: meta.files(),
    }
}

pub fn movie_from_metadata(library: &str, meta: &Metadata) -> MovieRecord {
    MovieRecord {
        id: meta.rating_key.clone(),
        library: library.to_string(),
        title: meta.title.clone(),
        year: meta.year,
        size_bytes: meta.size_bytes(),
        runtime_minutes: meta.duration.map(|ms| ms as f64 / 60_000.0),
        watched: meta.watched(),
        critic_rating: meta.rating,
        audience_rating: meta.audience_rating,
        files: meta.files(),
    }
}

/// Aggregate a show from its episodes; episodes without media are not counted
pub fn show_from_metadata(library: &str, show: &Metadata, episodes: &[Metadata]) -> ShowAggregate {
    let mut seasons: BTreeMap<Option<u32>, (u64, u32)> = BTreeMap::new();
    let mut files = Vec::new();
    let mut watched_episodes = 0;

    for episode in episodes.iter().filter(|ep| !ep.media.is_empty()) {
        let entry = seasons.entry(episode.parent_index).or_default();
        entry.0 += episode.size_bytes();
        entry.1 += 1;
        if episode.watched() {
            watched_episodes += 1;
        }
        files.extend(episode.files());
    }

    let seasons: Vec<SeasonSize> = seasons
        .into_iter()
        .filter(|(_, (size, _))| *size > 0)
        .map(|(season, (size_bytes, episode_count))| SeasonSize {
            season,
            size_bytes,
            episode_count,
        })
        .collect();

    ShowAggregate {
        id: show.rating_key.clone(),
        library: library.to_string(),
        title: show.title.clone(),
        year: show.year,
        size_bytes: seasons.iter().map(|s| s.size_bytes).sum(),
        episode_count: seasons.iter().map(|s| s.episode_count).sum(),
        watched_episodes,
        critic_rating: show.rating,
        audience_rating: show.audience_rating,
        seasons,
        files,
    }
}

/// Map a non-success Plex response to its error kind
pub fn status_error(status: StatusCode, path: &str) -> Option<SyncError> {
    match status {
        StatusCode::UNAUTHORIZED => Some(SyncError::authentication(
            "Unauthorized access to Plex server. Check your token and URL.",
        )),
        StatusCode::NOT_FOUND => Some(SyncError::not_found(format!("Plex resource '{}'", path))),
        status if !status.is_success() => Some(SyncError::other(format!(
            "Plex request '{}' failed with HTTP {}",
            path, status
        ))),
        _ => None,
    }
}

pub struct PlexClient {
    base_url: Url,
    token: String,
    http: Client,
}

impl PlexClient {
    pub fn new(url: &str, token: &str) -> Result<Self> {
        let base_url = Url::parse(url)
            .map_err(|e| SyncError::config(format!("Invalid Plex URL '{}': {}", url, e)))?;
        let http = Client::builder().user_agent("plex-sync").build()?;

        Ok(Self {
            base_url,
            token: token.to_string(),
            http,
        })
    }

    fn get<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| SyncError::other(format!("Bad Plex path '{}': {}", path, e)))?;

        let response = self
            .http
            .get(url)
            .header("X-Plex-Token", &self.token)
            .header("Accept", "application/json")
            .send()?;

        if let Some(err) = status_error(response.status(), path) {
            return Err(err);
        }
        let envelope: Envelope<T> = response.json()?;
        Ok(envelope.container)
    }

    fn section_items(&self, library: &LibraryRef) -> Result<Vec<Metadata>> {
        let container: MetadataContainer =
            self.get(&format!("library/sections/{}/all", library.id))?;
        Ok(container.metadata)
    }

    fn leaves(&self, show: &Metadata) -> Result<Vec<Metadata>> {
        let container: MetadataContainer =
            self.get(&format!("library/metadata/{}/allLeaves", show.rating_key))?;
        Ok(container.metadata)
    }
}

impl Catalog for PlexClient {
    fn list_libraries(&self) -> Result<Vec<LibraryRef>> {
        let container: SectionContainer = self.get("library/sections")?;

        Ok(container
            .directories
            .into_iter()
            .filter_map(|section| {
                let kind = match section.kind.as_str() {
                    "show" => LibraryKind::Episodic,
                    "movie" => LibraryKind::Movie,
                    _ => return None,
                };
                Some(LibraryRef {
                    id: section.key,
                    name: section.title,
                    kind,
                })
            })
            .collect())
    }

    fn list_show_episodes(&self, library: &LibraryRef, show_name: &str) -> Result<Vec<EpisodeRecord>> {
        let shows = self.section_items(library)?;
        let show = shows
            .iter()
            .find(|show| titles_match(&show.title, show_name))
            .ok_or_else(|| {
                SyncError::not_found(format!(
                    "Show '{}' not found in library '{}'",
                    show_name, library.name
                ))
            })?;

        Ok(self
            .leaves(show)?
            .iter()
            .map(|meta| episode_from_metadata(&show.title, meta))
            .collect())
    }

    fn list_movies(&self, library: &LibraryRef) -> Result<Vec<MovieRecord>> {
        Ok(self
            .section_items(library)?
            .iter()
            .map(|meta| movie_from_metadata(&library.name, meta))
            .collect())
    }

    fn list_shows(&self, library: &LibraryRef) -> Result<Vec<ShowAggregate>> {
        let shows = self.section_items(library)?;
        let mut aggregates = Vec::with_capacity(shows.len());

        for show in &shows {
            let episodes = self.leaves(show)?;
            aggregates.push(show_from_metadata(&library.name, show, &episodes));
        }

        Ok(aggregates)
    }
}
