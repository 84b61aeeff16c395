//! Catalog snapshot types shared by the sync and ranking workflows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of content a library holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LibraryKind {
    Episodic,
    Movie,
}

impl LibraryKind {
    pub fn label(&self) -> &'static str {
        match self {
            LibraryKind::Episodic => "show",
            LibraryKind::Movie => "movie",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRef {
    pub id: String,
    pub name: String,
    pub kind: LibraryKind,
}

/// One episode as reported by the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    pub show: String,
    pub title: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub air_date: Option<NaiveDate>,
    pub added_at: DateTime<Utc>,
    pub watched: bool,
    pub files: Vec<String>,
}

impl EpisodeRecord {
    /// `S01E02` style label, `S??E??` when the numbering is unknown
    pub fn code(&self) -> String {
        match (self.season, self.episode) {
            (Some(s), Some(e)) => format!("S{:02}E{:02}", s, e),
            (Some(s), None) => format!("S{:02}E??", s),
            (None, Some(e)) => format!("S??E{:02}", e),
            (None, None) => "S??E??".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub id: String,
    pub library: String,
    pub title: String,
    pub year: Option<i32>,
    pub size_bytes: u64,
    /// Runtime in minutes, `None` when the catalog has no duration
    pub runtime_minutes: Option<f64>,
    pub watched: bool,
    pub critic_rating: Option<f64>,
    pub audience_rating: Option<f64>,
    pub files: Vec<String>,
}

/// Size of one season within a show
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSize {
    /// `None` for specials/extras without a season number
    pub season: Option<u32>,
    pub size_bytes: u64,
    pub episode_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShowAggregate {
    pub id: String,
    pub library: String,
    pub title: String,
    pub year: Option<i32>,
    pub size_bytes: u64,
    pub episode_count: u32,
    pub watched_episodes: u32,
    pub critic_rating: Option<f64>,
    pub audience_rating: Option<f64>,
    pub seasons: Vec<SeasonSize>,
    pub files: Vec<String>,
}

impl ShowAggregate {
    pub fn watched_fraction(&self) -> f64 {
        if self.episode_count == 0 {
            0.0
        } else {
            self.watched_episodes as f64 / self.episode_count as f64
        }
    }

    pub fn fully_watched(&self) -> bool {
        self.episode_count > 0 && self.watched_episodes >= self.episode_count
    }
}

/// `Title (Year)`, or just the title when the year is unknown
pub fn display_title(title: &str, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("{} ({})", title, year),
        None => title.to_string(),
    }
}
