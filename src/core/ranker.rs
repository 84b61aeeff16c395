//! Size ranking of movies and shows.
//!
//! Rows are ordered by total size, largest first; the per-minute or
//! per-episode figure is carried alongside for the operator but does not
//! affect order. Equal sizes keep catalog order.

use crate::core::media::{display_title, MovieRecord, ShowAggregate};

pub const DEFAULT_RANK_LIMIT: usize = 50;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Watch-state filter for movies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchFilter {
    Watched,
    Unwatched,
    Any,
}

impl WatchFilter {
    pub fn label(&self) -> &'static str {
        match self {
            WatchFilter::Watched => "watched",
            WatchFilter::Unwatched => "unwatched",
            WatchFilter::Any => "all",
        }
    }

    fn accepts(&self, watched: bool) -> bool {
        match self {
            WatchFilter::Watched => watched,
            WatchFilter::Unwatched => !watched,
            WatchFilter::Any => true,
        }
    }
}

/// One season of a show shown as its own row
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonRow {
    pub show: ShowAggregate,
    pub season: Option<u32>,
    pub size_bytes: u64,
    pub episode_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RankSubject {
    Movie(MovieRecord),
    Show(ShowAggregate),
    Season(SeasonRow),
}

/// What a deletion request needs to find the item in Sonarr/Radarr
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteTarget {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedItem {
    pub rank: usize,
    pub subject: RankSubject,
    /// Bytes per runtime minute (movies) or per episode (shows, seasons)
    pub efficiency: f64,
}

impl RankedItem {
    /// Identifier used for selection and deletion. Season rows share their show's id.
    pub fn id(&self) -> &str {
        match &self.subject {
            RankSubject::Movie(movie) => &movie.id,
            RankSubject::Show(show) => &show.id,
            RankSubject::Season(row) => &row.show.id,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        match &self.subject {
            RankSubject::Movie(movie) => movie.size_bytes,
            RankSubject::Show(show) => show.size_bytes,
            RankSubject::Season(row) => row.size_bytes,
        }
    }

    pub fn library(&self) -> &str {
        match &self.subject {
            RankSubject::Movie(movie) => &movie.library,
            RankSubject::Show(show) => &show.library,
            RankSubject::Season(row) => &row.show.library,
        }
    }

    pub fn title(&self) -> String {
        match &self.subject {
            RankSubject::Movie(movie) => display_title(&movie.title, movie.year),
            RankSubject::Show(show) => display_title(&show.title, show.year),
            RankSubject::Season(row) => match row.season {
                Some(season) => format!("{} - S{:02}", row.show.title, season),
                None => format!("{} - Specials", row.show.title),
            },
        }
    }

    /// Efficiency scaled to GB per minute / per episode
    pub fn efficiency_gb(&self) -> f64 {
        self.efficiency / BYTES_PER_GB
    }

    pub fn size_gb(&self) -> f64 {
        self.size_bytes() as f64 / BYTES_PER_GB
    }

    pub fn ratings(&self) -> (Option<f64>, Option<f64>) {
        match &self.subject {
            RankSubject::Movie(movie) => (movie.critic_rating, movie.audience_rating),
            RankSubject::Show(show) => (show.critic_rating, show.audience_rating),
            RankSubject::Season(row) => (row.show.critic_rating, row.show.audience_rating),
        }
    }

    pub fn delete_target(&self) -> DeleteTarget {
        let (title, year) = match &self.subject {
            RankSubject::Movie(movie) => (movie.title.clone(), movie.year),
            RankSubject::Show(show) => (show.title.clone(), show.year),
            RankSubject::Season(row) => (row.show.title.clone(), row.show.year),
        };
        DeleteTarget {
            id: self.id().to_string(),
            title,
            year,
        }
    }

    /// Files backing this row
    pub fn files(&self) -> &[String] {
        match &self.subject {
            RankSubject::Movie(movie) => &movie.files,
            RankSubject::Show(show) => &show.files,
            RankSubject::Season(row) => &row.show.files,
        }
    }
}

pub fn rank_movies(movies: &[MovieRecord], filter: WatchFilter, limit: usize) -> Vec<RankedItem> {
    let candidates = movies
        .iter()
        .filter(|movie| filter.accepts(movie.watched))
        .filter_map(|movie| {
            let minutes = movie.runtime_minutes.filter(|m| *m > 0.0)?;
            Some((RankSubject::Movie(movie.clone()), movie.size_bytes, minutes))
        });

    finish(candidates, limit)
}

/// Rank whole shows; `fully_watched_only` keeps shows with every episode watched
pub fn rank_shows(shows: &[ShowAggregate], fully_watched_only: bool, limit: usize) -> Vec<RankedItem> {
    let candidates = shows
        .iter()
        .filter(|show| !fully_watched_only || show.fully_watched())
        .filter(|show| show.episode_count > 0)
        .map(|show| {
            (
                RankSubject::Show(show.clone()),
                show.size_bytes,
                show.episode_count as f64,
            )
        });

    finish(candidates, limit)
}

/// Rank individual seasons across all shows
pub fn rank_seasons(shows: &[ShowAggregate], fully_watched_only: bool, limit: usize) -> Vec<RankedItem> {
    let candidates = shows
        .iter()
        .filter(|show| !fully_watched_only || show.fully_watched())
        .flat_map(|show| {
            show.seasons
                .iter()
                .filter(|season| season.episode_count > 0)
                .map(move |season| {
                    (
                        RankSubject::Season(SeasonRow {
                            show: show.clone(),
                            season: season.season,
                            size_bytes: season.size_bytes,
                            episode_count: season.episode_count,
                        }),
                        season.size_bytes,
                        season.episode_count as f64,
                    )
                })
        });

    finish(candidates, limit)
}

fn finish<I>(candidates: I, limit: usize) -> Vec<RankedItem>
where
    I: Iterator<Item = (RankSubject, u64, f64)>,
{
    let mut rows: Vec<(RankSubject, u64, f64)> =
        candidates.filter(|(_, size, _)| *size > 0).collect();

    // sort_by is stable, so equal sizes stay in catalog order
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows.truncate(limit);

    rows.into_iter()
        .enumerate()
        .map(|(idx, (subject, size, denominator))| RankedItem {
            rank: idx + 1,
            subject,
            efficiency: size as f64 / denominator,
        })
        .collect()
}
