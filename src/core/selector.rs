//! Episode selection for sync.
//!
//! Picks the oldest unwatched episodes of a show: aired episodes first in
//! air-date order, then episodes without an air date in the order they were
//! added to the library.

use std::cmp::Ordering;

use crate::core::media::EpisodeRecord;
use crate::error::{Result, SyncError};

/// Return at most `limit` unwatched episodes, oldest first.
///
/// Duplicate files are not collapsed here; the planner does that per show.
pub fn select_episodes(episodes: &[EpisodeRecord], limit: usize) -> Result<Vec<EpisodeRecord>> {
    if limit == 0 {
        return Err(SyncError::config("episode limit must be at least 1"));
    }

    let mut unwatched: Vec<EpisodeRecord> =
        episodes.iter().filter(|ep| !ep.watched).cloned().collect();

    unwatched.sort_by(age_order);
    unwatched.truncate(limit);

    Ok(unwatched)
}

/// Season/episode order for presentation. Never feeds back into selection.
pub fn display_order(selected: &[EpisodeRecord]) -> Vec<EpisodeRecord> {
    let mut ordered = selected.to_vec();
    ordered.sort_by(|a, b| {
        // Unnumbered entries go last
        let key = |ep: &EpisodeRecord| {
            (
                ep.season.map_or(u32::MAX, |s| s),
                ep.episode.map_or(u32::MAX, |e| e),
            )
        };
        key(a).cmp(&key(b))
    });
    ordered
}

/// Dated episodes before undated ones; dated by air date, undated by added date
fn age_order(a: &EpisodeRecord, b: &EpisodeRecord) -> Ordering {
    match (a.air_date, b.air_date) {
        (Some(x), Some(y)) => x
            .cmp(&y)
            .then_with(|| a.season.cmp(&b.season))
            .then_with(|| a.episode.cmp(&b.episode)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.added_at.cmp(&b.added_at),
    }
}
