use plex_sync::commands::movie_size::collect_movies;
use plex_sync::core::media::MovieRecord;
use plex_sync::core::ranker::{rank_movies, WatchFilter};

use super::support::FakeCatalog;

const GB: u64 = 1024 * 1024 * 1024;

fn movie(id: &str, gb: u64, minutes: f64) -> MovieRecord {
    MovieRecord {
        id: id.into(),
        library: "Movies".into(),
        title: id.to_uppercase(),
        year: None,
        size_bytes: gb * GB,
        runtime_minutes: Some(minutes),
        watched: true,
        critic_rating: None,
        audience_rating: Some(6.1),
        files: vec![format!("/movies/{}.mkv", id)],
    }
}

#[test]
fn test_ranking_from_catalog_is_stable() {
    let mut catalog = FakeCatalog::with_show_library("TV Shows");
    catalog.movies = vec![
        movie("ten", 10, 100.0),
        movie("twenty", 20, 50.0),
        movie("five", 5, 200.0),
    ];

    let movies = collect_movies(&catalog).unwrap();
    let first = rank_movies(&movies, WatchFilter::Watched, 2);
    let second = rank_movies(&movies, WatchFilter::Watched, 2);

    assert_eq!(first, second);
    let ids: Vec<&str> = first.iter().map(|item| item.id()).collect();
    assert_eq!(ids, vec!["twenty", "ten"]);
    assert!((first[0].efficiency_gb() - 0.4).abs() < 1e-9);
    assert!((first[1].efficiency_gb() - 0.1).abs() < 1e-9);
}

#[test]
fn test_unwatched_filter_excludes_watched() {
    let mut catalog = FakeCatalog::with_show_library("TV Shows");
    catalog.movies = vec![movie("seen", 30, 120.0), {
        let mut fresh = movie("fresh", 3, 90.0);
        fresh.watched = false;
        fresh
    }];

    let movies = collect_movies(&catalog).unwrap();
    let ranked = rank_movies(&movies, WatchFilter::Unwatched, 50);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].id(), "fresh");
}
