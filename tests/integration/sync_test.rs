use std::fs;
use tempfile::TempDir;

use plex_sync::core::cache::CacheStore;
use plex_sync::core::media::LibraryKind;
use plex_sync::core::planner::{LibrarySpec, ShowSpec, SyncMode, SyncPlan, SyncPlanner, SyncRunner, SyncSpec};
use plex_sync::core::transfer::{DestinationMapper, TransferOptions};
use plex_sync::SyncError;

use super::support::{episode, FakeCatalog, RecordingTransfer};

fn foo_catalog() -> FakeCatalog {
    let mut catalog = FakeCatalog::with_show_library("TV Shows");

    let mut episodes = vec![
        episode("Foo", 1, 3, Some("2023-03-01"), false),
        episode("Foo", 1, 1, Some("2023-01-01"), false),
        episode("Foo", 1, 2, Some("2023-02-01"), false),
    ];
    for number in 4..=12 {
        episodes.push(episode("Foo", 2, number, None, false));
    }
    episodes.push(episode("Foo", 0, 99, Some("2020-01-01"), true));
    catalog.add_show("Foo", episodes);

    catalog.add_show(
        "Bar",
        vec![
            episode("Bar", 1, 1, Some("2022-05-01"), false),
            episode("Bar", 1, 2, Some("2022-05-08"), false),
        ],
    );
    catalog
}

fn spec(shows: Vec<ShowSpec>) -> SyncSpec {
    SyncSpec {
        libraries: vec![LibrarySpec {
            name: "TV Shows".into(),
            default_limit: 5,
            shows,
        }],
    }
}

fn show(name: &str, limit: Option<usize>) -> ShowSpec {
    ShowSpec {
        name: name.into(),
        limit,
    }
}

fn mapper() -> DestinationMapper {
    DestinationMapper::new("/data", "/mnt/usb")
}

#[test]
fn test_plan_picks_dated_episodes_first() {
    let catalog = foo_catalog();
    let spec = spec(vec![show("foo", None)]);
    let plan = SyncPlanner::new(&spec).plan(&catalog).unwrap();

    let paths = &plan.shows["foo"];
    assert_eq!(paths.len(), 5);
    assert_eq!(paths[0], "/data/tv/Foo/S01E01.mkv");
    assert_eq!(paths[1], "/data/tv/Foo/S01E02.mkv");
    assert_eq!(paths[2], "/data/tv/Foo/S01E03.mkv");
    assert!(paths[3..].iter().all(|p| p.contains("/S02E")));
}

#[test]
fn test_show_limit_overrides_library_default() {
    let catalog = foo_catalog();
    let spec = spec(vec![show("Foo", Some(2)), show("Bar", None)]);
    let plan = SyncPlanner::new(&spec).plan(&catalog).unwrap();

    assert_eq!(plan.shows["Foo"].len(), 2);
    assert_eq!(plan.shows["Bar"].len(), 2);
}

#[test]
fn test_planning_is_idempotent() {
    let catalog = foo_catalog();
    let spec = spec(vec![show("Foo", None), show("Bar", Some(1))]);
    let planner = SyncPlanner::new(&spec);

    assert_eq!(planner.plan(&catalog).unwrap(), planner.plan(&catalog).unwrap());
}

#[test]
fn test_unmatched_show_and_library_are_skipped() {
    let catalog = foo_catalog();
    let spec = SyncSpec {
        libraries: vec![
            LibrarySpec {
                name: "TV Shows".into(),
                default_limit: 5,
                shows: vec![show("Missing Show", None), show("Bar", None)],
            },
            LibrarySpec {
                name: "Anime".into(),
                default_limit: 5,
                shows: vec![show("Foo", None)],
            },
            LibrarySpec {
                name: "Movies".into(),
                default_limit: 5,
                shows: vec![show("Foo", None)],
            },
        ],
    };

    let (plan, details) = SyncPlanner::new(&spec).plan_with_details(&catalog).unwrap();
    assert_eq!(plan.shows.keys().collect::<Vec<_>>(), vec!["Bar"]);
    assert_eq!(details.shows.len(), 1);
    assert_eq!(details.skipped.len(), 3);
    assert!(details.skipped[0].contains("Missing Show"));
    assert!(details.skipped[1].contains("Anime"));
    assert!(details.skipped[2].contains("Movies"));
}

#[test]
fn test_show_in_two_libraries_stays_within_limit() {
    let mut catalog = FakeCatalog::with_show_library("TV Shows");
    catalog.add_library("TV 4K", LibraryKind::Episodic);

    let hd: Vec<_> = (1..=3).map(|n| episode("Foo", 1, n, None, false)).collect();
    let uhd: Vec<_> = (1..=3)
        .map(|n| {
            let mut ep = episode("Foo", 1, n, None, false);
            ep.files = vec![format!("/data/tv4k/Foo/S01E{:02}.mkv", n)];
            ep
        })
        .collect();
    catalog.add_show_in("TV Shows", "Foo", hd);
    catalog.add_show_in("TV 4K", "Foo", uhd);

    let library = |name: &str| LibrarySpec {
        name: name.into(),
        default_limit: 2,
        shows: vec![show("Foo", None)],
    };
    let spec = SyncSpec {
        libraries: vec![library("TV Shows"), library("TV 4K")],
    };

    let (plan, details) = SyncPlanner::new(&spec).plan_with_details(&catalog).unwrap();
    assert_eq!(
        plan.shows["Foo"],
        vec!["/data/tv/Foo/S01E01.mkv", "/data/tv/Foo/S01E02.mkv"]
    );
    assert_eq!(details.shows.len(), 1);
    assert_eq!(details.skipped.len(), 1);
    assert!(details.skipped[0].contains("TV 4K"));
}

#[test]
fn test_rejected_credentials_abort_before_cache_write() {
    let dir = TempDir::new().unwrap();
    let cache_path = dir.path().join("sync-cache.json");
    let cache = CacheStore::new(&cache_path);
    let catalog = FakeCatalog::rejecting_credentials();
    let spec = spec(vec![show("Foo", None)]);
    let planner = SyncPlanner::new(&spec);

    let transfer = RecordingTransfer::default();
    let runner = SyncRunner::new(&cache, &transfer, mapper(), TransferOptions::default());
    let err = runner.run_live(&planner, &catalog).unwrap_err();

    assert!(matches!(err, SyncError::Authentication(_)));
    assert!(err.is_fatal());
    assert_eq!(err.exit_code(), 3);
    assert!(!cache_path.exists());
    assert!(transfer.calls.borrow().is_empty());
}

#[test]
fn test_zero_limit_is_a_configuration_error() {
    let catalog = foo_catalog();
    let spec = spec(vec![show("Foo", Some(0))]);
    let err = SyncPlanner::new(&spec).plan(&catalog).unwrap_err();
    assert!(matches!(err, SyncError::Configuration(_)));
    assert_eq!(catalog.calls.get(), 0);
}

#[test]
fn test_live_run_writes_cache_and_replay_round_trips() {
    let dir = TempDir::new().unwrap();
    let cache = CacheStore::new(dir.path().join("sync-cache.json"));
    let catalog = foo_catalog();
    let spec = spec(vec![show("Foo", None), show("Bar", None)]);
    let planner = SyncPlanner::new(&spec);

    let transfer = RecordingTransfer::default();
    let runner = SyncRunner::new(&cache, &transfer, mapper(), TransferOptions::default());
    let live = runner.run_live(&planner, &catalog).unwrap();
    assert_eq!(live.transferred.len(), 7);

    let plan = planner.plan(&catalog).unwrap();
    assert_eq!(cache.load_plan().unwrap(), plan);

    let replay_transfer = RecordingTransfer::default();
    let replay_runner = SyncRunner::new(&cache, &replay_transfer, mapper(), TransferOptions::default());
    replay_runner.run_replay().unwrap();
    assert_eq!(replay_transfer.sources(), transfer.sources());
}

#[test]
fn test_replay_of_bare_cache_issues_one_transfer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sync-cache.json");
    fs::write(&path, r#"{"ShowX": ["/media/ShowX/e1.mkv"]}"#).unwrap();
    let cache = CacheStore::new(&path);

    let catalog = FakeCatalog::default();
    let transfer = RecordingTransfer::default();
    let runner = SyncRunner::new(
        &cache,
        &transfer,
        DestinationMapper::new("/media", "/mnt/usb"),
        TransferOptions::default(),
    );
    let report = runner.run_replay().unwrap();

    assert_eq!(transfer.sources(), vec!["/media/ShowX/e1.mkv"]);
    assert_eq!(
        transfer.calls.borrow()[0].1,
        std::path::PathBuf::from("/mnt/usb/ShowX/e1.mkv")
    );
    assert_eq!(report.transferred.len(), 1);
    assert_eq!(catalog.calls.get(), 0);
}

#[test]
fn test_replay_with_corrupt_cache_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sync-cache.json");
    fs::write(&path, "{ not json").unwrap();
    let cache = CacheStore::new(&path);
    let transfer = RecordingTransfer::default();
    let runner = SyncRunner::new(&cache, &transfer, mapper(), TransferOptions::default());

    let err = runner.run_replay().unwrap_err();
    assert!(matches!(err, SyncError::CacheCorrupt { .. }));
    assert!(transfer.calls.borrow().is_empty());

    let missing = CacheStore::new(dir.path().join("absent.json"));
    let runner = SyncRunner::new(&missing, &transfer, mapper(), TransferOptions::default());
    assert!(matches!(runner.run_replay(), Err(SyncError::CacheCorrupt { .. })));
}

#[test]
fn test_transfer_failure_continues_and_keeps_cache() {
    let dir = TempDir::new().unwrap();
    let cache = CacheStore::new(dir.path().join("sync-cache.json"));
    let catalog = foo_catalog();
    let spec = spec(vec![show("Bar", None)]);
    let planner = SyncPlanner::new(&spec);

    let transfer = RecordingTransfer::failing_on("/data/tv/Bar/S01E01.mkv");
    let runner = SyncRunner::new(&cache, &transfer, mapper(), TransferOptions::default());
    let report = runner.run_live(&planner, &catalog).unwrap();

    assert_eq!(transfer.calls.borrow().len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.transferred.len(), 1);
    assert!(report.has_failures());
    assert_eq!(cache.load_plan().unwrap().file_count(), 2);
}

#[test]
fn test_dry_run_reports_without_transferring() {
    let dir = TempDir::new().unwrap();
    let cache = CacheStore::new(dir.path().join("sync-cache.json"));
    let mut plan = SyncPlan::default();
    plan.shows.insert(
        "Foo".into(),
        vec!["/data/tv/Foo/a.mkv".into(), "/data/tv/Foo/b.mkv".into()],
    );

    let transfer = RecordingTransfer::default();
    let runner = SyncRunner::new(&cache, &transfer, mapper(), TransferOptions::default()).dry_run(true);
    let report = runner.execute(&plan, SyncMode::Live).unwrap();

    assert!(transfer.calls.borrow().is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].dest, std::path::PathBuf::from("/mnt/usb/tv/Foo/a.mkv"));
    assert_eq!(cache.load_plan().unwrap(), plan);
}
