use std::fs;
use tempfile::TempDir;

use plex_sync::core::config::{Config, DEFAULT_EPISODE_LIMIT};
use plex_sync::SyncError;

const SAMPLE: &str = r#"
[plex]
url = "http://plex.local:32400"
token = "abc123"

[rsync]
server_path = "/data"
target = "/mnt/usb"
remote = "media@nas"

[radarr]
enabled = true
url = "http://nas:7878"
api_key = "k"

[sync]
default_limit = 3

[[sync.libraries]]
name = "TV Shows"
shows = ["Foo", { name = "Bar", limit = 8 }]

[[sync.libraries]]
name = "Anime"
limit = 2
shows = ["Baz"]
"#;

#[test]
fn test_load_from_file_and_normalize_spec() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, SAMPLE).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.plex.url, "http://plex.local:32400");
    assert_eq!(config.rsync.remote.as_deref(), Some("media@nas"));
    assert!(config.radarr.enabled);
    assert!(!config.sonarr.enabled);
    assert_eq!(config.cache_path().unwrap(), dir.path().join("sync-cache.json"));

    let spec = config.sync_spec().unwrap();
    assert_eq!(spec.libraries.len(), 2);
    assert_eq!(spec.libraries[0].default_limit, 3);
    assert_eq!(spec.libraries[0].shows[0].limit, None);
    assert_eq!(spec.libraries[0].shows[1].limit, Some(8));
    assert_eq!(spec.libraries[1].default_limit, 2);
}

#[test]
fn test_malformed_file_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[plex\nurl = ").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, SyncError::Configuration(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_zero_limit_rejected_at_config_boundary() {
    let config = Config::from_toml_str(
        r#"
[[sync.libraries]]
name = "TV Shows"
shows = [{ name = "Foo", limit = 0 }]
"#,
    )
    .unwrap();
    assert!(matches!(config.sync_spec(), Err(SyncError::Configuration(_))));
}

#[test]
fn test_defaults_and_missing_token() {
    let config = Config::default();
    assert_eq!(config.sync.default_limit, DEFAULT_EPISODE_LIMIT);
    assert!(matches!(config.plex_token(), Err(SyncError::Configuration(_))));
}

#[test]
fn test_create_default_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let written = Config::create_default(Some(path.clone())).unwrap();
    assert_eq!(written, path);

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.plex.url, Config::default().plex.url);
    assert!(config.sync.libraries.is_empty());
}

#[test]
fn test_overrides_replace_plex_settings() {
    let mut config = Config::default();
    config.apply_overrides(Some("http://other:32400".into()), Some("tok".into()));
    assert_eq!(config.plex.url, "http://other:32400");
    assert_eq!(config.plex_token().unwrap(), "tok");

    config.apply_overrides(Some(String::new()), None);
    assert_eq!(config.plex.url, "http://other:32400");
}
