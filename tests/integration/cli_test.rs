use plex_sync::cli::build_cli;

#[test]
fn test_nested_list_commands_parse() {
    let matches = build_cli()
        .try_get_matches_from(["plex-sync", "list", "unwatched", "Foo", "--library", "Anime"])
        .unwrap();
    let (_, list) = matches.subcommand().unwrap();
    let (name, unwatched) = list.subcommand().unwrap();
    assert_eq!(name, "unwatched");
    assert_eq!(unwatched.get_one::<String>("show").unwrap(), "Foo");
    assert_eq!(unwatched.get_one::<String>("library").unwrap(), "Anime");
}

#[test]
fn test_show_size_flags() {
    let matches = build_cli()
        .try_get_matches_from(["plex-sync", "show-size", "--watched", "--seasons", "-n", "10"])
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    assert!(sub.get_flag("watched"));
    assert!(sub.get_flag("seasons"));
    assert_eq!(sub.get_one::<usize>("limit"), Some(&10));
}

#[test]
fn test_missing_subcommand_is_rejected() {
    assert!(build_cli().try_get_matches_from(["plex-sync"]).is_err());
    assert!(build_cli().try_get_matches_from(["plex-sync", "list"]).is_err());
}

#[test]
fn test_non_numeric_limit_is_rejected() {
    assert!(build_cli()
        .try_get_matches_from(["plex-sync", "movie-size", "-n", "many"])
        .is_err());
}
