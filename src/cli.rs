use clap::{value_parser, Arg, ArgAction, Command};

fn limit_arg(help: &'static str) -> Arg {
    Arg::new("limit")
        .short('n')
        .long("limit")
        .value_name("N")
        .help(help)
        .value_parser(value_parser!(usize))
}

/// Build the full command tree
pub fn build_cli() -> Command {
    Command::new("plex-sync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sync unwatched Plex episodes and reclaim space from large media")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Config file to use instead of the discovered one")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("config")
                .about("Create a default config file or show the active one")
                .arg(
                    Arg::new("path")
                        .long("path")
                        .value_name("PATH")
                        .help("Where to write the new config file"),
                )
                .arg(
                    Arg::new("show")
                        .long("show")
                        .help("Show the discovered config instead of writing one")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List libraries and unwatched media")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("libraries").about("List all libraries"))
                .subcommand(
                    Command::new("library")
                        .about("List unwatched movies or shows in a library")
                        .arg(
                            Arg::new("name")
                                .help("Library name")
                                .required(true)
                                .index(1),
                        ),
                )
                .subcommand(
                    Command::new("unwatched")
                        .about("List unwatched episodes of a show")
                        .arg(Arg::new("show").help("Show title").required(true).index(1))
                        .arg(
                            Arg::new("library")
                                .short('l')
                                .long("library")
                                .value_name("NAME")
                                .help("Library to search (defaults to the first show library)"),
                        ),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Copy the oldest unwatched episodes of each configured show")
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Show what would be transferred without copying")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("cached")
                        .long("cached")
                        .help("Replay the last cached plan without contacting Plex")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("movie-size")
                .about("Rank movies by size and optionally delete them through Radarr")
                .arg(limit_arg("Number of movies to show [default: 50]"))
                .arg(
                    Arg::new("unwatched")
                        .long("unwatched")
                        .help("Rank unwatched movies instead of watched ones")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("show-size")
                .about("Rank shows by size and optionally delete them through Sonarr")
                .arg(limit_arg("Number of shows or seasons to show [default: 50]"))
                .arg(
                    Arg::new("watched")
                        .long("watched")
                        .help("Only include fully watched shows")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("seasons")
                        .long("seasons")
                        .help("Start on the season table instead of whole shows (s switches in the table)")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for (bash, zsh, fish, powershell, elvish)")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}
