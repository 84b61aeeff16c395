use colored::Colorize;
use std::path::PathBuf;
use std::process;

use plex_sync::cli::build_cli;
use plex_sync::commands;
use plex_sync::SyncError;

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), err);

        let code = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<SyncError>())
            .map(SyncError::exit_code)
            .unwrap_or(1);
        process::exit(code);
    }
}

fn run() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();

    let Some((name, sub_matches)) = matches.subcommand() else {
        build_cli().print_help()?;
        return Ok(());
    };

    plex_sync::init_logging(sub_matches.get_flag("verbose"));

    let config_path = sub_matches.get_one::<String>("config").map(PathBuf::from);
    let config_path = config_path.as_deref();

    match name {
        "config" => commands::config::execute(sub_matches, config_path),
        "list" => commands::list::execute(sub_matches, config_path),
        "sync" => commands::sync::execute(sub_matches, config_path),
        "movie-size" => commands::movie_size::execute(sub_matches, config_path),
        "show-size" => commands::show_size::execute(sub_matches, config_path),
        "completions" => {
            let mut cli = build_cli();
            commands::completions::execute(sub_matches, &mut cli)
        }
        "version" => commands::version::execute(),
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
