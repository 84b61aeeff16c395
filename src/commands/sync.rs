use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::core::planner::{PlanDetails, SyncMode, SyncReport, SyncRunner};
use crate::core::transfer::{transfer_for_run, DestinationMapper, TransferOptions};
use crate::core::{CacheStore, Config, SyncPlanner};
use crate::ui::formatters::format_size;
use crate::ui::prompts;

pub fn execute(matches: &ArgMatches, explicit: Option<&Path>) -> Result<()> {
    let dry_run = matches.get_flag("dry-run");
    let cached = matches.get_flag("cached");

    let config = super::load_config(explicit)?;
    let cache = CacheStore::new(config.cache_path()?);
    let mapper = DestinationMapper::from_config(&config.rsync)?;
    let options = TransferOptions::from_config(&config.rsync);
    let transfer = transfer_for_run(dry_run, std::env::var_os("PATH").as_deref())?;

    let runner = SyncRunner::new(&cache, transfer.as_ref(), mapper, options).dry_run(dry_run);

    if dry_run {
        prompts::warn("Dry run: no files will be transferred.");
    }

    let (report, skipped) = if cached {
        prompts::info(&format!("Replaying cached plan from {}", cache.path().display()));
        (runner.run_replay()?, Vec::new())
    } else {
        run_live(&config, &runner)?
    };

    print_report(&report, &skipped, dry_run);

    if report.has_failures() {
        anyhow::bail!("{} file(s) failed to transfer", report.failed.len());
    }
    Ok(())
}

fn run_live(config: &Config, runner: &SyncRunner) -> Result<(SyncReport, Vec<String>)> {
    let spec = config.sync_spec()?;
    if spec.libraries.is_empty() {
        prompts::warn("No [[sync.libraries]] configured; nothing to sync.");
    }

    let plex = super::connect_plex(config)?;
    let planner = SyncPlanner::new(&spec);
    let (plan, details) = planner
        .plan_with_details(&plex)
        .context("Failed to build the sync plan")?;

    print_plan(&details);

    let report = runner.execute(&plan, SyncMode::Live)?;
    Ok((report, details.skipped))
}

fn print_plan(details: &PlanDetails) {
    for show in &details.shows {
        println!();
        println!(
            "{} {}",
            show.name.white().bold(),
            format!("[{}] (limit {})", show.library, show.limit).dimmed()
        );
        if show.episodes.is_empty() {
            prompts::dimmed("  No unwatched episodes");
            continue;
        }
        for episode in &show.episodes {
            let aired = episode
                .air_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "no air date".to_string());
            println!(
                "  {} {} {}",
                episode.code().cyan(),
                episode.title,
                format!("({})", aired).dimmed()
            );
        }
    }
    println!();
}

fn print_report(report: &SyncReport, skipped: &[String], dry_run: bool) {
    for reason in skipped {
        println!("  {} {}", "skipped".yellow(), reason.dimmed());
    }

    if dry_run {
        for job in &report.skipped {
            println!(
                "  {} {} -> {}",
                "would copy".yellow(),
                job.source,
                job.dest.display()
            );
        }
        prompts::info(&format!("{} file(s) would be transferred", report.skipped.len()));
        return;
    }

    for (job, reason) in &report.failed {
        println!("  {} {}: {}", "✗".red(), job.source, reason.dimmed());
    }

    // Size is only known for files that landed on a local target
    let size: u64 = report
        .transferred
        .iter()
        .filter_map(|job| fs::metadata(&job.dest).ok())
        .map(|meta| meta.len())
        .sum();

    let summary = format!(
        "{} file(s) transferred ({}), {} failed",
        report.transferred.len(),
        format_size(size),
        report.failed.len()
    );
    if report.has_failures() {
        prompts::error(&summary);
    } else {
        prompts::success(&summary);
    }
}
