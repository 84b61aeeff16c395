//! Sync planning and execution.
//!
//! A live run asks the catalog for every configured show, selects the oldest
//! unwatched episodes, writes the resulting plan to the cache and transfers
//! the files. A replay run skips the catalog entirely and transfers whatever
//! the cache holds.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::core::cache::CacheStore;
use crate::core::catalog::{titles_match, Catalog};
use crate::core::media::{EpisodeRecord, LibraryKind, LibraryRef};
use crate::core::selector::{display_order, select_episodes};
use crate::core::transfer::{DestinationMapper, Transfer, TransferOptions};
use crate::error::{Result, SyncError};

/// Which shows to sync, per library
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncSpec {
    pub libraries: Vec<LibrarySpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibrarySpec {
    pub name: String,
    pub default_limit: usize,
    pub shows: Vec<ShowSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShowSpec {
    pub name: String,
    /// `None` means the library default applies
    pub limit: Option<usize>,
}

impl ShowSpec {
    pub fn effective_limit(&self, library_default: usize) -> usize {
        self.limit.unwrap_or(library_default)
    }
}

impl SyncSpec {
    /// Every limit, explicit or default, must be at least 1
    pub fn validate(&self) -> Result<()> {
        for library in &self.libraries {
            if library.default_limit == 0 {
                return Err(SyncError::config(format!(
                    "library '{}' has an episode limit of 0",
                    library.name
                )));
            }
            for show in &library.shows {
                if show.limit == Some(0) {
                    return Err(SyncError::config(format!(
                        "show '{}' in library '{}' has an episode limit of 0",
                        show.name, library.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Show name to ordered, de-duplicated source paths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    pub shows: BTreeMap<String, Vec<String>>,
}

impl SyncPlan {
    pub fn file_count(&self) -> usize {
        self.shows.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.file_count() == 0
    }

    fn add_paths<'p, I>(&mut self, show: &str, paths: I)
    where
        I: IntoIterator<Item = &'p String>,
    {
        let entry = self.shows.entry(show.to_string()).or_default();
        let mut seen: HashSet<String> = entry.iter().cloned().collect();
        for path in paths {
            if seen.insert(path.clone()) {
                entry.push(path.clone());
            }
        }
    }
}

/// Selected episodes of one show, in season/episode order
#[derive(Debug, Clone)]
pub struct PlannedShow {
    pub library: String,
    pub name: String,
    pub limit: usize,
    pub episodes: Vec<EpisodeRecord>,
}

/// Everything a live plan picked, plus what it left out
#[derive(Debug, Clone, Default)]
pub struct PlanDetails {
    pub shows: Vec<PlannedShow>,
    /// Libraries and shows left out of the plan, with the reason
    pub skipped: Vec<String>,
}

impl PlanDetails {
    fn skip(&mut self, reason: String) {
        log::warn!("Skipping {}", reason);
        self.skipped.push(reason);
    }
}

pub struct SyncPlanner<'a> {
    spec: &'a SyncSpec,
}

impl<'a> SyncPlanner<'a> {
    pub fn new(spec: &'a SyncSpec) -> Self {
        Self { spec }
    }

    pub fn plan(&self, catalog: &dyn Catalog) -> Result<SyncPlan> {
        self.plan_with_details(catalog).map(|(plan, _)| plan)
    }

    /// Build the plan plus the per-show selections for display.
    ///
    /// Unknown libraries and shows are logged and skipped; authentication and
    /// other catalog failures abort the run. A show already planned from an
    /// earlier library is skipped, so no plan entry grows past its limit.
    pub fn plan_with_details(&self, catalog: &dyn Catalog) -> Result<(SyncPlan, PlanDetails)> {
        self.spec.validate()?;

        let libraries = catalog.list_libraries()?;
        let mut plan = SyncPlan::default();
        let mut details = PlanDetails::default();

        for library_spec in &self.spec.libraries {
            let library = match find_episodic(&libraries, &library_spec.name) {
                Ok(library) => library,
                Err(reason) => {
                    details.skip(reason);
                    continue;
                }
            };

            for show in &library_spec.shows {
                if plan.shows.keys().any(|planned| titles_match(planned, &show.name)) {
                    details.skip(format!(
                        "'{}' in '{}': already planned from an earlier library",
                        show.name, library.name
                    ));
                    continue;
                }

                let episodes = match catalog.list_show_episodes(library, &show.name) {
                    Ok(episodes) => episodes,
                    Err(SyncError::NotFound(msg)) => {
                        details.skip(format!("'{}': {}", show.name, msg));
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                let limit = show.effective_limit(library_spec.default_limit);
                let selected = select_episodes(&episodes, limit)?;

                plan.add_paths(&show.name, selected.iter().flat_map(|ep| ep.files.iter()));
                details.shows.push(PlannedShow {
                    library: library.name.clone(),
                    name: show.name.clone(),
                    limit,
                    episodes: display_order(&selected),
                });
            }
        }

        Ok((plan, details))
    }
}

fn find_episodic<'l>(
    libraries: &'l [LibraryRef],
    name: &str,
) -> std::result::Result<&'l LibraryRef, String> {
    match libraries.iter().find(|library| library.name == name) {
        Some(library) if library.kind == LibraryKind::Episodic => Ok(library),
        Some(library) => Err(format!(
            "library '{}': it holds {} content, not shows",
            name,
            library.kind.label()
        )),
        None => Err(format!("library '{}': not found on the server", name)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Plan from the catalog, persist it, then transfer
    Live,
    /// Transfer the cached plan without touching the catalog
    ReplayOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileTransfer {
    pub show: String,
    pub source: String,
    pub dest: PathBuf,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub transferred: Vec<FileTransfer>,
    pub failed: Vec<(FileTransfer, String)>,
    /// Dry-run only: transfers that would have been issued
    pub skipped: Vec<FileTransfer>,
}

impl SyncReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Executes a plan against the cache and the transfer collaborator
pub struct SyncRunner<'a> {
    cache: &'a CacheStore,
    transfer: &'a dyn Transfer,
    mapper: DestinationMapper,
    options: TransferOptions,
    dry_run: bool,
}

impl<'a> SyncRunner<'a> {
    pub fn new(
        cache: &'a CacheStore,
        transfer: &'a dyn Transfer,
        mapper: DestinationMapper,
        options: TransferOptions,
    ) -> Self {
        Self {
            cache,
            transfer,
            mapper,
            options,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Plan from the catalog, then execute in live mode
    pub fn run_live(&self, planner: &SyncPlanner, catalog: &dyn Catalog) -> Result<SyncReport> {
        let plan = planner.plan(catalog)?;
        self.execute(&plan, SyncMode::Live)
    }

    /// Execute the cached plan; the catalog is never consulted
    pub fn run_replay(&self) -> Result<SyncReport> {
        let plan = self.cache.load_plan()?;
        self.execute(&plan, SyncMode::ReplayOnly)
    }

    /// Transfer every file of `plan` in order.
    ///
    /// In live mode the plan is written to the cache first, whatever the
    /// transfers later do. A failed file is logged and the rest continue.
    pub fn execute(&self, plan: &SyncPlan, mode: SyncMode) -> Result<SyncReport> {
        if mode == SyncMode::Live {
            self.cache.save(plan)?;
        }

        let mut report = SyncReport::default();

        for (show, paths) in &plan.shows {
            for source in paths {
                let job = FileTransfer {
                    show: show.clone(),
                    source: source.clone(),
                    dest: self.mapper.destination(source),
                };

                if self.dry_run {
                    report.skipped.push(job);
                    continue;
                }

                match self.transfer.transfer(&job.source, &job.dest, &self.options) {
                    Ok(()) => report.transferred.push(job),
                    Err(e) => {
                        log::warn!("{}", e);
                        report.failed.push((job, e.to_string()));
                    }
                }
            }
        }

        Ok(report)
    }
}
