//! Copying planned files from the media server to the sync target.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::config::RsyncConfig;
use crate::error::{Result, SyncError};

/// Options handed to the transfer collaborator for every file
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    pub args: Vec<String>,
    /// `user@host` prefix for the source argument
    pub remote: Option<String>,
}

impl TransferOptions {
    pub fn from_config(config: &RsyncConfig) -> Self {
        Self {
            args: config.options.split_whitespace().map(String::from).collect(),
            remote: config.remote.clone().filter(|r| !r.is_empty()),
        }
    }
}

/// Copies one file from the media server to the sync target
pub trait Transfer {
    fn transfer(&self, source: &str, dest: &Path, options: &TransferOptions) -> Result<()>;
}

/// Maps server-side paths onto the sync target
#[derive(Debug, Clone)]
pub struct DestinationMapper {
    server_path: String,
    target: PathBuf,
}

impl DestinationMapper {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(server_path: S, target: P) -> Self {
        Self {
            server_path: server_path.into(),
            target: target.into(),
        }
    }

    pub fn from_config(config: &RsyncConfig) -> Result<Self> {
        if config.target.trim().is_empty() {
            return Err(SyncError::config("rsync.target is not configured"));
        }
        Ok(Self::new(config.server_path.clone(), config.target.clone()))
    }

    /// Strip the server prefix and join the remainder under the target.
    /// The prefix only matches whole path components.
    pub fn destination(&self, source: &str) -> PathBuf {
        let source = Path::new(source);
        let relative = source.strip_prefix(&self.server_path).unwrap_or(source);
        let relative = relative.strip_prefix("/").unwrap_or(relative);
        self.target.join(relative)
    }
}

/// Shells out to the `rsync` binary
pub struct Rsync {
    binary: PathBuf,
}

impl Rsync {
    /// Locate `rsync` in the given search path, usually `$PATH`
    pub fn locate_in(search_path: Option<&OsStr>) -> Result<Self> {
        let cwd = std::env::current_dir().unwrap_or_default();
        let binary = which::which_in("rsync", search_path, cwd)
            .map_err(|_| SyncError::config("rsync was not found in PATH"))?;
        Ok(Self { binary })
    }

    pub fn with_binary<P: Into<PathBuf>>(binary: P) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Transfer for Rsync {
    fn transfer(&self, source: &str, dest: &Path, options: &TransferOptions) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SyncError::transfer(source, format!("cannot create {:?}: {}", parent, e)))?;
        }

        let source_arg = match &options.remote {
            Some(remote) => format!("{}:{}", remote, source),
            None => source.to_string(),
        };

        log::debug!("{:?} {:?} {} {:?}", self.binary, options.args, source_arg, dest);

        let status = Command::new(&self.binary)
            .args(&options.args)
            .arg(&source_arg)
            .arg(dest)
            .status()
            .map_err(|e| SyncError::transfer(source, format!("failed to run rsync: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(SyncError::transfer(source, format!("rsync exited with {}", status)))
        }
    }
}

/// Stands in for rsync on dry runs; nothing is copied
pub struct ReportOnly;

impl Transfer for ReportOnly {
    fn transfer(&self, source: &str, dest: &Path, _options: &TransferOptions) -> Result<()> {
        log::debug!("would copy {} -> {}", source, dest.display());
        Ok(())
    }
}

/// Pick the transfer for a run. Dry runs never look for rsync.
pub fn transfer_for_run(dry_run: bool, search_path: Option<&OsStr>) -> Result<Box<dyn Transfer>> {
    if dry_run {
        Ok(Box::new(ReportOnly))
    } else {
        Ok(Box::new(Rsync::locate_in(search_path)?))
    }
}
