use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::planner::{LibrarySpec, ShowSpec, SyncSpec};
use crate::error::{Result, SyncError};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const APP_DIR_NAME: &str = "plex-sync";
pub const CACHE_FILE_NAME: &str = "sync-cache.json";
pub const DEFAULT_EPISODE_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub plex: PlexConfig,
    pub rsync: RsyncConfig,
    pub cache: CacheConfig,
    pub sync: SyncConfig,
    pub sonarr: ServiceConfig,
    pub radarr: ServiceConfig,
    /// File this configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlexConfig {
    pub url: String,
    pub token: String,
}

impl Default for PlexConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:32400".to_string(),
            token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RsyncConfig {
    /// Prefix stripped from server-side paths before joining onto `target`
    pub server_path: String,
    pub target: String,
    pub options: String,
    /// `user@host` when the media files live on another machine
    pub remote: Option<String>,
}

impl Default for RsyncConfig {
    fn default() -> Self {
        Self {
            server_path: String::new(),
            target: String::new(),
            options: "-avP".to_string(),
            remote: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub default_limit: usize,
    pub libraries: Vec<LibraryEntry>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_EPISODE_LIMIT,
            libraries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub shows: Vec<ShowEntry>,
}

/// A show is written either as a bare name or as a table with overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShowEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        limit: Option<usize>,
    },
}

/// Sonarr / Radarr connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub enabled: bool,
    pub url: Option<String>,
    pub api_key: Option<String>,
}

impl Config {
    /// Load the first discovered config file (or defaults), then apply
    /// `PLEX_URL` / `PLEX_TOKEN` from the environment.
    pub fn load() -> Result<Self> {
        let mut config = match Self::discover_path() {
            Some(path) => Self::load_from(&path)?,
            None => Config::default(),
        };

        config.apply_overrides(
            std::env::var("PLEX_URL").ok(),
            std::env::var("PLEX_TOKEN").ok(),
        );

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| {
            SyncError::config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut config = Self::from_toml_str(&data)
            .map_err(|e| SyncError::config(format!("Invalid config file {:?}: {}", path, e)))?;
        config.source = Some(path.to_path_buf());

        Ok(config)
    }

    pub fn from_toml_str(data: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(data)
    }

    /// Search order: working directory, `~/.config/plex-sync`, `$XDG_CONFIG_HOME/plex-sync`
    pub fn discover_path() -> Option<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".config").join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
        }
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg).join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
        }

        candidates.into_iter().find(|path| path.exists())
    }

    /// Where `plex-sync config` writes a new file when no path is given
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SyncError::config("Could not determine home directory"))?;

        Ok(home.join(".config").join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Write a default configuration file and return its path
    pub fn create_default(path: Option<PathBuf>) -> Result<PathBuf> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = toml::to_string_pretty(&Config::default())
            .map_err(|e| SyncError::config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, data)?;

        Ok(path)
    }

    pub fn apply_overrides(&mut self, url: Option<String>, token: Option<String>) {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.plex.url = url;
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.plex.token = token;
        }
    }

    pub fn plex_token(&self) -> Result<&str> {
        if self.plex.token.trim().is_empty() {
            return Err(SyncError::config(
                "Plex token not configured. Run 'plex-sync config' to create a config file.",
            ));
        }
        Ok(&self.plex.token)
    }

    /// Directory of the loaded config file
    pub fn config_dir(&self) -> Option<&Path> {
        self.source.as_deref().and_then(Path::parent)
    }

    /// Explicit `[cache] path`, else next to the config file, else the user cache dir
    pub fn cache_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.cache.path {
            return Ok(path.clone());
        }
        if let Some(dir) = self.config_dir() {
            return Ok(dir.join(CACHE_FILE_NAME));
        }

        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| SyncError::config("Could not determine cache directory"))?;
        Ok(cache_dir.join(APP_DIR_NAME).join(CACHE_FILE_NAME))
    }

    /// Normalize `[sync]` into a validated `SyncSpec`
    pub fn sync_spec(&self) -> Result<SyncSpec> {
        let libraries = self
            .sync
            .libraries
            .iter()
            .map(|library| LibrarySpec {
                name: library.name.clone(),
                default_limit: library.limit.unwrap_or(self.sync.default_limit),
                shows: library.shows.iter().map(ShowEntry::to_spec).collect(),
            })
            .collect();

        let spec = SyncSpec { libraries };
        spec.validate()?;
        Ok(spec)
    }
}

impl ShowEntry {
    pub fn name(&self) -> &str {
        match self {
            ShowEntry::Name(name) => name,
            ShowEntry::Detailed { name, .. } => name,
        }
    }

    fn to_spec(&self) -> ShowSpec {
        match self {
            ShowEntry::Name(name) => ShowSpec {
                name: name.clone(),
                limit: None,
            },
            ShowEntry::Detailed { name, limit } => ShowSpec {
                name: name.clone(),
                limit: *limit,
            },
        }
    }
}
