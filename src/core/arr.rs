//! Sonarr / Radarr clients used to delete media and block re-downloads.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::core::config::ServiceConfig;
use crate::core::ranker::DeleteTarget;
use crate::error::{Result, SyncError};

/// Removes an item's files and excludes it from future automated downloads
pub trait ManagementService {
    fn name(&self) -> &str;

    fn delete_item(&self, target: &DeleteTarget) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrKind {
    Sonarr,
    Radarr,
}

impl ArrKind {
    pub fn name(&self) -> &'static str {
        match self {
            ArrKind::Sonarr => "Sonarr",
            ArrKind::Radarr => "Radarr",
        }
    }

    fn resource(&self) -> &'static str {
        match self {
            ArrKind::Sonarr => "series",
            ArrKind::Radarr => "movie",
        }
    }

    fn exclusion_param(&self) -> &'static str {
        match self {
            ArrKind::Sonarr => "addImportListExclusion",
            ArrKind::Radarr => "addImportExclusion",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArrEntry {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, rename = "alternateTitles")]
    pub alternate_titles: Vec<AlternateTitle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlternateTitle {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct SystemStatus {
    #[serde(default)]
    version: Option<String>,
}

pub struct ArrClient {
    kind: ArrKind,
    base_url: Url,
    api_key: String,
    http: Client,
}

impl ArrClient {
    pub fn new(kind: ArrKind, url: &str, api_key: &str) -> Result<Self> {
        let mut base_url = Url::parse(url.trim_end_matches('/'))
            .map_err(|e| SyncError::config(format!("Invalid {} URL '{}': {}", kind.name(), url, e)))?;
        // Trailing slash so joins append instead of replacing the last segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder().user_agent("plex-sync").build()?;

        Ok(Self {
            kind,
            base_url,
            api_key: api_key.to_string(),
            http,
        })
    }

    pub fn kind(&self) -> ArrKind {
        self.kind
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(&format!("api/v3/{}", path))
            .map_err(|e| SyncError::other(format!("Bad {} endpoint '{}': {}", self.kind.name(), path, e)))
    }

    fn check_status(&self, status: StatusCode, action: &str) -> Result<()> {
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(SyncError::management(format!(
                "{} rejected the API key",
                self.kind.name()
            )));
        }
        Err(SyncError::management(format!(
            "{} {} failed with HTTP {}",
            self.kind.name(),
            action,
            status
        )))
    }

    /// Returns the service version on success
    pub fn test_connection(&self) -> Result<String> {
        let response = self
            .http
            .get(self.endpoint("system/status")?)
            .header("X-Api-Key", &self.api_key)
            .send()
            .map_err(|e| SyncError::management(format!("{} unreachable: {}", self.kind.name(), e)))?;
        self.check_status(response.status(), "status check")?;

        let status: SystemStatus = response
            .json()
            .map_err(|e| SyncError::management(format!("Unexpected {} response: {}", self.kind.name(), e)))?;
        Ok(status.version.unwrap_or_else(|| "unknown".to_string()))
    }

    pub fn list_entries(&self) -> Result<Vec<ArrEntry>> {
        let response = self
            .http
            .get(self.endpoint(self.kind.resource())?)
            .header("X-Api-Key", &self.api_key)
            .send()
            .map_err(|e| SyncError::management(format!("{} unreachable: {}", self.kind.name(), e)))?;
        self.check_status(response.status(), "lookup")?;

        response
            .json()
            .map_err(|e| SyncError::management(format!("Unexpected {} response: {}", self.kind.name(), e)))
    }

    pub fn delete_entry(&self, id: i64) -> Result<()> {
        let mut url = self.endpoint(&format!("{}/{}", self.kind.resource(), id))?;
        url.query_pairs_mut()
            .append_pair("deleteFiles", "true")
            .append_pair(self.kind.exclusion_param(), "true");

        let response = self
            .http
            .delete(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .map_err(|e| SyncError::management(format!("{} unreachable: {}", self.kind.name(), e)))?;
        self.check_status(response.status(), "delete")
    }
}

impl ManagementService for ArrClient {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn delete_item(&self, target: &DeleteTarget) -> Result<()> {
        let entries = self.list_entries()?;
        let entry = find_entry(&entries, &target.title, target.year).ok_or_else(|| {
            SyncError::management(format!(
                "'{}' not found in {}",
                target.title,
                self.kind.name()
            ))
        })?;

        log::info!(
            "Deleting '{}' from {} (id {})",
            entry.title,
            self.kind.name(),
            entry.id
        );
        self.delete_entry(entry.id)
    }
}

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Match by title or alternate title, preferring a year match when a year is known
pub fn find_entry<'e>(entries: &'e [ArrEntry], title: &str, year: Option<i32>) -> Option<&'e ArrEntry> {
    let wanted = normalize(title);
    let title_matches = |entry: &ArrEntry| {
        normalize(&entry.title) == wanted
            || entry
                .alternate_titles
                .iter()
                .any(|alt| normalize(&alt.title) == wanted)
    };

    match year {
        Some(year) => entries
            .iter()
            .find(|entry| title_matches(entry) && entry.year == Some(year))
            .or_else(|| entries.iter().find(|entry| normalize(&entry.title) == wanted)),
        None => entries.iter().find(|entry| title_matches(entry)),
    }
}

/// Result of wiring up a management service from configuration
pub enum ManagementAvailability {
    Available(ArrClient),
    /// Reason shown to the operator once
    Unavailable(String),
}

/// Build a client if the service is enabled, configured and reachable
pub fn connect_management(kind: ArrKind, config: &ServiceConfig) -> ManagementAvailability {
    if !config.enabled {
        return ManagementAvailability::Unavailable(format!("{} is not configured", kind.name()));
    }

    let url = config.url.as_deref().filter(|u| !u.is_empty());
    let api_key = config.api_key.as_deref().filter(|k| !k.is_empty());
    let (Some(url), Some(api_key)) = (url, api_key) else {
        log::warn!("{} is enabled but URL or API key is missing", kind.name());
        return ManagementAvailability::Unavailable(format!(
            "{} is enabled but URL or API key is missing",
            kind.name()
        ));
    };

    let client = match ArrClient::new(kind, url, api_key) {
        Ok(client) => client,
        Err(e) => {
            log::warn!("{}", e);
            return ManagementAvailability::Unavailable(e.to_string());
        }
    };

    match client.test_connection() {
        Ok(version) => {
            log::info!("Connected to {} v{}", kind.name(), version);
            ManagementAvailability::Available(client)
        }
        Err(e) => {
            log::warn!("Failed to connect to {}: {}", kind.name(), e);
            ManagementAvailability::Unavailable(format!("Failed to connect to {}", kind.name()))
        }
    }
}
