use crate::core::media::{EpisodeRecord, LibraryKind, LibraryRef, MovieRecord, ShowAggregate};
use crate::error::{Result, SyncError};

/// Read-only view of the media server's libraries
pub trait Catalog {
    fn list_libraries(&self) -> Result<Vec<LibraryRef>>;

    /// Episodes of the show whose title matches `show_name` case-insensitively.
    /// The first matching show wins; no match is a `NotFound` error.
    fn list_show_episodes(&self, library: &LibraryRef, show_name: &str)
        -> Result<Vec<EpisodeRecord>>;

    fn list_movies(&self, library: &LibraryRef) -> Result<Vec<MovieRecord>>;

    fn list_shows(&self, library: &LibraryRef) -> Result<Vec<ShowAggregate>>;
}

/// Look up a library by its exact display name
pub fn find_library(catalog: &dyn Catalog, name: &str) -> Result<LibraryRef> {
    catalog
        .list_libraries()?
        .into_iter()
        .find(|library| library.name == name)
        .ok_or_else(|| SyncError::not_found(format!("Library '{}' not found", name)))
}

/// All libraries of one kind, in catalog order
pub fn libraries_of_kind(catalog: &dyn Catalog, kind: LibraryKind) -> Result<Vec<LibraryRef>> {
    Ok(catalog
        .list_libraries()?
        .into_iter()
        .filter(|library| library.kind == kind)
        .collect())
}

/// Case-insensitive title comparison used for show lookups
pub fn titles_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
