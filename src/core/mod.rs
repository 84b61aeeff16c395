// Core business logic module

pub mod arr;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod media;
pub mod planner;
pub mod plex;
pub mod ranker;
pub mod reencode;
pub mod selector;
pub mod session;
pub mod transfer;

// Re-export commonly used items
pub use cache::CacheStore;
pub use catalog::Catalog;
pub use config::Config;
pub use planner::{SyncPlan, SyncPlanner, SyncReport, SyncRunner};
pub use plex::PlexClient;
pub use ranker::{RankedItem, WatchFilter};
pub use selector::select_episodes;
pub use session::{SelectionSession, SessionInput, SessionState};
pub use transfer::{DestinationMapper, Rsync, Transfer, TransferOptions};
