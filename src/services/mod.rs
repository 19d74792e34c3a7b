pub mod artwork_sync;
pub use artwork_sync::{ArtworkSyncService, ArtworkSyncSummary};

pub mod episode_sync;
pub use episode_sync::{EpisodeSyncService, EpisodeSyncSummary};
