//! Natural-key upsert store for catalog rows.
//!
//! Upserts insert unseen keys and overwrite every non-key column of known
//! ones. Rows are never deleted, so an image or special that disappears from
//! a later payload stays in the catalog as last written.

pub mod memory;

pub use memory::MemoryStore;

use crate::domain::{Mediable, ShowId};
use crate::models::episode::EpisodeRecord;
use crate::models::media::ArtworkRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot is not valid JSON: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Rows written by one upsert call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub inserted: usize,
    pub updated: usize,
}

impl UpsertOutcome {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

impl std::ops::AddAssign for UpsertOutcome {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.updated += other.updated;
    }
}

#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Upserts episode rows keyed by `source_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    async fn upsert_episodes(&self, rows: &[EpisodeRecord]) -> Result<UpsertOutcome, StoreError>;

    /// Upserts artwork rows keyed by `(mediable_type, mediable_id,
    /// external_image_id)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    async fn upsert_media(&self, rows: &[ArtworkRecord]) -> Result<UpsertOutcome, StoreError>;

    async fn episodes_for_show(&self, show_id: ShowId) -> Result<Vec<EpisodeRecord>, StoreError>;

    async fn media_for(&self, owner: Mediable) -> Result<Vec<ArtworkRecord>, StoreError>;
}
