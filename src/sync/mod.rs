//! Batch transforms applied between an API payload and the catalog store.
//!
//! Both transforms are pure and synchronous. A batch either converts in full
//! or fails with a [`SyncError`]; nothing is written for a failed batch.

pub mod artwork;
pub mod episodes;

pub use artwork::{best_image, build_media_records};
pub use episodes::{build_episode_records, reconcile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Invalid {entity} at position {position}: {reason}")]
    Validation {
        entity: &'static str,
        position: String,
        reason: String,
    },

    #[error("Malformed payload: {0}")]
    Payload(String),
}

impl SyncError {
    pub fn validation(
        entity: &'static str,
        position: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            entity,
            position: position.to_string(),
            reason: reason.into(),
        }
    }

    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }
}
