use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::ArtworkFetcher;
use crate::domain::Mediable;
use crate::store::{CatalogStore, UpsertOutcome};
use crate::sync::build_media_records;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtworkSyncSummary {
    pub records: usize,
    /// Distinct (image type, season) groups in the response.
    pub groups: usize,
    pub active: usize,
    pub upserted: UpsertOutcome,
}

/// Pulls FanArt images for a movie or show and upserts every image, with the
/// best one of each group flagged active.
#[derive(Clone)]
pub struct ArtworkSyncService {
    fetcher: Arc<dyn ArtworkFetcher>,
    store: Arc<dyn CatalogStore>,
    chunk_size: usize,
}

impl ArtworkSyncService {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn ArtworkFetcher>,
        store: Arc<dyn CatalogStore>,
        chunk_size: usize,
    ) -> Self {
        Self {
            fetcher,
            store,
            chunk_size: chunk_size.max(1),
        }
    }

    pub async fn sync(&self, owner: Mediable, external_id: &str) -> Result<ArtworkSyncSummary> {
        let response = match self.fetcher.fetch_artwork(owner, external_id).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%owner, external_id, error = %e, "Failed to fetch artwork");
                return Err(e);
            }
        };

        let summary = self.apply(owner, &response).await?;

        info!(
            event = "artwork_sync_finished",
            %owner,
            external_id,
            records = summary.records,
            groups = summary.groups,
            active = summary.active,
            inserted = summary.upserted.inserted,
            updated = summary.upserted.updated,
            "Artwork sync complete"
        );
        Ok(summary)
    }

    pub async fn apply(&self, owner: Mediable, response: &Value) -> Result<ArtworkSyncSummary> {
        let records = build_media_records(owner, response)
            .with_context(|| format!("Rejected artwork batch for {owner}"))?;
        let groups = records
            .iter()
            .map(|r| (r.image_type.as_str(), r.season))
            .collect::<HashSet<_>>()
            .len();
        let active = records.iter().filter(|r| r.is_active).count();

        let mut upserted = UpsertOutcome::default();
        for chunk in records.chunks(self.chunk_size) {
            upserted += self
                .store
                .upsert_media(chunk)
                .await
                .context("Failed to upsert artwork")?;
        }

        metrics::counter!("lundflix_artwork_active_total").increment(active as u64);
        metrics::counter!("lundflix_rows_upserted_total", "table" => "media")
            .increment(upserted.total() as u64);

        Ok(ArtworkSyncSummary {
            records: records.len(),
            groups,
            active,
            upserted,
        })
    }
}
