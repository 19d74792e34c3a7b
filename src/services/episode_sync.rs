use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::clients::EpisodeFetcher;
use crate::domain::ShowId;
use crate::store::{CatalogStore, UpsertOutcome};
use crate::sync::{build_episode_records, reconcile};

/// What one episode sync did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EpisodeSyncSummary {
    pub fetched: usize,
    pub discarded: usize,
    pub specials: usize,
    pub upserted: UpsertOutcome,
}

/// Pulls a show's episodes from TVMaze and upserts the reconciled batch.
///
/// Syncs of different shows are independent; callers should not run two
/// syncs of the same show at once.
#[derive(Clone)]
pub struct EpisodeSyncService {
    fetcher: Arc<dyn EpisodeFetcher>,
    store: Arc<dyn CatalogStore>,
    chunk_size: usize,
}

impl EpisodeSyncService {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn EpisodeFetcher>,
        store: Arc<dyn CatalogStore>,
        chunk_size: usize,
    ) -> Self {
        Self {
            fetcher,
            store,
            chunk_size: chunk_size.max(1),
        }
    }

    pub async fn sync_show(&self, show_id: ShowId, tvmaze_id: i64) -> Result<EpisodeSyncSummary> {
        let start = Instant::now();

        let payload = match self.fetcher.fetch_episodes(tvmaze_id).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(%show_id, tvmaze_id, error = %e, "Failed to fetch episodes");
                return Err(e);
            }
        };

        let summary = self.apply(show_id, &payload).await?;

        info!(
            event = "episode_sync_finished",
            %show_id,
            tvmaze_id,
            fetched = summary.fetched,
            discarded = summary.discarded,
            specials = summary.specials,
            inserted = summary.upserted.inserted,
            updated = summary.upserted.updated,
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Episode sync complete"
        );
        Ok(summary)
    }

    /// Builds, reconciles and upserts an already fetched payload.
    pub async fn apply(&self, show_id: ShowId, payload: &[Value]) -> Result<EpisodeSyncSummary> {
        let records = build_episode_records(show_id, payload)
            .with_context(|| format!("Rejected episode batch for show {show_id}"))?;
        let fetched = records.len();

        let episodes = reconcile(records);
        let discarded = fetched - episodes.len();
        let specials = episodes
            .iter()
            .filter(|e| e.is_significant_special())
            .count();

        let mut upserted = UpsertOutcome::default();
        for chunk in episodes.chunks(self.chunk_size) {
            upserted += self
                .store
                .upsert_episodes(chunk)
                .await
                .context("Failed to upsert episodes")?;
        }

        metrics::counter!("lundflix_episodes_discarded_total").increment(discarded as u64);
        metrics::counter!("lundflix_specials_renumbered_total").increment(specials as u64);
        metrics::counter!("lundflix_rows_upserted_total", "table" => "episodes")
            .increment(upserted.total() as u64);

        Ok(EpisodeSyncSummary {
            fetched,
            discarded,
            specials,
            upserted,
        })
    }
}
