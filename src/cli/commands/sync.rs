//! Live sync command handlers

use std::sync::Arc;

use crate::clients::{FanArtClient, TvMazeClient};
use crate::config::Config;
use crate::domain::{Mediable, ShowId};
use crate::services::{ArtworkSyncService, EpisodeSyncService};
use crate::store::MemoryStore;

pub async fn cmd_sync_episodes(config: &Config, show_id: i64, tvmaze_id: i64) -> anyhow::Result<()> {
    let store = MemoryStore::open(&config.general.store_path).await?;
    let client = TvMazeClient::new(&config.tvmaze)?;
    let service = EpisodeSyncService::new(
        Arc::new(client),
        Arc::new(store.clone()),
        config.sync.upsert_chunk_size,
    );

    let summary = service.sync_show(ShowId::new(show_id), tvmaze_id).await?;
    store.persist().await?;

    println!(
        "✓ Show {show_id}: {} fetched, {} discarded, {} specials renumbered",
        summary.fetched, summary.discarded, summary.specials
    );
    println!(
        "  {} inserted, {} updated",
        summary.upserted.inserted, summary.upserted.updated
    );
    Ok(())
}

pub async fn cmd_sync_artwork(
    config: &Config,
    owner: Mediable,
    fanart_id: &str,
) -> anyhow::Result<()> {
    let store = MemoryStore::open(&config.general.store_path).await?;
    let client = FanArtClient::new(&config.fanart)?;
    let service = ArtworkSyncService::new(
        Arc::new(client),
        Arc::new(store.clone()),
        config.sync.upsert_chunk_size,
    );

    let summary = service.sync(owner, fanart_id).await?;
    store.persist().await?;

    println!(
        "✓ {owner}: {} images in {} groups, {} active",
        summary.records, summary.groups, summary.active
    );
    println!(
        "  {} inserted, {} updated",
        summary.upserted.inserted, summary.upserted.updated
    );
    Ok(())
}
