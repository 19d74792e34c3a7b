//! List stored episodes command handler

use crate::config::Config;
use crate::domain::{EpisodeCode, ShowId, summarize_codes};
use crate::store::{CatalogStore, MemoryStore};

pub async fn cmd_episodes(config: &Config, show_id: i64) -> anyhow::Result<()> {
    let store = MemoryStore::open(&config.general.store_path).await?;
    let mut episodes = store.episodes_for_show(ShowId::new(show_id)).await?;

    if episodes.is_empty() {
        println!("No episodes stored for show {show_id}.");
        println!();
        println!("Sync them with: lundflix sync-episodes --show-id {show_id} --tvmaze-id <id>");
        return Ok(());
    }

    episodes.sort_by_key(|e| (EpisodeCode::for_record(e).is_none(), EpisodeCode::for_record(e)));

    println!("Episodes for show {show_id} ({} total)", episodes.len());
    println!("{:-<70}", "");

    for episode in &episodes {
        let code = EpisodeCode::for_record(episode)
            .map_or_else(|| "  ?   ".to_string(), |c| c.to_string());
        let aired = episode
            .airdate
            .map(|d| format!(" - {d}"))
            .unwrap_or_default();
        println!("{code} {}{aired}", episode.name);
    }

    let codes: Vec<EpisodeCode> = episodes.iter().filter_map(EpisodeCode::for_record).collect();
    println!();
    println!("Stored: {}", summarize_codes(&codes));

    Ok(())
}
