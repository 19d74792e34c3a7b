//! Offline reconcile command handler

use serde_json::Value;
use std::path::Path;

use crate::domain::ShowId;
use crate::sync::{build_episode_records, reconcile};

pub async fn cmd_reconcile(file: &Path, show_id: i64) -> anyhow::Result<()> {
    let payload: Vec<Value> = super::read_json(file).await?;
    let records = build_episode_records(ShowId::new(show_id), &payload)?;
    let episodes = reconcile(records);

    println!("{}", serde_json::to_string_pretty(&episodes)?);
    Ok(())
}
