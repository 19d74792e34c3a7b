//! Offline artwork selection command handler

use serde_json::Value;
use std::path::Path;

use crate::domain::Mediable;
use crate::sync::build_media_records;

pub async fn cmd_artwork(file: &Path, owner: Mediable) -> anyhow::Result<()> {
    let response: Value = super::read_json(file).await?;
    let records = build_media_records(owner, &response)?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
