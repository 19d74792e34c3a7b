mod artwork;
mod episodes;
mod reconcile;
mod sync;

pub use artwork::cmd_artwork;
pub use episodes::cmd_episodes;
pub use reconcile::cmd_reconcile;
pub use sync::{cmd_sync_artwork, cmd_sync_episodes};

use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::Path;

async fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&content)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))
}
