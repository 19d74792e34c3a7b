use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{CatalogStore, StoreError, UpsertOutcome};
use crate::domain::{Mediable, ShowId};
use crate::models::episode::EpisodeRecord;
use crate::models::media::{ArtworkRecord, MediaKey};

#[derive(Debug, Default)]
struct Catalog {
    episodes: BTreeMap<i64, EpisodeRecord>,
    media: BTreeMap<MediaKey, ArtworkRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    episodes: Vec<EpisodeRecord>,
    #[serde(default)]
    media: Vec<ArtworkRecord>,
}

/// In-memory catalog, optionally mirrored to a JSON snapshot file.
#[derive(Clone, Default)]
pub struct MemoryStore {
    catalog: Arc<RwLock<Catalog>>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store backed by `path`, loading it if the file exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let mut catalog = Catalog::default();

        if fs::try_exists(&path).await? {
            let content = fs::read(&path).await?;
            let snapshot: Snapshot = serde_json::from_slice(&content)?;
            catalog.episodes = snapshot
                .episodes
                .into_iter()
                .map(|e| (e.natural_key(), e))
                .collect();
            catalog.media = snapshot
                .media
                .into_iter()
                .map(|m| (m.natural_key(), m))
                .collect();
            info!(
                path = %path.display(),
                episodes = catalog.episodes.len(),
                media = catalog.media.len(),
                "Loaded catalog snapshot"
            );
        }

        Ok(Self {
            catalog: Arc::new(RwLock::new(catalog)),
            snapshot_path: Some(path),
        })
    }

    /// Writes the snapshot file. A no-op for purely in-memory stores.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the snapshot cannot be serialized or written.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let content = {
            let catalog = self.catalog.read().await;
            let snapshot = Snapshot {
                episodes: catalog.episodes.values().cloned().collect(),
                media: catalog.media.values().cloned().collect(),
            };
            serde_json::to_vec_pretty(&snapshot)?
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, content).await?;
        debug!(path = %path.display(), "Catalog snapshot written");
        Ok(())
    }
}

fn upsert_into<K: Ord, V: Clone>(
    map: &mut BTreeMap<K, V>,
    rows: &[V],
    key: impl Fn(&V) -> K,
) -> UpsertOutcome {
    let mut outcome = UpsertOutcome::default();
    for row in rows {
        if map.insert(key(row), row.clone()).is_some() {
            outcome.updated += 1;
        } else {
            outcome.inserted += 1;
        }
    }
    outcome
}

#[async_trait::async_trait]
impl CatalogStore for MemoryStore {
    async fn upsert_episodes(&self, rows: &[EpisodeRecord]) -> Result<UpsertOutcome, StoreError> {
        let mut catalog = self.catalog.write().await;
        Ok(upsert_into(
            &mut catalog.episodes,
            rows,
            EpisodeRecord::natural_key,
        ))
    }

    async fn upsert_media(&self, rows: &[ArtworkRecord]) -> Result<UpsertOutcome, StoreError> {
        let mut catalog = self.catalog.write().await;
        Ok(upsert_into(&mut catalog.media, rows, ArtworkRecord::natural_key))
    }

    async fn episodes_for_show(&self, show_id: ShowId) -> Result<Vec<EpisodeRecord>, StoreError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .episodes
            .values()
            .filter(|e| e.show_id == show_id)
            .cloned()
            .collect())
    }

    async fn media_for(&self, owner: Mediable) -> Result<Vec<ArtworkRecord>, StoreError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .media
            .values()
            .filter(|m| m.belongs_to(owner))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EpisodeType, MovieId, SeasonBucket};

    fn episode(id: i64, name: &str) -> EpisodeRecord {
        EpisodeRecord {
            source_id: id,
            show_id: ShowId::new(1),
            season: 1,
            number: Some(1),
            name: name.to_string(),
            episode_type: EpisodeType::Regular,
            airdate: None,
            airtime: None,
            runtime: None,
            rating: None,
            image: None,
            summary: None,
        }
    }

    fn poster(id: &str, active: bool) -> ArtworkRecord {
        ArtworkRecord {
            mediable_type: "movie".to_string(),
            mediable_id: 9,
            external_image_id: id.to_string(),
            image_type: "movieposter".to_string(),
            url: format!("https://assets.fanart.tv/{id}.jpg"),
            path: format!("/{id}.jpg"),
            lang: None,
            likes: 0,
            season: SeasonBucket::NotApplicable,
            disc: None,
            disc_type: None,
            is_active: active,
        }
    }

    #[tokio::test]
    async fn upsert_updates_existing_keys() {
        let store = MemoryStore::new();
        let first = store.upsert_episodes(&[episode(1, "Old")]).await.unwrap();
        assert_eq!(first, UpsertOutcome { inserted: 1, updated: 0 });

        let second = store
            .upsert_episodes(&[episode(1, "New"), episode(2, "Other")])
            .await
            .unwrap();
        assert_eq!(second, UpsertOutcome { inserted: 1, updated: 1 });

        let rows = store.episodes_for_show(ShowId::new(1)).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "New");
    }

    #[tokio::test]
    async fn media_rows_are_never_deleted() {
        let store = MemoryStore::new();
        store
            .upsert_media(&[poster("a", true), poster("b", false)])
            .await
            .unwrap();
        store.upsert_media(&[poster("b", true)]).await.unwrap();

        let rows = store
            .media_for(Mediable::Movie(MovieId::new(9)))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_active));
    }

    #[tokio::test]
    async fn snapshot_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "lundflix-store-test-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let store = MemoryStore::open(&path).await.unwrap();
        store.upsert_episodes(&[episode(7, "Seven")]).await.unwrap();
        store.upsert_media(&[poster("p", true)]).await.unwrap();
        store.persist().await.unwrap();

        let reopened = MemoryStore::open(&path).await.unwrap();
        let episodes = reopened.episodes_for_show(ShowId::new(1)).await.unwrap();
        assert_eq!(episodes, vec![episode(7, "Seven")]);
        let media = reopened
            .media_for(Mediable::Movie(MovieId::new(9)))
            .await
            .unwrap();
        assert_eq!(media, vec![poster("p", true)]);

        let _ = std::fs::remove_file(&path);
    }
}
