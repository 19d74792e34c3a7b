use serde::{Deserialize, Serialize};

use crate::domain::{Mediable, SeasonBucket};

/// Natural key of an artwork row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MediaKey {
    pub mediable_type: String,
    pub mediable_id: i64,
    pub external_image_id: String,
}

/// One FanArt image, flagged active when it is the best of its
/// (type, season) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    pub mediable_type: String,
    pub mediable_id: i64,
    pub external_image_id: String,
    #[serde(rename = "type")]
    pub image_type: String,
    pub url: String,
    pub path: String,
    pub lang: Option<String>,
    pub likes: i64,
    pub season: SeasonBucket,
    pub disc: Option<String>,
    pub disc_type: Option<String>,
    pub is_active: bool,
}

impl ArtworkRecord {
    #[must_use]
    pub fn natural_key(&self) -> MediaKey {
        MediaKey {
            mediable_type: self.mediable_type.clone(),
            mediable_id: self.mediable_id,
            external_image_id: self.external_image_id.clone(),
        }
    }

    #[must_use]
    pub fn belongs_to(&self, owner: Mediable) -> bool {
        self.mediable_type == owner.mediable_type() && self.mediable_id == owner.mediable_id()
    }
}
