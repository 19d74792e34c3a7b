use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{EpisodeType, ShowId};

/// One episode row, keyed by `source_id` at the storage boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// TVMaze episode id.
    pub source_id: i64,
    pub show_id: ShowId,
    pub season: u32,
    /// Reassigned for significant specials; TVMaze leaves it null for them.
    pub number: Option<u32>,
    pub name: String,
    #[serde(rename = "type")]
    pub episode_type: EpisodeType,
    pub airdate: Option<NaiveDate>,
    pub airtime: Option<String>,
    pub runtime: Option<i64>,
    pub rating: Option<Value>,
    pub image: Option<Value>,
    pub summary: Option<String>,
}

impl EpisodeRecord {
    #[must_use]
    pub const fn natural_key(&self) -> i64 {
        self.source_id
    }

    #[must_use]
    pub const fn is_significant_special(&self) -> bool {
        matches!(self.episode_type, EpisodeType::SignificantSpecial)
    }
}
