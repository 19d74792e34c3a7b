//! Domain types for catalog sync with strong typing.
//!
//! Newtype identifiers keep show ids, movie ids and external source ids from
//! being mixed up, and the small enums here replace the stringly values that
//! the upstream APIs hand us.

pub mod episode_code;

pub use episode_code::{EpisodeCode, summarize_codes};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::constants::artwork::ALL_SEASONS;

/// Catalog identifier of a TV show.
///
/// # Examples
///
/// ```rust
/// use lundflix::domain::ShowId;
///
/// let id = ShowId::new(5);
/// assert_eq!(id.value(), 5);
/// assert_eq!(id.to_string(), "5");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ShowId(i64);

impl ShowId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        debug_assert!(id >= 0, "ShowId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ShowId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

/// Catalog identifier of a movie.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MovieId(i64);

impl MovieId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        debug_assert!(id >= 0, "MovieId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MovieId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

/// The catalog entity that owns a piece of artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mediable {
    Movie(MovieId),
    Show(ShowId),
}

impl Mediable {
    /// Type discriminator written to the `mediable_type` column.
    #[must_use]
    pub const fn mediable_type(&self) -> &'static str {
        match self {
            Self::Movie(_) => "movie",
            Self::Show(_) => "show",
        }
    }

    #[must_use]
    pub const fn mediable_id(&self) -> i64 {
        match self {
            Self::Movie(id) => id.value(),
            Self::Show(id) => id.value(),
        }
    }
}

impl fmt::Display for Mediable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mediable_type(), self.mediable_id())
    }
}

/// Episode classification as reported by TVMaze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeType {
    #[default]
    Regular,
    SignificantSpecial,
    InsignificantSpecial,
}

impl EpisodeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::SignificantSpecial => "significant_special",
            Self::InsignificantSpecial => "insignificant_special",
        }
    }

    /// Maps an upstream type string, falling back to `Regular` for missing or
    /// unrecognised values.
    ///
    /// ```rust
    /// use lundflix::domain::EpisodeType;
    ///
    /// assert_eq!(EpisodeType::from_upstream(Some("significant_special")), EpisodeType::SignificantSpecial);
    /// assert_eq!(EpisodeType::from_upstream(Some("bonus_feature")), EpisodeType::Regular);
    /// assert_eq!(EpisodeType::from_upstream(None), EpisodeType::Regular);
    /// ```
    #[must_use]
    pub fn from_upstream(value: Option<&str>) -> Self {
        match value {
            None | Some("regular") => Self::Regular,
            Some("significant_special") => Self::SignificantSpecial,
            Some("insignificant_special") => Self::InsignificantSpecial,
            Some(other) => {
                debug!(episode_type = other, "Unknown episode type, treating as regular");
                Self::Regular
            }
        }
    }

    #[must_use]
    pub const fn is_special(self) -> bool {
        !matches!(self, Self::Regular)
    }
}

impl fmt::Display for EpisodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalised season grouping for artwork.
///
/// Stored as a nullable integer: `NotApplicable` is null, `AllSeasons` is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeasonBucket {
    NotApplicable,
    AllSeasons,
    Season(i32),
}

impl SeasonBucket {
    /// Reads a FanArt `season` field.
    ///
    /// Anything other than null or `"all"` is cast to an integer: floats and
    /// numeric strings truncate, and `0` is the all-seasons bucket. Values
    /// with no integer reading are treated as not season specific.
    #[must_use]
    pub fn from_value(value: Option<&Value>) -> Self {
        let season = match value {
            None | Some(Value::Null) => return Self::NotApplicable,
            Some(Value::String(s)) if s == ALL_SEASONS => return Self::AllSeasons,
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(truncate))
            }
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
            Some(_) => None,
        };

        match season.and_then(|n| i32::try_from(n).ok()) {
            Some(0) => Self::AllSeasons,
            Some(n) => Self::Season(n),
            None => {
                debug!(?value, "Season has no integer reading, treating as not season specific");
                Self::NotApplicable
            }
        }
    }

    /// Encoding used at the storage boundary.
    #[must_use]
    pub const fn to_storage(self) -> Option<i32> {
        match self {
            Self::NotApplicable => None,
            Self::AllSeasons => Some(0),
            Self::Season(n) => Some(n),
        }
    }

    #[must_use]
    pub const fn from_storage(value: Option<i32>) -> Self {
        match value {
            None => Self::NotApplicable,
            Some(0) => Self::AllSeasons,
            Some(n) => Self::Season(n),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}

impl Serialize for SeasonBucket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_storage().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SeasonBucket {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Option::<i32>::deserialize(deserializer).map(Self::from_storage)
    }
}
