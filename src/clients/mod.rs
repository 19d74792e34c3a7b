//! HTTP clients for the upstream catalog sources.
//!
//! Responses are handed over as untyped JSON; shaping them into rows is the
//! job of [`crate::sync`].

pub mod fanart;
pub mod tvmaze;

pub use fanart::FanArtClient;
pub use tvmaze::TvMazeClient;

use anyhow::Result;
use serde_json::Value;

use crate::domain::Mediable;

#[async_trait::async_trait]
pub trait EpisodeFetcher: Send + Sync {
    /// Every episode TVMaze knows for the show, in API order.
    async fn fetch_episodes(&self, tvmaze_id: i64) -> Result<Vec<Value>>;
}

#[async_trait::async_trait]
pub trait ArtworkFetcher: Send + Sync {
    /// The raw FanArt response for `owner`, looked up by its FanArt-side id
    /// (TMDB/IMDb id for movies, TVDB id for shows).
    async fn fetch_artwork(&self, owner: Mediable, external_id: &str) -> Result<Value>;
}
