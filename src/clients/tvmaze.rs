use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::EpisodeFetcher;
use crate::config::TvMazeConfig;
use crate::constants::http::USER_AGENT;

#[derive(Clone)]
pub struct TvMazeClient {
    client: Client,
    base_url: String,
    include_specials: bool,
}

impl TvMazeClient {
    pub fn new(config: &TvMazeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(u64::from(
                config.request_timeout_seconds,
            )))
            .build()
            .context("Failed to build TVMaze HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            include_specials: config.include_specials,
        })
    }

    fn episodes_url(&self, tvmaze_id: i64) -> String {
        let mut url = format!("{}/shows/{}/episodes", self.base_url, tvmaze_id);
        if self.include_specials {
            url.push_str("?specials=1");
        }
        url
    }

    pub async fn get_episodes(&self, tvmaze_id: i64) -> Result<Vec<Value>> {
        let url = self.episodes_url(tvmaze_id);
        debug!(url = %url, "Fetching TVMaze episodes");
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("TVMaze show {tvmaze_id} not found");
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TVMaze API error: {} - {}", status, body));
        }

        let episodes: Vec<Value> = response
            .json()
            .await
            .context("TVMaze returned a non-array episode list")?;
        Ok(episodes)
    }
}

#[async_trait::async_trait]
impl EpisodeFetcher for TvMazeClient {
    async fn fetch_episodes(&self, tvmaze_id: i64) -> Result<Vec<Value>> {
        self.get_episodes(tvmaze_id).await
    }
}
