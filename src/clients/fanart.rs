use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::ArtworkFetcher;
use crate::config::FanArtConfig;
use crate::constants::http::USER_AGENT;
use crate::domain::Mediable;

#[derive(Clone)]
pub struct FanArtClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FanArtClient {
    pub fn new(config: &FanArtConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(u64::from(
                config.request_timeout_seconds,
            )))
            .build()
            .context("Failed to build FanArt HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn images_path(&self, owner: Mediable, external_id: &str) -> String {
        let section = match owner {
            Mediable::Movie(_) => "movies",
            Mediable::Show(_) => "tv",
        };
        format!(
            "{}/{}/{}",
            self.base_url,
            section,
            urlencoding::encode(external_id)
        )
    }

    /// Fetches the image listing; an unknown id yields an empty object.
    pub async fn get_images(&self, owner: Mediable, external_id: &str) -> Result<Value> {
        if self.api_key.is_empty() {
            anyhow::bail!("FanArt API key is not configured (fanart.api_key)");
        }

        let url = self.images_path(owner, external_id);
        debug!(url = %url, owner = %owner, "Fetching FanArt images");
        let response = self
            .client
            .get(format!(
                "{url}?api_key={}",
                urlencoding::encode(&self.api_key)
            ))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("FanArt API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl ArtworkFetcher for FanArtClient {
    async fn fetch_artwork(&self, owner: Mediable, external_id: &str) -> Result<Value> {
        self.get_images(owner, external_id).await
    }
}
