use super::Fetcher;
use crate::error::HarvestError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Serialize)]
struct ContentRequest {
    url: String,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: String,
}

/// Fetches pages through a headless-browser rendering service, so script-built
/// listings are present in the returned markup.
pub struct ChromeFetcher {
    endpoint: String,
    client: Client,
}

impl ChromeFetcher {
    /// Uses the service at `PAGE_SCRIBER_URL`, if set
    pub fn new() -> Option<Self> {
        let page_scriber_url = env::var("PAGE_SCRIBER_URL").ok()?;
        Some(Self::with_base_url(&page_scriber_url))
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let endpoint = format!("{}/api/fetch-content", base_url.trim_end_matches('/'));
        Self {
            endpoint,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Fetcher for ChromeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, HarvestError> {
        debug!("ChromeFetcher: rendering {} via {}", url, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ContentRequest {
                url: url.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HarvestError::FetchStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let content: ContentResponse = response.json().await?;
        Ok(content.content)
    }
}
