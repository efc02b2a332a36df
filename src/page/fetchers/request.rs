use super::Fetcher;
use crate::error::HarvestError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Plain HTTP GET, for pages whose markup is complete without running scripts
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, HarvestError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, HarvestError> {
        debug!("RequestFetcher: GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;
        Ok(html)
    }
}
