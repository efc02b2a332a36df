use crate::error::HarvestError;
use async_trait::async_trait;

mod chrome;
mod request;

pub use chrome::ChromeFetcher;
pub use request::RequestFetcher;

/// Source of page HTML for a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, HarvestError>;
}
