pub mod detail;
pub mod listing;

use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::page::fetchers::{ChromeFetcher, Fetcher, RequestFetcher};
use log::debug;

/// Rendering service when `PAGE_SCRIBER_URL` is configured, plain HTTP otherwise.
pub fn default_fetcher(config: &HarvestConfig) -> Result<Box<dyn Fetcher>, HarvestError> {
    if let Some(chrome) = ChromeFetcher::new() {
        debug!("Using rendering service for page loads");
        return Ok(Box::new(chrome));
    }
    Ok(Box::new(RequestFetcher::new(Some(config.request_timeout()))?))
}
