//! Harvest restaurant listings from a review site, normalize each detail page
//! into a [`RestaurantRecord`] and aggregate saved records into one CSV table.
//!
//! The three stages run independently and hand over files:
//! listing pages -> link list -> one JSON record per restaurant -> CSV.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod harvester;
pub mod model;
pub mod normalizer;
pub mod page;
pub mod pipelines;
pub mod store;

pub use aggregator::{AggregateReport, Aggregator, CsvRow};
pub use config::HarvestConfig;
pub use error::HarvestError;
pub use harvester::{CrawlState, HarvestOutcome, LinkHarvester, PageSummary};
pub use model::{Address, Coordinates, RestaurantRecord};
pub use normalizer::RecordNormalizer;
pub use page::{HtmlPage, Page, PageElement};
pub use pipelines::detail::{fetch_record, visit_and_normalize, NormalizeReport};
pub use pipelines::listing::harvest_to_file;
pub use store::{read_link_list, write_link_list, RecordStore};

use std::path::Path;

/// Crawl the listing starting at `start_url` and write the link list.
pub async fn harvest_links(
    start_url: &str,
    config: &HarvestConfig,
    links_file: &Path,
) -> Result<HarvestOutcome, HarvestError> {
    pipelines::listing::process(start_url, config, links_file).await
}

/// Visit every URL, saving one record file per page under `records_dir`.
pub async fn normalize_urls(
    urls: &[String],
    config: &HarvestConfig,
    records_dir: &Path,
) -> Result<NormalizeReport, HarvestError> {
    pipelines::detail::process(urls, config, records_dir).await
}

/// Aggregate the record files in `records_dir` into `table_file`.
pub async fn aggregate_records(
    records_dir: &Path,
    table_file: &Path,
    config: &HarvestConfig,
) -> Result<AggregateReport, HarvestError> {
    Aggregator::new(config.output.record_extension.clone())
        .aggregate(records_dir, table_file)
        .await
}
