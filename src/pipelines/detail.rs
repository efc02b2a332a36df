use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::model::RestaurantRecord;
use crate::normalizer::RecordNormalizer;
use crate::page::{HtmlPage, Page};
use crate::store::RecordStore;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;

/// Outcome of visiting a batch of detail pages
#[derive(Debug, Default)]
pub struct NormalizeReport {
    /// Files written, in visit order
    pub saved: Vec<PathBuf>,
    /// URL and reason for every page that produced no record
    pub failed: Vec<(String, String)>,
}

/// Visit each URL in order, normalize it and save the record.
///
/// A page that fails to load or carries malformed structured data is logged
/// and skipped; the batch continues. Failing to write a record file aborts.
pub async fn visit_and_normalize<P>(
    page: &mut P,
    urls: &[String],
    normalizer: &RecordNormalizer,
    store: &RecordStore,
    settle_delay: Duration,
) -> Result<NormalizeReport, HarvestError>
where
    P: Page + ?Sized,
{
    info!("Found {} URLs to process.", urls.len());
    let mut report = NormalizeReport::default();

    for (index, url) in urls.iter().enumerate() {
        info!("[{}/{}] {}", index + 1, urls.len(), url);
        if let Err(e) = page.navigate(url).await {
            warn!("Could not load {}: {}", url, e);
            report.failed.push((url.clone(), e.to_string()));
            continue;
        }
        sleep(settle_delay).await;

        let record = match normalizer.normalize(&*page) {
            Ok(record) => record,
            Err(e) => {
                warn!("Could not normalize {}: {}", url, e);
                report.failed.push((url.clone(), e.to_string()));
                continue;
            }
        };
        report.saved.push(store.save(&record).await?);
    }

    info!(
        "Saved {} records, {} pages failed",
        report.saved.len(),
        report.failed.len()
    );
    Ok(report)
}

/// Fetch a single detail page and normalize it, without saving.
pub async fn fetch_record(
    url: &str,
    config: &HarvestConfig,
) -> Result<RestaurantRecord, HarvestError> {
    let fetcher = super::default_fetcher(config)?;
    let page = HtmlPage::open(fetcher, url).await?;
    RecordNormalizer::from_config(config).normalize(&page)
}

/// Visit `urls` with the default fetcher and save records under `records_dir`.
pub async fn process(
    urls: &[String],
    config: &HarvestConfig,
    records_dir: impl Into<PathBuf>,
) -> Result<NormalizeReport, HarvestError> {
    let fetcher = super::default_fetcher(config)?;
    let mut page = HtmlPage::new(fetcher);
    let store = RecordStore::open(records_dir).await?;
    let normalizer = RecordNormalizer::from_config(config);
    visit_and_normalize(
        &mut page,
        urls,
        &normalizer,
        &store,
        config.crawl.settle_delay(),
    )
    .await
}
