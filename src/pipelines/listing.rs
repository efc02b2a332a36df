use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::harvester::{HarvestOutcome, LinkHarvester};
use crate::page::{HtmlPage, Page};
use crate::store::write_link_list;
use log::info;
use std::path::Path;

/// Harvest from the page already loaded and persist the full link list at the end.
///
/// Nothing is written until the crawl finishes.
pub async fn harvest_to_file<P>(
    page: &mut P,
    harvester: &LinkHarvester,
    links_file: &Path,
) -> Result<HarvestOutcome, HarvestError>
where
    P: Page + ?Sized,
{
    let outcome = harvester.harvest(page).await?;
    write_link_list(links_file, &outcome.links).await?;
    info!(
        "Wrote {} links from {} pages to '{}'",
        outcome.links.len(),
        outcome.pages_visited(),
        links_file.display()
    );
    Ok(outcome)
}

/// Open `start_url` with the default fetcher and harvest the listing.
pub async fn process(
    start_url: &str,
    config: &HarvestConfig,
    links_file: &Path,
) -> Result<HarvestOutcome, HarvestError> {
    let fetcher = super::default_fetcher(config)?;
    let mut page = HtmlPage::open(fetcher, start_url).await?;
    let harvester = LinkHarvester::from_config(config);
    harvest_to_file(&mut page, &harvester, links_file).await
}
