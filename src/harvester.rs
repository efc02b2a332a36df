//! Paginated collection of restaurant detail-page links.

use crate::config::{CrawlConfig, HarvestConfig};
use crate::error::HarvestError;
use crate::page::{Page, PageElement};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Links seen so far in one harvest run, kept in first-seen order.
#[derive(Debug)]
pub struct CrawlState {
    visited: HashSet<String>,
    ordered: Vec<String>,
    current_page: usize,
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlState {
    pub fn new() -> Self {
        Self {
            visited: HashSet::new(),
            ordered: Vec::new(),
            current_page: 1,
        }
    }

    /// 1-based index of the page being read
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn advance(&mut self) {
        self.current_page += 1;
    }

    /// Union `links` into the visited set, returning how many were new
    pub fn absorb(&mut self, links: impl IntoIterator<Item = String>) -> usize {
        let before = self.ordered.len();
        for link in links {
            if self.visited.insert(link.clone()) {
                self.ordered.push(link);
            }
        }
        self.ordered.len() - before
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_links(self) -> Vec<String> {
        self.ordered
    }
}

/// Per-page counts reported during a harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub page: usize,
    /// Raw selector matches before the promoted slots were dropped
    pub matched: usize,
    /// Deduplicated links read from this page, promoted slots excluded
    pub found: usize,
    /// Unique links collected after this page
    pub total: usize,
}

/// Result of one harvest run
#[derive(Debug, Clone, Default)]
pub struct HarvestOutcome {
    pub links: Vec<String>,
    pub pages: Vec<PageSummary>,
    /// True when the crawl stopped while a next-page control was still offered
    pub truncated: bool,
}

impl HarvestOutcome {
    pub fn pages_visited(&self) -> usize {
        self.pages.len()
    }
}

/// Drop the leading promoted matches and deduplicate the rest, keeping order.
pub fn page_links(anchors: Vec<PageElement>, skip_leading: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    anchors
        .into_iter()
        .skip(skip_leading)
        .filter_map(|anchor| anchor.href)
        .filter(|href| seen.insert(href.clone()))
        .collect()
}

pub struct LinkHarvester {
    crawl: CrawlConfig,
    link_selector: String,
    next_selector: String,
}

impl LinkHarvester {
    pub fn new(
        crawl: CrawlConfig,
        link_selector: impl Into<String>,
        next_selector: impl Into<String>,
    ) -> Self {
        Self {
            crawl,
            link_selector: link_selector.into(),
            next_selector: next_selector.into(),
        }
    }

    pub fn from_config(config: &HarvestConfig) -> Self {
        Self::new(
            config.crawl.clone(),
            config.selectors.restaurant_link.clone(),
            config.selectors.next_page.clone(),
        )
    }

    /// Walk the listing from the page currently loaded until no next-page
    /// control is offered or `max_pages` pages have been read.
    pub async fn harvest<P>(&self, page: &mut P) -> Result<HarvestOutcome, HarvestError>
    where
        P: Page + ?Sized,
    {
        let mut state = CrawlState::new();
        let mut pages = Vec::new();
        let mut truncated = false;

        loop {
            info!("Scraping page {}...", state.current_page());

            let anchors = page.query_all(&self.link_selector)?;
            let matched = anchors.len();
            let links = page_links(anchors, self.crawl.skip_leading_links);
            let found = links.len();
            state.absorb(links);

            info!(
                "Found {} links on this page. Total unique links so far: {}",
                found,
                state.len()
            );
            pages.push(PageSummary {
                page: state.current_page(),
                matched,
                found,
                total: state.len(),
            });

            let Some(next) = page.query(&self.next_selector)? else {
                info!("Scraping finished. No more pages found.");
                break;
            };

            if state.current_page() >= self.crawl.max_pages {
                warn!(
                    "Stopping after {} pages: page limit reached while a next page was still offered",
                    state.current_page()
                );
                truncated = true;
                break;
            }

            let Some(target) = next.href else {
                warn!("Next-page control has no link target, stopping");
                truncated = true;
                break;
            };

            info!("Navigating to the next page...");
            if let Err(e) = page.navigate(&target).await {
                warn!("Navigation to {} failed, stopping: {}", target, e);
                truncated = true;
                break;
            }
            state.advance();
            self.wait_until_ready(&*page).await?;
        }

        let links = state.into_links();
        info!("All {} unique restaurant links found", links.len());

        Ok(HarvestOutcome {
            links,
            pages,
            truncated,
        })
    }

    /// Settle delay as a floor, then poll until the link selector matches or
    /// the ready timeout runs out.
    async fn wait_until_ready<P>(&self, page: &P) -> Result<(), HarvestError>
    where
        P: Page + ?Sized,
    {
        sleep(self.crawl.settle_delay()).await;

        let deadline = Instant::now() + self.crawl.ready_timeout();
        let interval = self.crawl.poll_interval().max(Duration::from_millis(1));
        loop {
            if !page.query_all(&self.link_selector)?.is_empty() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                warn!(
                    "No restaurant links appeared on {} within {:?}",
                    page.url(),
                    self.crawl.ready_timeout()
                );
                return Ok(());
            }
            debug!("Waiting for restaurant links on {}", page.url());
            sleep(interval).await;
        }
    }
}
