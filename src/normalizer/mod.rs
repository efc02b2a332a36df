//! Page -> [`RestaurantRecord`] normalization.
//!
//! The embedded JSON-LD block is authoritative when present; otherwise a
//! shallow markup fallback fills the name, address caption and phone.
//! Features, description and cuisine tags always come from the markup.

pub mod cuisine;
mod json_ld;
mod markup;

use crate::config::{HarvestConfig, SelectorConfig};
use crate::error::HarvestError;
use crate::model::RestaurantRecord;
use crate::page::Page;
use log::{debug, warn};

pub use cuisine::{filter_cuisine_tags, primary_and_second};

pub struct RecordNormalizer {
    selectors: SelectorConfig,
}

impl RecordNormalizer {
    pub fn new(selectors: SelectorConfig) -> Self {
        Self { selectors }
    }

    pub fn from_config(config: &HarvestConfig) -> Self {
        Self::new(config.selectors.clone())
    }

    /// Build the canonical record for the page currently loaded.
    ///
    /// # Errors
    /// Returns [`HarvestError::MalformedStructuredData`] when the page carries
    /// a food-establishment block that cannot be read. Missing elements never
    /// fail; they leave the field unset.
    pub fn normalize<P>(&self, page: &P) -> Result<RestaurantRecord, HarvestError>
    where
        P: Page + ?Sized,
    {
        let selectors = &self.selectors;

        let mut record = match json_ld::extract(page, &selectors.structured_data)? {
            Some(establishment) => {
                debug!("Using structured data for {}", page.url());
                let mut record = establishment.into_record();
                record.website = markup::first_href(page, &selectors.website_button)?;
                record
            }
            None => {
                warn!(
                    "Could not find structured JSON-LD data on {}. Falling back to manual scraping.",
                    page.url()
                );
                markup::fallback_record(page, selectors)?
            }
        };

        record.features = markup::all_texts(page, &selectors.features)?;
        record.description = markup::first_text(page, &selectors.description)?;

        let tags = markup::all_texts(page, &selectors.cuisine_tags)?;
        let (primary, second) = primary_and_second(&tags);
        record.cuisine_primary = primary;
        record.cuisine_second = second;

        Ok(record)
    }
}
