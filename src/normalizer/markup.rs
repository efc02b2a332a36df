use crate::config::SelectorConfig;
use crate::error::HarvestError;
use crate::model::{Address, RestaurantRecord};
use crate::page::Page;

/// Trimmed text of the first match
pub(crate) fn first_text<P>(page: &P, selector: &str) -> Result<Option<String>, HarvestError>
where
    P: Page + ?Sized,
{
    Ok(page.query(selector)?.and_then(|el| el.trimmed_text()))
}

/// Trimmed, non-empty texts of every match
pub(crate) fn all_texts<P>(page: &P, selector: &str) -> Result<Vec<String>, HarvestError>
where
    P: Page + ?Sized,
{
    Ok(page
        .query_all(selector)?
        .iter()
        .filter_map(|el| el.trimmed_text())
        .collect())
}

pub(crate) fn first_href<P>(page: &P, selector: &str) -> Result<Option<String>, HarvestError>
where
    P: Page + ?Sized,
{
    Ok(page.query(selector)?.and_then(|el| el.href))
}

/// Shallow extraction for pages without a structured block: name, the
/// address caption and the phone link. Everything else stays unset.
pub(crate) fn fallback_record<P>(
    page: &P,
    selectors: &SelectorConfig,
) -> Result<RestaurantRecord, HarvestError>
where
    P: Page + ?Sized,
{
    Ok(RestaurantRecord {
        name: first_text(page, &selectors.heading)?,
        address: Address::from_full(first_text(page, &selectors.map_link_caption)?),
        phone: first_text(page, &selectors.phone_link)?,
        ..Default::default()
    })
}
