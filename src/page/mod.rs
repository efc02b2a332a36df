//! Page capability consumed by the harvester and the normalizer.
//!
//! A [`Page`] answers CSS selector queries with owned [`PageElement`]s and can
//! be pointed at another URL. [`HtmlPage`] implements it over fetched markup;
//! tests and other drivers can provide their own implementations.

pub mod fetchers;

use crate::error::HarvestError;
use async_trait::async_trait;
use fetchers::Fetcher;
use log::debug;
use reqwest::Url;
use scraper::{Html, Selector};

/// Snapshot of one matched element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageElement {
    /// Concatenated text content, untrimmed
    pub text: String,
    /// Absolute link target for elements carrying an `href`
    pub href: Option<String>,
}

impl PageElement {
    pub fn new(text: impl Into<String>, href: Option<String>) -> Self {
        Self {
            text: text.into(),
            href,
        }
    }

    /// Trimmed text, or `None` when only whitespace remains
    pub fn trimmed_text(&self) -> Option<String> {
        let text = self.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

#[async_trait]
pub trait Page: Send {
    /// URL of the currently loaded document
    fn url(&self) -> &str;

    /// All elements matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Result<Vec<PageElement>, HarvestError>;

    /// First element matching `selector`
    fn query(&self, selector: &str) -> Result<Option<PageElement>, HarvestError> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    /// Load `url` as the current document
    async fn navigate(&mut self, url: &str) -> Result<(), HarvestError>;
}

/// Page backed by static markup, loaded through a [`Fetcher`].
pub struct HtmlPage {
    fetcher: Option<Box<dyn Fetcher>>,
    url: String,
    html: String,
}

impl HtmlPage {
    /// Empty page that loads documents with `fetcher` on navigation
    pub fn new(fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            fetcher: Some(fetcher),
            url: String::new(),
            html: String::new(),
        }
    }

    /// Fetch `url` and return the loaded page
    pub async fn open(fetcher: Box<dyn Fetcher>, url: &str) -> Result<Self, HarvestError> {
        let mut page = Self::new(fetcher);
        page.navigate(url).await?;
        Ok(page)
    }

    /// In-memory document; navigation is not available
    pub fn from_html(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            fetcher: None,
            url: url.into(),
            html: html.into(),
        }
    }

    fn resolve(&self, href: &str) -> String {
        Url::parse(&self.url)
            .and_then(|base| base.join(href))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string())
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, HarvestError> {
    Selector::parse(selector).map_err(|e| HarvestError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

#[async_trait]
impl Page for HtmlPage {
    fn url(&self) -> &str {
        &self.url
    }

    fn query_all(&self, selector: &str) -> Result<Vec<PageElement>, HarvestError> {
        let parsed = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        let elements: Vec<PageElement> = document
            .select(&parsed)
            .map(|el| PageElement {
                text: el.text().collect(),
                href: el.value().attr("href").map(|href| self.resolve(href)),
            })
            .collect();
        debug!("HtmlPage: '{}' matched {} elements", selector, elements.len());
        Ok(elements)
    }

    async fn navigate(&mut self, url: &str) -> Result<(), HarvestError> {
        let fetcher = self.fetcher.as_ref().ok_or_else(|| {
            HarvestError::NavigationError(format!("page has no fetcher to load {url}"))
        })?;
        let target = if self.url.is_empty() {
            Url::parse(url).map_err(|_| HarvestError::InvalidUrl(url.to_string()))?
        } else {
            Url::parse(&self.url)
                .and_then(|base| base.join(url))
                .map_err(|_| HarvestError::InvalidUrl(url.to_string()))?
        };

        self.html = fetcher.fetch(target.as_str()).await?;
        self.url = target.to_string();
        Ok(())
    }
}
