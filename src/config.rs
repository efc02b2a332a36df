use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main harvest configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct HarvestConfig {
    /// Pagination and page-load timing
    #[serde(default)]
    pub crawl: CrawlConfig,
    /// Site-specific CSS selectors
    #[serde(default)]
    pub selectors: SelectorConfig,
    /// Default file locations
    #[serde(default)]
    pub output: OutputConfig,
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            selectors: SelectorConfig::default(),
            output: OutputConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Timing and bounds for the page-by-page crawl
#[derive(Debug, Deserialize, Clone)]
pub struct CrawlConfig {
    /// Minimum wait after triggering navigation, in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Upper bound on listing pages visited in one harvest
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// How long to poll for the link selector after the settle delay, in milliseconds
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
    /// Interval between readiness polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Leading link matches reserved for promoted listings
    #[serde(default = "default_skip_leading_links")]
    pub skip_leading_links: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            max_pages: default_max_pages(),
            ready_timeout_ms: default_ready_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            skip_leading_links: default_skip_leading_links(),
        }
    }
}

impl CrawlConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// CSS selectors for the review site's markup.
///
/// The defaults track the site's current class names; they are expected to
/// drift and can be overridden without a rebuild.
#[derive(Debug, Deserialize, Clone)]
pub struct SelectorConfig {
    #[serde(default = "default_restaurant_link")]
    pub restaurant_link: String,
    #[serde(default = "default_next_page")]
    pub next_page: String,
    #[serde(default = "default_structured_data")]
    pub structured_data: String,
    #[serde(default = "default_heading")]
    pub heading: String,
    #[serde(default = "default_map_link_caption")]
    pub map_link_caption: String,
    #[serde(default = "default_phone_link")]
    pub phone_link: String,
    #[serde(default = "default_website_button")]
    pub website_button: String,
    #[serde(default = "default_features")]
    pub features: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_cuisine_tags")]
    pub cuisine_tags: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            restaurant_link: default_restaurant_link(),
            next_page: default_next_page(),
            structured_data: default_structured_data(),
            heading: default_heading(),
            map_link_caption: default_map_link_caption(),
            phone_link: default_phone_link(),
            website_button: default_website_button(),
            features: default_features(),
            description: default_description(),
            cuisine_tags: default_cuisine_tags(),
        }
    }
}

/// Default locations for the files each stage produces
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_links_file")]
    pub links_file: String,
    #[serde(default = "default_records_dir")]
    pub records_dir: String,
    #[serde(default = "default_table_file")]
    pub table_file: String,
    /// Extension (without the dot) of record files read by the aggregator
    #[serde(default = "default_record_extension")]
    pub record_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            links_file: default_links_file(),
            records_dir: default_records_dir(),
            table_file: default_table_file(),
            record_extension: default_record_extension(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_settle_delay_ms() -> u64 {
    3000
}

fn default_max_pages() -> usize {
    500
}

fn default_ready_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_skip_leading_links() -> usize {
    4
}

fn default_restaurant_link() -> String {
    "a.BMQDV.ukgoS".to_string()
}

fn default_next_page() -> String {
    r#"a[data-smoke-attr="pagination-next-arrow"]"#.to_string()
}

fn default_structured_data() -> String {
    r#"script[type="application/ld+json"]"#.to_string()
}

fn default_heading() -> String {
    "h1.biGQs._P.fiohW.hzzSG.CIuBz".to_string()
}

fn default_map_link_caption() -> String {
    r#"[data-automation="restaurantsMapLinkOnName"] span"#.to_string()
}

fn default_phone_link() -> String {
    r#"a[href^="tel:"]"#.to_string()
}

fn default_website_button() -> String {
    r#"[data-automation="restaurantsWebsiteButton"]"#.to_string()
}

fn default_features() -> String {
    ".iPiKu.f.e.Q1.RpLvz .rREKL .biGQs._P.pZUbB.avBIb.AWdfh".to_string()
}

fn default_description() -> String {
    "div.pZUbB.avBIb.AWdfh".to_string()
}

fn default_cuisine_tags() -> String {
    "span.bTeln span.AWdfh".to_string()
}

fn default_links_file() -> String {
    "restaurantes_links.txt".to_string()
}

fn default_records_dir() -> String {
    "restaurants".to_string()
}

fn default_table_file() -> String {
    "restaurants.csv".to_string()
}

fn default_record_extension() -> String {
    "json".to_string()
}

impl HarvestConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RESTAURANT_HARVEST__ prefix
    /// 2. harvest.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RESTAURANT_HARVEST__CRAWL__SETTLE_DELAY_MS
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Load configuration from file and environment variables
///
/// See [`HarvestConfig::load`] for the source priority.
pub fn load_config() -> Result<HarvestConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("harvest").required(false))
        // Use double underscore for nested: RESTAURANT_HARVEST__CRAWL__MAX_PAGES
        .add_source(
            Environment::with_prefix("RESTAURANT_HARVEST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
