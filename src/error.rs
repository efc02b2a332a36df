use thiserror::Error;

/// Errors that can occur while harvesting, normalizing or aggregating restaurants
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Failed to fetch a page over HTTP
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The rendering service answered with a non-success status
    #[error("Page fetch failed with status {status} for {url}")]
    FetchStatus { url: String, status: u16 },

    /// An embedded structured-data block was found but could not be read
    #[error("Malformed structured data: {0}")]
    MalformedStructuredData(String),

    /// A configured CSS selector does not parse
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A link could not be resolved to an absolute URL
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    /// Navigation was requested before any page was loaded
    #[error("Navigation error: {0}")]
    NavigationError(String),

    /// File system failure
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Record serialization failure
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
