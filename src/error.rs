use thiserror::Error;

/// Error types for page collection and dataset handling.
///
/// Field extraction never produces these: a strategy that fails simply falls
/// through to the next one. Errors only surface at page granularity
/// (navigation, rendering) and at the dataset boundary (CSV and file I/O).
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use audiomack_metrics::{HtmlSession, PageSession, ScrapeError, StaticPages};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let mut session = HtmlSession::new(StaticPages::new(), "https://audiomack.com");
///
/// match session.navigate("https://audiomack.com/nahj", Duration::from_secs(60)).await {
///     Ok(()) => println!("Page ready"),
///     Err(ScrapeError::Timeout { url, seconds }) => {
///         eprintln!("{url} did not load within {seconds}s");
///     }
///     Err(ScrapeError::RateLimit { retry_after }) => {
///         eprintln!("Rate limited, retry in {retry_after} seconds");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # });
/// ```
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// HTTP/network related errors.
    ///
    /// Connection failures, DNS errors, unexpected status codes and bodies
    /// that cannot be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A page could not be navigated to or rendered.
    #[error("Failed to load {url}: {message}")]
    Navigation {
        /// The page that failed
        url: String,
        /// What went wrong
        message: String,
    },

    /// Navigation did not finish within its timeout.
    #[error("Timed out after {seconds}s loading {url}")]
    Timeout {
        /// The page that timed out
        url: String,
        /// The timeout that expired
        seconds: u64,
    },

    /// Rate limiting from the site.
    ///
    /// The `retry_after` field indicates how many seconds to wait before
    /// the next request attempt.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimit {
        /// Number of seconds to wait before retrying
        retry_after: u64,
    },

    /// Failed to parse a page or a value read from it.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A CSS selector could not be compiled.
    #[error("Invalid selector: {0}")]
    Selector(String),

    /// The headless browser reported an error.
    #[error("Browser error: {0}")]
    Browser(String),

    /// Invalid run configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing a dataset failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading a configuration file failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
