//! The page-rendering seam.
//!
//! Field extraction only ever sees a page through [`PageSession`]: its
//! visible text, its title and snapshots of the elements a [`Locator`]
//! matches. Backends decide how pages are fetched and rendered.

#[cfg(feature = "chrome")]
pub mod chrome;
pub mod document;
pub mod html;
pub mod http;

use crate::Result;
use async_trait::async_trait;
use http_types::Url;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// How often [`PageSession::wait_for`] re-checks the page by default.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Resolve `href` against `base`, returning an absolute URL.
///
/// Fragment-only and `javascript:` links resolve to nothing.
///
/// ```rust
/// use audiomack_metrics::resolve_url;
///
/// assert_eq!(
///     resolve_url("https://audiomack.com", "/nahj/song/ballon-dor").as_deref(),
///     Some("https://audiomack.com/nahj/song/ballon-dor")
/// );
/// assert_eq!(resolve_url("https://audiomack.com", "#"), None);
/// ```
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(|url| url.to_string())
}

/// Describes which elements to look up on a page.
///
/// A locator is a CSS selector, optionally narrowed to elements whose visible
/// text contains a string (case-insensitive), optionally followed by a
/// descendant selector evaluated inside each match.
///
/// ```rust
/// use audiomack_metrics::Locator;
///
/// let release_date = Locator::css("li.SinglePageMusicCardInfo-row")
///     .has_text("Release Date")
///     .descendant(".SinglePageMusicCardInfo-value span span");
///
/// assert_eq!(
///     release_date.to_string(),
///     "li.SinglePageMusicCardInfo-row:has-text(\"Release Date\") .SinglePageMusicCardInfo-value span span"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    css: String,
    has_text: Option<String>,
    descendant: Option<String>,
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            css: selector.into(),
            has_text: None,
            descendant: None,
        }
    }

    /// Keep only elements whose text contains `text`, ignoring case.
    pub fn has_text(mut self, text: impl Into<String>) -> Self {
        self.has_text = Some(text.into());
        self
    }

    /// Select `selector` inside each matched element instead of the element itself.
    pub fn descendant(mut self, selector: impl Into<String>) -> Self {
        self.descendant = Some(selector.into());
        self
    }

    pub fn selector(&self) -> &str {
        &self.css
    }

    pub fn text_filter(&self) -> Option<&str> {
        self.has_text.as_deref()
    }

    pub fn descendant_selector(&self) -> Option<&str> {
        self.descendant.as_deref()
    }

    /// Whether an element with this visible text passes the text filter.
    pub fn accepts_text(&self, text: &str) -> bool {
        match &self.has_text {
            Some(needle) => text.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css)?;
        if let Some(text) = &self.has_text {
            write!(f, ":has-text(\"{text}\")")?;
        }
        if let Some(descendant) = &self.descendant {
            write!(f, " {descendant}")?;
        }
        Ok(())
    }
}

/// A snapshot of one element: its visible text and its attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    text: String,
    attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Visible text, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A rendered page that can be navigated, read and interacted with.
///
/// Sessions are driven sequentially: one navigation at a time, each followed
/// by any number of reads. Implementations must treat a navigation that
/// exceeds its timeout as an error for that page only.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides `MockPageSession`
/// that implements this trait using the `mockall` library.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait PageSession {
    /// Load `url`, replacing the current page.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// All visible text of the page body, one rendered line per line.
    async fn body_text(&self) -> Result<String>;

    /// The page's `<title>`.
    async fn title(&self) -> Result<String>;

    /// Snapshots of every element matching `locator`, in document order.
    async fn query(&self, locator: &Locator) -> Result<Vec<Element>>;

    /// Activate (click) the first element matching `locator`.
    ///
    /// Returns `Ok(false)` when there is nothing that can be activated.
    async fn activate(&mut self, locator: &Locator) -> Result<bool>;

    /// Wait until at least one element matches `locator`.
    ///
    /// Returns `Ok(false)` if `timeout` expires first.
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.query(locator).await?.is_empty() {
                return Ok(true);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}
