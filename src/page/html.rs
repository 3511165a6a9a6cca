//! A [`PageSession`] over plain HTML documents.

use super::document::HtmlPage;
use super::{resolve_url, Element, Locator, PageSession};
use crate::{Result, ScrapeError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Something that can produce the HTML source of a URL.
#[async_trait(?Send)]
pub trait Fetch {
    async fn fetch(&mut self, url: &str, timeout: Duration) -> Result<String>;
}

/// Pages served from memory, keyed by URL.
///
/// Used for offline replays and tests. Unknown URLs fail like an unreachable
/// page would.
#[derive(Debug, Clone, Default)]
pub struct StaticPages {
    pages: HashMap<String, String>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.insert(url, html);
        self
    }

    pub fn insert(&mut self, url: &str, html: impl Into<String>) {
        self.pages
            .insert(url.trim_end_matches('/').to_string(), html.into());
    }
}

#[async_trait(?Send)]
impl Fetch for StaticPages {
    async fn fetch(&mut self, url: &str, _timeout: Duration) -> Result<String> {
        self.pages
            .get(url.trim_end_matches('/'))
            .cloned()
            .ok_or_else(|| ScrapeError::Navigation {
                url: url.to_string(),
                message: "page not found".to_string(),
            })
    }
}

/// Session that renders fetched HTML without running scripts.
///
/// Documents are complete when they arrive, so waits resolve immediately.
/// Expansion controls can only be activated when they are links: the linked
/// document is fetched and appended to the current page. Each link is
/// followed at most once per page.
pub struct HtmlSession<F> {
    fetcher: F,
    base_url: String,
    page: Option<HtmlPage>,
    followed: HashSet<String>,
    timeout: Duration,
}

impl<F: Fetch> HtmlSession<F> {
    pub fn new(fetcher: F, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            page: None,
            followed: HashSet::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The currently loaded page, if any.
    pub fn page(&self) -> Option<&HtmlPage> {
        self.page.as_ref()
    }

    fn current(&self) -> Result<&HtmlPage> {
        self.page.as_ref().ok_or_else(|| ScrapeError::Navigation {
            url: self.base_url.clone(),
            message: "no page has been loaded".to_string(),
        })
    }
}

#[async_trait(?Send)]
impl<F: Fetch> PageSession for HtmlSession<F> {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        log::debug!("Loading {url}");
        let html = self.fetcher.fetch(url, timeout).await?;
        self.page = Some(HtmlPage::parse(url, html));
        self.followed.clear();
        self.timeout = timeout;
        Ok(())
    }

    async fn body_text(&self) -> Result<String> {
        Ok(self.current()?.body_text())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.current()?.title())
    }

    async fn query(&self, locator: &Locator) -> Result<Vec<Element>> {
        self.current()?.select(locator)
    }

    async fn activate(&mut self, locator: &Locator) -> Result<bool> {
        let page = self.current()?;
        let target = page
            .select(locator)?
            .iter()
            .filter_map(|element| element.attr("href"))
            .filter_map(|href| resolve_url(page.url(), href))
            .find(|url| !self.followed.contains(url));

        let Some(target) = target else {
            log::debug!("Nothing to follow for {locator}");
            return Ok(false);
        };

        log::debug!("Following {locator} to {target}");
        let html = self.fetcher.fetch(&target, self.timeout).await?;
        if let Some(page) = self.page.as_mut() {
            page.append(&html);
        }
        self.followed.insert(target);
        Ok(true)
    }

    async fn wait_for(&self, locator: &Locator, _timeout: Duration) -> Result<bool> {
        Ok(!self.query(locator).await?.is_empty())
    }
}
