//! Headless Chromium backend.
//!
//! Pages are rendered by a real browser, so scripted "load more" buttons work
//! and waits observe the live DOM. The `headless_chrome` API is blocking; the
//! session is driven one step at a time, so calls are made inline.

use super::{Element, Locator, PageSession, POLL_INTERVAL};
use crate::{Result, ScrapeError};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn browser_error(e: impl Display) -> ScrapeError {
    ScrapeError::Browser(e.to_string())
}

pub struct ChromeSession {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launch a headless browser with a single tab.
    pub fn launch(user_agent: &str) -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((1920, 1080)))
            .args(vec![OsStr::new("--disable-blink-features=AutomationControlled")])
            .build()
            .map_err(browser_error)?;

        let browser = Browser::new(options).map_err(browser_error)?;
        let tab = browser.new_tab().map_err(browser_error)?;
        tab.set_user_agent(user_agent, Some("en-US,en;q=0.9"), None)
            .map_err(browser_error)?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    fn snapshot(element: &headless_chrome::Element<'_>) -> Result<Element> {
        let text = element.get_inner_text().map_err(browser_error)?;
        let attributes = element.get_attributes().map_err(browser_error)?;
        Ok(attributes
            .unwrap_or_default()
            .chunks(2)
            .filter_map(|pair| match pair {
                [name, value] => Some((name.clone(), value.clone())),
                _ => None,
            })
            .fold(Element::new(text), |snapshot, (name, value)| {
                snapshot.with_attribute(name, value)
            }))
    }

    fn matching<'a>(&'a self, locator: &Locator) -> Vec<headless_chrome::Element<'a>> {
        let elements = match self.tab.find_elements(locator.selector()) {
            Ok(elements) => elements,
            Err(e) => {
                log::trace!("No elements for {locator}: {e}");
                return Vec::new();
            }
        };
        elements
            .into_iter()
            .filter(|element| match locator.text_filter() {
                Some(_) => element
                    .get_inner_text()
                    .map(|text| locator.accepts_text(&text))
                    .unwrap_or(false),
                None => true,
            })
            .collect()
    }
}

#[async_trait(?Send)]
impl PageSession for ChromeSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        log::debug!("Loading {url} in browser");
        self.tab.set_default_timeout(timeout);
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn body_text(&self) -> Result<String> {
        self.tab
            .find_element("body")
            .and_then(|body| body.get_inner_text())
            .map_err(browser_error)
    }

    async fn title(&self) -> Result<String> {
        self.tab.get_title().map_err(browser_error)
    }

    async fn query(&self, locator: &Locator) -> Result<Vec<Element>> {
        let mut snapshots = Vec::new();
        for element in self.matching(locator) {
            match locator.descendant_selector() {
                Some(descendant) => {
                    for inner in element.find_elements(descendant).unwrap_or_default() {
                        snapshots.push(Self::snapshot(&inner)?);
                    }
                }
                None => snapshots.push(Self::snapshot(&element)?),
            }
        }
        Ok(snapshots)
    }

    async fn activate(&mut self, locator: &Locator) -> Result<bool> {
        let Some(element) = self.matching(locator).into_iter().next() else {
            return Ok(false);
        };
        element.click().map_err(browser_error)?;
        log::debug!("Clicked {locator}");
        Ok(true)
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<bool> {
        if locator.text_filter().is_none() && locator.descendant_selector().is_none() {
            return Ok(self
                .tab
                .wait_for_element_with_custom_timeout(locator.selector(), timeout)
                .is_ok());
        }

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
