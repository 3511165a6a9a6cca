//! Absolute image URLs: artist avatars and track artwork.

use crate::page::{Element, Locator, PageSession};
use regex::Regex;
use std::sync::LazyLock;

/// Attributes checked for an image URL, in order.
pub const SOURCE_ATTRIBUTES: [&str; 2] = ["src", "data-src"];

static STYLE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(\s*['"]?([^'")]+?)['"]?\s*\)"#).expect("style url pattern is valid"));

/// Only absolute HTTP(S) URLs are kept.
pub fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// The first absolute image URL carried by `element`.
///
/// `src` and `data-src` are checked before any `url(...)` inside an inline
/// `style`.
///
/// ```rust
/// use audiomack_metrics::extract::image::image_url;
/// use audiomack_metrics::page::Element;
///
/// let styled = Element::new("").with_attribute("style", "background-image:url('https://x/y.jpg')");
/// assert_eq!(image_url(&styled).as_deref(), Some("https://x/y.jpg"));
///
/// let relative = Element::new("").with_attribute("src", "/img.jpg");
/// assert_eq!(image_url(&relative), None);
/// ```
pub fn image_url(element: &Element) -> Option<String> {
    let from_style = element
        .attr("style")
        .and_then(|style| STYLE_URL.captures(style))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim());

    SOURCE_ATTRIBUTES
        .iter()
        .filter_map(|name| element.attr(name).map(str::trim))
        .chain(from_style)
        .find(|url| is_absolute(url))
        .map(str::to_string)
}

/// An image field and the ordered locators that may carry it.
#[derive(Debug, Clone)]
pub struct ImageField {
    name: &'static str,
    candidates: Vec<Locator>,
}

impl ImageField {
    pub fn new(name: &'static str, candidates: Vec<Locator>) -> Self {
        Self { name, candidates }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn profile_image() -> Self {
        Self::new(
            "profile_image",
            [
                ".ArtistSidebar-avatar img",
                ".ArtistSidebar img",
                "img[class*=\"Avatar\"]",
                "img[class*=\"avatar\"]",
                "[class*=\"Avatar\"]",
                "[class*=\"avatar\"]",
            ]
            .into_iter()
            .map(Locator::css)
            .collect(),
        )
    }

    pub fn cover_art() -> Self {
        Self::new(
            "album_art",
            [
                ".SinglePageMusicCard img",
                "img[class*=\"Artwork\"]",
                "img[class*=\"artwork\"]",
                "img[class*=\"cover\"]",
                "[class*=\"Artwork\"]",
                "[class*=\"artwork\"]",
            ]
            .into_iter()
            .map(Locator::css)
            .collect(),
        )
    }

    /// The first absolute image URL among the candidate elements.
    ///
    /// Only the first element of each locator is considered.
    pub async fn extract<S>(&self, page: &S) -> Option<String>
    where
        S: PageSession + ?Sized,
    {
        for locator in &self.candidates {
            let first = match page.query(locator).await {
                Ok(elements) => elements.into_iter().next(),
                Err(e) => {
                    log::debug!("Image lookup {} failed: {}", locator, e);
                    None
                }
            };
            if let Some(url) = first.as_ref().and_then(image_url) {
                log::debug!("Found {} {} via {}", self.name, url, locator);
                return Some(url);
            }
        }
        None
    }
}
