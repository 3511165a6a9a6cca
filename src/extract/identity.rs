//! Display names for artists and titles for tracks.
//!
//! Unlike the other extractors these always produce a value: the URL slug is
//! the last resort and never fails.

use super::first_text;
use crate::normalize::UNKNOWN;
use crate::page::{Locator, PageSession};
use std::borrow::Cow;

const PLACEHOLDERS: [&str; 2] = ["Unknown", UNKNOWN];

/// Which part of a `<title>` holds the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSegment {
    /// `Name - Listen Free on Audiomack`
    Leading,
    /// `Artist - Track | Audiomack`
    Trailing,
}

/// Pull a name out of a page title.
///
/// ```rust
/// use audiomack_metrics::extract::identity::{name_from_title, TitleSegment};
///
/// assert_eq!(
///     name_from_title("Nahj - Listen Free on Audiomack", TitleSegment::Leading).as_deref(),
///     Some("Nahj")
/// );
/// assert_eq!(
///     name_from_title("Nahj - Ballon d'Or | Audiomack", TitleSegment::Trailing).as_deref(),
///     Some("Ballon d'Or")
/// );
/// assert_eq!(name_from_title("Audiomack", TitleSegment::Leading), None);
/// ```
pub fn name_from_title(title: &str, segment: TitleSegment) -> Option<String> {
    let parts: Vec<&str> = title.split(" - ").collect();
    if parts.len() < 2 {
        return None;
    }
    let name = match segment {
        TitleSegment::Leading => parts[0],
        TitleSegment::Trailing => parts[1].split('|').next().unwrap_or_default(),
    };
    Some(name.trim().to_string())
}

/// Turn the last path segment of `url` into a readable name.
///
/// ```rust
/// use audiomack_metrics::extract::identity::name_from_url;
///
/// assert_eq!(name_from_url("https://audiomack.com/will-flash"), "Will Flash");
/// assert_eq!(
///     name_from_url("https://audiomack.com/nahj/song/ballon_dor%20remix/"),
///     "Ballon Dor Remix"
/// );
/// ```
pub fn name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let slug = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
    let decoded = urlencoding::decode(slug).unwrap_or(Cow::Borrowed(slug));

    let name = decoded
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        url.to_string()
    } else {
        name
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// A name field and the ordered ways to find it.
#[derive(Debug, Clone)]
pub struct IdentityField {
    name: &'static str,
    canonical: Vec<Locator>,
    heading: Locator,
    title_segment: TitleSegment,
    min_chars: usize,
}

impl IdentityField {
    pub fn new(name: &'static str, title_segment: TitleSegment) -> Self {
        Self {
            name,
            canonical: Vec::new(),
            heading: Locator::css("h1"),
            title_segment,
            min_chars: 1,
        }
    }

    pub fn with_canonical(mut self, locator: Locator) -> Self {
        self.canonical.push(locator);
        self
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn artist_name() -> Self {
        Self::new("artist_name", TitleSegment::Leading)
            .with_canonical(Locator::css("a.ArtistSidebar-name-link"))
    }

    pub fn track_title() -> Self {
        Self::new("track_title", TitleSegment::Trailing).with_min_chars(2)
    }

    /// Whether `value` can stand as a name.
    pub fn is_usable(&self, value: &str) -> bool {
        let value = value.trim();
        !value.is_empty()
            && !PLACEHOLDERS.iter().any(|p| value.eq_ignore_ascii_case(p))
            && value.chars().count() >= self.min_chars
    }

    /// Resolve the name shown on `page`, which was loaded from `url`.
    pub async fn extract<S>(&self, page: &S, url: &str) -> String
    where
        S: PageSession + ?Sized,
    {
        for locator in &self.canonical {
            if let Some(name) = first_text(page, locator, |text| self.is_usable(text)).await {
                log::debug!("Found {} '{}' in {}", self.name, name, locator);
                return name;
            }
        }

        let heading = match page.query(&self.heading).await {
            Ok(elements) => elements.first().map(|e| e.text().to_string()),
            Err(e) => {
                log::debug!("Heading lookup for {} failed: {}", self.name, e);
                None
            }
        };
        if let Some(name) = heading.filter(|name| self.is_usable(name)) {
            log::debug!("Found {} '{}' in heading", self.name, name);
            return name;
        }

        let title = page.title().await.ok();
        if let Some(name) = title
            .as_deref()
            .and_then(|title| name_from_title(title, self.title_segment))
            .filter(|name| self.is_usable(name))
        {
            log::debug!("Found {} '{}' in page title", self.name, name);
            return name;
        }

        let name = name_from_url(url);
        log::debug!("Using {} '{}' from URL", self.name, name);
        name
    }
}
