//! Free-text dates such as "March 5, 2021".
//!
//! Dates are returned exactly as displayed; nothing here parses them.

use super::first_text;
use crate::page::{Locator, PageSession};
use regex::Regex;
use std::sync::LazyLock;

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Lines searched after a label line, not counting the label line itself.
pub const LABEL_WINDOW: usize = 4;

static MONTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\s+\d{{1,2}},?\s+\d{{4}}", MONTHS.join("|"))).unwrap()
});

/// Whether `text` names one of the twelve English months.
pub fn mentions_month(text: &str) -> bool {
    MONTHS.iter().any(|month| text.contains(month))
}

/// The first `<Month> <day>[,] <year>` found near a label line.
///
/// Every line containing any of `labels` (ignoring case) is tried in order;
/// for each, that line plus the following [`LABEL_WINDOW`] lines are searched.
///
/// ```rust
/// use audiomack_metrics::extract::date::date_after_label;
///
/// let text = "Genre\nAfrobeats\nRelease Date\nMarch 5, 2021\nPlays";
/// assert_eq!(
///     date_after_label(text, &["Release Date"]).as_deref(),
///     Some("March 5, 2021")
/// );
/// ```
pub fn date_after_label(text: &str, labels: &[&str]) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let labels: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.to_lowercase();
            labels.iter().any(|label| line.contains(label))
        })
        .find_map(|(start, _)| {
            let end = (start + LABEL_WINDOW + 1).min(lines.len());
            lines[start..end].iter().find_map(|line| MONTH_DATE.find(line))
        })
        .map(|m| m.as_str().to_string())
}

/// A date field and the ordered ways to find it.
#[derive(Debug, Clone)]
pub struct DateField {
    name: &'static str,
    primary: Option<Locator>,
    candidates: Option<Locator>,
    labels: Vec<&'static str>,
}

impl DateField {
    pub fn new(name: &'static str, labels: &[&'static str]) -> Self {
        Self {
            name,
            primary: None,
            candidates: None,
            labels: labels.to_vec(),
        }
    }

    /// A locator whose first non-empty text is taken verbatim.
    pub fn with_primary(mut self, locator: Locator) -> Self {
        self.primary = Some(locator);
        self
    }

    /// A locator whose elements are accepted only when they mention a month.
    pub fn with_candidates(mut self, locator: Locator) -> Self {
        self.candidates = Some(locator);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn release_date() -> Self {
        Self::new("release_date", &["Release Date"])
            .with_primary(
                Locator::css("li.SinglePageMusicCardInfo-row")
                    .has_text("Release Date")
                    .descendant(".SinglePageMusicCardInfo-value span span"),
            )
            .with_candidates(Locator::css(".SinglePageMusicCardInfo-row .TooltipTitle span"))
    }

    pub fn member_since() -> Self {
        Self::new("member_since", &["Member since", "Joined"]).with_candidates(Locator::css(
            ".ArtistSidebar-info time, .artist-info time, [class*=\"sidebar\"] time, [class*=\"Sidebar\"] time",
        ))
    }

    /// Locate the date on `page`, falling back to its visible `text`.
    pub async fn extract<S>(&self, page: &S, text: &str) -> Option<String>
    where
        S: PageSession + ?Sized,
    {
        if let Some(primary) = &self.primary {
            if let Some(date) = first_text(page, primary, |_| true).await {
                log::debug!("Found {} '{}' in info panel", self.name, date);
                return Some(date);
            }
        }

        if let Some(candidates) = &self.candidates {
            if let Some(date) = first_text(page, candidates, mentions_month).await {
                log::debug!("Found {} '{}' in {}", self.name, date, candidates);
                return Some(date);
            }
        }

        let date = date_after_label(text, &self.labels)?;
        log::debug!("Found {} '{}' after label", self.name, date);
        Some(date)
    }
}
