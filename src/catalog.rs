//! Enumerating an artist's track URLs.
//!
//! The `/songs` listing shows a first batch of tracks and an expansion
//! control ("Load More" and friends). Expanding is repeated until the number
//! of track links stops growing, no control is left, or the expansion budget
//! is spent.

use crate::page::{resolve_url, Locator, PageSession, POLL_INTERVAL};
use crate::Result;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;

/// Anchors that point at a track page.
pub const TRACK_LINK_SELECTOR: &str = "a[href*=\"/song/\"]";

/// How catalog enumeration behaves for one artist.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// Visit `/songs` and expand it; otherwise use the artist page as is
    pub full_catalog: bool,
    /// Upper bound on expansion clicks
    pub max_expansions: u32,
    /// Keep at most this many URLs; `0` keeps all
    pub max_tracks: usize,
    pub navigation_timeout: Duration,
    /// How long to wait for links to appear or grow after an expansion
    pub settle_timeout: Duration,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            full_catalog: true,
            max_expansions: 10,
            max_tracks: 0,
            navigation_timeout: Duration::from_secs(60),
            settle_timeout: Duration::from_secs(10),
        }
    }
}

pub fn track_links() -> Locator {
    Locator::css(TRACK_LINK_SELECTOR)
}

/// Controls that reveal more tracks, in the order they are tried.
pub fn expansion_controls() -> Vec<Locator> {
    vec![
        Locator::css("button").has_text("Load More"),
        Locator::css("button").has_text("Show More"),
        Locator::css("button").has_text("View More"),
        Locator::css("a").has_text("Load More"),
        Locator::css("a").has_text("Show More"),
        Locator::css("[class*=\"load-more\"]"),
        Locator::css("[class*=\"show-more\"]"),
    ]
}

pub fn songs_url(artist_url: &str) -> String {
    format!("{}/songs", artist_url.trim_end_matches('/'))
}

/// Every track URL on the current page.
///
/// Hrefs are resolved against `base_url`, duplicates are dropped keeping the
/// first occurrence, and the result is truncated to `max_tracks` when it is
/// positive.
pub async fn collect_track_links<S>(
    session: &S,
    base_url: &str,
    max_tracks: usize,
) -> Result<Vec<String>>
where
    S: PageSession + ?Sized,
{
    let mut seen = HashSet::new();
    let mut urls: Vec<String> = session
        .query(&track_links())
        .await?
        .iter()
        .filter_map(|element| element.attr("href"))
        .filter(|href| href.contains("/song/"))
        .filter_map(|href| resolve_url(base_url, href))
        .filter(|url| seen.insert(url.clone()))
        .collect();

    if max_tracks > 0 && urls.len() > max_tracks {
        log::debug!("Limiting catalog from {} to {max_tracks} tracks", urls.len());
        urls.truncate(max_tracks);
    }
    Ok(urls)
}

async fn link_count<S>(session: &S) -> Result<usize>
where
    S: PageSession + ?Sized,
{
    Ok(session.query(&track_links()).await?.len())
}

/// Wait until there are more than `previous` track links, up to `timeout`.
async fn wait_for_growth<S>(session: &S, previous: usize, timeout: Duration) -> Result<usize>
where
    S: PageSession + ?Sized,
{
    let deadline = Instant::now() + timeout;
    loop {
        let count = link_count(session).await?;
        let now = Instant::now();
        if count > previous || now >= deadline {
            return Ok(count);
        }
        tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
    }
}

/// Click the first expansion control present. Controls that fail to
/// activate are skipped.
async fn expand<S>(session: &mut S) -> bool
where
    S: PageSession + ?Sized,
{
    for control in expansion_controls() {
        match session.activate(&control).await {
            Ok(true) => {
                log::debug!("Expanded catalog with {control}");
                return true;
            }
            Ok(false) => {}
            Err(e) => log::debug!("Could not activate {control}: {e}"),
        }
    }
    false
}

async fn expand_songs_page<S>(
    session: &mut S,
    artist_url: &str,
    options: &CatalogOptions,
) -> Result<Vec<String>>
where
    S: PageSession + ?Sized,
{
    let url = songs_url(artist_url);
    log::info!("Loading catalog from {url}");
    session.navigate(&url, options.navigation_timeout).await?;

    if !session
        .wait_for(&track_links(), options.settle_timeout)
        .await?
    {
        log::debug!("No track links appeared on {url}");
    }

    let mut previous = 0;
    let mut expansions = 0;
    while expansions < options.max_expansions {
        let count = link_count(session).await?;
        log::debug!("Found {count} tracks so far");

        if count == previous && expansions > 0 {
            log::debug!("No more tracks to load");
            break;
        }
        previous = count;

        if !expand(session).await {
            log::debug!("No expansion control left, all tracks loaded");
            break;
        }
        expansions += 1;
        wait_for_growth(session, previous, options.settle_timeout).await?;
    }

    collect_track_links(session, artist_url, options.max_tracks).await
}

/// The track URLs of the artist at `artist_url`.
///
/// When the full listing cannot be loaded, the links on the artist page
/// itself are used instead; if that fails as well the catalog is empty.
/// Never fails.
pub async fn enumerate<S>(session: &mut S, artist_url: &str, options: &CatalogOptions) -> Vec<String>
where
    S: PageSession + ?Sized,
{
    if !options.full_catalog {
        return collect_track_links(session, artist_url, options.max_tracks)
            .await
            .unwrap_or_else(|e| {
                log::warn!("Could not read tracks from {artist_url}: {e}");
                Vec::new()
            });
    }

    match expand_songs_page(session, artist_url, options).await {
        Ok(urls) => urls,
        Err(e) => {
            log::warn!("Error getting full catalog for {artist_url}: {e}");
            log::info!("Falling back to tracks from the artist page");
            match fallback(session, artist_url, options).await {
                Ok(urls) => urls,
                Err(e) => {
                    log::warn!("Fallback catalog for {artist_url} failed: {e}");
                    Vec::new()
                }
            }
        }
    }
}

async fn fallback<S>(session: &mut S, artist_url: &str, options: &CatalogOptions) -> Result<Vec<String>>
where
    S: PageSession + ?Sized,
{
    session.navigate(artist_url, options.navigation_timeout).await?;
    collect_track_links(session, artist_url, options.max_tracks).await
}
