//! Best-effort field extraction.
//!
//! Every field is located by an ordered list of strategies; the first one
//! that yields a usable value wins and the rest are never tried. A strategy
//! that errors (a failed query, a missing title) counts as a miss, so
//! extraction itself never fails and an exhausted field is
//! [`Field::Unknown`].

pub mod date;
pub mod identity;
pub mod image;
pub mod metric;

pub use date::DateField;
pub use identity::{IdentityField, TitleSegment};
pub use image::ImageField;
pub use metric::{LineContext, MetricField};

use crate::page::{Locator, PageSession};
use crate::types::{collection_time, ArtistRecord, Field, TrackRecord};

/// Trimmed text of the first element matching `locator` that `accept` allows.
pub(crate) async fn first_text<S, P>(page: &S, locator: &Locator, accept: P) -> Option<String>
where
    S: PageSession + ?Sized,
    P: Fn(&str) -> bool,
{
    match page.query(locator).await {
        Ok(elements) => elements
            .iter()
            .map(|element| element.text())
            .find(|text| !text.is_empty() && accept(*text))
            .map(str::to_string),
        Err(e) => {
            log::debug!("Lookup {} failed: {}", locator, e);
            None
        }
    }
}

/// How every artist-level field is located.
#[derive(Debug, Clone)]
pub struct ArtistFields {
    pub name: IdentityField,
    pub profile_image: ImageField,
    pub followers: MetricField,
    pub total_plays: MetricField,
    pub monthly_listeners: MetricField,
    pub member_since: DateField,
}

impl Default for ArtistFields {
    fn default() -> Self {
        Self {
            name: IdentityField::artist_name(),
            profile_image: ImageField::profile_image(),
            followers: MetricField::followers(),
            total_plays: MetricField::total_account_plays(),
            monthly_listeners: MetricField::monthly_listeners(),
            member_since: DateField::member_since(),
        }
    }
}

impl ArtistFields {
    /// Build the record for an artist page already loaded in `page`.
    ///
    /// `text` is the page's visible text. `tracks_found` is left at zero.
    pub async fn extract<S>(&self, page: &S, url: &str, text: &str) -> ArtistRecord
    where
        S: PageSession + ?Sized,
    {
        let name = self.name.extract(page, url).await;
        ArtistRecord {
            profile_image: Field::from(self.profile_image.extract(page).await),
            followers: Field::from(self.followers.extract(text)),
            total_plays: Field::from(self.total_plays.extract(text)),
            monthly_listeners: Field::from(self.monthly_listeners.extract(text)),
            member_since: Field::from(self.member_since.extract(page, text).await),
            ..ArtistRecord::new(url, name)
        }
    }
}

/// How every track-level field is located.
#[derive(Debug, Clone)]
pub struct TrackFields {
    pub title: IdentityField,
    pub album_art: ImageField,
    pub plays: MetricField,
    pub likes: MetricField,
    pub reposts: MetricField,
    pub playlist_adds: MetricField,
    pub release_date: DateField,
}

impl Default for TrackFields {
    fn default() -> Self {
        Self {
            title: IdentityField::track_title(),
            album_art: ImageField::cover_art(),
            plays: MetricField::plays(),
            likes: MetricField::likes(),
            reposts: MetricField::reposts(),
            playlist_adds: MetricField::playlist_adds(),
            release_date: DateField::release_date(),
        }
    }
}

impl TrackFields {
    /// Build the record for a track page already loaded in `page`.
    pub async fn extract<S>(
        &self,
        page: &S,
        url: &str,
        text: &str,
        artist_name: &str,
    ) -> TrackRecord
    where
        S: PageSession + ?Sized,
    {
        TrackRecord {
            timestamp: collection_time(),
            artist_name: artist_name.to_string(),
            track_title: self.title.extract(page, url).await,
            track_url: url.to_string(),
            album_art: Field::from(self.album_art.extract(page).await),
            plays: Field::from(self.plays.extract(text)),
            likes: Field::from(self.likes.extract(text)),
            reposts: Field::from(self.reposts.extract(text)),
            playlist_adds: Field::from(self.playlist_adds.extract(text)),
            release_date: Field::from(self.release_date.extract(page, text).await),
        }
    }
}
