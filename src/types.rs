//! Record types for the artist and track datasets.
//!
//! Both records are built once per page visit, filled in field by field and
//! then appended to a [`RunOutput`]. Absent values stay explicit as
//! [`Field::Unknown`] until a record is written, where they become `N/A`.

use crate::normalize::{ERROR, UNKNOWN};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};
use std::fmt;

/// Format used for the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Literal artist name used for artists whose page failed.
pub const ERROR_ARTIST_NAME: &str = ERROR;

/// The outcome of extracting one value from a page.
///
/// # Examples
///
/// ```rust
/// use audiomack_metrics::Field;
///
/// assert_eq!(Field::from(Some("1200".to_string())).as_str(), "1200");
/// assert_eq!(Field::from(None).as_str(), "N/A");
/// assert_eq!(Field::Failed.as_str(), "Error");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Field {
    /// A value was located on the page
    Found(String),
    /// Every strategy came up empty
    #[default]
    Unknown,
    /// The page itself failed before the value could be looked for
    Failed,
}

impl Field {
    /// The value as written to a dataset.
    pub fn as_str(&self) -> &str {
        match self {
            Field::Found(value) => value.as_str(),
            Field::Unknown => UNKNOWN,
            Field::Failed => ERROR,
        }
    }

    /// The located value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Field::Found(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Field::Found(_))
    }
}

impl From<Option<String>> for Field {
    fn from(value: Option<String>) -> Self {
        value.map_or(Field::Unknown, Field::Found)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

/// Current local time truncated to whole seconds.
pub fn collection_time() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Aggregate metrics for one artist profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRecord {
    /// When the profile was collected
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    /// Resolved display name, or `Error` when the page failed
    pub artist_name: String,
    /// The artist page this record was collected from
    pub url: String,
    /// Absolute avatar URL
    pub profile_image: Field,
    pub followers: Field,
    /// Total plays across the whole account
    pub total_plays: Field,
    pub monthly_listeners: Field,
    /// Free-text "member since" date, never reformatted
    pub member_since: Field,
    /// Number of track URLs the catalog enumeration produced
    pub tracks_found: usize,
    /// Why the page failed, for error records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ArtistRecord {
    /// An empty record for `url` with every field unknown.
    pub fn new(url: &str, artist_name: String) -> Self {
        Self {
            timestamp: collection_time(),
            artist_name,
            url: url.to_string(),
            profile_image: Field::Unknown,
            followers: Field::Unknown,
            total_plays: Field::Unknown,
            monthly_listeners: Field::Unknown,
            member_since: Field::Unknown,
            tracks_found: 0,
            error: None,
        }
    }

    /// The record emitted when an artist page fails, so row counts still
    /// match the list of artists.
    pub fn failed(url: &str, error: impl fmt::Display) -> Self {
        Self {
            followers: Field::Failed,
            total_plays: Field::Failed,
            monthly_listeners: Field::Failed,
            error: Some(error.to_string()),
            ..Self::new(url, ERROR_ARTIST_NAME.to_string())
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.artist_name == ERROR_ARTIST_NAME
    }
}

impl fmt::Display for ArtistRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} followers, {} tracks)",
            self.artist_name, self.followers, self.tracks_found
        )
    }
}

/// Metrics for a single track page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    /// Copied from the owning [`ArtistRecord`]
    pub artist_name: String,
    pub track_title: String,
    /// Always absolute
    pub track_url: String,
    /// Absolute cover image URL
    pub album_art: Field,
    pub plays: Field,
    /// Likes, shown as "Favorites" on some layouts
    pub likes: Field,
    pub reposts: Field,
    pub playlist_adds: Field,
    /// Free-text release date, never reformatted
    pub release_date: Field,
}

impl fmt::Display for TrackRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} (plays: {}, likes: {}, playlist adds: {}, released: {})",
            self.artist_name,
            self.track_title,
            self.plays,
            self.likes,
            self.playlist_adds,
            self.release_date
        )
    }
}

/// Everything a run collected, in visiting order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunOutput {
    pub artists: Vec<ArtistRecord>,
    pub tracks: Vec<TrackRecord>,
}

impl RunOutput {
    /// Artists whose page loaded.
    pub fn successful_artists(&self) -> usize {
        self.artists.iter().filter(|a| !a.is_error()).count()
    }

    pub fn failed_artists(&self) -> usize {
        self.artists.len() - self.successful_artists()
    }

    /// Average number of collected tracks per successful artist.
    pub fn average_tracks_per_artist(&self) -> f64 {
        self.tracks.len() as f64 / self.successful_artists().max(1) as f64
    }
}
