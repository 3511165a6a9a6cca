//! CSV datasets written at the end of a run.
//!
//! One file per dataset kind per run, named
//! `audiomack_<kind>_YYYYmmdd_HHMMSS.csv`. Files are only created when they
//! would contain at least one row.

use crate::types::{ArtistRecord, RunOutput, TrackRecord, TIMESTAMP_FORMAT};
use crate::Result;
use chrono::NaiveDateTime;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Prefix shared by every dataset file.
pub const FILE_PREFIX: &str = "audiomack_";

/// Timestamp format used in dataset file names.
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub const ARTIST_COLUMNS: [&str; 9] = [
    "timestamp",
    "artist_name",
    "url",
    "profile_image",
    "followers",
    "total_plays",
    "monthly_listeners",
    "member_since",
    "tracks_found",
];

pub const TRACK_COLUMNS: [&str; 10] = [
    "timestamp",
    "artist_name",
    "track_title",
    "track_url",
    "album_art",
    "plays",
    "likes",
    "reposts",
    "playlist_adds",
    "release_date",
];

/// Columns dropped by [`Layout::Legacy`].
const IMAGE_COLUMNS: [&str; 2] = ["profile_image", "album_art"];

/// The two datasets a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Artists,
    Tracks,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Artists, DatasetKind::Tracks];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Artists => "artists",
            DatasetKind::Tracks => "tracks",
        }
    }

    /// `audiomack_artists_` or `audiomack_tracks_`
    pub fn file_prefix(&self) -> String {
        format!("{FILE_PREFIX}{}_", self.as_str())
    }

    pub fn file_name(&self, at: &NaiveDateTime) -> String {
        format!("{}{}.csv", self.file_prefix(), at.format(FILE_STAMP_FORMAT))
    }

    /// Name of the stable copy of the newest file.
    pub fn latest_file_name(&self) -> String {
        format!("{}latest.csv", self.file_prefix())
    }

    pub fn columns(&self, layout: Layout) -> Vec<&'static str> {
        let all: &[&'static str] = match self {
            DatasetKind::Artists => &ARTIST_COLUMNS,
            DatasetKind::Tracks => &TRACK_COLUMNS,
        };
        all.iter()
            .copied()
            .filter(|column| layout == Layout::Current || !IMAGE_COLUMNS.contains(column))
            .collect()
    }
}

/// Column layout of written datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Current,
    /// Older layout without image URL columns
    Legacy,
}

impl Layout {
    pub fn from_legacy_flag(legacy: bool) -> Self {
        if legacy {
            Layout::Legacy
        } else {
            Layout::Current
        }
    }
}

fn artist_row(artist: &ArtistRecord, layout: Layout) -> Vec<String> {
    let mut row = vec![
        artist.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        artist.artist_name.clone(),
        artist.url.clone(),
    ];
    if layout == Layout::Current {
        row.push(artist.profile_image.to_string());
    }
    row.extend([
        artist.followers.to_string(),
        artist.total_plays.to_string(),
        artist.monthly_listeners.to_string(),
        artist.member_since.to_string(),
        artist.tracks_found.to_string(),
    ]);
    row
}

fn track_row(track: &TrackRecord, layout: Layout) -> Vec<String> {
    let mut row = vec![
        track.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        track.artist_name.clone(),
        track.track_title.clone(),
        track.track_url.clone(),
    ];
    if layout == Layout::Current {
        row.push(track.album_art.to_string());
    }
    row.extend([
        track.plays.to_string(),
        track.likes.to_string(),
        track.reposts.to_string(),
        track.playlist_adds.to_string(),
        track.release_date.to_string(),
    ]);
    row
}

/// Write the artist dataset, header included, to `writer`.
pub fn write_artists<W: io::Write>(writer: W, artists: &[ArtistRecord], layout: Layout) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(DatasetKind::Artists.columns(layout))?;
    for artist in artists {
        csv.write_record(artist_row(artist, layout))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the track dataset, header included, to `writer`.
pub fn write_tracks<W: io::Write>(writer: W, tracks: &[TrackRecord], layout: Layout) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(DatasetKind::Tracks.columns(layout))?;
    for track in tracks {
        csv.write_record(track_row(track, layout))?;
    }
    csv.flush()?;
    Ok(())
}

/// Files written by [`save_run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedDatasets {
    pub artists: Option<PathBuf>,
    pub tracks: Option<PathBuf>,
}

/// Write both datasets of `output` into `dir`, stamped with `at`.
///
/// `dir` is created if needed. An empty dataset produces no file.
pub fn save_run(
    output: &RunOutput,
    dir: &Path,
    layout: Layout,
    at: &NaiveDateTime,
) -> Result<SavedDatasets> {
    let mut saved = SavedDatasets::default();
    if output.artists.is_empty() && output.tracks.is_empty() {
        log::warn!("Nothing collected, no dataset written");
        return Ok(saved);
    }
    fs::create_dir_all(dir)?;

    if !output.artists.is_empty() {
        let path = dir.join(DatasetKind::Artists.file_name(at));
        write_artists(File::create(&path)?, &output.artists, layout)?;
        log::info!("Saved {} artists to {}", output.artists.len(), path.display());
        saved.artists = Some(path);
    }

    if !output.tracks.is_empty() {
        let path = dir.join(DatasetKind::Tracks.file_name(at));
        write_tracks(File::create(&path)?, &output.tracks, layout)?;
        log::info!("Saved {} tracks to {}", output.tracks.len(), path.display());
        saved.tracks = Some(path);
    }

    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            DatasetKind::Artists.file_name(&at()),
            "audiomack_artists_20250309_140507.csv"
        );
        assert_eq!(DatasetKind::Tracks.latest_file_name(), "audiomack_tracks_latest.csv");
    }

    #[test]
    fn test_legacy_layout_drops_image_columns() {
        let legacy = DatasetKind::Tracks.columns(Layout::Legacy);
        assert_eq!(legacy.len(), 9);
        assert!(!legacy.contains(&"album_art"));
        assert_eq!(DatasetKind::Artists.columns(Layout::Legacy).len(), 8);
        assert_eq!(DatasetKind::Artists.columns(Layout::Current), ARTIST_COLUMNS.to_vec());
    }

    #[test]
    fn test_failed_artist_row() {
        let mut artist = ArtistRecord::failed("https://audiomack.com/gone", "timed out");
        artist.timestamp = at();

        let mut buffer = Vec::new();
        write_artists(&mut buffer, &[artist], Layout::Current).unwrap();
        let written = String::from_utf8(buffer).unwrap();

        assert_eq!(
            written,
            "timestamp,artist_name,url,profile_image,followers,total_plays,monthly_listeners,member_since,tracks_found\n\
             2025-03-09 14:05:07,Error,https://audiomack.com/gone,N/A,Error,Error,Error,N/A,0\n"
        );
    }
}
