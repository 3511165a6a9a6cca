use audiomack_metrics::dataset::{self, Layout};
use audiomack_metrics::{ArtistRecord, Field, RunOutput, TrackRecord};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn artist() -> ArtistRecord {
    ArtistRecord {
        timestamp: at(),
        profile_image: Field::Found("https://cdn/a.jpg".to_string()),
        followers: Field::Found("12500".to_string()),
        total_plays: Field::Found("1200000".to_string()),
        monthly_listeners: Field::Unknown,
        member_since: Field::Found("March 5, 2019".to_string()),
        tracks_found: 2,
        ..ArtistRecord::new("https://audiomack.com/nahj", "Nahj".to_string())
    }
}

fn track(title: &str) -> TrackRecord {
    TrackRecord {
        timestamp: at(),
        artist_name: "Nahj".to_string(),
        track_title: title.to_string(),
        track_url: format!("https://audiomack.com/nahj/song/{}", title.to_lowercase()),
        album_art: Field::Unknown,
        plays: Field::Found("1200".to_string()),
        likes: Field::Found("87".to_string()),
        reposts: Field::Unknown,
        playlist_adds: Field::Found("300".to_string()),
        release_date: Field::Found("March 5, 2021".to_string()),
    }
}

#[test]
fn test_save_run_writes_both_datasets() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("data");
    let output = RunOutput {
        artists: vec![artist()],
        tracks: vec![track("Water"), track("Gbese")],
    };

    let saved = dataset::save_run(&output, &output_dir, Layout::Current, &at()).unwrap();

    let artists = fs::read_to_string(saved.artists.unwrap()).unwrap();
    assert_eq!(
        artists,
        "timestamp,artist_name,url,profile_image,followers,total_plays,monthly_listeners,member_since,tracks_found\n\
         2025-06-01 09:30:00,Nahj,https://audiomack.com/nahj,https://cdn/a.jpg,12500,1200000,N/A,\"March 5, 2019\",2\n"
    );

    let tracks_path = saved.tracks.unwrap();
    assert_eq!(
        tracks_path,
        output_dir.join("audiomack_tracks_20250601_093000.csv")
    );
    let tracks = fs::read_to_string(tracks_path).unwrap();
    let lines: Vec<&str> = tracks.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "timestamp,artist_name,track_title,track_url,album_art,plays,likes,reposts,playlist_adds,release_date"
    );
    assert_eq!(
        lines[1],
        "2025-06-01 09:30:00,Nahj,Water,https://audiomack.com/nahj/song/water,N/A,1200,87,N/A,300,\"March 5, 2021\""
    );
}

#[test]
fn test_legacy_layout_omits_image_columns() {
    let mut buffer = Vec::new();
    dataset::write_tracks(&mut buffer, &[track("Water")], Layout::Legacy).unwrap();
    let written = String::from_utf8(buffer).unwrap();

    assert_eq!(
        written,
        "timestamp,artist_name,track_title,track_url,plays,likes,reposts,playlist_adds,release_date\n\
         2025-06-01 09:30:00,Nahj,Water,https://audiomack.com/nahj/song/water,1200,87,N/A,300,\"March 5, 2021\"\n"
    );
}

#[test]
fn test_empty_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("data");

    let saved =
        dataset::save_run(&RunOutput::default(), &output_dir, Layout::Current, &at()).unwrap();

    assert_eq!(saved, dataset::SavedDatasets::default());
    assert!(!output_dir.exists());
}
