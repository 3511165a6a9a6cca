mod common;

use audiomack_metrics::dataset::{self, Layout};
use audiomack_metrics::{Collector, Field, StaticPages};
use chrono::NaiveDate;
use common::{nahj_pages, static_session, test_config, ARTIST_URL};
use std::fs;

#[test_log::test(tokio::test)]
async fn test_run_collects_artist_and_reachable_tracks() {
    let mut collector = Collector::new(static_session(nahj_pages()), test_config(&[ARTIST_URL]));

    let output = collector.run().await;

    assert_eq!(output.artists.len(), 1);
    let artist = &output.artists[0];
    assert_eq!(artist.artist_name, "Nahj");
    assert_eq!(artist.followers.as_str(), "12500");
    assert_eq!(artist.tracks_found, 3);

    // the third listed track has no page and is dropped
    assert_eq!(output.tracks.len(), 2);
    assert_eq!(output.tracks[0].track_title, "Ballon d'Or");
    assert_eq!(output.tracks[0].plays.as_str(), "1200");
    assert_eq!(output.tracks[1].track_title, "Gbese");
    assert!(output.tracks.iter().all(|t| t.artist_name == "Nahj"));
    assert_eq!(output.successful_artists(), 1);
}

#[tokio::test]
async fn test_failed_artist_yields_error_record_and_no_tracks() {
    let missing = "https://audiomack.com/gone";
    let mut collector = Collector::new(
        static_session(nahj_pages()),
        test_config(&[missing, ARTIST_URL]),
    );

    let output = collector.run().await;

    assert_eq!(output.artists.len(), 2);
    let failed = &output.artists[0];
    assert_eq!(failed.artist_name, "Error");
    assert_eq!(failed.url, missing);
    assert_eq!(failed.followers, Field::Failed);
    assert_eq!(failed.total_plays, Field::Failed);
    assert_eq!(failed.monthly_listeners, Field::Failed);
    assert_eq!(failed.member_since, Field::Unknown);
    assert_eq!(failed.profile_image, Field::Unknown);
    assert_eq!(failed.tracks_found, 0);
    assert!(failed.error.is_some());

    // the next artist is still collected
    assert_eq!(output.artists[1].artist_name, "Nahj");
    assert_eq!(output.failed_artists(), 1);
    assert!(output.tracks.iter().all(|t| t.artist_name == "Nahj"));
}

#[tokio::test]
async fn test_only_failed_artist_writes_artist_dataset_only() {
    let mut collector = Collector::new(
        static_session(StaticPages::new()),
        test_config(&["https://audiomack.com/gone"]),
    );
    let output = collector.run().await;
    assert!(output.tracks.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let at = NaiveDate::from_ymd_opt(2025, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    let saved = dataset::save_run(&output, dir.path(), Layout::Current, &at).unwrap();

    assert!(saved.tracks.is_none());
    let artists = saved.artists.unwrap();
    assert_eq!(
        artists.file_name().unwrap().to_str().unwrap(),
        "audiomack_artists_20250102_030405.csv"
    );
    let written = fs::read_to_string(artists).unwrap();
    assert_eq!(written.lines().count(), 2);
    assert!(written.lines().nth(1).unwrap().contains(",Error,https://audiomack.com/gone,"));
}

#[tokio::test]
async fn test_single_page_mode_uses_artist_page_links() {
    let config = audiomack_metrics::RunConfig {
        full_catalog: false,
        ..test_config(&[ARTIST_URL])
    };
    let mut collector = Collector::new(static_session(nahj_pages()), config);

    let output = collector.run().await;

    assert_eq!(output.artists[0].tracks_found, 1);
    assert_eq!(output.tracks.len(), 1);
    assert_eq!(
        output.tracks[0].track_url,
        "https://audiomack.com/nahj/song/ballon-dor"
    );
}
