use audiomack_metrics::{normalize_count, ArtistRecord, Field, RunOutput, TrackRecord};

#[test]
fn test_display_implementations() {
    let artist = ArtistRecord {
        followers: Field::Found("12500".to_string()),
        tracks_found: 3,
        ..ArtistRecord::new("https://audiomack.com/nahj", "Nahj".to_string())
    };
    assert_eq!(format!("{artist}"), "Nahj (12500 followers, 3 tracks)");

    let failed = ArtistRecord::failed("https://audiomack.com/gone", "timed out");
    assert_eq!(format!("{failed}"), "Error (Error followers, 0 tracks)");

    let track = TrackRecord {
        timestamp: artist.timestamp,
        artist_name: "Nahj".to_string(),
        track_title: "Gbese".to_string(),
        track_url: "https://audiomack.com/nahj/song/gbese".to_string(),
        album_art: Field::Unknown,
        plays: Field::Found("1200".to_string()),
        likes: Field::Unknown,
        reposts: Field::Unknown,
        playlist_adds: Field::Found("300".to_string()),
        release_date: Field::Found("March 5, 2021".to_string()),
    };
    assert_eq!(
        format!("{track}"),
        "Nahj - Gbese (plays: 1200, likes: N/A, playlist adds: 300, released: March 5, 2021)"
    );
}

#[test]
fn test_field_sentinels() {
    assert_eq!(Field::default(), Field::Unknown);
    assert_eq!(Field::Unknown.to_string(), "N/A");
    assert_eq!(Field::Failed.to_string(), "Error");
    assert_eq!(Field::Found("7".to_string()).value(), Some("7"));
    assert_eq!(Field::Failed.value(), None);
    assert!(!Field::Unknown.is_found());
}

#[test]
fn test_records_serialize_with_sentinels() {
    let failed = ArtistRecord::failed("https://audiomack.com/gone", "timed out");
    let json = serde_json::to_value(&failed).unwrap();

    assert_eq!(json["artist_name"], "Error");
    assert_eq!(json["followers"], "Error");
    assert_eq!(json["member_since"], "N/A");
    assert_eq!(json["error"], "timed out");
    assert_eq!(json["timestamp"].as_str().unwrap().len(), 19);
}

#[test]
fn test_run_output_summary() {
    let output = RunOutput {
        artists: vec![
            ArtistRecord::new("https://audiomack.com/nahj", "Nahj".to_string()),
            ArtistRecord::failed("https://audiomack.com/gone", "timed out"),
        ],
        tracks: Vec::new(),
    };
    assert_eq!(output.successful_artists(), 1);
    assert_eq!(output.failed_artists(), 1);
    assert_eq!(output.average_tracks_per_artist(), 0.0);
}

#[test]
fn test_normalized_counts() {
    assert_eq!(normalize_count("1.2K"), "1200");
    assert_eq!(normalize_count("2M"), "2000000");
    assert_eq!(normalize_count("500"), "500");
    assert_eq!(normalize_count("N/A"), "N/A");
    assert_eq!(normalize_count(""), "N/A");

    for raw in ["1.2K", "3.4 m", "1,500", "0.5B", "Error"] {
        let once = normalize_count(raw);
        assert_eq!(normalize_count(&once), once);
    }
}
