#[cfg(feature = "mock")]
mod mock_tests {
    use audiomack_metrics::extract::{IdentityField, ImageField};
    use audiomack_metrics::{Collector, Field, MockPageSession, RunConfig, ScrapeError};
    use mockall::predicate::*;

    fn config(artists: &[&str]) -> RunConfig {
        RunConfig {
            artists: artists.iter().map(|a| a.to_string()).collect(),
            settle_timeout_ms: 0,
            track_delay_ms: 0,
            artist_delay_ms: 0,
            ..RunConfig::default()
        }
    }

    #[tokio::test]
    async fn test_navigation_timeout_gives_error_record() {
        let mut session = MockPageSession::new();
        session
            .expect_navigate()
            .with(eq("https://audiomack.com/nahj"), always())
            .times(1)
            .returning(|url, timeout| {
                Err(ScrapeError::Timeout {
                    url: url.to_string(),
                    seconds: timeout.as_secs(),
                })
            });
        session.expect_body_text().never();

        let mut collector = Collector::new(session, config(&["https://audiomack.com/nahj"]));
        let output = collector.run().await;

        assert_eq!(output.artists.len(), 1);
        assert!(output.tracks.is_empty());
        let artist = &output.artists[0];
        assert_eq!(artist.artist_name, "Error");
        assert_eq!(artist.followers, Field::Failed);
        assert_eq!(
            artist.error.as_deref(),
            Some("Timed out after 60s loading https://audiomack.com/nahj")
        );
    }

    #[tokio::test]
    async fn test_query_errors_fall_through_to_url() {
        let mut session = MockPageSession::new();
        session
            .expect_query()
            .returning(|locator| Err(ScrapeError::Selector(locator.to_string())));
        session
            .expect_title()
            .returning(|| Err(ScrapeError::Browser("tab crashed".to_string())));

        let name = IdentityField::artist_name()
            .extract(&session, "https://audiomack.com/spizeofficial")
            .await;
        assert_eq!(name, "Spizeofficial");

        let image = ImageField::profile_image().extract(&session).await;
        assert_eq!(image, None);
    }
}
