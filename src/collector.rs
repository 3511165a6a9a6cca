use crate::catalog::{self, CatalogOptions};
use crate::config::RunConfig;
use crate::extract::{ArtistFields, TrackFields};
use crate::page::{Locator, PageSession};
use crate::types::{ArtistRecord, RunOutput, TrackRecord};
use crate::Result;
use std::time::Duration;

/// Drives a [`PageSession`] through artists and their tracks.
///
/// Artists and tracks are visited one at a time. A failing artist page yields
/// an error record and no tracks; a failing track page is skipped. Nothing
/// that happens to one artist stops the run.
pub struct Collector<S> {
    session: S,
    config: RunConfig,
    artist_fields: ArtistFields,
    track_fields: TrackFields,
}

impl<S: PageSession> Collector<S> {
    pub fn new(session: S, config: RunConfig) -> Self {
        Self {
            session,
            config,
            artist_fields: ArtistFields::default(),
            track_fields: TrackFields::default(),
        }
    }

    /// Replace the field definitions, e.g. for a different page layout.
    pub fn with_fields(mut self, artist_fields: ArtistFields, track_fields: TrackFields) -> Self {
        self.artist_fields = artist_fields;
        self.track_fields = track_fields;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// Collect every configured artist.
    pub async fn run(&mut self) -> RunOutput {
        let artists = self.config.artists.clone();
        self.run_artists(&artists).await
    }

    /// Collect `artists` in order.
    pub async fn run_artists(&mut self, artists: &[String]) -> RunOutput {
        let mut output = RunOutput::default();
        let artist_delay = Duration::from_millis(self.config.artist_delay_ms);

        for (i, url) in artists.iter().enumerate() {
            log::info!("[{}/{}] Collecting {url}", i + 1, artists.len());

            let (artist, tracks) = self.collect_artist(url).await;
            log::info!("Collected {artist}");
            output.artists.push(artist);
            output.tracks.extend(tracks);

            if i + 1 < artists.len() && !artist_delay.is_zero() {
                tokio::time::sleep(artist_delay).await;
            }
        }

        log::info!(
            "Run complete: {} artists ({} failed), {} tracks, {:.1} tracks per artist",
            output.artists.len(),
            output.failed_artists(),
            output.tracks.len(),
            output.average_tracks_per_artist()
        );
        output
    }

    /// Collect one artist and every track of their catalog.
    pub async fn collect_artist(&mut self, url: &str) -> (ArtistRecord, Vec<TrackRecord>) {
        let mut artist = match self.artist_page(url).await {
            Ok(artist) => artist,
            Err(e) => {
                log::warn!("Error collecting artist {url}: {e}");
                return (ArtistRecord::failed(url, e), Vec::new());
            }
        };

        let options = self.catalog_options();
        let track_urls = catalog::enumerate(&mut self.session, url, &options).await;
        artist.tracks_found = track_urls.len();
        log::info!("Found {} tracks for {}", track_urls.len(), artist.artist_name);

        let track_delay = Duration::from_millis(self.config.track_delay_ms);
        let mut tracks = Vec::with_capacity(track_urls.len());
        for (i, track_url) in track_urls.iter().enumerate() {
            log::info!("[{}/{}] {track_url}", i + 1, track_urls.len());
            if let Some(track) = self.collect_track(track_url, &artist.artist_name).await {
                tracks.push(track);
            }
            if !track_delay.is_zero() {
                tokio::time::sleep(track_delay).await;
            }
        }

        (artist, tracks)
    }

    async fn artist_page(&mut self, url: &str) -> Result<ArtistRecord> {
        let timeout = Duration::from_secs(self.config.artist_navigation_timeout_secs);
        self.session.navigate(url, timeout).await?;
        self.settle().await?;

        let text = self.session.body_text().await?;
        Ok(self.artist_fields.extract(&self.session, url, &text).await)
    }

    /// Collect one track page. Failures are logged and yield `None`.
    pub async fn collect_track(&mut self, url: &str, artist_name: &str) -> Option<TrackRecord> {
        match self.track_page(url, artist_name).await {
            Ok(track) => {
                log::info!("Collected {track}");
                Some(track)
            }
            Err(e) => {
                log::warn!("Error collecting track {url}: {e}");
                None
            }
        }
    }

    async fn track_page(&mut self, url: &str, artist_name: &str) -> Result<TrackRecord> {
        let timeout = Duration::from_secs(self.config.track_navigation_timeout_secs);
        self.session.navigate(url, timeout).await?;
        self.settle().await?;

        let text = self.session.body_text().await?;
        Ok(self
            .track_fields
            .extract(&self.session, url, &text, artist_name)
            .await)
    }

    /// Wait for the page heading to render. A page without one is still read.
    async fn settle(&self) -> Result<()> {
        let timeout = Duration::from_millis(self.config.settle_timeout_ms);
        if !self.session.wait_for(&Locator::css("h1"), timeout).await? {
            log::debug!("No heading appeared within {timeout:?}");
        }
        Ok(())
    }

    fn catalog_options(&self) -> CatalogOptions {
        self.config.catalog_options()
    }
}
