use super::Backend;
use audiomack_metrics::dataset::{self, Layout};
use audiomack_metrics::types::collection_time;
use audiomack_metrics::{Collector, HttpFetcher, PageSession, RunConfig, RunOutput};
use std::path::{Path, PathBuf};

/// Command line values that take precedence over the configuration file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub artists: Vec<String>,
    pub max_tracks: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub single_page: bool,
    pub legacy_columns: bool,
}

impl Overrides {
    pub fn apply(self, mut config: RunConfig) -> RunConfig {
        if !self.artists.is_empty() {
            config.artists = self.artists;
        }
        if let Some(max_tracks) = self.max_tracks {
            config.max_tracks_per_artist = max_tracks;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if self.single_page {
            config.full_catalog = false;
        }
        if self.legacy_columns {
            config.legacy_columns = true;
        }
        config
    }
}

async fn collect<S: PageSession>(session: S, config: &RunConfig) -> RunOutput {
    Collector::new(session, config.clone()).run().await
}

pub async fn handle_scrape_command(
    config_path: Option<&Path>,
    overrides: Overrides,
    backend: Backend,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = overrides.apply(RunConfig::resolve(config_path)?);
    config.validate()?;

    println!("🎵 Collecting {} artists", config.artists.len());
    if config.full_catalog {
        println!("💿 Full catalog mode enabled");
    }
    if config.max_tracks_per_artist > 0 {
        println!("⚠️  Limited to {} tracks per artist", config.max_tracks_per_artist);
    }

    let started = collection_time();
    let output = match backend {
        Backend::Http => {
            let session = HttpFetcher::with_base_url(
                Box::new(http_client::native::NativeClient::new()),
                config.base_url.clone(),
            )
            .with_user_agent(config.user_agent.clone())
            .with_retry_config(config.retry_config())
            .into_session();
            collect(session, &config).await
        }
        Backend::Chrome => collect_with_chrome(&config).await?,
    };

    let layout = Layout::from_legacy_flag(config.legacy_columns);
    let saved = dataset::save_run(&output, &config.output_dir, layout, &started)?;

    println!();
    println!("📊 Summary");
    println!(
        "   Artists: {} ({} failed)",
        output.artists.len(),
        output.failed_artists()
    );
    println!("   Tracks:  {}", output.tracks.len());
    println!(
        "   Average tracks per artist: {:.1}",
        output.average_tracks_per_artist()
    );
    for path in [saved.artists, saved.tracks].into_iter().flatten() {
        println!("💾 Saved {}", path.display());
    }

    Ok(())
}

#[cfg(feature = "chrome")]
async fn collect_with_chrome(config: &RunConfig) -> Result<RunOutput, Box<dyn std::error::Error>> {
    let session = audiomack_metrics::ChromeSession::launch(&config.user_agent)?;
    Ok(collect(session, config).await)
}

#[cfg(not(feature = "chrome"))]
async fn collect_with_chrome(_config: &RunConfig) -> Result<RunOutput, Box<dyn std::error::Error>> {
    Err("this build does not include the chrome backend; rebuild with --features chrome".into())
}
