pub mod files;
pub mod latest;
pub mod scrape;

use audiomack_metrics::retention::DEFAULT_RETENTION_DAYS;
use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Fetch pages over HTTP and parse them without running scripts
    Http,
    /// Render pages in headless Chromium (requires the `chrome` feature)
    Chrome,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect artist and track metrics and write the CSV datasets
    ///
    /// Artists come from the configuration file unless given with --artist.
    ///
    /// Usage examples:
    /// # Collect the configured artists
    /// audiomack-metrics scrape
    ///
    /// # Collect two artists, at most 10 tracks each
    /// audiomack-metrics scrape --artist https://audiomack.com/nahj --artist https://audiomack.com/stunn --max-tracks 10
    ///
    /// # Only use the tracks shown on the artist page, legacy CSV columns
    /// audiomack-metrics scrape --single-page --legacy-columns
    Scrape {
        /// Configuration file (defaults to <config dir>/audiomack-metrics/config.json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Artist page URL; repeat for several artists
        #[arg(long = "artist")]
        artists: Vec<String>,

        /// Maximum number of tracks per artist (0 for no limit)
        #[arg(long)]
        max_tracks: Option<usize>,

        /// Directory the datasets are written to
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Use the tracks on the artist page instead of the full catalog
        #[arg(long)]
        single_page: bool,

        /// Write datasets without image URL columns
        #[arg(long)]
        legacy_columns: bool,

        /// How pages are loaded
        #[arg(long, value_enum, default_value = "http")]
        backend: Backend,
    },

    /// Copy the newest datasets to their `latest` names and remove old files
    ///
    /// Usage examples:
    /// # Refresh latest files and keep 30 days of history
    /// audiomack-metrics update-latest
    ///
    /// # Keep a week of history in another directory
    /// audiomack-metrics update-latest --data-dir exports --retention-days 7
    UpdateLatest {
        /// Directory holding the datasets
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Remove datasets older than this many days
        #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
        retention_days: u64,

        /// Only refresh the latest files
        #[arg(long)]
        no_cleanup: bool,
    },

    /// List the CSV files in the data directory, newest first
    Files {
        /// Directory holding the datasets
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

pub async fn execute_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Scrape {
            config,
            artists,
            max_tracks,
            output_dir,
            single_page,
            legacy_columns,
            backend,
        } => {
            let overrides = scrape::Overrides {
                artists,
                max_tracks,
                output_dir,
                single_page,
                legacy_columns,
            };
            scrape::handle_scrape_command(config.as_deref(), overrides, backend).await
        }

        Commands::UpdateLatest {
            data_dir,
            retention_days,
            no_cleanup,
        } => {
            let cleanup_days = (!no_cleanup).then_some(retention_days);
            latest::handle_update_latest_command(&data_dir, cleanup_days)?;
            files::handle_files_command(&data_dir)
        }

        Commands::Files { data_dir } => files::handle_files_command(&data_dir),
    }
}
