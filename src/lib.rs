//! # audiomack-metrics
//!
//! Collects public artist and track metrics from Audiomack and writes them
//! as two flat CSV datasets.
//!
//! Pages are read through the [`PageSession`] trait. Every field is located
//! by an ordered list of strategies (see [`extract`]); a field that no
//! strategy finds is [`Field::Unknown`] and is written as `N/A`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use audiomack_metrics::{dataset, Collector, HttpFetcher, RunConfig};
//!
//! # tokio_test::block_on(async {
//! let config = RunConfig {
//!     artists: vec!["https://audiomack.com/nahj".to_string()],
//!     max_tracks_per_artist: 5,
//!     ..RunConfig::default()
//! };
//!
//! let session = HttpFetcher::new(Box::new(http_client::native::NativeClient::new()))
//!     .with_retry_config(config.retry_config())
//!     .into_session();
//!
//! let mut collector = Collector::new(session, config.clone());
//! let output = collector.run().await;
//!
//! let layout = dataset::Layout::from_legacy_flag(config.legacy_columns);
//! let now = chrono::Local::now().naive_local();
//! dataset::save_run(&output, &config.output_dir, layout, &now)?;
//! # Ok::<(), audiomack_metrics::ScrapeError>(())
//! # });
//! ```

pub mod catalog;
pub mod collector;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod page;
pub mod retention;
pub mod retry;
pub mod types;

pub use collector::Collector;
pub use config::RunConfig;
pub use error::ScrapeError;
pub use normalize::normalize_count;
pub use page::html::{Fetch, HtmlSession, StaticPages};
pub use page::http::HttpFetcher;
pub use page::{resolve_url, Element, Locator, PageSession};
pub use types::{ArtistRecord, Field, RunOutput, TrackRecord};

#[cfg(feature = "chrome")]
pub use page::chrome::ChromeSession;

#[cfg(feature = "mock")]
pub use page::MockPageSession;

pub type Result<T> = std::result::Result<T, ScrapeError>;
