use crate::catalog::CatalogOptions;
use crate::page::http::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::retry::RetryConfig;
use crate::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Artists collected when no list is configured.
pub const DEFAULT_ARTISTS: [&str; 5] = [
    "https://audiomack.com/vibeking-sio",
    "https://audiomack.com/nahj",
    "https://audiomack.com/spizeofficial",
    "https://audiomack.com/will-flash",
    "https://audiomack.com/stunn",
];

/// Settings for one collection run.
///
/// Every field has a default, so a configuration file only needs the values
/// it changes:
///
/// ```rust
/// use audiomack_metrics::RunConfig;
///
/// let config = RunConfig::from_json(r#"{ "artists": ["https://audiomack.com/nahj"], "max_tracks_per_artist": 5 }"#).unwrap();
/// assert_eq!(config.artists.len(), 1);
/// assert_eq!(config.max_tracks_per_artist, 5);
/// assert_eq!(config.track_navigation_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Artist page URLs, visited in order
    pub artists: Vec<String>,
    pub base_url: String,
    /// Tracks collected per artist; `0` collects the whole catalog
    pub max_tracks_per_artist: usize,
    /// Expand the `/songs` listing instead of using the artist page only
    pub full_catalog: bool,
    pub max_expansions: u32,
    pub output_dir: PathBuf,
    /// Write datasets without the image columns
    pub legacy_columns: bool,
    pub user_agent: String,
    pub artist_navigation_timeout_secs: u64,
    pub track_navigation_timeout_secs: u64,
    /// Upper bound for waits after navigation and expansion
    pub settle_timeout_ms: u64,
    /// Pause after every track page
    pub track_delay_ms: u64,
    /// Pause between artists
    pub artist_delay_ms: u64,
    /// Rate limit retries per page
    pub max_retries: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            artists: DEFAULT_ARTISTS.iter().map(|s| s.to_string()).collect(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tracks_per_artist: 0,
            full_catalog: true,
            max_expansions: 10,
            output_dir: PathBuf::from("data"),
            legacy_columns: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            artist_navigation_timeout_secs: 60,
            track_navigation_timeout_secs: 30,
            settle_timeout_ms: 10_000,
            track_delay_ms: 1_000,
            artist_delay_ms: 3_000,
            max_retries: 3,
        }
    }
}

impl RunConfig {
    /// `<config_dir>/audiomack-metrics/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ScrapeError::Config("Cannot determine config directory".to_string()))?;
        Ok(config_dir.join("audiomack-metrics").join("config.json"))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise the default file if it exists,
    /// otherwise the defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Ok(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.parse::<http_types::Url>().is_err() {
            return Err(ScrapeError::Config(format!(
                "base_url is not a URL: {}",
                self.base_url
            )));
        }
        if let Some(bad) = self
            .artists
            .iter()
            .find(|url| url.parse::<http_types::Url>().is_err())
        {
            return Err(ScrapeError::Config(format!("artist is not a URL: {bad}")));
        }
        if self.artist_navigation_timeout_secs == 0 || self.track_navigation_timeout_secs == 0 {
            return Err(ScrapeError::Config(
                "navigation timeouts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            full_catalog: self.full_catalog,
            max_expansions: self.max_expansions,
            max_tracks: self.max_tracks_per_artist,
            navigation_timeout: Duration::from_secs(self.artist_navigation_timeout_secs),
            settle_timeout: Duration::from_millis(self.settle_timeout_ms),
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            ..RetryConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = RunConfig::from_json("{}").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.artists.len(), 5);
        assert_eq!(config.output_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_invalid_artist_url_is_rejected() {
        let result = RunConfig::from_json(r#"{ "artists": ["not a url"] }"#);
        assert!(matches!(result, Err(ScrapeError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = RunConfig::from_json(r#"{ "track_navigation_timeout_secs": 0 }"#);
        assert!(matches!(result, Err(ScrapeError::Config(_))));
    }

    #[test]
    fn test_malformed_json_is_a_json_error() {
        assert!(matches!(
            RunConfig::from_json("{ artists: "),
            Err(ScrapeError::Json(_))
        ));
    }

    #[test]
    fn test_catalog_options_follow_config() {
        let config = RunConfig {
            full_catalog: false,
            max_tracks_per_artist: 3,
            settle_timeout_ms: 250,
            ..RunConfig::default()
        };
        let options = config.catalog_options();
        assert!(!options.full_catalog);
        assert_eq!(options.max_tracks, 3);
        assert_eq!(options.settle_timeout, Duration::from_millis(250));
    }
}
