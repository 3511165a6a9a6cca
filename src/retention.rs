//! Housekeeping for the data directory.
//!
//! Keeps a stable `audiomack_<kind>_latest.csv` copy of the newest dataset of
//! each kind and removes timestamped files once they fall out of the
//! retention window. `latest` copies are never considered for either.

use crate::dataset::{DatasetKind, FILE_PREFIX};
use crate::{Result, ScrapeError};
use chrono::{DateTime, Local};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Default retention window in days.
pub const DEFAULT_RETENTION_DAYS: u64 = 30;

const LATEST_MARKER: &str = "latest";

/// When a file was created, or last modified where the platform does not
/// record creation times.
pub fn file_time(metadata: &Metadata) -> SystemTime {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

fn is_latest(path: &Path) -> bool {
    file_name(path).contains(LATEST_MARKER)
}

/// CSV files in `dir` whose name starts with `prefix`, with their metadata.
fn csv_files(dir: &Path, prefix: &str) -> Result<Vec<(PathBuf, Metadata)>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = file_name(&path);
        if !name.starts_with(prefix) || !name.ends_with(".csv") {
            continue;
        }
        let metadata = entry.metadata()?;
        if metadata.is_file() {
            files.push((path, metadata));
        }
    }
    Ok(files)
}

fn require_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(ScrapeError::Config(format!(
            "data directory {} not found",
            dir.display()
        )))
    }
}

/// One refreshed `latest` copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestCopy {
    pub kind: DatasetKind,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestReport {
    pub updated: Vec<LatestCopy>,
    /// Kinds with no timestamped file to copy
    pub missing: Vec<DatasetKind>,
}

/// The newest timestamped file of `kind` in `dir`.
pub fn newest_file(dir: &Path, kind: DatasetKind) -> Result<Option<PathBuf>> {
    let newest = csv_files(dir, &kind.file_prefix())?
        .into_iter()
        .filter(|(path, _)| !is_latest(path))
        .max_by(|(a, a_meta), (b, b_meta)| {
            file_time(a_meta)
                .cmp(&file_time(b_meta))
                .then_with(|| file_name(a).cmp(file_name(b)))
        })
        .map(|(path, _)| path);
    Ok(newest)
}

/// Copy the newest dataset of each kind to its `latest` name.
///
/// A missing data directory is an error; a kind with no files is reported
/// in [`LatestReport::missing`].
pub fn update_latest(dir: &Path) -> Result<LatestReport> {
    require_dir(dir)?;
    let mut report = LatestReport::default();

    for kind in DatasetKind::ALL {
        let Some(source) = newest_file(dir, kind)? else {
            log::warn!("No {} CSV files found in {}", kind.as_str(), dir.display());
            report.missing.push(kind);
            continue;
        };

        let destination = dir.join(kind.latest_file_name());
        let bytes = fs::copy(&source, &destination)?;
        log::info!(
            "Updated {} from {} ({bytes} bytes)",
            destination.display(),
            file_name(&source)
        );
        report.updated.push(LatestCopy {
            kind,
            source,
            destination,
            bytes,
        });
    }

    Ok(report)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub bytes_freed: u64,
    /// Files that were due for removal but could not be deleted
    pub failed: Vec<PathBuf>,
}

/// Delete timestamped datasets older than `days`.
pub fn cleanup_old_files(dir: &Path, days: u64) -> Result<CleanupReport> {
    let window = Duration::from_secs(days.saturating_mul(86_400));
    let cutoff = SystemTime::now()
        .checked_sub(window)
        .unwrap_or(SystemTime::UNIX_EPOCH);
    cleanup_before(dir, cutoff)
}

/// Delete timestamped datasets whose [`file_time`] is before `cutoff`.
///
/// Files that cannot be removed are logged and skipped.
pub fn cleanup_before(dir: &Path, cutoff: SystemTime) -> Result<CleanupReport> {
    require_dir(dir)?;
    let mut report = CleanupReport::default();

    for (path, metadata) in csv_files(dir, FILE_PREFIX)? {
        if is_latest(&path) || file_time(&metadata) >= cutoff {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Removed {} ({} bytes)", file_name(&path), metadata.len());
                report.bytes_freed += metadata.len();
                report.removed.push(path);
            }
            Err(e) => {
                log::warn!("Error removing {}: {e}", path.display());
                report.failed.push(path);
            }
        }
    }

    Ok(report)
}

/// One CSV file in the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Local>,
    pub is_latest: bool,
}

impl DataFile {
    pub fn name(&self) -> &str {
        file_name(&self.path)
    }
}

/// Every CSV file in `dir`, newest first.
pub fn list_data_files(dir: &Path) -> Result<Vec<DataFile>> {
    require_dir(dir)?;
    let mut files = csv_files(dir, "")?;
    files.sort_by(|(a, a_meta), (b, b_meta)| {
        file_time(b_meta)
            .cmp(&file_time(a_meta))
            .then_with(|| file_name(b).cmp(file_name(a)))
    });

    Ok(files
        .into_iter()
        .map(|(path, metadata)| DataFile {
            is_latest: is_latest(&path),
            size: metadata.len(),
            modified: metadata
                .modified()
                .map(DateTime::<Local>::from)
                .unwrap_or_else(|_| DateTime::<Local>::from(SystemTime::UNIX_EPOCH)),
            path,
        })
        .collect())
}
