use audiomack_metrics::retention;
use std::path::Path;

/// Refresh the `latest` copies, then remove old files unless `cleanup_days`
/// is `None`.
pub fn handle_update_latest_command(
    data_dir: &Path,
    cleanup_days: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("📂 Updating latest CSV files in {}", data_dir.display());

    let report = retention::update_latest(data_dir)?;
    for copy in &report.updated {
        println!();
        println!("✅ {} file updated:", copy.kind.as_str());
        println!(
            "   Source: {}",
            copy.source.file_name().unwrap_or_default().to_string_lossy()
        );
        println!(
            "   Dest:   {}",
            copy.destination.file_name().unwrap_or_default().to_string_lossy()
        );
        println!("   Size:   {} bytes", copy.bytes);
    }
    for kind in &report.missing {
        println!();
        println!("⚠️  No {} CSV files found", kind.as_str());
    }

    let Some(days) = cleanup_days else {
        return Ok(());
    };

    println!();
    let cleanup = retention::cleanup_old_files(data_dir, days)?;
    for path in &cleanup.removed {
        println!(
            "🗑️  Removed: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );
    }
    for path in &cleanup.failed {
        println!("❌ Could not remove {}", path.display());
    }

    if cleanup.removed.is_empty() {
        println!("ℹ️  No old files to clean up (all files < {days} days old)");
    } else {
        println!(
            "✅ Cleaned up {} old file(s), freed {} bytes ({:.2} MB)",
            cleanup.removed.len(),
            cleanup.bytes_freed,
            cleanup.bytes_freed as f64 / 1024.0 / 1024.0
        );
    }

    Ok(())
}
