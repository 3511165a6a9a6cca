use audiomack_metrics::retention;
use std::path::Path;

pub fn handle_files_command(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("📊 Current data files in {}:", data_dir.display());

    let files = retention::list_data_files(data_dir)?;
    if files.is_empty() {
        println!("No CSV files found");
        return Ok(());
    }

    for file in &files {
        let marker = if file.is_latest { "⭐" } else { "  " };
        println!("{marker} {}", file.name());
        println!(
            "   Size: {} bytes | Modified: {}",
            file.size,
            file.modified.format("%Y-%m-%d %H:%M:%S")
        );
    }

    Ok(())
}
