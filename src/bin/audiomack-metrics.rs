mod commands;

use clap::Parser;
use commands::{execute_command, Commands};

/// Audiomack artist and track metrics collector
#[derive(Parser)]
#[command(
    name = "audiomack-metrics",
    about = "Audiomack artist and track metrics collector",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.verbose {
        println!("🔍 Verbose mode enabled");
    }

    if let Err(e) = execute_command(args.command).await {
        eprintln!("❌ Command failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}
