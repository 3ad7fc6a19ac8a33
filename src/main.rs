//! CLI entry point for the playlist downloader.

use anyhow::{Result, bail};
use clap::Parser;
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let config = args.run_config();
    info!(
        manifest_url = %config.manifest_url,
        download_dir = %config.download_dir.display(),
        "playlist downloader starting"
    );

    let report = playlist_core::run(&config).await?;

    for failure in report.failures() {
        warn!(
            title = %failure.track.title,
            url = %failure.track.location,
            error = %failure.error,
            "track not downloaded"
        );
    }

    info!(
        selected = report.selected(),
        downloaded = report.downloaded(),
        skipped = report.skipped(),
        failed = report.failed(),
        bytes = report.bytes_written(),
        "download complete"
    );

    if !report.is_success() {
        bail!("{} of {} tracks failed to download", report.failed(), report.selected());
    }

    Ok(())
}
