//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use playlist_core::download::{
    CONNECT_TIMEOUT_SECS, DEFAULT_DOWNLOAD_DIR, DEFAULT_SKIP_LEADING, DEFAULT_SKIP_TRAILING,
    READ_TIMEOUT_SECS,
};
use playlist_core::{DEFAULT_MANIFEST_URL, FailurePolicy, RunConfig, TrackSelection};

/// Mirror the tracks of a remote XML playlist manifest to local storage.
///
/// Tracks already present in the download directory are skipped, so the
/// tool can be re-run to pick up new entries.
#[derive(Parser, Debug)]
#[command(name = "playlist-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// URL of the XML playlist manifest
    #[arg(short = 'u', long, default_value = DEFAULT_MANIFEST_URL)]
    pub manifest_url: String,

    /// Directory tracks are saved into (created if missing)
    #[arg(short = 'd', long, default_value = DEFAULT_DOWNLOAD_DIR)]
    pub download_dir: PathBuf,

    /// Minimum delay between two download starts in milliseconds (0 to disable, max 60000)
    #[arg(short = 'i', long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub interval_ms: u64,

    /// Manifest entries to skip at the start of the track list
    #[arg(long, default_value_t = DEFAULT_SKIP_LEADING)]
    pub skip_leading: usize,

    /// Manifest entries to skip at the end of the track list
    #[arg(long, default_value_t = DEFAULT_SKIP_TRAILING)]
    pub skip_trailing: usize,

    /// Keep downloading after a failure and report all failures at the end
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// HTTP connect timeout in seconds
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// HTTP read timeout in seconds
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=86400))]
    pub read_timeout: u64,
}

impl Args {
    /// Builds the run configuration these arguments describe.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            manifest_url: self.manifest_url.clone(),
            download_dir: self.download_dir.clone(),
            interval: Duration::from_millis(self.interval_ms),
            selection: TrackSelection::new(self.skip_leading, self.skip_trailing),
            failure_policy: if self.keep_going {
                FailurePolicy::Isolate
            } else {
                FailurePolicy::AbortOnFirst
            },
            connect_timeout_secs: self.connect_timeout,
            read_timeout_secs: self.read_timeout,
        }
    }
}
