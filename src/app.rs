//! Run configuration and the fetch → parse → dispatch pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, instrument};

use crate::download::{
    CONNECT_TIMEOUT_SECS, DEFAULT_DOWNLOAD_DIR, DEFAULT_INTERVAL, DirectoryStore, DispatchError,
    DispatchReport, Dispatcher, FailurePolicy, HttpClient, READ_TIMEOUT_SECS, RateLimiter,
    TrackSelection,
};
use crate::manifest::{ManifestError, fetch_playlist};

/// Manifest fetched when no URL is configured.
pub const DEFAULT_MANIFEST_URL: &str = "https://vip.aersia.net/roster.xml";

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// URL of the XML playlist manifest.
    pub manifest_url: String,
    /// Directory tracks are saved into.
    pub download_dir: PathBuf,
    /// Minimum spacing between two download starts; zero disables pacing.
    pub interval: Duration,
    /// Manifest entries dropped before scheduling.
    pub selection: TrackSelection,
    /// What to do when a download fails.
    pub failure_policy: FailurePolicy,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// HTTP read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            interval: DEFAULT_INTERVAL,
            selection: TrackSelection::default(),
            failure_policy: FailurePolicy::default(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The manifest could not be fetched or parsed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The download directory could not be prepared or a download failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Fetches the manifest and downloads its tracks according to `config`.
///
/// Nothing is written to disk when the manifest step fails.
///
/// # Errors
///
/// Returns [`RunError::Manifest`] for fetch or parse failures and
/// [`RunError::Dispatch`] for directory or (under
/// [`FailurePolicy::AbortOnFirst`]) download failures.
#[instrument(skip(config), fields(manifest_url = %config.manifest_url, download_dir = %config.download_dir.display()))]
pub async fn run(config: &RunConfig) -> Result<DispatchReport, RunError> {
    let client = HttpClient::new_with_timeouts(config.connect_timeout_secs, config.read_timeout_secs);

    let playlist = fetch_playlist(&client, &config.manifest_url).await?;

    let dispatcher = Dispatcher::new(
        client,
        Arc::new(RateLimiter::new(config.interval)),
        Arc::new(DirectoryStore::new(&config.download_dir)),
    )
    .with_selection(config.selection)
    .with_failure_policy(config.failure_policy);

    let report = dispatcher.run(playlist.tracks()).await?;
    info!(
        downloaded = report.downloaded(),
        skipped = report.skipped(),
        failed = report.failed(),
        "run finished"
    );
    Ok(report)
}
