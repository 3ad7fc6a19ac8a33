//! Concurrent download dispatcher with paced task starts.
//!
//! This module provides the [`Dispatcher`], which turns a list of playlist
//! tracks into one Tokio task per track that still needs downloading. Task
//! starts are gated by a shared [`RateLimiter`]; once started, a task runs
//! independently, so the number of downloads in flight is not bounded.
//!
//! # Failure policy
//!
//! Every task reports a tagged result back to the dispatcher, which applies
//! the configured [`FailurePolicy`]:
//!
//! - [`FailurePolicy::AbortOnFirst`] (default) stops at the first failed
//!   download, aborts the tasks still running, and returns the error.
//! - [`FailurePolicy::Isolate`] lets every task finish and lists failures in
//!   the returned [`DispatchReport`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use playlist_core::{DirectoryStore, Dispatcher, HttpClient, RateLimiter, Track};
//!
//! # async fn example(tracks: Vec<Track>) -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = Dispatcher::new(
//!     HttpClient::new(),
//!     Arc::new(RateLimiter::new(Duration::from_millis(100))),
//!     Arc::new(DirectoryStore::new("download")),
//! );
//! let report = dispatcher.run(&tracks).await?;
//! println!("downloaded {}, skipped {}", report.downloaded(), report.skipped());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::rate_limiter::RateLimiter;
use super::selection::TrackSelection;
use super::store::DownloadStore;
use super::{DownloadError, HttpClient};
use crate::manifest::Track;

/// What the dispatcher does when a download fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop everything on the first failed download.
    #[default]
    AbortOnFirst,
    /// Keep going and report every failure at the end.
    Isolate,
}

/// Error type for dispatcher runs.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The download directory could not be created.
    #[error("failed to create download directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A track download failed under [`FailurePolicy::AbortOnFirst`].
    #[error("download of {title:?} failed: {source}")]
    Track {
        /// Title of the failed track.
        title: String,
        /// The download error.
        #[source]
        source: DownloadError,
    },

    /// A download task panicked under [`FailurePolicy::AbortOnFirst`].
    #[error("download task panicked: {message}")]
    TaskPanicked {
        /// Panic description from the runtime.
        message: String,
    },
}

/// A track whose download failed.
#[derive(Debug)]
pub struct TrackFailure {
    /// The track that failed.
    pub track: Track,
    /// Why it failed.
    pub error: DownloadError,
}

/// Outcome of a dispatcher run.
#[derive(Debug, Default)]
pub struct DispatchReport {
    selected: usize,
    skipped: usize,
    downloaded: usize,
    bytes_written: u64,
    panicked: usize,
    failures: Vec<TrackFailure>,
}

impl DispatchReport {
    /// Tracks left after trimming the manifest.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Tracks skipped because they were already on disk.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Tracks downloaded during this run.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.downloaded
    }

    /// Total bytes written by successful downloads.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Tracks whose download failed or whose task panicked.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len() + self.panicked
    }

    /// Failed downloads with their errors.
    #[must_use]
    pub fn failures(&self) -> &[TrackFailure] {
        &self.failures
    }

    /// True when no download failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Schedules paced, concurrent downloads for the tracks of a playlist.
#[derive(Debug)]
pub struct Dispatcher {
    client: HttpClient,
    rate_limiter: Arc<RateLimiter>,
    store: Arc<dyn DownloadStore>,
    selection: TrackSelection,
    failure_policy: FailurePolicy,
}

impl Dispatcher {
    /// Creates a dispatcher with the default selection and failure policy.
    #[must_use]
    pub fn new(
        client: HttpClient,
        rate_limiter: Arc<RateLimiter>,
        store: Arc<dyn DownloadStore>,
    ) -> Self {
        Self {
            client,
            rate_limiter,
            store,
            selection: TrackSelection::default(),
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Replaces the manifest trim applied before scheduling.
    #[must_use]
    pub fn with_selection(mut self, selection: TrackSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Replaces the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Returns the configured failure policy.
    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Returns the configured selection.
    #[must_use]
    pub fn selection(&self) -> TrackSelection {
        self.selection
    }

    /// Downloads every selected track that is not already stored.
    ///
    /// This method:
    /// 1. Prepares the download directory
    /// 2. Trims the track list with the configured selection
    /// 3. Skips tracks the store already has
    /// 4. Spawns one paced task per remaining track
    /// 5. Waits for the tasks, applying the failure policy
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::CreateDir`] if the download directory cannot
    /// be created. Under [`FailurePolicy::AbortOnFirst`] also returns
    /// [`DispatchError::Track`] or [`DispatchError::TaskPanicked`] for the
    /// first failing task; the remaining tasks are aborted first.
    #[instrument(skip(self, tracks), fields(tracks = tracks.len(), policy = ?self.failure_policy))]
    pub async fn run(&self, tracks: &[Track]) -> Result<DispatchReport, DispatchError> {
        self.store
            .prepare()
            .map_err(|source| DispatchError::CreateDir {
                path: self.store.root().to_path_buf(),
                source,
            })?;

        let selected = self.selection.apply(tracks);
        let mut report = DispatchReport {
            selected: selected.len(),
            ..DispatchReport::default()
        };

        let mut tasks = JoinSet::new();
        for track in selected {
            let save_path = self.store.save_path(track);
            if self.store.is_already_downloaded(track) {
                info!(title = %track.title, path = %save_path.display(), "skipping downloaded track");
                report.skipped += 1;
                continue;
            }

            let client = self.client.clone();
            let rate_limiter = Arc::clone(&self.rate_limiter);
            let track = track.clone();
            tasks.spawn(async move {
                rate_limiter.acquire().await;
                let result = download_track(&client, &track, &save_path).await;
                (track, result)
            });
        }

        debug!(task_count = tasks.len(), "waiting for downloads to complete");

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(bytes))) => {
                    report.downloaded += 1;
                    report.bytes_written += bytes;
                }
                Ok((track, Err(error))) => {
                    warn!(
                        title = %track.title,
                        url = %track.location,
                        filesystem = error.is_filesystem(),
                        error = %error,
                        "download failed"
                    );
                    if self.failure_policy == FailurePolicy::AbortOnFirst {
                        abort_remaining(&mut tasks).await;
                        return Err(DispatchError::Track {
                            title: track.title,
                            source: error,
                        });
                    }
                    report.failures.push(TrackFailure { track, error });
                }
                Err(join_error) => {
                    warn!(error = %join_error, "download task panicked");
                    if self.failure_policy == FailurePolicy::AbortOnFirst {
                        abort_remaining(&mut tasks).await;
                        return Err(DispatchError::TaskPanicked {
                            message: join_error.to_string(),
                        });
                    }
                    report.panicked += 1;
                }
            }
        }

        info!(
            selected = report.selected,
            skipped = report.skipped,
            downloaded = report.downloaded,
            failed = report.failed(),
            bytes = report.bytes_written,
            "dispatch complete"
        );
        Ok(report)
    }
}

async fn abort_remaining(tasks: &mut JoinSet<(Track, Result<u64, DownloadError>)>) {
    if !tasks.is_empty() {
        warn!(in_flight = tasks.len(), "aborting remaining downloads");
    }
    tasks.shutdown().await;
}

/// Downloads one track to `save_path`, returning the bytes written.
#[instrument(skip(client, track), fields(title = %track.title))]
async fn download_track(
    client: &HttpClient,
    track: &Track,
    save_path: &Path,
) -> Result<u64, DownloadError> {
    info!(path = %save_path.display(), "downloading track");
    let bytes = client.download_to_path(&track.location, save_path).await?;
    info!(path = %save_path.display(), bytes, "track saved");
    Ok(bytes)
}
