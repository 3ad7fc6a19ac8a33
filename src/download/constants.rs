//! Constants for the download module (timeouts, pacing, naming).

use std::time::Duration;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes between body chunks).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default interval between two download task starts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Default directory tracks are saved into, relative to the working directory.
pub const DEFAULT_DOWNLOAD_DIR: &str = "download";

/// Extension appended to every derived track file name.
pub const TRACK_EXTENSION: &str = ".m4a";

/// Suffix of the in-progress file a track is streamed into before it is renamed.
pub const PARTIAL_SUFFIX: &str = ".part";

/// Leading manifest entries that are not music and get skipped by default.
pub const DEFAULT_SKIP_LEADING: usize = 5;

/// Trailing manifest entries that are not music and get skipped by default.
pub const DEFAULT_SKIP_TRAILING: usize = 1;
