//! Track download pipeline: HTTP transfers, pacing, and dispatch.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large media files)
//! - Completed-only save paths (bodies are streamed to a `.part` file first)
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Fixed-interval pacing of download starts
//! - Existence-based skip of already downloaded tracks
//!
//! # Example
//!
//! ```no_run
//! use playlist_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let bytes = client
//!     .download_to_path("https://example.com/track.m4a", Path::new("./download/track.m4a"))
//!     .await?;
//! println!("Downloaded {bytes} bytes");
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod dispatcher;
mod error;
mod filename;
pub mod rate_limiter;
mod selection;
mod store;

pub use client::HttpClient;
pub use constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_DOWNLOAD_DIR, DEFAULT_INTERVAL, DEFAULT_SKIP_LEADING,
    DEFAULT_SKIP_TRAILING, READ_TIMEOUT_SECS, TRACK_EXTENSION,
};
pub use dispatcher::{DispatchError, DispatchReport, Dispatcher, FailurePolicy, TrackFailure};
pub use error::DownloadError;
pub use filename::{derive_name, derive_save_path};
pub use rate_limiter::RateLimiter;
pub use selection::TrackSelection;
pub use store::{DirectoryStore, DownloadStore};
