//! Playlist Downloader Core Library
//!
//! This library provides the core functionality for the playlist downloader,
//! which mirrors the tracks listed in a remote XML playlist manifest into a
//! local directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`manifest`] - Manifest fetching and playlist parsing
//! - [`download`] - HTTP client, pacing, and the concurrent download dispatcher
//! - [`app`] - Run configuration and the fetch → parse → dispatch pipeline

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod download;
pub mod manifest;
mod user_agent;

// Re-export commonly used types
pub use app::{DEFAULT_MANIFEST_URL, RunConfig, RunError, run};
pub use download::{
    DEFAULT_DOWNLOAD_DIR, DEFAULT_INTERVAL, DirectoryStore, DispatchError, DispatchReport,
    Dispatcher, DownloadError, DownloadStore, FailurePolicy, HttpClient, RateLimiter,
    TrackFailure, TrackSelection, derive_name, derive_save_path,
};
pub use manifest::{ManifestError, Playlist, Track, fetch_playlist, parse_playlist};
