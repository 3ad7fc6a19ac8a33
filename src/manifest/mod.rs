//! Playlist manifest fetching and parsing.
//!
//! The manifest is an XSPF-style XML document:
//!
//! ```text
//! <playlist version="...">
//!   <trackList>
//!     <track><creator>...</creator><title>...</title><location>...</location></track>
//!   </trackList>
//! </playlist>
//! ```
//!
//! # Example
//!
//! ```no_run
//! use playlist_core::{HttpClient, fetch_playlist};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let playlist = fetch_playlist(&client, "https://example.com/roster.xml").await?;
//! println!("{} tracks", playlist.tracks().len());
//! # Ok(())
//! # }
//! ```

mod error;
mod playlist;

pub use error::ManifestError;
pub use playlist::{Playlist, Track, parse_playlist};

use tracing::{info, instrument};

use crate::download::HttpClient;

/// Fetches the manifest at `url` and parses it.
///
/// # Errors
///
/// Returns [`ManifestError::Fetch`] when the request fails or the server
/// answers with a non-success status, and [`ManifestError::Parse`] when the
/// body is not a playlist document.
#[instrument(skip(client))]
pub async fn fetch_playlist(client: &HttpClient, url: &str) -> Result<Playlist, ManifestError> {
    let bytes = client.fetch_bytes(url).await?;
    let playlist = parse_playlist(&bytes)?;
    info!(
        version = %playlist.version,
        tracks = playlist.tracks().len(),
        "fetched manifest"
    );
    Ok(playlist)
}
