//! Playlist data model and XML deserialization.

use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument};

use super::error::ManifestError;
use crate::download::{derive_name, derive_save_path};

/// Name of the root element every manifest must carry.
const ROOT_ELEMENT: &[u8] = b"playlist";

/// One playlist entry.
///
/// Fields absent from the manifest deserialize to empty strings. A field
/// repeated inside one `<track>` keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Track {
    /// Artist or game the track is credited to.
    #[serde(deserialize_with = "last_value")]
    pub creator: String,
    /// Display title, also the source of the local file name.
    #[serde(deserialize_with = "last_value")]
    pub title: String,
    /// URL of the media file.
    #[serde(deserialize_with = "last_value")]
    pub location: String,
}

impl Track {
    /// Creates a track from its three fields.
    pub fn new(
        creator: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            creator: creator.into(),
            title: title.into(),
            location: location.into(),
        }
    }

    /// File name this track is stored under.
    #[must_use]
    pub fn file_name(&self) -> String {
        derive_name(&self.title)
    }

    /// Full path of this track inside `download_dir`.
    #[must_use]
    pub fn save_path(&self, download_dir: &Path) -> PathBuf {
        derive_save_path(download_dir, &self.title)
    }
}

/// A parsed playlist manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename = "playlist")]
pub struct Playlist {
    /// Value of the root element's `version` attribute.
    #[serde(rename = "@version", default)]
    pub version: String,

    #[serde(rename = "trackList", default)]
    track_list: TrackList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct TrackList {
    #[serde(rename = "track", default)]
    tracks: Vec<Track>,
}

impl Playlist {
    /// Tracks in manifest order.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.track_list.tracks
    }
}

fn last_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<String>::deserialize(deserializer)?;
    Ok(values.into_iter().last().unwrap_or_default())
}

/// Parses manifest bytes into a [`Playlist`].
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] when the document is not well-formed
/// XML, has no root element, or its root element is not `playlist`.
#[instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn parse_playlist(bytes: &[u8]) -> Result<Playlist, ManifestError> {
    check_root_element(bytes)?;

    let playlist: Playlist =
        quick_xml::de::from_reader(bytes).map_err(|e| ManifestError::parse(e.to_string()))?;

    debug!(
        version = %playlist.version,
        tracks = playlist.tracks().len(),
        "parsed playlist"
    );
    Ok(playlist)
}

fn check_root_element(bytes: &[u8]) -> Result<(), ManifestError> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(element) | Event::Empty(element)) => {
                let name = element.local_name();
                if name.as_ref() == ROOT_ELEMENT {
                    return Ok(());
                }
                return Err(ManifestError::parse(format!(
                    "expected root element <playlist>, found <{}>",
                    String::from_utf8_lossy(name.as_ref())
                )));
            }
            Ok(Event::Eof) => return Err(ManifestError::parse("document has no root element")),
            Ok(_) => {}
            Err(e) => return Err(ManifestError::parse(e.to_string())),
        }
        buf.clear();
    }
}
