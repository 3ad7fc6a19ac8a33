//! Filename derivation for downloaded tracks.
//!
//! Track titles are normalized into a lowercase ASCII alphanumeric stem with
//! the fixed [`TRACK_EXTENSION`]. The mapping is lossy: two titles that only
//! differ in punctuation, case, or non-ASCII characters share a save path.

use std::path::{Path, PathBuf};

use super::constants::{PARTIAL_SUFFIX, TRACK_EXTENSION};

/// Derives the file name a track with `title` is saved under.
///
/// The title is lowercased, then everything except ASCII lowercase letters
/// and digits is dropped, then [`TRACK_EXTENSION`] is appended.
///
/// # Examples
///
/// ```
/// use playlist_core::derive_name;
///
/// assert_eq!(derive_name("Hello, World! 2.0"), "helloworld20.m4a");
/// assert_eq!(derive_name("Café Theme"), "caftheme.m4a");
/// ```
#[must_use]
pub fn derive_name(title: &str) -> String {
    let mut name: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    name.push_str(TRACK_EXTENSION);
    name
}

/// Joins the derived name of `title` onto `download_dir`.
#[must_use]
pub fn derive_save_path(download_dir: &Path, title: &str) -> PathBuf {
    download_dir.join(derive_name(title))
}

/// Path of the in-progress file used while `save_path` is being downloaded.
pub(crate) fn partial_path(save_path: &Path) -> PathBuf {
    let mut raw = save_path.as_os_str().to_os_string();
    raw.push(PARTIAL_SUFFIX);
    PathBuf::from(raw)
}
