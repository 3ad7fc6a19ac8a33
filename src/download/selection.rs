//! Trimming of non-music entries at either end of the manifest.

use tracing::warn;

use super::constants::{DEFAULT_SKIP_LEADING, DEFAULT_SKIP_TRAILING};
use crate::manifest::Track;

/// How many manifest entries to drop from the front and the back.
///
/// The upstream roster starts with a handful of announcement entries and
/// ends with a credits entry; [`TrackSelection::default`] removes those.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSelection {
    skip_leading: usize,
    skip_trailing: usize,
}

impl Default for TrackSelection {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_LEADING, DEFAULT_SKIP_TRAILING)
    }
}

impl TrackSelection {
    /// Drops `skip_leading` entries from the front and `skip_trailing` from the back.
    #[must_use]
    pub const fn new(skip_leading: usize, skip_trailing: usize) -> Self {
        Self {
            skip_leading,
            skip_trailing,
        }
    }

    /// Keeps every entry.
    #[must_use]
    pub const fn all() -> Self {
        Self::new(0, 0)
    }

    /// Entries dropped from the front.
    #[must_use]
    pub const fn skip_leading(&self) -> usize {
        self.skip_leading
    }

    /// Entries dropped from the back.
    #[must_use]
    pub const fn skip_trailing(&self) -> usize {
        self.skip_trailing
    }

    /// Returns the selected sub-slice of `tracks`.
    ///
    /// A list shorter than the combined trim yields an empty slice.
    #[must_use]
    pub fn apply<'a>(&self, tracks: &'a [Track]) -> &'a [Track] {
        let trimmed = self.skip_leading.saturating_add(self.skip_trailing);
        if tracks.len() < trimmed {
            warn!(
                tracks = tracks.len(),
                skip_leading = self.skip_leading,
                skip_trailing = self.skip_trailing,
                "manifest shorter than trimmed entries, nothing selected"
            );
            return &[];
        }
        &tracks[self.skip_leading..tracks.len() - self.skip_trailing]
    }
}
