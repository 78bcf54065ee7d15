//! Audio metadata value type
//!
//! The metadata bundle that flows through check/enrich/materialize messages.
//! All fields are optional: a freshly inspected file may carry any subset,
//! and enrichment fills gaps without clobbering values already present.

use serde::{Deserialize, Serialize};

/// Tag metadata for one audio file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track_number: Option<u32>,
    pub genre: Option<String>,
    pub year: Option<u32>,
}

impl AudioMetadata {
    /// True when every field the organizer cares about is present
    pub fn is_complete(&self) -> bool {
        self.title.is_some()
            && self.artist.is_some()
            && self.album.is_some()
            && self.track_number.is_some()
    }

    /// Fill fields missing here from `other`, leaving present values alone
    pub fn fill_missing_from(&mut self, other: &AudioMetadata) {
        if self.title.is_none() {
            self.title = other.title.clone();
        }
        if self.artist.is_none() {
            self.artist = other.artist.clone();
        }
        if self.album.is_none() {
            self.album = other.album.clone();
        }
        if self.track_number.is_none() {
            self.track_number = other.track_number;
        }
        if self.genre.is_none() {
            self.genre = other.genre.clone();
        }
        if self.year.is_none() {
            self.year = other.year;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> AudioMetadata {
        AudioMetadata {
            title: Some("Title".into()),
            artist: Some("Artist".into()),
            album: Some("Album".into()),
            track_number: Some(7),
            genre: Some("Jazz".into()),
            year: Some(1959),
        }
    }

    #[test]
    fn completeness_requires_core_fields() {
        assert!(full().is_complete());

        let mut missing_track = full();
        missing_track.track_number = None;
        assert!(!missing_track.is_complete());

        // Genre and year are optional extras
        let mut no_extras = full();
        no_extras.genre = None;
        no_extras.year = None;
        assert!(no_extras.is_complete());
    }

    #[test]
    fn fill_missing_preserves_existing_values() {
        let mut partial = AudioMetadata {
            artist: Some("Original Artist".into()),
            ..Default::default()
        };
        partial.fill_missing_from(&full());

        assert_eq!(partial.artist.as_deref(), Some("Original Artist"));
        assert_eq!(partial.title.as_deref(), Some("Title"));
        assert_eq!(partial.track_number, Some(7));
    }
}
