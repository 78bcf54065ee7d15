//! File descriptors for tracked entries

use serde::Serialize;
use std::path::{Path, PathBuf};
use tagsmith_common::TrackingId;

/// What kind of file a tracking entry describes
///
/// A compressed-audio-file descriptor references its containing archive by
/// [`TrackingId`] only: relation + lookup, never ownership. The ledger owns
/// parent and child independently and the child never extends the parent's
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Descriptor {
    /// A plain audio file on disk
    AudioFile { source_path: PathBuf },
    /// A compressed file (archive) that may contain audio files
    CompressedFile { source_path: PathBuf },
    /// An audio file found inside a compressed file
    CompressedAudioFile {
        source_path: PathBuf,
        parent: TrackingId,
    },
}

impl Descriptor {
    /// Stable kind tag, also the domain input to deterministic id derivation
    pub fn kind_label(&self) -> &'static str {
        match self {
            Descriptor::AudioFile { .. } => "audio",
            Descriptor::CompressedFile { .. } => "compressed",
            Descriptor::CompressedAudioFile { .. } => "compressed_audio",
        }
    }

    pub fn source_path(&self) -> &Path {
        match self {
            Descriptor::AudioFile { source_path }
            | Descriptor::CompressedFile { source_path }
            | Descriptor::CompressedAudioFile { source_path, .. } => source_path,
        }
    }

    /// Parent archive reference, if this is a compressed-audio descriptor
    pub fn parent(&self) -> Option<TrackingId> {
        match self {
            Descriptor::CompressedAudioFile { parent, .. } => Some(*parent),
            _ => None,
        }
    }
}
