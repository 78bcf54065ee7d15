//! Tracking events: immutable state-transition records

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tagsmith_common::TrackingId;

/// One state transition in a tracking history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackingEventKind {
    /// The supervisor started inspecting the file's metadata
    MetadataInspectionStarted,
    /// Metadata is complete, either from the file's own tags or after
    /// enrichment
    MetadataAvailable,
    /// The file's own tags are incomplete; enrichment was delegated
    FileMetadataIncomplete,
    /// Metadata is incomplete and offline mode forbids enrichment
    MetadataNotAvailable,
    /// The check or enrichment step failed
    MetadataEvaluationFailed { reason: String },
    /// An audio file was discovered inside this compressed file
    CompressedAudioFileFound { child: TrackingId },
    /// The materializer created the target folder
    FolderCreated { path: PathBuf },
    /// The materializer could not create the target folder
    FolderCreationFailed { reason: String },
}

impl TrackingEventKind {
    /// Stable snake_case label used for summary aggregation
    pub fn label(&self) -> &'static str {
        match self {
            TrackingEventKind::MetadataInspectionStarted => "metadata_inspection_started",
            TrackingEventKind::MetadataAvailable => "metadata_available",
            TrackingEventKind::FileMetadataIncomplete => "file_metadata_incomplete",
            TrackingEventKind::MetadataNotAvailable => "metadata_not_available",
            TrackingEventKind::MetadataEvaluationFailed { .. } => "metadata_evaluation_failed",
            TrackingEventKind::CompressedAudioFileFound { .. } => "compressed_audio_file_found",
            TrackingEventKind::FolderCreated { .. } => "folder_created",
            TrackingEventKind::FolderCreationFailed { .. } => "folder_creation_failed",
        }
    }
}

/// A [`TrackingEventKind`] stamped with the time it was appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingEvent {
    pub kind: TrackingEventKind,
    pub occurred_at: DateTime<Utc>,
}

impl TrackingEvent {
    pub fn now(kind: TrackingEventKind) -> Self {
        Self {
            kind,
            occurred_at: Utc::now(),
        }
    }
}
