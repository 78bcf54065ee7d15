//! Message protocol exchanged between the tagsmith actors
//!
//! Every actor accepts exactly one tagged request enum and answers with
//! typed reply values. Failures are data: a reply variant always carries
//! enough context (source path, reason, tracking id, the triggering
//! request) to reconstruct what happened without consulting logs.
//!
//! Workflow-initiating messages carry a [`TrackingId`] that is threaded
//! through every downstream message for that workflow instance.

use std::path::PathBuf;
use tagsmith_common::{AudioMetadata, TrackingId};
use tokio::sync::oneshot;

use crate::tracking::events::TrackingEventKind;
use crate::tracking::summary::ActivitySummary;
use crate::tracking::MediaFileTracking;

// ============================================================================
// Tracking Ledger Protocol
// ============================================================================

/// Requests accepted by the tracking ledger actor
#[derive(Debug)]
pub enum LedgerRequest {
    /// Create (or reuse) an audio-file tracking entry
    CreateTrackingEntry {
        source_path: PathBuf,
        reply: oneshot::Sender<TrackingEntryCreated>,
    },
    /// Create (or reuse) a compressed-file tracking entry
    CreateCompressedFileTrackingEntry {
        source_path: PathBuf,
        reply: oneshot::Sender<TrackingEntryCreated>,
    },
    /// Create a tracking entry for an audio file found inside a compressed
    /// file; resolves or creates the parent entry idempotently
    CreateCompressedAudioFileTrackingEntry {
        source_path: PathBuf,
        parent_source_path: PathBuf,
        reply: oneshot::Sender<CompressedAudioEntryCreated>,
    },
    /// Look up a tracking entry in either map
    LookupTrackingEntry {
        tracking_id: TrackingId,
        reply: oneshot::Sender<LookupReply>,
    },
    /// Append an event to an audio-file tracking
    RegisterTrackingEvent {
        tracking_id: TrackingId,
        event: TrackingEventKind,
        reply: oneshot::Sender<RegisterReply>,
    },
    /// Append an event to a compressed-file tracking
    RegisterCompressedFileTrackingEvent {
        tracking_id: TrackingId,
        event: TrackingEventKind,
        reply: oneshot::Sender<RegisterReply>,
    },
    /// Build an aggregate activity summary over all trackings
    GenerateSummary {
        reply: oneshot::Sender<ActivitySummary>,
    },
}

/// Reply to a create request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingEntryCreated {
    pub tracking_id: TrackingId,
}

/// Reply to a compressed-audio create request: both the new child id and
/// the (possibly pre-existing) parent id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedAudioEntryCreated {
    pub tracking_id: TrackingId,
    pub parent_tracking_id: TrackingId,
}

/// Reply to a lookup request
#[derive(Debug, Clone)]
pub enum LookupReply {
    TrackingEntryFound(MediaFileTracking),
    TrackingEntryNotFound(TrackingId),
}

/// Reply to an event registration request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterReply {
    TrackingEventSuccessfullyRegistered,
    TrackingEntryNotFound(TrackingId),
}

// ============================================================================
// Inspection Supervisor Protocol
// ============================================================================

/// Messages accepted by the inspection supervisor
#[derive(Debug)]
pub enum SupervisorMessage {
    /// Client request: inspect one file's tag metadata and resolve it to a
    /// terminal outcome
    InspectFileMetadata {
        source_path: PathBuf,
        tracking_id: TrackingId,
        reply: oneshot::Sender<InspectionOutcome>,
    },
    /// Reply from the tag-checker child
    Checker(TagCheckReply),
    /// Reply from the enricher child
    Enricher(EnrichmentReply),
}

/// Terminal outcome reported to the original requester
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectionOutcome {
    /// Metadata is complete (possibly after enrichment)
    FileMetadataAvailable {
        source_path: PathBuf,
        metadata: AudioMetadata,
        tracking_id: TrackingId,
    },
    /// Metadata is incomplete and offline mode forbids enrichment
    FileMetadataNotFullyAvailable {
        source_path: PathBuf,
        metadata: AudioMetadata,
        tracking_id: TrackingId,
    },
    /// The check or enrichment step failed outright
    FileMetadataEvaluationFailed {
        source_path: PathBuf,
        reason: String,
        tracking_id: TrackingId,
    },
}

impl InspectionOutcome {
    pub fn tracking_id(&self) -> TrackingId {
        match self {
            InspectionOutcome::FileMetadataAvailable { tracking_id, .. }
            | InspectionOutcome::FileMetadataNotFullyAvailable { tracking_id, .. }
            | InspectionOutcome::FileMetadataEvaluationFailed { tracking_id, .. } => *tracking_id,
        }
    }
}

// ============================================================================
// Tag-Checker Child Protocol
// ============================================================================

/// Request forwarded by the supervisor to the tag-checker child
#[derive(Debug, Clone)]
pub struct CheckFileMetadata {
    pub source_path: PathBuf,
    pub tracking_id: TrackingId,
}

/// Replies produced by the tag-check service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCheckReply {
    FileMetadataIsComplete {
        source_path: PathBuf,
        metadata: AudioMetadata,
        tracking_id: TrackingId,
    },
    FileMetadataIsIncomplete {
        source_path: PathBuf,
        metadata: AudioMetadata,
        tracking_id: TrackingId,
    },
    FileMetadataCouldNotBeChecked {
        source_path: PathBuf,
        reason: String,
        tracking_id: TrackingId,
    },
}

impl TagCheckReply {
    pub fn tracking_id(&self) -> TrackingId {
        match self {
            TagCheckReply::FileMetadataIsComplete { tracking_id, .. }
            | TagCheckReply::FileMetadataIsIncomplete { tracking_id, .. }
            | TagCheckReply::FileMetadataCouldNotBeChecked { tracking_id, .. } => *tracking_id,
        }
    }
}

// ============================================================================
// Enricher Child Protocol
// ============================================================================

/// Requests forwarded by the supervisor to the enricher child
#[derive(Debug, Clone)]
pub enum EnrichmentRequest {
    /// Fill fields the file's own tags are missing from the external source
    FillUpMissingMetadataFields {
        source_path: PathBuf,
        metadata: AudioMetadata,
        tracking_id: TrackingId,
    },
    /// Re-fetch and override all tags from the external source
    OverrideFileMetadata {
        source_path: PathBuf,
        metadata: AudioMetadata,
        tracking_id: TrackingId,
    },
}

/// Replies produced by the metadata-enrichment service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentReply {
    FileMetadataSuccessfullyFilled {
        source_path: PathBuf,
        metadata: AudioMetadata,
        tracking_id: TrackingId,
    },
    FillUpMissingMetadataFieldsFailed {
        source_path: PathBuf,
        reason: String,
        tracking_id: TrackingId,
    },
    OverrideFileMetadataDone {
        source_path: PathBuf,
        metadata: AudioMetadata,
        tracking_id: TrackingId,
    },
    OverrideFileMetadataFailed {
        source_path: PathBuf,
        reason: String,
        tracking_id: TrackingId,
    },
    /// The external lookup service itself is unreachable or broken
    MusicBrainzServiceFailed {
        source_path: PathBuf,
        reason: String,
        tracking_id: TrackingId,
    },
}

impl EnrichmentReply {
    pub fn tracking_id(&self) -> TrackingId {
        match self {
            EnrichmentReply::FileMetadataSuccessfullyFilled { tracking_id, .. }
            | EnrichmentReply::FillUpMissingMetadataFieldsFailed { tracking_id, .. }
            | EnrichmentReply::OverrideFileMetadataDone { tracking_id, .. }
            | EnrichmentReply::OverrideFileMetadataFailed { tracking_id, .. }
            | EnrichmentReply::MusicBrainzServiceFailed { tracking_id, .. } => *tracking_id,
        }
    }
}

// ============================================================================
// Folder Materializer Protocol
// ============================================================================

/// Request to materialize a target folder from resolved metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFolderFromMetadata {
    pub source_file: PathBuf,
    pub metadata: AudioMetadata,
    pub base_dir: PathBuf,
    pub tracking_id: TrackingId,
}

/// Requests accepted by the materializer actor
#[derive(Debug)]
pub enum MaterializerRequest {
    CreateFolderFromMetadata {
        request: CreateFolderFromMetadata,
        reply: oneshot::Sender<MaterializerReply>,
    },
}

/// Reply from the materializer
///
/// The failure variant preserves the triggering request so the caller can
/// diagnose or re-issue it without reconstructing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializerReply {
    FolderFromMetadataSuccessfullyCreated {
        source_file: PathBuf,
        metadata: AudioMetadata,
        new_path: PathBuf,
        tracking_id: TrackingId,
    },
    CreateFolderFromMetadataFailed {
        request: CreateFolderFromMetadata,
        reason: String,
    },
}
