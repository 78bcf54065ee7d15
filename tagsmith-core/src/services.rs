//! External collaborator interfaces
//!
//! The core consumes a tag-check service and a metadata-enrichment service
//! but does not implement either; production code plugs in real clients
//! (tag readers, MusicBrainz lookups), tests plug in stubs.
//!
//! Services return protocol reply values directly: a refused or failed call
//! is a reply variant, never a Rust error, so failures stay data all the
//! way to the supervisor.

use async_trait::async_trait;
use std::path::Path;
use tagsmith_common::{AudioMetadata, TrackingId};

use crate::protocol::{EnrichmentReply, TagCheckReply};

/// Reads a file's tags and judges completeness
#[async_trait]
pub trait TagCheckService: Send + Sync {
    /// Service name for logging and provenance
    fn name(&self) -> &'static str;

    /// Check one file's metadata
    ///
    /// Expected replies: `FileMetadataIsComplete`, `FileMetadataIsIncomplete`
    /// or `FileMetadataCouldNotBeChecked`, each echoing `tracking_id`.
    async fn check(&self, source_path: &Path, tracking_id: TrackingId) -> TagCheckReply;
}

/// Fetches metadata from an external source (e.g. a music-metadata lookup)
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Service name for logging and provenance
    fn name(&self) -> &'static str;

    /// Fill fields missing from `metadata` without touching present values
    async fn fill_up(
        &self,
        source_path: &Path,
        metadata: AudioMetadata,
        tracking_id: TrackingId,
    ) -> EnrichmentReply;

    /// Re-fetch all tags from the external source, overriding `metadata`
    async fn override_tags(
        &self,
        source_path: &Path,
        metadata: AudioMetadata,
        tracking_id: TrackingId,
    ) -> EnrichmentReply;
}
