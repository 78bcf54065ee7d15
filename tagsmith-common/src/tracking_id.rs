//! Tracking identity scheme
//!
//! A [`TrackingId`] keys one workflow instance's activity history in the
//! tracking ledger. Ids derived from a source path are deterministic: the
//! same (kind, path) pair always yields the same id, which is what makes
//! parent-entry creation idempotent when several compressed audio files
//! report the same containing archive.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

/// Domain separator so derived ids can never collide with ids derived by
/// unrelated code hashing the same paths.
const DERIVE_TAG: &[u8] = b"tagsmith/tracking-id/v1";

/// Opaque identifier for one tracked workflow instance
///
/// Immutable once created; compared and hashed by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingId(Uuid);

impl TrackingId {
    /// Derive a deterministic id from a descriptor kind and source path
    ///
    /// SHA-256 over (domain tag, kind, path bytes), truncated to 16 bytes.
    pub fn derive(kind: &str, source_path: &Path) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(DERIVE_TAG);
        hasher.update([0u8]);
        hasher.update(kind.as_bytes());
        hasher.update([0u8]);
        hasher.update(source_path.to_string_lossy().as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        TrackingId(Uuid::from_bytes(bytes))
    }

    /// Generate a random id for workflows not keyed by a path
    pub fn random() -> Self {
        TrackingId(Uuid::new_v4())
    }

    /// Access the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
