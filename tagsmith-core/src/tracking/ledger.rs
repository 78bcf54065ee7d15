//! Tracking Ledger actor
//!
//! Single authoritative store mapping [`TrackingId`] → [`MediaFileTracking`].
//! The actor exclusively owns two maps (audio trackings and compressed-file
//! trackings); no other actor touches them except through request messages,
//! so no locks are needed.
//!
//! Ids are derived deterministically from the descriptor kind and source
//! path, which makes entry creation idempotent: creating a tracking for a
//! path that is already tracked reuses the existing entry instead of
//! resetting its history.

use std::collections::HashMap;
use std::path::PathBuf;
use tagsmith_common::{Error, Result, TrackingId};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::protocol::{
    CompressedAudioEntryCreated, LedgerRequest, LookupReply, RegisterReply, TrackingEntryCreated,
};
use crate::tracking::summary::ActivitySummary;
use crate::tracking::{Descriptor, MediaFileTracking, TrackingEventKind};

const ACTOR_NAME: &str = "tracking-ledger";

// ============================================================================
// Ledger State
// ============================================================================

/// The maps the ledger actor owns; kept separate from the mailbox loop so
/// the semantics are testable synchronously
#[derive(Debug, Default)]
struct LedgerState {
    audio: HashMap<TrackingId, MediaFileTracking>,
    compressed: HashMap<TrackingId, MediaFileTracking>,
}

impl LedgerState {
    fn create_audio_entry(&mut self, source_path: PathBuf) -> TrackingId {
        let id = TrackingId::derive("audio", &source_path);
        self.audio
            .entry(id)
            .or_insert_with(|| MediaFileTracking::new(Descriptor::AudioFile { source_path }));
        id
    }

    fn create_compressed_entry(&mut self, source_path: PathBuf) -> TrackingId {
        let id = TrackingId::derive("compressed", &source_path);
        self.compressed
            .entry(id)
            .or_insert_with(|| MediaFileTracking::new(Descriptor::CompressedFile { source_path }));
        id
    }

    /// Create a child entry for an audio file inside an archive
    ///
    /// The parent compressed-file entry is resolved or created first; the
    /// deterministic id makes repeated calls with the same parent path
    /// reuse one parent entry. The child-found event is appended to the
    /// parent only when the child is new, so re-announcing the same child
    /// does not duplicate history.
    fn create_compressed_audio_entry(
        &mut self,
        source_path: PathBuf,
        parent_source_path: PathBuf,
    ) -> CompressedAudioEntryCreated {
        let parent_id = self.create_compressed_entry(parent_source_path);
        let child_id = TrackingId::derive("compressed_audio", &source_path);

        if !self.audio.contains_key(&child_id) {
            self.audio.insert(
                child_id,
                MediaFileTracking::new(Descriptor::CompressedAudioFile {
                    source_path,
                    parent: parent_id,
                }),
            );
            // Parent was just resolved or created above, so this cannot miss
            if let Some(parent) = self.compressed.get_mut(&parent_id) {
                parent.append(TrackingEventKind::CompressedAudioFileFound { child: child_id });
            }
        }

        CompressedAudioEntryCreated {
            tracking_id: child_id,
            parent_tracking_id: parent_id,
        }
    }

    /// Look up an id in both maps; audio entries shadow nothing because the
    /// kind tag keeps the id spaces disjoint
    fn lookup(&self, tracking_id: TrackingId) -> LookupReply {
        self.audio
            .get(&tracking_id)
            .or_else(|| self.compressed.get(&tracking_id))
            .map(|tracking| LookupReply::TrackingEntryFound(tracking.clone()))
            .unwrap_or(LookupReply::TrackingEntryNotFound(tracking_id))
    }

    fn register_event(
        &mut self,
        tracking_id: TrackingId,
        event: TrackingEventKind,
    ) -> RegisterReply {
        match self.audio.get_mut(&tracking_id) {
            Some(tracking) => {
                tracking.append(event);
                RegisterReply::TrackingEventSuccessfullyRegistered
            }
            None => RegisterReply::TrackingEntryNotFound(tracking_id),
        }
    }

    fn register_compressed_event(
        &mut self,
        tracking_id: TrackingId,
        event: TrackingEventKind,
    ) -> RegisterReply {
        match self.compressed.get_mut(&tracking_id) {
            Some(tracking) => {
                tracking.append(event);
                RegisterReply::TrackingEventSuccessfullyRegistered
            }
            None => RegisterReply::TrackingEntryNotFound(tracking_id),
        }
    }

    fn summarize(&self) -> ActivitySummary {
        ActivitySummary::build(&self.audio, &self.compressed)
    }
}

// ============================================================================
// Actor Loop
// ============================================================================

async fn run(mut state: LedgerState, mut inbox: mpsc::Receiver<LedgerRequest>) {
    info!("Tracking ledger started");

    while let Some(request) = inbox.recv().await {
        match request {
            LedgerRequest::CreateTrackingEntry { source_path, reply } => {
                let tracking_id = state.create_audio_entry(source_path);
                debug!(%tracking_id, "Audio tracking entry created");
                let _ = reply.send(TrackingEntryCreated { tracking_id });
            }
            LedgerRequest::CreateCompressedFileTrackingEntry { source_path, reply } => {
                let tracking_id = state.create_compressed_entry(source_path);
                debug!(%tracking_id, "Compressed-file tracking entry created");
                let _ = reply.send(TrackingEntryCreated { tracking_id });
            }
            LedgerRequest::CreateCompressedAudioFileTrackingEntry {
                source_path,
                parent_source_path,
                reply,
            } => {
                let created = state.create_compressed_audio_entry(source_path, parent_source_path);
                debug!(
                    tracking_id = %created.tracking_id,
                    parent = %created.parent_tracking_id,
                    "Compressed-audio tracking entry created"
                );
                let _ = reply.send(created);
            }
            LedgerRequest::LookupTrackingEntry { tracking_id, reply } => {
                let _ = reply.send(state.lookup(tracking_id));
            }
            LedgerRequest::RegisterTrackingEvent {
                tracking_id,
                event,
                reply,
            } => {
                let result = state.register_event(tracking_id, event);
                if matches!(result, RegisterReply::TrackingEntryNotFound(_)) {
                    warn!(%tracking_id, "Event registration against unknown tracking");
                }
                let _ = reply.send(result);
            }
            LedgerRequest::RegisterCompressedFileTrackingEvent {
                tracking_id,
                event,
                reply,
            } => {
                let result = state.register_compressed_event(tracking_id, event);
                if matches!(result, RegisterReply::TrackingEntryNotFound(_)) {
                    warn!(%tracking_id, "Event registration against unknown compressed tracking");
                }
                let _ = reply.send(result);
            }
            LedgerRequest::GenerateSummary { reply } => {
                // Reflects ledger state at the moment this message is
                // processed; not synchronized with in-flight supervisors
                let _ = reply.send(state.summarize());
            }
        }
    }

    info!("Tracking ledger stopped (all handles dropped)");
}

// ============================================================================
// Handle
// ============================================================================

/// Cloneable handle for sending requests to the ledger actor
#[derive(Debug, Clone)]
pub struct LedgerHandle {
    tx: mpsc::Sender<LedgerRequest>,
}

impl LedgerHandle {
    /// Spawn the ledger actor and return a handle to it
    pub fn spawn(mailbox_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(mailbox_capacity);
        tokio::spawn(run(LedgerState::default(), rx));
        Self { tx }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> LedgerRequest,
    ) -> Result<R> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| Error::ActorUnavailable(ACTOR_NAME))?;
        reply_rx
            .await
            .map_err(|_| Error::ActorUnavailable(ACTOR_NAME))
    }

    pub async fn create_tracking_entry(&self, source_path: PathBuf) -> Result<TrackingId> {
        let created = self
            .request(|reply| LedgerRequest::CreateTrackingEntry { source_path, reply })
            .await?;
        Ok(created.tracking_id)
    }

    pub async fn create_compressed_file_tracking_entry(
        &self,
        source_path: PathBuf,
    ) -> Result<TrackingId> {
        let created = self
            .request(|reply| LedgerRequest::CreateCompressedFileTrackingEntry {
                source_path,
                reply,
            })
            .await?;
        Ok(created.tracking_id)
    }

    pub async fn create_compressed_audio_file_tracking_entry(
        &self,
        source_path: PathBuf,
        parent_source_path: PathBuf,
    ) -> Result<CompressedAudioEntryCreated> {
        self.request(|reply| LedgerRequest::CreateCompressedAudioFileTrackingEntry {
            source_path,
            parent_source_path,
            reply,
        })
        .await
    }

    pub async fn lookup_tracking_entry(&self, tracking_id: TrackingId) -> Result<LookupReply> {
        self.request(|reply| LedgerRequest::LookupTrackingEntry { tracking_id, reply })
            .await
    }

    pub async fn register_tracking_event(
        &self,
        tracking_id: TrackingId,
        event: TrackingEventKind,
    ) -> Result<RegisterReply> {
        self.request(|reply| LedgerRequest::RegisterTrackingEvent {
            tracking_id,
            event,
            reply,
        })
        .await
    }

    pub async fn register_compressed_file_tracking_event(
        &self,
        tracking_id: TrackingId,
        event: TrackingEventKind,
    ) -> Result<RegisterReply> {
        self.request(|reply| LedgerRequest::RegisterCompressedFileTrackingEvent {
            tracking_id,
            event,
            reply,
        })
        .await
    }

    pub async fn generate_summary(&self) -> Result<ActivitySummary> {
        self.request(|reply| LedgerRequest::GenerateSummary { reply })
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
