//! Folder materializer actor
//!
//! Turns resolved metadata into filesystem side effects: derives an
//! `Artist/Album` directory under the base dir, normalizes segment casing
//! so inconsistently-tagged files land in one folder, and creates the
//! directories recursively. Pre-existing directories are not an error.
//!
//! Failures preserve the triggering request and a reason in the reply, and
//! are registered with the tracking ledger alongside successes.

use std::path::{Path, PathBuf};
use tagsmith_common::{AudioMetadata, Error, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::protocol::{CreateFolderFromMetadata, MaterializerReply, MaterializerRequest};
use crate::tracking::ledger::LedgerHandle;
use crate::tracking::TrackingEventKind;

const ACTOR_NAME: &str = "folder-materializer";

/// Cloneable handle to the materializer actor
#[derive(Debug, Clone)]
pub struct MaterializerHandle {
    tx: mpsc::Sender<MaterializerRequest>,
}

impl MaterializerHandle {
    /// Spawn the materializer; outcomes are registered with `ledger`
    pub fn spawn(ledger: LedgerHandle, mailbox_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(mailbox_capacity);
        tokio::spawn(run(ledger, rx));
        Self { tx }
    }

    /// Create the target folder for one file's metadata
    pub async fn create_folder_from_metadata(
        &self,
        request: CreateFolderFromMetadata,
    ) -> Result<MaterializerReply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(MaterializerRequest::CreateFolderFromMetadata {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| Error::ActorUnavailable(ACTOR_NAME))?;
        reply_rx
            .await
            .map_err(|_| Error::ActorUnavailable(ACTOR_NAME))
    }
}

async fn run(ledger: LedgerHandle, mut inbox: mpsc::Receiver<MaterializerRequest>) {
    info!("Folder materializer started");

    while let Some(message) = inbox.recv().await {
        match message {
            MaterializerRequest::CreateFolderFromMetadata { request, reply } => {
                let outcome = materialize(&ledger, request).await;
                let _ = reply.send(outcome);
            }
        }
    }

    info!("Folder materializer stopped");
}

async fn materialize(
    ledger: &LedgerHandle,
    request: CreateFolderFromMetadata,
) -> MaterializerReply {
    let new_path = match target_dir(&request.base_dir, &request.metadata) {
        Ok(path) => path,
        Err(reason) => return failed(ledger, request, reason).await,
    };

    match tokio::fs::create_dir_all(&new_path).await {
        Ok(()) => {
            debug!(
                tracking_id = %request.tracking_id,
                path = %new_path.display(),
                "Target folder materialized"
            );
            register(
                ledger,
                &request,
                TrackingEventKind::FolderCreated {
                    path: new_path.clone(),
                },
            )
            .await;
            MaterializerReply::FolderFromMetadataSuccessfullyCreated {
                source_file: request.source_file,
                metadata: request.metadata,
                new_path,
                tracking_id: request.tracking_id,
            }
        }
        Err(e) => {
            failed(
                ledger,
                request,
                format!("Cannot create directory {}: {}", new_path.display(), e),
            )
            .await
        }
    }
}

async fn failed(
    ledger: &LedgerHandle,
    request: CreateFolderFromMetadata,
    reason: String,
) -> MaterializerReply {
    warn!(
        tracking_id = %request.tracking_id,
        source = %request.source_file.display(),
        reason,
        "Folder materialization failed"
    );
    register(
        ledger,
        &request,
        TrackingEventKind::FolderCreationFailed {
            reason: reason.clone(),
        },
    )
    .await;
    MaterializerReply::CreateFolderFromMetadataFailed { request, reason }
}

async fn register(ledger: &LedgerHandle, request: &CreateFolderFromMetadata, event: TrackingEventKind) {
    if let Err(e) = ledger
        .register_tracking_event(request.tracking_id, event)
        .await
    {
        warn!(
            tracking_id = %request.tracking_id,
            error = %e,
            "Tracking ledger unreachable"
        );
    }
}

/// Derive `base/Artist/Album`; missing fields are a typed failure, never
/// invented segments
fn target_dir(base_dir: &Path, metadata: &AudioMetadata) -> std::result::Result<PathBuf, String> {
    let artist = metadata
        .artist
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| "Metadata has no artist to derive a folder from".to_string())?;
    let album = metadata
        .album
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| "Metadata has no album to derive a folder from".to_string())?;

    Ok(base_dir
        .join(capitalize_words(artist))
        .join(capitalize_words(album)))
}

/// Normalize one path segment: each word first-letter-uppercased, rest
/// lowercased, so "CAPITAL ARTIST" and "capital artist" collapse to the
/// same "Capital Artist" folder
fn capitalize_words(segment: &str) -> String {
    segment
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Tests
// ============================================================================
