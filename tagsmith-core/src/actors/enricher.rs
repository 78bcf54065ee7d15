//! Enricher child actor
//!
//! Mailbox around a [`MetadataService`]. Handles the two enrichment shapes
//! (fill-up of missing fields, full tag override) under the configured
//! timeout; expiry synthesizes the matching failure reply. Replies are
//! posted over the supervisor's unbounded reply channel: the child never
//! blocks on the supervisor, so the bounded request mailboxes cannot form
//! a send cycle under load.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::protocol::{EnrichmentReply, EnrichmentRequest, SupervisorMessage};
use crate::services::MetadataService;

/// Handle for forwarding enrichment requests to the enricher child
#[derive(Debug, Clone)]
pub struct EnricherHandle {
    tx: mpsc::Sender<EnrichmentRequest>,
}

impl EnricherHandle {
    /// Spawn the child actor; replies go to `supervisor`
    pub fn spawn(
        service: Arc<dyn MetadataService>,
        supervisor: mpsc::UnboundedSender<SupervisorMessage>,
        request_timeout: Duration,
        mailbox_capacity: usize,
    ) -> Self {
        let (tx, rx) = mpsc::channel(mailbox_capacity);
        tokio::spawn(run(service, supervisor, request_timeout, rx));
        Self { tx }
    }

    pub(crate) async fn send(
        &self,
        request: EnrichmentRequest,
    ) -> Result<(), mpsc::error::SendError<EnrichmentRequest>> {
        self.tx.send(request).await
    }
}

async fn run(
    service: Arc<dyn MetadataService>,
    supervisor: mpsc::UnboundedSender<SupervisorMessage>,
    request_timeout: Duration,
    mut inbox: mpsc::Receiver<EnrichmentRequest>,
) {
    info!(service = service.name(), "Enricher started");

    while let Some(request) = inbox.recv().await {
        let reply = match request {
            EnrichmentRequest::FillUpMissingMetadataFields {
                source_path,
                metadata,
                tracking_id,
            } => {
                debug!(%tracking_id, path = %source_path.display(), "Filling up missing metadata fields");
                match tokio::time::timeout(
                    request_timeout,
                    service.fill_up(&source_path, metadata, tracking_id),
                )
                .await
                {
                    Ok(reply) => reply,
                    Err(_) => EnrichmentReply::FillUpMissingMetadataFieldsFailed {
                        source_path,
                        reason: format!(
                            "Metadata fill-up timed out after {}ms",
                            request_timeout.as_millis()
                        ),
                        tracking_id,
                    },
                }
            }
            EnrichmentRequest::OverrideFileMetadata {
                source_path,
                metadata,
                tracking_id,
            } => {
                debug!(%tracking_id, path = %source_path.display(), "Overriding file metadata");
                match tokio::time::timeout(
                    request_timeout,
                    service.override_tags(&source_path, metadata, tracking_id),
                )
                .await
                {
                    Ok(reply) => reply,
                    Err(_) => EnrichmentReply::OverrideFileMetadataFailed {
                        source_path,
                        reason: format!(
                            "Metadata override timed out after {}ms",
                            request_timeout.as_millis()
                        ),
                        tracking_id,
                    },
                }
            }
        };

        if supervisor.send(SupervisorMessage::Enricher(reply)).is_err() {
            debug!("Supervisor mailbox closed, enricher shutting down");
            break;
        }
    }

    info!("Enricher stopped");
}
