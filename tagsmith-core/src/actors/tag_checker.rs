//! Tag-checker child actor
//!
//! Thin mailbox around a [`TagCheckService`]. Each check runs under the
//! configured timeout; expiry synthesizes a `FileMetadataCouldNotBeChecked`
//! reply so the supervising workflow always terminates. Replies are posted
//! over the supervisor's unbounded reply channel: the child never blocks on
//! the supervisor, so the bounded request mailboxes cannot form a send
//! cycle under load.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::protocol::{CheckFileMetadata, SupervisorMessage, TagCheckReply};
use crate::services::TagCheckService;

/// Handle for forwarding check requests to the tag-checker child
#[derive(Debug, Clone)]
pub struct TagCheckerHandle {
    tx: mpsc::Sender<CheckFileMetadata>,
}

impl TagCheckerHandle {
    /// Spawn the child actor; replies go to `supervisor`
    pub fn spawn(
        service: Arc<dyn TagCheckService>,
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
        request: CheckFileMetadata,
    ) -> Result<(), mpsc::error::SendError<CheckFileMetadata>> {
        self.tx.send(request).await
    }
}

async fn run(
    service: Arc<dyn TagCheckService>,
    supervisor: mpsc::UnboundedSender<SupervisorMessage>,
    request_timeout: Duration,
    mut inbox: mpsc::Receiver<CheckFileMetadata>,
) {
    info!(service = service.name(), "Tag checker started");

    while let Some(request) = inbox.recv().await {
        debug!(
            tracking_id = %request.tracking_id,
            path = %request.source_path.display(),
            "Checking file metadata"
        );

        let reply = match tokio::time::timeout(
            request_timeout,
            service.check(&request.source_path, request.tracking_id),
        )
        .await
        {
            Ok(reply) => reply,
            Err(_) => TagCheckReply::FileMetadataCouldNotBeChecked {
                source_path: request.source_path.clone(),
                reason: format!(
                    "Tag check timed out after {}ms",
                    request_timeout.as_millis()
                ),
                tracking_id: request.tracking_id,
            },
        };

        if supervisor.send(SupervisorMessage::Checker(reply)).is_err() {
            debug!("Supervisor mailbox closed, tag checker shutting down");
            break;
        }
    }

    info!("Tag checker stopped");
}
