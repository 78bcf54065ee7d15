//! Dead-letter sink for marooned messages
//!
//! A marooned message is one an actor receives but cannot attribute to a
//! live workflow: a child reply for an unknown tracking id, a reply
//! arriving in the wrong phase, a duplicate request. These are routed here
//! and logged instead of being silently dropped or crashing the actor.

use tagsmith_common::TrackingId;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// A message that reached an actor which could not handle it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaroonedMessage {
    /// Name of the actor that marooned the message
    pub actor: &'static str,
    /// Human-readable description of the message and why it was marooned
    pub detail: String,
    /// The workflow the message claimed to belong to, if any
    pub tracking_id: Option<TrackingId>,
}

/// Cloneable handle to the dead-letter sink
#[derive(Debug, Clone)]
pub struct DeadLetterSink {
    tx: mpsc::Sender<MaroonedMessage>,
}

impl DeadLetterSink {
    /// Spawn the default sink: every marooned message is logged at warn
    pub fn spawn(mailbox_capacity: usize) -> Self {
        let (sink, mut rx) = Self::channel(mailbox_capacity);
        tokio::spawn(async move {
            while let Some(marooned) = rx.recv().await {
                warn!(
                    actor = marooned.actor,
                    tracking_id = ?marooned.tracking_id,
                    "Marooned message: {}",
                    marooned.detail
                );
            }
            info!("Dead-letter sink stopped");
        });
        sink
    }

    /// Create a sink whose receiver the caller drains itself; used by tests
    /// and by embedders that want to observe marooned traffic
    pub fn channel(mailbox_capacity: usize) -> (Self, mpsc::Receiver<MaroonedMessage>) {
        let (tx, rx) = mpsc::channel(mailbox_capacity);
        (Self { tx }, rx)
    }

    /// Report a marooned message; best effort, never fails the caller
    pub async fn report(
        &self,
        actor: &'static str,
        tracking_id: Option<TrackingId>,
        detail: impl Into<String>,
    ) {
        let marooned = MaroonedMessage {
            actor,
            detail: detail.into(),
            tracking_id,
        };
        if self.tx.send(marooned).await.is_err() {
            warn!(actor, "Dead-letter sink unavailable, marooned message dropped");
        }
    }
}
