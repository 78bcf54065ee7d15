//! Inspection supervisor
//!
//! Coordinates the tag-check → enrichment workflow for each file. The
//! supervisor hosts one state machine per workflow instance, keyed by
//! tracking id, and processes its mailbox sequentially, so ledger events
//! for one instance are registered in emission order.
//!
//! Per instance: `AwaitingCheck → (Filling | Overriding) → terminal`.
//!
//! - Complete metadata finalizes immediately, unless the override policy is
//!   configured, in which case the enricher re-fetches tags first.
//! - Incomplete metadata delegates to the enricher, unless offline mode is
//!   configured, in which case the outcome is terminal and the enricher is
//!   never contacted.
//! - Every failure reply is terminal; there is no retry at this layer.
//!
//! Replies that cannot be attributed to a live workflow in the right phase
//! are marooned to the dead-letter sink, never silently dropped.
//!
//! Child replies arrive over a dedicated unbounded channel, separate from
//! the bounded client mailbox. Children therefore never block on the
//! supervisor while the supervisor blocks on a full child mailbox; the
//! request channels carry backpressure without forming a send cycle.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tagsmith_common::{CoreConfig, Error, Result, TrackingId};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::actors::dead_letter::DeadLetterSink;
use crate::actors::enricher::EnricherHandle;
use crate::actors::tag_checker::TagCheckerHandle;
use crate::protocol::{
    CheckFileMetadata, EnrichmentReply, EnrichmentRequest, InspectionOutcome, RegisterReply,
    SupervisorMessage, TagCheckReply,
};
use crate::services::{MetadataService, TagCheckService};
use crate::tracking::ledger::LedgerHandle;
use crate::tracking::TrackingEventKind;

const ACTOR_NAME: &str = "inspection-supervisor";

// ============================================================================
// Workflow State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the tag checker's verdict
    AwaitingCheck,
    /// Enricher is filling missing fields
    Filling,
    /// Enricher is overriding complete tags
    Overriding,
}

#[derive(Debug)]
struct Workflow {
    source_path: PathBuf,
    phase: Phase,
    reply: oneshot::Sender<InspectionOutcome>,
}

// ============================================================================
// Supervisor Actor
// ============================================================================

struct InspectionSupervisor {
    offline: bool,
    override_tags: bool,
    ledger: LedgerHandle,
    checker: TagCheckerHandle,
    enricher: EnricherHandle,
    dead_letters: DeadLetterSink,
    workflows: HashMap<TrackingId, Workflow>,
}

impl InspectionSupervisor {
    async fn handle(&mut self, message: SupervisorMessage) {
        match message {
            SupervisorMessage::InspectFileMetadata {
                source_path,
                tracking_id,
                reply,
            } => self.handle_inspect(source_path, tracking_id, reply).await,
            SupervisorMessage::Checker(check_reply) => self.handle_checker(check_reply).await,
            SupervisorMessage::Enricher(enrich_reply) => self.handle_enricher(enrich_reply).await,
        }
    }

    async fn handle_inspect(
        &mut self,
        source_path: PathBuf,
        tracking_id: TrackingId,
        reply: oneshot::Sender<InspectionOutcome>,
    ) {
        if self.workflows.contains_key(&tracking_id) {
            self.dead_letters
                .report(
                    ACTOR_NAME,
                    Some(tracking_id),
                    "Duplicate InspectFileMetadata for a workflow already in progress",
                )
                .await;
            let _ = reply.send(InspectionOutcome::FileMetadataEvaluationFailed {
                source_path,
                reason: "Inspection already in progress for this tracking id".into(),
                tracking_id,
            });
            return;
        }

        debug!(%tracking_id, path = %source_path.display(), "Inspection started");
        self.notify_ledger(tracking_id, TrackingEventKind::MetadataInspectionStarted)
            .await;

        let request = CheckFileMetadata {
            source_path: source_path.clone(),
            tracking_id,
        };
        self.workflows.insert(
            tracking_id,
            Workflow {
                source_path: source_path.clone(),
                phase: Phase::AwaitingCheck,
                reply,
            },
        );

        if self.checker.send(request).await.is_err() {
            warn!(%tracking_id, "Tag checker unavailable");
            self.fail(tracking_id, "Tag checker unavailable".into()).await;
        }
    }

    async fn handle_checker(&mut self, check_reply: TagCheckReply) {
        let tracking_id = check_reply.tracking_id();
        let valid = self
            .workflows
            .get(&tracking_id)
            .is_some_and(|workflow| workflow.phase == Phase::AwaitingCheck);
        if !valid {
            self.maroon(tracking_id, "tag-check reply").await;
            return;
        }

        match check_reply {
            TagCheckReply::FileMetadataIsComplete {
                source_path,
                metadata,
                ..
            } => {
                self.notify_ledger(tracking_id, TrackingEventKind::MetadataAvailable)
                    .await;

                if self.override_tags {
                    debug!(%tracking_id, "Metadata complete, override policy active");
                    self.set_phase(tracking_id, Phase::Overriding);
                    let request = EnrichmentRequest::OverrideFileMetadata {
                        source_path,
                        metadata,
                        tracking_id,
                    };
                    if self.enricher.send(request).await.is_err() {
                        warn!(%tracking_id, "Enricher unavailable");
                        self.fail(tracking_id, "Enricher unavailable".into()).await;
                    }
                } else {
                    self.finalize(
                        tracking_id,
                        InspectionOutcome::FileMetadataAvailable {
                            source_path,
                            metadata,
                            tracking_id,
                        },
                    );
                }
            }
            TagCheckReply::FileMetadataIsIncomplete {
                source_path,
                metadata,
                ..
            } => {
                if self.offline {
                    debug!(%tracking_id, "Metadata incomplete, offline mode is terminal");
                    self.notify_ledger(tracking_id, TrackingEventKind::MetadataNotAvailable)
                        .await;
                    self.finalize(
                        tracking_id,
                        InspectionOutcome::FileMetadataNotFullyAvailable {
                            source_path,
                            metadata,
                            tracking_id,
                        },
                    );
                } else {
                    debug!(%tracking_id, "Metadata incomplete, delegating to enricher");
                    self.notify_ledger(tracking_id, TrackingEventKind::FileMetadataIncomplete)
                        .await;
                    self.set_phase(tracking_id, Phase::Filling);
                    let request = EnrichmentRequest::FillUpMissingMetadataFields {
                        source_path,
                        metadata,
                        tracking_id,
                    };
                    if self.enricher.send(request).await.is_err() {
                        warn!(%tracking_id, "Enricher unavailable");
                        self.fail(tracking_id, "Enricher unavailable".into()).await;
                    }
                }
            }
            TagCheckReply::FileMetadataCouldNotBeChecked { reason, .. } => {
                warn!(%tracking_id, reason, "File metadata could not be checked");
                self.fail(tracking_id, reason).await;
            }
        }
    }

    async fn handle_enricher(&mut self, enrich_reply: EnrichmentReply) {
        let tracking_id = enrich_reply.tracking_id();

        let expected = match &enrich_reply {
            EnrichmentReply::FileMetadataSuccessfullyFilled { .. }
            | EnrichmentReply::FillUpMissingMetadataFieldsFailed { .. } => vec![Phase::Filling],
            EnrichmentReply::OverrideFileMetadataDone { .. }
            | EnrichmentReply::OverrideFileMetadataFailed { .. } => vec![Phase::Overriding],
            // The lookup service failing is attributable to either shape
            EnrichmentReply::MusicBrainzServiceFailed { .. } => {
                vec![Phase::Filling, Phase::Overriding]
            }
        };
        let valid = self
            .workflows
            .get(&tracking_id)
            .is_some_and(|w| expected.contains(&w.phase));
        if !valid {
            self.maroon(tracking_id, "enrichment reply").await;
            return;
        }

        match enrich_reply {
            EnrichmentReply::FileMetadataSuccessfullyFilled {
                source_path,
                metadata,
                ..
            }
            | EnrichmentReply::OverrideFileMetadataDone {
                source_path,
                metadata,
                ..
            } => {
                self.notify_ledger(tracking_id, TrackingEventKind::MetadataAvailable)
                    .await;
                self.finalize(
                    tracking_id,
                    InspectionOutcome::FileMetadataAvailable {
                        source_path,
                        metadata,
                        tracking_id,
                    },
                );
            }
            EnrichmentReply::FillUpMissingMetadataFieldsFailed { reason, .. }
            | EnrichmentReply::OverrideFileMetadataFailed { reason, .. }
            | EnrichmentReply::MusicBrainzServiceFailed { reason, .. } => {
                warn!(%tracking_id, reason, "Enrichment failed");
                self.fail(tracking_id, reason).await;
            }
        }
    }

    fn set_phase(&mut self, tracking_id: TrackingId, phase: Phase) {
        if let Some(workflow) = self.workflows.get_mut(&tracking_id) {
            workflow.phase = phase;
        }
    }

    async fn maroon(&self, tracking_id: TrackingId, what: &str) {
        self.dead_letters
            .report(
                ACTOR_NAME,
                Some(tracking_id),
                format!("Received {} for an unknown or mismatched workflow", what),
            )
            .await;
    }

    /// Register a terminal failure and report it to the requester
    async fn fail(&mut self, tracking_id: TrackingId, reason: String) {
        self.notify_ledger(
            tracking_id,
            TrackingEventKind::MetadataEvaluationFailed {
                reason: reason.clone(),
            },
        )
        .await;
        if let Some(workflow) = self.workflows.remove(&tracking_id) {
            let outcome = InspectionOutcome::FileMetadataEvaluationFailed {
                source_path: workflow.source_path,
                reason,
                tracking_id,
            };
            if workflow.reply.send(outcome).is_err() {
                debug!(%tracking_id, "Requester dropped before failure outcome was delivered");
            }
        }
    }

    fn finalize(&mut self, tracking_id: TrackingId, outcome: InspectionOutcome) {
        if let Some(workflow) = self.workflows.remove(&tracking_id) {
            if workflow.reply.send(outcome).is_err() {
                debug!(%tracking_id, "Requester dropped before outcome was delivered");
            }
        }
    }

    /// Register a tracking event; registration problems are logged, not
    /// propagated — they must not abort a running workflow
    async fn notify_ledger(&self, tracking_id: TrackingId, event: TrackingEventKind) {
        match self.ledger.register_tracking_event(tracking_id, event).await {
            Ok(RegisterReply::TrackingEventSuccessfullyRegistered) => {}
            Ok(RegisterReply::TrackingEntryNotFound(_)) => {
                warn!(%tracking_id, "No tracking entry for supervised workflow");
            }
            Err(e) => {
                warn!(%tracking_id, error = %e, "Tracking ledger unreachable");
            }
        }
    }
}

async fn run(
    mut supervisor: InspectionSupervisor,
    mut inbox: mpsc::Receiver<SupervisorMessage>,
    mut replies: mpsc::UnboundedReceiver<SupervisorMessage>,
) {
    info!(
        offline = supervisor.offline,
        override_tags = supervisor.override_tags,
        "Inspection supervisor started"
    );

    loop {
        tokio::select! {
            Some(reply) = replies.recv() => supervisor.handle(reply).await,
            message = inbox.recv() => match message {
                Some(message) => supervisor.handle(message).await,
                None => break,
            },
        }
    }

    // Client handles are gone; finish the workflows still in flight before
    // dropping the children
    while !supervisor.workflows.is_empty() {
        match replies.recv().await {
            Some(reply) => supervisor.handle(reply).await,
            None => break,
        }
    }

    info!("Inspection supervisor stopped");
}

// ============================================================================
// Handle
// ============================================================================

/// Cloneable handle to a running inspection supervisor
#[derive(Debug, Clone)]
pub struct SupervisorHandle {
    tx: mpsc::Sender<SupervisorMessage>,
}

impl SupervisorHandle {
    /// Spawn the supervisor and its two children wired to the given services
    pub fn spawn(
        config: &CoreConfig,
        ledger: LedgerHandle,
        tag_check: Arc<dyn TagCheckService>,
        metadata: Arc<dyn MetadataService>,
        dead_letters: DeadLetterSink,
    ) -> Self {
        let (tx, rx) = mpsc::channel(config.mailbox_capacity);
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let request_timeout = Duration::from_millis(config.child_request_timeout_ms);

        let checker = TagCheckerHandle::spawn(
            tag_check,
            reply_tx.clone(),
            request_timeout,
            config.mailbox_capacity,
        );
        let enricher = EnricherHandle::spawn(
            metadata,
            reply_tx,
            request_timeout,
            config.mailbox_capacity,
        );

        let supervisor = InspectionSupervisor {
            offline: config.offline,
            override_tags: config.override_tags,
            ledger,
            checker,
            enricher,
            dead_letters,
            workflows: HashMap::new(),
        };
        tokio::spawn(run(supervisor, rx, reply_rx));

        Self { tx }
    }

    /// Inspect one file's metadata and await the terminal outcome
    pub async fn inspect_file_metadata(
        &self,
        source_path: PathBuf,
        tracking_id: TrackingId,
    ) -> Result<InspectionOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SupervisorMessage::InspectFileMetadata {
                source_path,
                tracking_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| Error::ActorUnavailable(ACTOR_NAME))?;
        reply_rx
            .await
            .map_err(|_| Error::ActorUnavailable(ACTOR_NAME))
    }

    /// Raw mailbox sender; lets embedders route child-style replies directly
    pub fn sender(&self) -> mpsc::Sender<SupervisorMessage> {
        self.tx.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::LookupReply;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tagsmith_common::AudioMetadata;

    fn complete_metadata() -> AudioMetadata {
        AudioMetadata {
            title: Some("So What".into()),
            artist: Some("Miles Davis".into()),
            album: Some("Kind of Blue".into()),
            track_number: Some(1),
            genre: Some("Jazz".into()),
            year: Some(1959),
        }
    }

    /// Tag checker with a canned verdict
    struct StubChecker {
        complete: bool,
        failing: bool,
    }

    #[async_trait]
    impl TagCheckService for StubChecker {
        fn name(&self) -> &'static str {
            "stub-checker"
        }

        async fn check(&self, source_path: &Path, tracking_id: TrackingId) -> TagCheckReply {
            if self.failing {
                return TagCheckReply::FileMetadataCouldNotBeChecked {
                    source_path: source_path.to_path_buf(),
                    reason: "Unreadable tag frame".into(),
                    tracking_id,
                };
            }
            if self.complete {
                TagCheckReply::FileMetadataIsComplete {
                    source_path: source_path.to_path_buf(),
                    metadata: complete_metadata(),
                    tracking_id,
                }
            } else {
                TagCheckReply::FileMetadataIsIncomplete {
                    source_path: source_path.to_path_buf(),
                    metadata: AudioMetadata {
                        artist: Some("Miles Davis".into()),
                        ..Default::default()
                    },
                    tracking_id,
                }
            }
        }
    }

    /// Metadata service that counts calls and succeeds or fails on demand
    struct StubEnricher {
        calls: Arc<AtomicUsize>,
        succeed: bool,
    }

    #[async_trait]
    impl MetadataService for StubEnricher {
        fn name(&self) -> &'static str {
            "stub-enricher"
        }

        async fn fill_up(
            &self,
            source_path: &Path,
            mut metadata: AudioMetadata,
            tracking_id: TrackingId,
        ) -> EnrichmentReply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                metadata.fill_missing_from(&complete_metadata());
                EnrichmentReply::FileMetadataSuccessfullyFilled {
                    source_path: source_path.to_path_buf(),
                    metadata,
                    tracking_id,
                }
            } else {
                EnrichmentReply::FillUpMissingMetadataFieldsFailed {
                    source_path: source_path.to_path_buf(),
                    reason: "No release matched".into(),
                    tracking_id,
                }
            }
        }

        async fn override_tags(
            &self,
            source_path: &Path,
            _metadata: AudioMetadata,
            tracking_id: TrackingId,
        ) -> EnrichmentReply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                EnrichmentReply::OverrideFileMetadataDone {
                    source_path: source_path.to_path_buf(),
                    metadata: complete_metadata(),
                    tracking_id,
                }
            } else {
                EnrichmentReply::OverrideFileMetadataFailed {
                    source_path: source_path.to_path_buf(),
                    reason: "Lookup rejected".into(),
                    tracking_id,
                }
            }
        }
    }

    struct Fixture {
        ledger: LedgerHandle,
        supervisor: SupervisorHandle,
        enricher_calls: Arc<AtomicUsize>,
        dead_letters: mpsc::Receiver<crate::actors::dead_letter::MaroonedMessage>,
    }

    fn fixture(config: CoreConfig, checker: StubChecker, enricher_succeeds: bool) -> Fixture {
        let ledger = LedgerHandle::spawn(config.mailbox_capacity);
        let (sink, dead_letters) = DeadLetterSink::channel(config.mailbox_capacity);
        let calls = Arc::new(AtomicUsize::new(0));
        let supervisor = SupervisorHandle::spawn(
            &config,
            ledger.clone(),
            Arc::new(checker),
            Arc::new(StubEnricher {
                calls: calls.clone(),
                succeed: enricher_succeeds,
            }),
            sink,
        );
        Fixture {
            ledger,
            supervisor,
            enricher_calls: calls,
            dead_letters,
        }
    }

    async fn event_labels(ledger: &LedgerHandle, id: TrackingId) -> Vec<&'static str> {
        match ledger.lookup_tracking_entry(id).await.unwrap() {
            LookupReply::TrackingEntryFound(tracking) => {
                tracking.events().iter().map(|e| e.kind.label()).collect()
            }
            LookupReply::TrackingEntryNotFound(_) => panic!("Tracking entry missing"),
        }
    }

    #[tokio::test]
    async fn complete_metadata_finalizes_with_one_available_notification() {
        let fx = fixture(
            CoreConfig::default(),
            StubChecker {
                complete: true,
                failing: false,
            },
            true,
        );

        let path = PathBuf::from("/music/track.mp3");
        let id = fx.ledger.create_tracking_entry(path.clone()).await.unwrap();

        let outcome = fx
            .supervisor
            .inspect_file_metadata(path, id)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            InspectionOutcome::FileMetadataAvailable { tracking_id, .. } if tracking_id == id
        ));

        let labels = event_labels(&fx.ledger, id).await;
        assert_eq!(
            labels,
            vec!["metadata_inspection_started", "metadata_available"]
        );
        assert_eq!(fx.enricher_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn offline_incomplete_is_terminal_and_never_contacts_enricher() {
        let fx = fixture(
            CoreConfig {
                offline: true,
                ..Default::default()
            },
            StubChecker {
                complete: false,
                failing: false,
            },
            true,
        );

        let path = PathBuf::from("/music/track.mp3");
        let id = fx.ledger.create_tracking_entry(path.clone()).await.unwrap();

        let outcome = fx
            .supervisor
            .inspect_file_metadata(path, id)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            InspectionOutcome::FileMetadataNotFullyAvailable { .. }
        ));

        let labels = event_labels(&fx.ledger, id).await;
        assert_eq!(
            labels,
            vec!["metadata_inspection_started", "metadata_not_available"]
        );
        assert_eq!(fx.enricher_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn incomplete_metadata_is_filled_by_the_enricher() {
        let fx = fixture(
            CoreConfig::default(),
            StubChecker {
                complete: false,
                failing: false,
            },
            true,
        );

        let path = PathBuf::from("/music/track.mp3");
        let id = fx.ledger.create_tracking_entry(path.clone()).await.unwrap();

        let outcome = fx
            .supervisor
            .inspect_file_metadata(path, id)
            .await
            .unwrap();
        match outcome {
            InspectionOutcome::FileMetadataAvailable { metadata, .. } => {
                assert!(metadata.is_complete());
                // Present values survive enrichment
                assert_eq!(metadata.artist.as_deref(), Some("Miles Davis"));
            }
            other => panic!("Expected available, got {:?}", other),
        }

        let labels = event_labels(&fx.ledger, id).await;
        assert_eq!(
            labels,
            vec![
                "metadata_inspection_started",
                "file_metadata_incomplete",
                "metadata_available"
            ]
        );
        assert_eq!(fx.enricher_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn override_policy_re_fetches_tags_before_finalizing() {
        let fx = fixture(
            CoreConfig {
                override_tags: true,
                ..Default::default()
            },
            StubChecker {
                complete: true,
                failing: false,
            },
            true,
        );

        let path = PathBuf::from("/music/track.mp3");
        let id = fx.ledger.create_tracking_entry(path.clone()).await.unwrap();

        let outcome = fx
            .supervisor
            .inspect_file_metadata(path, id)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            InspectionOutcome::FileMetadataAvailable { .. }
        ));
        assert_eq!(fx.enricher_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn check_failure_is_terminal_with_reason() {
        let fx = fixture(
            CoreConfig::default(),
            StubChecker {
                complete: false,
                failing: true,
            },
            true,
        );

        let path = PathBuf::from("/music/track.mp3");
        let id = fx.ledger.create_tracking_entry(path.clone()).await.unwrap();

        let outcome = fx
            .supervisor
            .inspect_file_metadata(path, id)
            .await
            .unwrap();
        match outcome {
            InspectionOutcome::FileMetadataEvaluationFailed { reason, .. } => {
                assert_eq!(reason, "Unreadable tag frame");
            }
            other => panic!("Expected failure, got {:?}", other),
        }

        let labels = event_labels(&fx.ledger, id).await;
        assert_eq!(
            labels,
            vec!["metadata_inspection_started", "metadata_evaluation_failed"]
        );
    }

    #[tokio::test]
    async fn enrichment_failure_is_terminal() {
        let fx = fixture(
            CoreConfig::default(),
            StubChecker {
                complete: false,
                failing: false,
            },
            false,
        );

        let path = PathBuf::from("/music/track.mp3");
        let id = fx.ledger.create_tracking_entry(path.clone()).await.unwrap();

        let outcome = fx
            .supervisor
            .inspect_file_metadata(path, id)
            .await
            .unwrap();
        match outcome {
            InspectionOutcome::FileMetadataEvaluationFailed { reason, .. } => {
                assert_eq!(reason, "No release matched");
            }
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unattributable_reply_is_marooned() {
        let mut fx = fixture(
            CoreConfig::default(),
            StubChecker {
                complete: true,
                failing: false,
            },
            true,
        );

        let stray = TrackingId::random();
        fx.supervisor
            .sender()
            .send(SupervisorMessage::Checker(
                TagCheckReply::FileMetadataIsComplete {
                    source_path: PathBuf::from("/music/stray.mp3"),
                    metadata: complete_metadata(),
                    tracking_id: stray,
                },
            ))
            .await
            .unwrap();

        let marooned = fx.dead_letters.recv().await.unwrap();
        assert_eq!(marooned.actor, ACTOR_NAME);
        assert_eq!(marooned.tracking_id, Some(stray));
    }

    /// Tag checker slow enough that concurrent requests pile up in the
    /// bounded mailboxes
    struct SlowChecker;

    #[async_trait]
    impl TagCheckService for SlowChecker {
        fn name(&self) -> &'static str {
            "slow-checker"
        }

        async fn check(&self, source_path: &Path, tracking_id: TrackingId) -> TagCheckReply {
            tokio::time::sleep(Duration::from_millis(200)).await;
            TagCheckReply::FileMetadataIsComplete {
                source_path: source_path.to_path_buf(),
                metadata: complete_metadata(),
                tracking_id,
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn full_mailboxes_do_not_stall_concurrent_inspections() {
        let config = CoreConfig {
            mailbox_capacity: 1,
            ..Default::default()
        };
        let ledger = LedgerHandle::spawn(8);
        let (sink, _dead_letters) = DeadLetterSink::channel(8);
        let supervisor = SupervisorHandle::spawn(
            &config,
            ledger.clone(),
            Arc::new(SlowChecker),
            Arc::new(StubEnricher {
                calls: Arc::new(AtomicUsize::new(0)),
                succeed: true,
            }),
            sink,
        );

        let mut pending = Vec::new();
        for n in 0..6 {
            let path = PathBuf::from(format!("/music/track_{n}.mp3"));
            let id = ledger.create_tracking_entry(path.clone()).await.unwrap();
            let supervisor = supervisor.clone();
            pending.push(tokio::spawn(async move {
                supervisor.inspect_file_metadata(path, id).await.unwrap()
            }));
        }

        for task in pending {
            let outcome = tokio::time::timeout(Duration::from_secs(10), task)
                .await
                .expect("inspection stalled under load")
                .unwrap();
            assert!(matches!(
                outcome,
                InspectionOutcome::FileMetadataAvailable { .. }
            ));
        }
    }
}
