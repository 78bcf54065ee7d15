//! Aggregate activity summary
//!
//! Built by the ledger actor on `GenerateSummary`: a read-only scan over
//! both tracking maps. The summary reflects ledger state at the moment the
//! request message is processed; it is not synchronized with supervisor
//! work still in flight.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tagsmith_common::TrackingId;

use crate::tracking::{MediaFileTracking, TrackingEventKind};

/// Terminal disposition of one audio tracking, judged from its history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingOutcome {
    /// Metadata resolved successfully
    Available,
    /// Incomplete metadata with enrichment forbidden
    NotAvailable,
    /// Check or enrichment failed
    Failed,
    /// No terminal lifecycle event recorded yet
    InFlight,
}

/// Per-outcome entry counts over all audio trackings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub available: usize,
    pub not_available: usize,
    pub failed: usize,
    pub in_flight: usize,
}

/// One row per tracking entry
#[derive(Debug, Clone, Serialize)]
pub struct TrackingSummaryRow {
    pub tracking_id: TrackingId,
    pub kind: &'static str,
    pub source_path: PathBuf,
    pub event_count: usize,
    pub last_event: Option<&'static str>,
}

/// Aggregate activity over the whole ledger
#[derive(Debug, Clone, Serialize)]
pub struct ActivitySummary {
    pub generated_at: DateTime<Utc>,
    pub audio_entries: usize,
    pub compressed_entries: usize,
    pub total_events: usize,
    pub outcomes: OutcomeCounts,
    pub entries: Vec<TrackingSummaryRow>,
}

impl ActivitySummary {
    pub(crate) fn build(
        audio: &HashMap<TrackingId, MediaFileTracking>,
        compressed: &HashMap<TrackingId, MediaFileTracking>,
    ) -> Self {
        let mut outcomes = OutcomeCounts::default();
        for tracking in audio.values() {
            match outcome_of(tracking) {
                TrackingOutcome::Available => outcomes.available += 1,
                TrackingOutcome::NotAvailable => outcomes.not_available += 1,
                TrackingOutcome::Failed => outcomes.failed += 1,
                TrackingOutcome::InFlight => outcomes.in_flight += 1,
            }
        }

        let mut entries: Vec<TrackingSummaryRow> = audio
            .iter()
            .chain(compressed.iter())
            .map(|(id, tracking)| TrackingSummaryRow {
                tracking_id: *id,
                kind: tracking.descriptor().kind_label(),
                source_path: tracking.descriptor().source_path().to_path_buf(),
                event_count: tracking.events().len(),
                last_event: tracking.last_event().map(|e| e.kind.label()),
            })
            .collect();
        // Deterministic row order regardless of map iteration
        entries.sort_by(|a, b| a.source_path.cmp(&b.source_path));

        let total_events = entries.iter().map(|row| row.event_count).sum();

        Self {
            generated_at: Utc::now(),
            audio_entries: audio.len(),
            compressed_entries: compressed.len(),
            total_events,
            outcomes,
            entries,
        }
    }
}

/// Judge the disposition from the most recent lifecycle event; materializer
/// events (folder created/failed) do not change the metadata outcome
fn outcome_of(tracking: &MediaFileTracking) -> TrackingOutcome {
    for event in tracking.events().iter().rev() {
        match event.kind {
            TrackingEventKind::MetadataAvailable => return TrackingOutcome::Available,
            TrackingEventKind::MetadataNotAvailable => return TrackingOutcome::NotAvailable,
            TrackingEventKind::MetadataEvaluationFailed { .. } => return TrackingOutcome::Failed,
            _ => {}
        }
    }
    TrackingOutcome::InFlight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::Descriptor;

    fn tracking(path: &str, events: &[TrackingEventKind]) -> MediaFileTracking {
        let mut t = MediaFileTracking::new(Descriptor::AudioFile {
            source_path: PathBuf::from(path),
        });
        for event in events {
            t.append(event.clone());
        }
        t
    }

    #[test]
    fn outcomes_follow_last_lifecycle_event() {
        let available = tracking(
            "/a.mp3",
            &[
                TrackingEventKind::MetadataInspectionStarted,
                TrackingEventKind::MetadataAvailable,
                TrackingEventKind::FolderCreated {
                    path: PathBuf::from("/library/A"),
                },
            ],
        );
        assert_eq!(outcome_of(&available), TrackingOutcome::Available);

        let failed = tracking(
            "/b.mp3",
            &[
                TrackingEventKind::MetadataInspectionStarted,
                TrackingEventKind::FileMetadataIncomplete,
                TrackingEventKind::MetadataEvaluationFailed {
                    reason: "lookup refused".into(),
                },
            ],
        );
        assert_eq!(outcome_of(&failed), TrackingOutcome::Failed);

        let pending = tracking("/c.mp3", &[TrackingEventKind::MetadataInspectionStarted]);
        assert_eq!(outcome_of(&pending), TrackingOutcome::InFlight);
    }

    #[test]
    fn build_counts_and_sorts_entries() {
        let mut audio = HashMap::new();
        audio.insert(
            TrackingId::derive("audio", std::path::Path::new("/z.mp3")),
            tracking("/z.mp3", &[TrackingEventKind::MetadataAvailable]),
        );
        audio.insert(
            TrackingId::derive("audio", std::path::Path::new("/a.mp3")),
            tracking("/a.mp3", &[TrackingEventKind::MetadataNotAvailable]),
        );

        let mut compressed = HashMap::new();
        compressed.insert(
            TrackingId::derive("compressed", std::path::Path::new("/m.zip")),
            MediaFileTracking::new(Descriptor::CompressedFile {
                source_path: PathBuf::from("/m.zip"),
            }),
        );

        let summary = ActivitySummary::build(&audio, &compressed);
        assert_eq!(summary.audio_entries, 2);
        assert_eq!(summary.compressed_entries, 1);
        assert_eq!(summary.total_events, 2);
        assert_eq!(summary.outcomes.available, 1);
        assert_eq!(summary.outcomes.not_available, 1);
        assert_eq!(summary.outcomes.in_flight, 0);

        let paths: Vec<_> = summary
            .entries
            .iter()
            .map(|row| row.source_path.display().to_string())
            .collect();
        assert_eq!(paths, vec!["/a.mp3", "/m.zip", "/z.mp3"]);
    }
}
