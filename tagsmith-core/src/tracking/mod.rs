//! Tracking Ledger and its data model
//!
//! A [`MediaFileTracking`] is the cumulative, append-only activity history
//! of one logical file moving through the system. The ledger actor in
//! [`ledger`] exclusively owns all trackings; everything else reads and
//! mutates them through the request/reply protocol.

pub mod descriptor;
pub mod events;
pub mod ledger;
pub mod summary;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use descriptor::Descriptor;
pub use events::{TrackingEvent, TrackingEventKind};

/// Activity history for one tracked file
///
/// Events are append-only and order-preserving; a tracking is never deleted
/// within the process lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct MediaFileTracking {
    descriptor: Descriptor,
    events: Vec<TrackingEvent>,
    created_at: DateTime<Utc>,
}

impl MediaFileTracking {
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            events: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn events(&self) -> &[TrackingEvent] {
        &self.events
    }

    pub fn last_event(&self) -> Option<&TrackingEvent> {
        self.events.last()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Append one event; appended events are immutable
    pub fn append(&mut self, kind: TrackingEventKind) {
        self.events.push(TrackingEvent::now(kind));
    }
}
