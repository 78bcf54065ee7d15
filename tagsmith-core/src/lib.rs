//! tagsmith-core - Actor-based media tracking and supervision core
//!
//! A small actor system for organizing audio files by their tag metadata:
//!
//! - **Tracking ledger**: one actor exclusively owning the per-file activity
//!   histories, keyed by [`TrackingId`](tagsmith_common::TrackingId) and
//!   reachable only through request/reply messages.
//! - **Inspection supervisor**: drives the check → enrich workflow for each
//!   file, routing child replies, notifying the ledger of every state
//!   transition, and reporting a terminal outcome to the requester.
//! - **Child actors**: thin mailboxes around the external tag-check and
//!   metadata-enrichment services, with a per-call timeout that synthesizes
//!   a failure reply instead of leaving a workflow in limbo.
//! - **Folder materializer**: turns resolved metadata into an
//!   `Artist/Album` directory tree on disk.
//! - **Dead-letter sink**: destination for marooned messages an actor
//!   receives but cannot attribute to a live workflow.
//!
//! All domain failures travel as typed reply messages; Rust errors are
//! reserved for infrastructure faults such as closed mailboxes.

pub mod actors;
pub mod protocol;
pub mod services;
pub mod tracking;

pub use actors::dead_letter::{DeadLetterSink, MaroonedMessage};
pub use actors::materializer::MaterializerHandle;
pub use actors::supervisor::SupervisorHandle;
pub use protocol::{InspectionOutcome, MaterializerReply};
pub use tracking::ledger::LedgerHandle;
pub use tracking::summary::ActivitySummary;
