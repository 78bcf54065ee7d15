//! Actor implementations
//!
//! Each actor is a tokio task draining a bounded mpsc mailbox, processing
//! one message to completion at a time. Private state lives inside the
//! task; the only way in is the handle's request messages.

pub mod dead_letter;
pub mod enricher;
pub mod materializer;
pub mod supervisor;
pub mod tag_checker;
