//! tagsmith-common - Shared foundation for the tagsmith actor core
//!
//! Provides the pieces every tagsmith crate needs:
//! - Error type and `Result` alias
//! - Configuration loading (TOML file + environment overrides)
//! - Tracking identity scheme (deterministic and random ids)
//! - Audio metadata value type

pub mod config;
pub mod error;
pub mod metadata;
pub mod tracking_id;

pub use config::CoreConfig;
pub use error::{Error, Result};
pub use metadata::AudioMetadata;
pub use tracking_id::TrackingId;
