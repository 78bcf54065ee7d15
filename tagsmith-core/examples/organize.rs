//! Minimal wiring demo: inspect two files and materialize their folders
//!
//! External services are stubbed inline; real deployments plug in a tag
//! reader and a metadata lookup client behind the same traits.
//!
//! Run with: `cargo run --example organize`

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tagsmith_common::{AudioMetadata, CoreConfig, TrackingId};
use tagsmith_core::actors::dead_letter::DeadLetterSink;
use tagsmith_core::actors::materializer::MaterializerHandle;
use tagsmith_core::actors::supervisor::SupervisorHandle;
use tagsmith_core::protocol::{
    CreateFolderFromMetadata, EnrichmentReply, InspectionOutcome, TagCheckReply,
};
use tagsmith_core::services::{MetadataService, TagCheckService};
use tagsmith_core::tracking::ledger::LedgerHandle;

struct DemoChecker;

#[async_trait]
impl TagCheckService for DemoChecker {
    fn name(&self) -> &'static str {
        "demo-checker"
    }

    async fn check(&self, source_path: &Path, tracking_id: TrackingId) -> TagCheckReply {
        // Pretend files named "tagged_*" carry complete tags
        let tagged = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("tagged_"));

        let metadata = AudioMetadata {
            title: Some("Blue In Green".into()),
            artist: Some("miles davis".into()),
            album: tagged.then(|| "kind of blue".to_string()),
            track_number: tagged.then_some(3),
            ..Default::default()
        };

        if metadata.is_complete() {
            TagCheckReply::FileMetadataIsComplete {
                source_path: source_path.to_path_buf(),
                metadata,
                tracking_id,
            }
        } else {
            TagCheckReply::FileMetadataIsIncomplete {
                source_path: source_path.to_path_buf(),
                metadata,
                tracking_id,
            }
        }
    }
}

struct DemoCatalog;

#[async_trait]
impl MetadataService for DemoCatalog {
    fn name(&self) -> &'static str {
        "demo-catalog"
    }

    async fn fill_up(
        &self,
        source_path: &Path,
        mut metadata: AudioMetadata,
        tracking_id: TrackingId,
    ) -> EnrichmentReply {
        metadata.fill_missing_from(&AudioMetadata {
            album: Some("kind of blue".into()),
            track_number: Some(3),
            genre: Some("Jazz".into()),
            year: Some(1959),
            ..Default::default()
        });
        EnrichmentReply::FileMetadataSuccessfullyFilled {
            source_path: source_path.to_path_buf(),
            metadata,
            tracking_id,
        }
    }

    async fn override_tags(
        &self,
        source_path: &Path,
        metadata: AudioMetadata,
        tracking_id: TrackingId,
    ) -> EnrichmentReply {
        EnrichmentReply::OverrideFileMetadataDone {
            source_path: source_path.to_path_buf(),
            metadata,
            tracking_id,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = CoreConfig::load()?;
    info!(?config, "Starting tagsmith demo");

    let ledger = LedgerHandle::spawn(config.mailbox_capacity);
    let dead_letters = DeadLetterSink::spawn(config.mailbox_capacity);
    let supervisor = SupervisorHandle::spawn(
        &config,
        ledger.clone(),
        Arc::new(DemoChecker),
        Arc::new(DemoCatalog),
        dead_letters,
    );
    let materializer = MaterializerHandle::spawn(ledger.clone(), config.mailbox_capacity);

    let library = std::env::temp_dir().join("tagsmith-demo-library");
    let sources = [
        PathBuf::from("/music/incoming/tagged_blue_in_green.mp3"),
        PathBuf::from("/music/incoming/untagged_take.mp3"),
    ];

    for source in sources {
        let tracking_id = ledger.create_tracking_entry(source.clone()).await?;
        let outcome = supervisor
            .inspect_file_metadata(source.clone(), tracking_id)
            .await?;

        match outcome {
            InspectionOutcome::FileMetadataAvailable { metadata, .. } => {
                let reply = materializer
                    .create_folder_from_metadata(CreateFolderFromMetadata {
                        source_file: source,
                        metadata,
                        base_dir: library.clone(),
                        tracking_id,
                    })
                    .await?;
                info!(?reply, "Materialized");
            }
            other => info!(?other, "File left unorganized"),
        }
    }

    let summary = ledger.generate_summary().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
