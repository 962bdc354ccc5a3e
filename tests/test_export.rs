#![cfg(feature = "test-utils")]

mod support;
use std::sync::Arc;
use tempfile::TempDir;

use crate::support::{create_test_level, create_test_list, tracing_init};
use gmd_transfer::classifier::FileKindClassifier;
use gmd_transfer::codec::{ArchiveCodec, JsonArchiveCodec};
use gmd_transfer::export::ExportOrchestrator;
use gmd_transfer::platform::{PlatformCapabilities, PostExportAction};
use gmd_transfer::test_support::FailingExportCodec;
use gmd_transfer::{Entity, FileKind, TransferError};

fn setup() -> (ExportOrchestrator, FileKindClassifier, TempDir) {
    tracing_init();
    let codec: Arc<dyn ArchiveCodec> = Arc::new(JsonArchiveCodec::new());
    let orchestrator = ExportOrchestrator::new(codec.clone(), PlatformCapabilities::default());
    (orchestrator, FileKindClassifier::new(codec), TempDir::new().unwrap())
}

#[test]
fn test_export_then_classify_matches_variant() {
    let (orchestrator, classifier, dir) = setup();

    let level = Entity::from(create_test_level("Theory of Everything"));
    let list = Entity::from(create_test_list("Weekly Demons"));
    let level_path = dir.path().join("toe.gmd");
    let list_path = dir.path().join("weekly.gmdl");

    orchestrator.export_entity(&level, &level_path).unwrap();
    orchestrator.export_entity(&list, &list_path).unwrap();

    assert_eq!(classifier.classify(&level_path), FileKind::Level);
    assert_eq!(classifier.classify(&list_path), FileKind::List);
}

#[test]
fn test_export_twice_is_deterministic() {
    let (orchestrator, classifier, dir) = setup();
    let entity = Entity::from(create_test_level("Electroman Adventures"));
    let first = dir.path().join("first.gmd");
    let second = dir.path().join("second.gmd");

    orchestrator.export_entity(&entity, &first).unwrap();
    orchestrator.export_entity(&entity, &second).unwrap();

    assert_eq!(classifier.classify(&first), classifier.classify(&second));
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn test_export_does_not_mutate_entity() {
    let (orchestrator, _classifier, dir) = setup();
    let entity = Entity::from(create_test_list("Gauntlet"));
    let before = entity.clone();

    orchestrator
        .export_entity(&entity, &dir.path().join("g.gmdl"))
        .unwrap();

    assert_eq!(entity, before);
}

#[test]
fn test_export_to_unwritable_destination_leaves_nothing() {
    let (orchestrator, _classifier, dir) = setup();
    let destination = dir.path().join("no-such-dir").join("level.gmd");

    let err = orchestrator
        .export_entity(&Entity::from(create_test_level("Deadlocked")), &destination)
        .unwrap_err();

    assert!(matches!(err, TransferError::Write { .. }));
    assert!(!destination.exists());
}

#[test]
fn test_codec_failure_leaves_no_partial_file() {
    tracing_init();
    let dir = TempDir::new().unwrap();
    let codec = FailingExportCodec::new(JsonArchiveCodec::new(), "Level data is too large");
    let orchestrator = ExportOrchestrator::new(Arc::new(codec), PlatformCapabilities::default());
    let destination = dir.path().join("big.gmd");

    let err = orchestrator
        .export_entity(&Entity::from(create_test_level("Bloodbath")), &destination)
        .unwrap_err();

    assert_eq!(err, TransferError::Codec("Level data is too large".to_string()));
    assert!(!destination.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_codec_failure_keeps_existing_destination() {
    tracing_init();
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("keep.gmd");
    std::fs::write(&destination, b"previous export").unwrap();

    let codec = FailingExportCodec::new(JsonArchiveCodec::new(), "boom");
    let orchestrator = ExportOrchestrator::new(Arc::new(codec), PlatformCapabilities::default());
    orchestrator
        .export_entity(&Entity::from(create_test_level("Keep")), &destination)
        .unwrap_err();

    assert_eq!(std::fs::read(&destination).unwrap(), b"previous export");
}

#[test]
fn test_export_overwrites_existing_file() {
    let (orchestrator, classifier, dir) = setup();
    let destination = dir.path().join("over.gmd");
    std::fs::write(&destination, b"old").unwrap();

    orchestrator
        .export_entity(&Entity::from(create_test_level("Over")), &destination)
        .unwrap();

    assert_eq!(classifier.classify(&destination), FileKind::Level);
}

#[test]
fn test_receipt_carries_capability_action() {
    tracing_init();
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("shared.gmd");
    let orchestrator = ExportOrchestrator::new(
        Arc::new(JsonArchiveCodec::new()),
        PlatformCapabilities {
            can_reveal_in_folder: false,
            can_invoke_share_sheet: true,
        },
    );

    let receipt = orchestrator
        .export_entity(&Entity::from(create_test_level("Shared")), &destination)
        .unwrap();

    assert_eq!(
        receipt.action,
        Some(PostExportAction::InvokeShareSheet(destination))
    );
}

#[cfg(unix)]
fn mode_of(path: &std::path::Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[cfg(unix)]
#[test]
fn test_exported_file_has_normal_permissions() {
    let (orchestrator, _classifier, dir) = setup();
    let plain = dir.path().join("plain.txt");
    std::fs::write(&plain, b"plain").unwrap();
    let destination = dir.path().join("shared.gmd");

    orchestrator
        .export_entity(&Entity::from(create_test_level("Shared")), &destination)
        .unwrap();

    assert_eq!(mode_of(&destination), mode_of(&plain));
}

#[cfg(unix)]
#[test]
fn test_overwrite_keeps_existing_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (orchestrator, _classifier, dir) = setup();
    let destination = dir.path().join("kept.gmd");
    std::fs::write(&destination, b"old").unwrap();
    std::fs::set_permissions(&destination, std::fs::Permissions::from_mode(0o640)).unwrap();

    orchestrator
        .export_entity(&Entity::from(create_test_level("Kept")), &destination)
        .unwrap();

    assert_eq!(mode_of(&destination), 0o640);
}
