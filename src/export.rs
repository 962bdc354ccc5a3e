// # Export Orchestrator
//
// Writes one entity to a user-chosen destination. The codec never writes the
// destination directly: it fills a staging file in the destination's
// directory, which replaces the destination only after the codec succeeded.
// A failed export therefore leaves nothing (or the previous file) behind.

use crate::codec::ArchiveCodec;
use crate::error::{TransferError, TransferOutcome};
use crate::models::Entity;
use crate::picker::PickRequest;
use crate::platform::{PlatformCapabilities, PostExportAction};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::Builder;
use tracing::{error, info, warn};

/// Result of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub path: PathBuf,
    /// Advisory platform follow-up; not retried if it fails
    pub action: Option<PostExportAction>,
}

#[derive(Clone)]
pub struct ExportOrchestrator {
    codec: Arc<dyn ArchiveCodec>,
    capabilities: PlatformCapabilities,
}

impl ExportOrchestrator {
    pub fn new(codec: Arc<dyn ArchiveCodec>, capabilities: PlatformCapabilities) -> Self {
        Self {
            codec,
            capabilities,
        }
    }

    /// Save-dialog request suggesting `<display name>.gmd` or `.gmdl`
    pub fn pick_request(&self, entity: &Entity) -> PickRequest {
        PickRequest::save(entity.suggested_file_name())
    }

    /// Export `entity` to `destination`, replacing any existing file there.
    pub fn export_entity(
        &self,
        entity: &Entity,
        destination: &Path,
    ) -> TransferOutcome<ExportReceipt> {
        info!(
            "Exporting {} '{}' to {}",
            entity.kind(),
            entity.display_name(),
            destination.display()
        );

        let file_name = destination
            .file_name()
            .ok_or_else(|| TransferError::write(destination, "Destination is not a file path"))?;

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.is_dir() {
            return Err(TransferError::write(
                destination,
                format!("Directory {} does not exist", dir.display()),
            ));
        }

        let mut prefix = std::ffi::OsString::from(".");
        prefix.push(file_name);
        let mut builder = Builder::new();
        builder.prefix(&prefix).suffix(".part");
        // Same mode a plain file create would give (umask applies)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let staging = builder
            .tempfile_in(dir)
            .map_err(|e| TransferError::write(destination, e))?
            .into_temp_path();

        if let Err(message) = self.codec.export_entity(entity, &staging) {
            error!("Export of '{}' failed: {}", entity.display_name(), message);
            // Dropping the staging path removes whatever the codec wrote
            return Err(TransferError::Codec(message));
        }

        // Overwriting keeps the permissions the existing file had
        if let Ok(existing) = std::fs::metadata(destination) {
            if let Err(e) = std::fs::set_permissions(&staging, existing.permissions()) {
                warn!(
                    "Could not carry permissions of {} over: {}",
                    destination.display(),
                    e
                );
            }
        }

        staging
            .persist(destination)
            .map_err(|e| TransferError::write(destination, e.error))?;

        info!("Exported '{}' to {}", entity.display_name(), destination.display());
        Ok(ExportReceipt {
            path: destination.to_path_buf(),
            action: PostExportAction::for_capabilities(self.capabilities, destination),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonArchiveCodec;
    use crate::models::{FileKind, Level, LevelList};
    use crate::picker::PickMode;
    use tempfile::TempDir;

    fn orchestrator() -> ExportOrchestrator {
        ExportOrchestrator::new(
            Arc::new(JsonArchiveCodec::new()),
            PlatformCapabilities::default(),
        )
    }

    #[test]
    fn test_pick_request_suggests_name() {
        let request = orchestrator().pick_request(&Entity::from(LevelList::new("Top 10")));

        assert_eq!(request.mode, PickMode::Save);
        assert_eq!(request.default_name.as_deref(), Some("Top 10.gmdl"));
    }

    #[test]
    fn test_export_leaves_no_staging_files() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("out.gmd");

        let receipt = orchestrator()
            .export_entity(&Entity::from(Level::new("Polargeist")), &destination)
            .unwrap();

        assert_eq!(receipt.path, destination);
        assert_eq!(receipt.action, None);
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.gmd")]);
        assert_eq!(
            JsonArchiveCodec::new().classify(&destination),
            FileKind::Level
        );
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("missing").join("out.gmd");

        let err = orchestrator()
            .export_entity(&Entity::from(Level::new("Dry Out")), &destination)
            .unwrap_err();

        assert!(matches!(err, TransferError::Write { .. }));
        assert!(!destination.exists());
    }

    #[test]
    fn test_export_without_file_name_fails() {
        let err = orchestrator()
            .export_entity(&Entity::from(Level::new("Base After Base")), Path::new("/"))
            .unwrap_err();

        assert!(matches!(err, TransferError::Write { .. }));
    }
}
