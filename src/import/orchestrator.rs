use super::types::{ImportBatchResult, ImportFileResult, ImportStatus};
use crate::classifier::FileKindClassifier;
use crate::codec::ArchiveCodec;
use crate::error::TransferError;
use crate::library::LocalLibrary;
use crate::models::Entity;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Imports archive files into the local library
#[derive(Clone)]
pub struct ImportOrchestrator {
    classifier: FileKindClassifier,
    codec: Arc<dyn ArchiveCodec>,
    library: Arc<dyn LocalLibrary>,
}

impl ImportOrchestrator {
    pub fn new(codec: Arc<dyn ArchiveCodec>, library: Arc<dyn LocalLibrary>) -> Self {
        Self {
            classifier: FileKindClassifier::new(codec.clone()),
            codec,
            library,
        }
    }

    pub fn library(&self) -> &Arc<dyn LocalLibrary> {
        &self.library
    }

    /// Import `paths` in order, stopping at the first file that fails.
    pub fn import_batch(&self, paths: &[PathBuf]) -> ImportBatchResult {
        let batch_id = Uuid::new_v4();
        info!("Import batch {} started with {} files", batch_id, paths.len());

        let mut result = ImportBatchResult::default();
        for path in paths {
            let status = self.import_one(path);
            let rejected = matches!(status, ImportStatus::Rejected(_));

            result.entries.push(ImportFileResult {
                path: path.clone(),
                status,
            });

            if rejected {
                warn!(
                    "Import batch {} stopped at {} after {} of {} files",
                    batch_id,
                    path.display(),
                    result.inserted_count(),
                    paths.len()
                );
                return result;
            }
        }

        info!(
            "Import batch {} complete: {} files imported",
            batch_id,
            result.len()
        );
        result
    }

    fn import_one(&self, path: &Path) -> ImportStatus {
        let Some(kind) = self.classifier.classify(path).entity_kind() else {
            return ImportStatus::Rejected(TransferError::NotAnArchive {
                path: path.to_path_buf(),
            });
        };

        let entity = match self.codec.import_kind(kind, path) {
            Ok(entity) => entity,
            Err(message) => {
                warn!("Failed to import {}: {}", path.display(), message);
                return ImportStatus::Rejected(TransferError::Codec(message));
            }
        };

        let inserted = match entity {
            Entity::Level(level) => {
                let name = level.name.clone();
                self.library
                    .insert_level(level)
                    .map(|_| ImportStatus::InsertedLevel { name })
            }
            Entity::List(list) => {
                let name = list.name.clone();
                self.library
                    .insert_list(list)
                    .map(|_| ImportStatus::InsertedList { name })
            }
        };

        match inserted {
            Ok(status) => {
                info!("Imported {} {}", kind, path.display());
                status
            }
            Err(e) => {
                warn!("Failed to store {}: {}", path.display(), e);
                ImportStatus::Rejected(TransferError::write(path, e))
            }
        }
    }
}
