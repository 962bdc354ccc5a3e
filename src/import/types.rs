use crate::error::TransferError;
use std::path::PathBuf;

/// What happened to one file of an import batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    /// Inserted at the front of the level store
    InsertedLevel { name: String },
    /// Inserted at the front of the list store
    InsertedList { name: String },
    /// Not an archive, or the codec failed; the batch stopped here
    Rejected(TransferError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFileResult {
    pub path: PathBuf,
    pub status: ImportStatus,
}

impl ImportFileResult {
    pub fn is_inserted(&self) -> bool {
        !matches!(self.status, ImportStatus::Rejected(_))
    }
}

/// Per-file results of one import batch, in the order the paths were given
///
/// Only the last entry can be a rejection: processing stops at the first bad
/// file, and files after it do not appear at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatchResult {
    pub entries: Vec<ImportFileResult>,
}

impl ImportBatchResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The rejection that ended the batch early, if any
    pub fn failure(&self) -> Option<(&PathBuf, &TransferError)> {
        self.entries.last().and_then(|entry| match &entry.status {
            ImportStatus::Rejected(err) => Some((&entry.path, err)),
            _ => None,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.failure().is_none()
    }

    /// True when every file was imported, so views over the stores are stale
    pub fn should_refresh(&self) -> bool {
        !self.is_empty() && self.is_complete()
    }

    pub fn inserted_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_inserted()).count()
    }
}
