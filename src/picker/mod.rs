// # File Picker
//
// Asynchronous path selection. Implementations hand back a TransferTask
// immediately and resolve it once the user has chosen (or closed) the
// dialog.

#[cfg(feature = "desktop")]
mod native;

#[cfg(feature = "desktop")]
pub use native::RfdFilePicker;

use crate::error::TransferError;
use crate::task::TransferTask;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickMode {
    /// Open one existing file
    Single,
    /// Open any number of existing files
    Multiple,
    /// Choose a destination to save to
    Save,
}

/// Named group of accepted file extensions, without dots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    /// Level (`.gmd`) and list (`.gmdl`) archives
    pub fn archives() -> Self {
        FileFilter {
            name: "GD Level Files".to_string(),
            extensions: vec!["gmd".to_string(), "gmdl".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    pub mode: PickMode,
    pub filter: FileFilter,
    pub default_name: Option<String>,
}

impl PickRequest {
    pub fn open_many() -> Self {
        PickRequest {
            mode: PickMode::Multiple,
            filter: FileFilter::archives(),
            default_name: None,
        }
    }

    pub fn save(default_name: impl Into<String>) -> Self {
        PickRequest {
            mode: PickMode::Save,
            filter: FileFilter::archives(),
            default_name: Some(default_name.into()),
        }
    }
}

/// What the user picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSelection {
    Single(PathBuf),
    Multiple(Vec<PathBuf>),
}

impl PathSelection {
    pub fn into_paths(self) -> Vec<PathBuf> {
        match self {
            PathSelection::Single(path) => vec![path],
            PathSelection::Multiple(paths) => paths,
        }
    }

    /// The one path of a single selection.
    /// A multiple selection yields its first path, if any.
    pub fn into_single(self) -> Result<PathBuf, TransferError> {
        match self {
            PathSelection::Single(path) => Ok(path),
            PathSelection::Multiple(paths) => {
                paths.into_iter().next().ok_or(TransferError::Cancelled)
            }
        }
    }
}

/// Platform dialog for choosing files
pub trait FilePicker: Send + Sync {
    fn request(&self, request: PickRequest) -> TransferTask<PathSelection>;
}
