use std::path::PathBuf;
use thiserror::Error;

/// Terminal failure of a pick, export or import
///
/// Every variant renders a message fit for an error dialog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("No file was selected")]
    Cancelled,
    #[error("Selected '{}' is not a level archive", path.display())]
    NotAnArchive { path: PathBuf },
    #[error("{0}")]
    Codec(String),
    #[error("Unable to write '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },
    #[error("The operation ended without a result")]
    Abandoned,
}

impl TransferError {
    /// True when the user closed the picker without choosing anything.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransferError::Cancelled)
    }

    pub(crate) fn write(path: impl Into<PathBuf>, err: impl ToString) -> Self {
        TransferError::Write {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Single-shot result of a transfer step
pub type TransferOutcome<T> = Result<T, TransferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_file() {
        let err = TransferError::NotAnArchive {
            path: PathBuf::from("/tmp/notes.gmd"),
        };
        assert_eq!(err.to_string(), "Selected '/tmp/notes.gmd' is not a level archive");

        let err = TransferError::write("/nope/out.gmd", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "Unable to write '/nope/out.gmd': No such file or directory"
        );
    }

    #[test]
    fn test_codec_message_passes_through() {
        let err = TransferError::Codec("Level data is corrupted".to_string());
        assert_eq!(err.to_string(), "Level data is corrupted");
        assert!(!err.is_cancelled());
        assert!(TransferError::Cancelled.is_cancelled());
    }
}
