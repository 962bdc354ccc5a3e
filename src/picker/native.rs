use super::{FilePicker, PathSelection, PickMode, PickRequest};
use crate::error::TransferError;
use crate::task::TransferTask;
use rfd::AsyncFileDialog;
use std::path::PathBuf;
use tracing::debug;

/// Native file dialogs through rfd. Must be used inside a tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct RfdFilePicker {
    start_dir: Option<PathBuf>,
}

impl RfdFilePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open dialogs in `dir` instead of the platform default
    pub fn with_start_dir(dir: PathBuf) -> Self {
        Self {
            start_dir: Some(dir),
        }
    }

    fn dialog(&self, request: &PickRequest) -> AsyncFileDialog {
        let title = match request.mode {
            PickMode::Save => "Export Level",
            PickMode::Single | PickMode::Multiple => "Import Levels",
        };

        let mut dialog = AsyncFileDialog::new()
            .set_title(title)
            .add_filter(&request.filter.name, request.filter.extensions.as_slice());

        if let Some(dir) = &self.start_dir {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = &request.default_name {
            dialog = dialog.set_file_name(name);
        }
        dialog
    }
}

impl FilePicker for RfdFilePicker {
    fn request(&self, request: PickRequest) -> TransferTask<PathSelection> {
        let dialog = self.dialog(&request);

        TransferTask::spawn(async move {
            let selection = match request.mode {
                PickMode::Save => dialog
                    .save_file()
                    .await
                    .map(|handle| PathSelection::Single(handle.path().to_path_buf())),
                PickMode::Single => dialog
                    .pick_file()
                    .await
                    .map(|handle| PathSelection::Single(handle.path().to_path_buf())),
                PickMode::Multiple => dialog.pick_files().await.map(|handles| {
                    PathSelection::Multiple(
                        handles
                            .iter()
                            .map(|handle| handle.path().to_path_buf())
                            .collect(),
                    )
                }),
            };

            match selection {
                Some(selection) => Ok(selection),
                None => {
                    debug!("File dialog closed without a selection");
                    Err(TransferError::Cancelled)
                }
            }
        })
    }
}
