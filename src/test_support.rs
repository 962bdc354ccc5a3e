// Test support utilities for both unit and integration tests

use crate::codec::ArchiveCodec;
use crate::error::TransferOutcome;
use crate::models::{FileKind, Level, LevelList};
use crate::picker::{FilePicker, PathSelection, PickRequest};
use crate::platform::{PlatformActions, PlatformCapabilities, PostExportAction};
use crate::task::{TaskResolver, TransferTask};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

/// Picker driven by the test instead of a dialog
///
/// Every request is recorded and its resolver queued; the test resolves them
/// whenever and in whatever order it likes.
#[derive(Default)]
pub struct ScriptedPicker {
    requests: Mutex<Vec<PickRequest>>,
    pending: Mutex<VecDeque<TaskResolver<PathSelection>>>,
}

impl ScriptedPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<PickRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Resolve the oldest unresolved request. Returns false if none was waiting.
    pub fn resolve_next(&self, outcome: TransferOutcome<PathSelection>) -> bool {
        match self.pending.lock().unwrap().pop_front() {
            Some(resolver) => {
                resolver.resolve(outcome);
                true
            }
            None => false,
        }
    }

    /// Hand out the oldest unresolved request's resolver
    pub fn take_next(&self) -> Option<TaskResolver<PathSelection>> {
        self.pending.lock().unwrap().pop_front()
    }
}

impl FilePicker for ScriptedPicker {
    fn request(&self, request: PickRequest) -> TransferTask<PathSelection> {
        let (resolver, task) = TransferTask::channel();
        self.requests.lock().unwrap().push(request);
        self.pending.lock().unwrap().push_back(resolver);
        task
    }
}

/// Platform that records post-export actions instead of performing them
pub struct RecordingPlatform {
    capabilities: PlatformCapabilities,
    performed: Mutex<Vec<PostExportAction>>,
}

impl RecordingPlatform {
    pub fn new(capabilities: PlatformCapabilities) -> Self {
        Self {
            capabilities,
            performed: Mutex::new(Vec::new()),
        }
    }

    pub fn performed(&self) -> Vec<PostExportAction> {
        self.performed.lock().unwrap().clone()
    }
}

impl PlatformActions for RecordingPlatform {
    fn capabilities(&self) -> PlatformCapabilities {
        self.capabilities
    }

    fn reveal_in_folder(&self, path: &Path) -> Result<(), String> {
        self.performed
            .lock()
            .unwrap()
            .push(PostExportAction::OpenContainingFolder(path.to_path_buf()));
        Ok(())
    }

    fn invoke_share_sheet(&self, path: &Path) -> Result<(), String> {
        self.performed
            .lock()
            .unwrap()
            .push(PostExportAction::InvokeShareSheet(path.to_path_buf()));
        Ok(())
    }
}

/// Codec wrapper that fails exports after writing partial data,
/// to check nothing is left at the destination
pub struct FailingExportCodec<C> {
    inner: C,
    message: String,
}

impl<C: ArchiveCodec> FailingExportCodec<C> {
    pub fn new(inner: C, message: impl Into<String>) -> Self {
        Self {
            inner,
            message: message.into(),
        }
    }

    fn fail_after_partial_write(&self, path: &Path) -> Result<(), String> {
        std::fs::write(path, b"{\"format\":\"gmd-ar").map_err(|e| e.to_string())?;
        Err(self.message.clone())
    }
}

impl<C: ArchiveCodec> ArchiveCodec for FailingExportCodec<C> {
    fn classify(&self, path: &Path) -> FileKind {
        self.inner.classify(path)
    }

    fn export_level(&self, _level: &Level, path: &Path) -> Result<(), String> {
        self.fail_after_partial_write(path)
    }

    fn export_list(&self, _list: &LevelList, path: &Path) -> Result<(), String> {
        self.fail_after_partial_write(path)
    }

    fn import_level(&self, path: &Path) -> Result<Level, String> {
        self.inner.import_level(path)
    }

    fn import_list(&self, path: &Path) -> Result<LevelList, String> {
        self.inner.import_list(path)
    }
}
