// # UI Surfaces
//
// The entry points a screen calls: `start_export` / `start_import` return
// immediately, and exactly one terminal event per started operation arrives
// on the surface's event channel. Each surface owns one PickSession, so
// starting a new operation abandons one still waiting on its picker.

use crate::codec::ArchiveCodec;
use crate::config::Config;
use crate::error::TransferError;
use crate::export::{ExportOrchestrator, ExportReceipt};
use crate::import::{ImportBatchResult, ImportOrchestrator};
use crate::library::LocalLibrary;
use crate::models::Entity;
use crate::picker::{FilePicker, PathSelection, PickRequest};
use crate::platform::{PlatformActions, PlatformCapabilities, PostExportAction};
use crate::session::PickSession;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Wire shape of a terminal event: `{ "ok": true }` or `{ "ok": false, "message": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalPayload {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TerminalPayload {
    fn ok() -> Self {
        TerminalPayload {
            ok: true,
            message: None,
        }
    }

    fn failed(message: String) -> Self {
        TerminalPayload {
            ok: false,
            message: Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    Exported(ExportReceipt),
    Failed(TransferError),
    /// Picker closed while cancellations are not reported as failures
    Cancelled,
}

impl ExportEvent {
    pub fn is_ok(&self) -> bool {
        matches!(self, ExportEvent::Exported(_))
    }

    pub fn payload(&self) -> TerminalPayload {
        match self {
            ExportEvent::Exported(_) => TerminalPayload::ok(),
            ExportEvent::Failed(err) => TerminalPayload::failed(err.to_string()),
            ExportEvent::Cancelled => TerminalPayload::failed(TransferError::Cancelled.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent {
    /// Picker returned; per-file results of the batch, possibly ending in a rejection
    Finished(ImportBatchResult),
    /// No batch ran because picking failed
    Failed(TransferError),
    Cancelled,
}

impl ImportEvent {
    /// Whether views over the library need to be re-queried
    pub fn should_refresh(&self) -> bool {
        match self {
            ImportEvent::Finished(result) => result.should_refresh(),
            _ => false,
        }
    }
}

fn send_event<E>(events_tx: &mpsc::UnboundedSender<E>, event: E) {
    if events_tx.send(event).is_err() {
        debug!("Surface event receiver dropped");
    }
}

/// Export button of a level or list screen
pub struct ExportSurface {
    session: PickSession<PathSelection>,
    picker: Arc<dyn FilePicker>,
    orchestrator: ExportOrchestrator,
    platform: Arc<dyn PlatformActions>,
    notify_on_cancel: bool,
    events_tx: mpsc::UnboundedSender<ExportEvent>,
}

impl ExportSurface {
    pub fn new(
        picker: Arc<dyn FilePicker>,
        codec: Arc<dyn ArchiveCodec>,
        platform: Arc<dyn PlatformActions>,
        config: &Config,
    ) -> (Self, mpsc::UnboundedReceiver<ExportEvent>) {
        let capabilities = if config.post_export_action {
            platform.capabilities()
        } else {
            PlatformCapabilities::default()
        };
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let surface = Self {
            session: PickSession::new(),
            picker,
            orchestrator: ExportOrchestrator::new(codec, capabilities),
            platform,
            notify_on_cancel: config.notify_on_cancel,
            events_tx,
        };
        (surface, events_rx)
    }

    /// Ask for a destination, then export a snapshot of `entity` there.
    pub fn start_export(&self, entity: Entity) {
        let request = self.orchestrator.pick_request(&entity);
        info!(
            "Starting export of {} '{}'",
            entity.kind(),
            entity.display_name()
        );

        let orchestrator = self.orchestrator.clone();
        let platform = self.platform.clone();
        let notify_on_cancel = self.notify_on_cancel;
        let events_tx = self.events_tx.clone();

        self.session.bind(move |outcome| {
            let event = match outcome.and_then(PathSelection::into_single) {
                Ok(destination) => match orchestrator.export_entity(&entity, &destination) {
                    Ok(receipt) => {
                        match &receipt.action {
                            Some(action) if action.runs_automatically() => {
                                perform_logged(platform.as_ref(), action);
                            }
                            _ => {}
                        }
                        ExportEvent::Exported(receipt)
                    }
                    Err(err) => ExportEvent::Failed(err),
                },
                Err(err) if err.is_cancelled() && !notify_on_cancel => ExportEvent::Cancelled,
                Err(err) => ExportEvent::Failed(err),
            };
            send_event(&events_tx, event);
        });

        let task = self.picker.request(request);
        if let Err(e) = self.session.start(task) {
            error!("Failed to start export pick: {}", e);
        }
    }

    /// Run the receipt's follow-up on user request ("Open Folder").
    /// Returns false when the receipt has none.
    pub fn perform_follow_up(&self, receipt: &ExportReceipt) -> bool {
        match &receipt.action {
            Some(action) => {
                perform_logged(self.platform.as_ref(), action);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }
}

fn perform_logged(platform: &dyn PlatformActions, action: &PostExportAction) {
    if let Err(e) = platform.perform(action) {
        warn!(
            "Post-export action failed for {}: {}",
            action.path().display(),
            e
        );
    }
}

/// Import button of the local levels / lists browser
pub struct ImportSurface {
    session: PickSession<PathSelection>,
    picker: Arc<dyn FilePicker>,
    orchestrator: ImportOrchestrator,
    notify_on_cancel: bool,
    events_tx: mpsc::UnboundedSender<ImportEvent>,
}

impl ImportSurface {
    pub fn new(
        picker: Arc<dyn FilePicker>,
        codec: Arc<dyn ArchiveCodec>,
        library: Arc<dyn LocalLibrary>,
        config: &Config,
    ) -> (Self, mpsc::UnboundedReceiver<ImportEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let surface = Self {
            session: PickSession::new(),
            picker,
            orchestrator: ImportOrchestrator::new(codec, library),
            notify_on_cancel: config.notify_on_cancel,
            events_tx,
        };
        (surface, events_rx)
    }

    /// Ask for archive files, then import them in the order picked.
    pub fn start_import(&self) {
        info!("Starting import");

        let orchestrator = self.orchestrator.clone();
        let notify_on_cancel = self.notify_on_cancel;
        let events_tx = self.events_tx.clone();

        self.session.bind(move |outcome| {
            let event = match outcome {
                Ok(selection) => {
                    ImportEvent::Finished(orchestrator.import_batch(&selection.into_paths()))
                }
                Err(err) if err.is_cancelled() && !notify_on_cancel => ImportEvent::Cancelled,
                Err(err) => ImportEvent::Failed(err),
            };
            send_event(&events_tx, event);
        });

        let task = self.picker.request(PickRequest::open_many());
        if let Err(e) = self.session.start(task) {
            error!("Failed to start import pick: {}", e);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }
}
