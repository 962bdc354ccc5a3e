// # Import Module
//
// Turns a batch of picked files into entries of the local library:
//
// - **ImportOrchestrator**: classify → decode → insert, one file at a time
// - **ImportBatchResult**: ordered per-file outcome reported to the UI
//
// Batches are fail-fast: the first file that is not an archive, or that the
// codec cannot decode, ends the batch. Files imported before it stay in the
// library.

mod orchestrator;
mod types;

pub use orchestrator::ImportOrchestrator;
pub use types::{ImportBatchResult, ImportFileResult, ImportStatus};
