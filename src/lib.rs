// Library exports for the command line front end and integration tests

pub mod classifier;
pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod library;
pub mod models;
pub mod picker;
pub mod platform;
pub mod session;
pub mod surface;
pub mod task;

pub use error::{TransferError, TransferOutcome};
pub use models::{Entity, EntityKind, FileKind, Level, LevelList};

// Test support (only available with test-utils feature)
#[cfg(feature = "test-utils")]
pub mod test_support;
