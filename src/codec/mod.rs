// # Archive Codec
//
// The capability set the orchestrators consume to turn entities into
// archive files and back. The byte layout belongs to the implementation;
// the only requirement is that `classify` can tell levels, lists and
// everything else apart by content.

mod json;

pub use json::{JsonArchiveCodec, ARCHIVE_FORMAT, ARCHIVE_VERSION};

use crate::models::{Entity, EntityKind, FileKind, Level, LevelList};
use std::path::Path;

/// Converts between in-memory entities and archive files
///
/// Errors are plain messages shown to the user as-is.
pub trait ArchiveCodec: Send + Sync {
    /// Sniff a file. Must not fail: unreadable or malformed files are `FileKind::None`.
    fn classify(&self, path: &Path) -> FileKind;

    fn export_level(&self, level: &Level, path: &Path) -> Result<(), String>;

    fn export_list(&self, list: &LevelList, path: &Path) -> Result<(), String>;

    fn import_level(&self, path: &Path) -> Result<Level, String>;

    fn import_list(&self, path: &Path) -> Result<LevelList, String>;

    fn export_entity(&self, entity: &Entity, path: &Path) -> Result<(), String> {
        match entity {
            Entity::Level(level) => self.export_level(level, path),
            Entity::List(list) => self.export_list(list, path),
        }
    }

    fn import_kind(&self, kind: EntityKind, path: &Path) -> Result<Entity, String> {
        match kind {
            EntityKind::Level => self.import_level(path).map(Entity::Level),
            EntityKind::List => self.import_list(path).map(Entity::List),
        }
    }
}
