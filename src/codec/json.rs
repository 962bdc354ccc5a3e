use super::ArchiveCodec;
use crate::models::{FileKind, Level, LevelList};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Format marker written into every archive
pub const ARCHIVE_FORMAT: &str = "gmd-archive";

/// Current archive version; newer versions are not recognized
pub const ARCHIVE_VERSION: u32 = 1;

/// Reference codec storing one entity per file as a tagged JSON document:
///
/// ```json
/// { "format": "gmd-archive", "version": 1, "kind": "level", "level": { ... } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonArchiveCodec;

impl JsonArchiveCodec {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct ArchiveOut<'a> {
    format: &'static str,
    version: u32,
    #[serde(flatten)]
    body: BodyOut<'a>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum BodyOut<'a> {
    Level { level: &'a Level },
    List { list: &'a LevelList },
}

#[derive(Deserialize)]
struct ArchiveIn {
    format: String,
    version: u32,
    #[serde(flatten)]
    body: BodyIn,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum BodyIn {
    Level { level: Level },
    List { list: LevelList },
}

/// Only the fields needed to tell archives apart
#[derive(Deserialize)]
struct Header {
    format: String,
    version: u32,
    kind: String,
}

fn write_archive(body: BodyOut<'_>, path: &Path) -> Result<(), String> {
    let file = File::create(path)
        .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);

    let archive = ArchiveOut {
        format: ARCHIVE_FORMAT,
        version: ARCHIVE_VERSION,
        body,
    };
    serde_json::to_writer_pretty(&mut writer, &archive)
        .map_err(|e| format!("Failed to encode archive: {}", e))?;

    writer
        .flush()
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    Ok(())
}

fn read_archive(path: &Path) -> Result<BodyIn, String> {
    let file =
        File::open(path).map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;

    let archive: ArchiveIn = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Failed to decode {}: {}", path.display(), e))?;

    if archive.format != ARCHIVE_FORMAT {
        return Err(format!("Unknown archive format '{}'", archive.format));
    }
    if archive.version > ARCHIVE_VERSION {
        return Err(format!(
            "Archive version {} is newer than supported version {}",
            archive.version, ARCHIVE_VERSION
        ));
    }

    Ok(archive.body)
}

impl ArchiveCodec for JsonArchiveCodec {
    fn classify(&self, path: &Path) -> FileKind {
        let header: Header = match File::open(path)
            .map_err(|e| e.to_string())
            .and_then(|file| {
                serde_json::from_reader(BufReader::new(file)).map_err(|e| e.to_string())
            }) {
            Ok(header) => header,
            Err(e) => {
                debug!("{} is not readable as an archive: {}", path.display(), e);
                return FileKind::None;
            }
        };

        if header.format != ARCHIVE_FORMAT || header.version > ARCHIVE_VERSION {
            return FileKind::None;
        }

        match header.kind.as_str() {
            "level" => FileKind::Level,
            "list" => FileKind::List,
            _ => FileKind::None,
        }
    }

    fn export_level(&self, level: &Level, path: &Path) -> Result<(), String> {
        write_archive(BodyOut::Level { level }, path)
    }

    fn export_list(&self, list: &LevelList, path: &Path) -> Result<(), String> {
        write_archive(BodyOut::List { list }, path)
    }

    fn import_level(&self, path: &Path) -> Result<Level, String> {
        match read_archive(path)? {
            BodyIn::Level { level } => Ok(level),
            BodyIn::List { .. } => Err(format!("{} contains a list, not a level", path.display())),
        }
    }

    fn import_list(&self, path: &Path) -> Result<LevelList, String> {
        match read_archive(path)? {
            BodyIn::List { list } => Ok(list),
            BodyIn::Level { .. } => Err(format!("{} contains a level, not a list", path.display())),
        }
    }
}
