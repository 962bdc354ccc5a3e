use crate::models::{Level, LevelList};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::VecDeque;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Library file {} is corrupted: {source}", path.display())]
    Corrupted {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to save {}: {message}", path.display())]
    Save { path: PathBuf, message: String },
}

/// The host's local containers for levels and lists
///
/// Both stores are ordered newest first: inserting puts an entity at the front.
pub trait LocalLibrary: Send + Sync {
    fn insert_level(&self, level: Level) -> Result<(), LibraryError>;

    fn insert_list(&self, list: LevelList) -> Result<(), LibraryError>;

    fn levels(&self) -> Result<Vec<Level>, LibraryError>;

    fn lists(&self) -> Result<Vec<LevelList>, LibraryError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Library kept only in memory
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    levels: Mutex<VecDeque<Level>>,
    lists: Mutex<VecDeque<LevelList>>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalLibrary for MemoryLibrary {
    fn insert_level(&self, level: Level) -> Result<(), LibraryError> {
        lock(&self.levels).push_front(level);
        Ok(())
    }

    fn insert_list(&self, list: LevelList) -> Result<(), LibraryError> {
        lock(&self.lists).push_front(list);
        Ok(())
    }

    fn levels(&self) -> Result<Vec<Level>, LibraryError> {
        Ok(lock(&self.levels).iter().cloned().collect())
    }

    fn lists(&self) -> Result<Vec<LevelList>, LibraryError> {
        Ok(lock(&self.lists).iter().cloned().collect())
    }
}

const LEVELS_FILE: &str = "levels.json";
const LISTS_FILE: &str = "lists.json";

/// Library persisted as `levels.json` and `lists.json` in one directory
///
/// Every insertion rewrites the affected file through a staging file, so a
/// crash mid-save leaves the previous contents in place.
#[derive(Debug)]
pub struct JsonFileLibrary {
    dir: PathBuf,
    levels: Mutex<Vec<Level>>,
    lists: Mutex<Vec<LevelList>>,
}

impl JsonFileLibrary {
    /// Open (creating if needed) the library stored in `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let levels = load_entries(&dir.join(LEVELS_FILE))?;
        let lists = load_entries(&dir.join(LISTS_FILE))?;
        info!(
            "Opened library at {} ({} levels, {} lists)",
            dir.display(),
            levels.len(),
            lists.len()
        );

        Ok(Self {
            dir,
            levels: Mutex::new(levels),
            lists: Mutex::new(lists),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn insert_front<T: Serialize>(
        &self,
        store: &Mutex<Vec<T>>,
        file_name: &str,
        entry: T,
    ) -> Result<(), LibraryError> {
        let mut entries = lock(store);
        entries.insert(0, entry);

        let path = self.dir.join(file_name);
        if let Err(e) = save_entries(&path, &entries) {
            entries.remove(0);
            return Err(e);
        }

        debug!("Saved {} entries to {}", entries.len(), path.display());
        Ok(())
    }
}

impl LocalLibrary for JsonFileLibrary {
    fn insert_level(&self, level: Level) -> Result<(), LibraryError> {
        self.insert_front(&self.levels, LEVELS_FILE, level)
    }

    fn insert_list(&self, list: LevelList) -> Result<(), LibraryError> {
        self.insert_front(&self.lists, LISTS_FILE, list)
    }

    fn levels(&self) -> Result<Vec<Level>, LibraryError> {
        Ok(lock(&self.levels).clone())
    }

    fn lists(&self) -> Result<Vec<LevelList>, LibraryError> {
        Ok(lock(&self.lists).clone())
    }
}

fn load_entries<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LibraryError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_slice(&data).map_err(|source| LibraryError::Corrupted {
        path: path.to_path_buf(),
        source,
    })
}

fn save_entries<T: Serialize>(path: &Path, entries: &[T]) -> Result<(), LibraryError> {
    let save_error = |message: String| LibraryError::Save {
        path: path.to_path_buf(),
        message,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let staging = tempfile::NamedTempFile::new_in(dir).map_err(|e| save_error(e.to_string()))?;

    let mut writer = BufWriter::new(staging.as_file());
    serde_json::to_writer_pretty(&mut writer, entries).map_err(|e| save_error(e.to_string()))?;
    writer.flush().map_err(|e| save_error(e.to_string()))?;
    drop(writer);

    staging
        .persist(path)
        .map_err(|e| save_error(e.error.to_string()))?;
    Ok(())
}
