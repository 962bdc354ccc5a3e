#![allow(dead_code)]

use gmd_transfer::codec::{ArchiveCodec, JsonArchiveCodec};
use gmd_transfer::{Level, LevelList};
use std::path::{Path, PathBuf};

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn create_test_level(name: &str) -> Level {
    Level {
        name: name.to_string(),
        description: format!("{} description", name),
        creator: "Tester".to_string(),
        level_string: "kS38,1_40_2_125_3_255,kA13,0".to_string(),
        song_id: Some(467339),
        version: 2,
    }
}

pub fn create_test_list(name: &str) -> LevelList {
    LevelList {
        name: name.to_string(),
        description: String::new(),
        creator: "Tester".to_string(),
        level_ids: vec![1, 2, 3],
    }
}

/// Write a level archive into `dir` and return its path
pub fn write_level_archive(dir: &Path, file_name: &str, name: &str) -> PathBuf {
    let path = dir.join(file_name);
    JsonArchiveCodec::new()
        .export_level(&create_test_level(name), &path)
        .unwrap();
    path
}

/// Write a list archive into `dir` and return its path
pub fn write_list_archive(dir: &Path, file_name: &str, name: &str) -> PathBuf {
    let path = dir.join(file_name);
    JsonArchiveCodec::new()
        .export_list(&create_test_list(name), &path)
        .unwrap();
    path
}

/// Write junk bytes under an archive-looking name
pub fn write_garbage(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, b"this is not a level\n\x00\xff").unwrap();
    path
}
