use serde::{Deserialize, Serialize};
use std::fmt;

/// A single level as the host keeps it in memory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Level {
    pub name: String,
    pub description: String,
    pub creator: String,
    /// Encoded object data, opaque to this crate
    pub level_string: String,
    pub song_id: Option<u32>,
    pub version: u32,
}

impl Level {
    pub fn new(name: impl Into<String>) -> Self {
        Level {
            name: name.into(),
            description: String::new(),
            creator: String::new(),
            level_string: String::new(),
            song_id: None,
            version: 1,
        }
    }
}

/// A list of references to online levels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelList {
    pub name: String,
    pub description: String,
    pub creator: String,
    pub level_ids: Vec<u64>,
}

impl LevelList {
    pub fn new(name: impl Into<String>) -> Self {
        LevelList {
            name: name.into(),
            description: String::new(),
            creator: String::new(),
            level_ids: Vec::new(),
        }
    }
}

/// Anything that can be written to or read from an archive
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Level(Level),
    List(LevelList),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Level(_) => EntityKind::Level,
            Entity::List(_) => EntityKind::List,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Entity::Level(level) => &level.name,
            Entity::List(list) => &list.name,
        }
    }

    /// File name offered to the save dialog, e.g. `Stereo Madness.gmd`.
    /// Only a suggestion: the user may pick any destination.
    pub fn suggested_file_name(&self) -> String {
        format!(
            "{}.{}",
            sanitize_file_stem(self.display_name()),
            self.kind().extension()
        )
    }
}

impl From<Level> for Entity {
    fn from(level: Level) -> Self {
        Entity::Level(level)
    }
}

impl From<LevelList> for Entity {
    fn from(list: LevelList) -> Self {
        Entity::List(list)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Level,
    List,
}

impl EntityKind {
    pub fn extension(&self) -> &'static str {
        match self {
            EntityKind::Level => "gmd",
            EntityKind::List => "gmdl",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Level => write!(f, "level"),
            EntityKind::List => write!(f, "list"),
        }
    }
}

/// What a file on disk turned out to contain, judged by content alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Level,
    List,
    None,
}

impl FileKind {
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            FileKind::Level => Some(EntityKind::Level),
            FileKind::List => Some(EntityKind::List),
            FileKind::None => None,
        }
    }
}

impl From<EntityKind> for FileKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Level => FileKind::Level,
            EntityKind::List => FileKind::List,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Level => write!(f, "level archive"),
            FileKind::List => write!(f, "list archive"),
            FileKind::None => write!(f, "not an archive"),
        }
    }
}

fn sanitize_file_stem(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim().trim_matches('.').trim();
    if trimmed.is_empty() {
        "Unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}
