use crate::codec::ArchiveCodec;
use crate::models::FileKind;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Decides whether a file is a level archive, a list archive or neither
///
/// Unreadable and malformed files both come back as `FileKind::None`, so the
/// caller can route them to the same rejection.
#[derive(Clone)]
pub struct FileKindClassifier {
    codec: Arc<dyn ArchiveCodec>,
}

impl FileKindClassifier {
    pub fn new(codec: Arc<dyn ArchiveCodec>) -> Self {
        Self { codec }
    }

    pub fn classify(&self, path: &Path) -> FileKind {
        if !path.is_file() {
            debug!("{} is not a regular file", path.display());
            return FileKind::None;
        }

        let kind = self.codec.classify(path);
        debug!("Classified {} as {}", path.display(), kind);
        kind
    }
}
