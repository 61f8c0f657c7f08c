use std::fs;
use std::io;
use std::path::PathBuf;

use miner_core::{append_entries, StoryRecord};

use crate::persist::{AtomicFileWriter, PersistError};

/// The on-disk story index, updated read-modify-write.
#[derive(Debug, Clone)]
pub struct IndexFile {
    writer: AtomicFileWriter,
    filename: String,
}

impl IndexFile {
    pub fn new(dir: PathBuf, filename: impl Into<String>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
            filename: filename.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(&self.filename)
    }

    pub fn append(&self, entries: &[StoryRecord]) -> Result<PathBuf, PersistError> {
        let path = self.path();
        let existing = match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(err.into()),
        };
        let updated = append_entries(existing.as_deref(), entries);
        self.writer.write(&self.filename, &updated)
    }
}
