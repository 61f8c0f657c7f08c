use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use miner_core::PublicationState;
use miner_logging::{miner_debug, miner_info};
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

pub const DEFAULT_STATE_FILENAME: &str = "fr_state.json";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("state file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write state: {0}")]
    Write(#[from] PersistError),
}

/// JSON-file backed [`PublicationState`].
#[derive(Debug, Clone)]
pub struct StateStore {
    writer: AtomicFileWriter,
    filename: String,
    first_story_num: u64,
}

impl StateStore {
    pub fn new(dir: PathBuf, filename: impl Into<String>, first_story_num: u64) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
            filename: filename.into(),
            first_story_num,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(&self.filename)
    }

    /// A missing file is a fresh start; an unreadable or corrupt one is an
    /// error so the ledger is never silently reset.
    pub fn load(&self) -> Result<PublicationState, StateError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                miner_info!(
                    "No state file at {:?}; starting empty at story {}",
                    path,
                    self.first_story_num
                );
                return Ok(PublicationState::starting_at(self.first_story_num));
            }
            Err(source) => return Err(StateError::Read { path, source }),
        };

        let state: PublicationState = serde_json::from_str(&content)
            .map_err(|source| StateError::Corrupt { path: path.clone(), source })?;
        miner_info!(
            "Loaded state from {:?}: {} published documents",
            path,
            state.published_docs.len()
        );
        Ok(state)
    }

    pub fn save(&self, state: &PublicationState) -> Result<PathBuf, StateError> {
        let mut content = serde_json::to_string_pretty(state).map_err(StateError::Serialize)?;
        content.push('\n');
        let path = self.writer.write(&self.filename, &content)?;
        miner_debug!(
            "Saved state to {:?} (next story {})",
            path,
            state.next_story_num
        );
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        self.writer.dir()
    }
}
