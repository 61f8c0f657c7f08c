//! Miner engine: upstream fetching, persistence and the mining pipeline.
mod fetch;
mod index_file;
mod mine;
mod orchestrator;
mod persist;
mod publish;
mod state_store;
mod types;

pub use fetch::{DocumentSource, FederalRegisterFetcher, FetchSettings, PageQuery, DEFAULT_API_BASE};
pub use index_file::IndexFile;
pub use mine::{MineError, MinerSettings, StoryMiner};
pub use orchestrator::{Orchestrator, OrchestratorError, RunSummary};
pub use persist::{ensure_output_dir, list_file_names, AtomicFileWriter, PersistError};
pub use publish::{DryRunPublisher, GitPublisher, PublishError, Publisher};
pub use state_store::{StateError, StateStore, DEFAULT_STATE_FILENAME};
pub use types::{FailureKind, FetchError};
