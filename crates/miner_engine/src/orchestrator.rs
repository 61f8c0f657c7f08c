use std::sync::Arc;

use chrono::{Days, NaiveDate};
use miner_core::{
    reconcile_sequence, PublicationState, SequenceExhausted, StoryRecord, StoryRenderer,
};
use miner_logging::{miner_info, miner_warn};
use thiserror::Error;

use crate::fetch::DocumentSource;
use crate::index_file::IndexFile;
use crate::mine::{MineError, MinerSettings, StoryMiner};
use crate::persist::{list_file_names, PersistError};
use crate::publish::{PublishError, Publisher};
use crate::state_store::{StateError, StateStore};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Mine(#[from] MineError),
    #[error(transparent)]
    Sequence(#[from] SequenceExhausted),
    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub new_stories: usize,
    pub batches_published: usize,
}

/// Drives mining runs and decides when state is saved and published.
///
/// State is loaded once per run and written only at flush points. A flush
/// updates the index, saves state, then publishes; if publishing fails the
/// saved ledger still marks those documents done, so they are never
/// re-created.
pub struct Orchestrator {
    miner: StoryMiner,
    store: StateStore,
    index: IndexFile,
    publisher: Box<dyn Publisher>,
}

impl Orchestrator {
    pub fn new(
        settings: &MinerSettings,
        source: Arc<dyn DocumentSource>,
        renderer: Arc<dyn StoryRenderer>,
        publisher: Box<dyn Publisher>,
    ) -> Self {
        Self {
            miner: StoryMiner::new(settings, source, renderer),
            store: StateStore::new(
                settings.output_dir.clone(),
                settings.state_filename.clone(),
                settings.first_story_num,
            ),
            index: IndexFile::new(settings.output_dir.clone(), settings.index_filename.clone()),
            publisher,
        }
    }

    /// Loads persisted state and re-derives the sequence cursor from the
    /// artifacts actually on disk.
    pub fn load_state(&self) -> Result<PublicationState, OrchestratorError> {
        let mut state = self.store.load()?;
        let names = list_file_names(self.store.dir())?;
        let persisted = state.next_story_num;
        reconcile_sequence(&mut state, &names)?;
        if persisted != state.next_story_num {
            miner_warn!(
                "Story cursor {} from state file differs from artifacts on disk; using {}",
                persisted,
                state.next_story_num
            );
        }
        Ok(state)
    }

    /// Mines a single date, capped at `batch_limit` new stories, and publishes
    /// them as one batch. Nothing is written when there is nothing new.
    pub async fn run_single_date(
        &self,
        date: NaiveDate,
        batch_limit: usize,
    ) -> Result<RunSummary, OrchestratorError> {
        let mut state = self.load_state()?;
        let stories = self.miner.mine(Some(date), &mut state, Some(batch_limit)).await?;

        if stories.is_empty() {
            miner_info!("No new documents to publish for {}", date);
            return Ok(RunSummary::default());
        }

        let message = format!(
            "Federal Register batch: {} documents from {}",
            stories.len(),
            date
        );
        self.flush(&state, &stories, &message)?;
        miner_info!("Published {} new stories", stories.len());
        Ok(RunSummary {
            new_stories: stories.len(),
            batches_published: 1,
        })
    }

    /// Mines `days_back` dates ending at `today`, newest first, without a
    /// per-date cap. Accumulated stories are flushed whenever they reach
    /// `checkpoint`, and once more at the end for any remainder.
    pub async fn run_history(
        &self,
        today: NaiveDate,
        days_back: u32,
        checkpoint: usize,
    ) -> Result<RunSummary, OrchestratorError> {
        let mut state = self.load_state()?;
        let mut summary = RunSummary::default();
        let mut pending: Vec<StoryRecord> = Vec::new();

        for offset in 0..days_back {
            let Some(date) = today.checked_sub_days(Days::new(u64::from(offset))) else {
                break;
            };
            let stories = self.miner.mine(Some(date), &mut state, None).await?;
            summary.new_stories += stories.len();
            pending.extend(stories);

            if !pending.is_empty() && pending.len() >= checkpoint {
                self.flush(&state, &pending, &history_message(pending.len()))?;
                summary.batches_published += 1;
                miner_info!(
                    "Committed batch of {} stories. Total: {}",
                    pending.len(),
                    summary.new_stories
                );
                pending.clear();
            }
        }

        if !pending.is_empty() {
            self.flush(&state, &pending, &history_message(pending.len()))?;
            summary.batches_published += 1;
            miner_info!(
                "Final batch: {} stories. Total: {}",
                pending.len(),
                summary.new_stories
            );
        }

        miner_info!(
            "Historical run complete: {} new Federal Register documents",
            summary.new_stories
        );
        Ok(summary)
    }

    fn flush(
        &self,
        state: &PublicationState,
        stories: &[StoryRecord],
        message: &str,
    ) -> Result<(), OrchestratorError> {
        self.index.append(stories)?;
        self.store.save(state)?;
        self.publisher.publish(message)?;
        Ok(())
    }
}

fn history_message(count: usize) -> String {
    format!("Federal Register historical batch: {count} documents")
}
