use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use miner_core::{
    Document, PublicationState, SequenceExhausted, StoryRecord, StoryRenderer, INDEX_FILENAME,
};
use miner_logging::{miner_debug, miner_info, miner_trace, miner_warn};
use thiserror::Error;

use crate::fetch::{DocumentSource, PageQuery};
use crate::persist::{AtomicFileWriter, PersistError};
use crate::state_store::DEFAULT_STATE_FILENAME;

/// Where and how a run writes its output.
#[derive(Debug, Clone)]
pub struct MinerSettings {
    pub output_dir: PathBuf,
    pub state_filename: String,
    pub index_filename: String,
    pub per_page: u32,
    /// Pause between two page requests for the same date.
    pub page_delay: Duration,
    /// Cursor used only when no state file exists yet.
    pub first_story_num: u64,
}

impl MinerSettings {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            state_filename: DEFAULT_STATE_FILENAME.to_string(),
            index_filename: INDEX_FILENAME.to_string(),
            per_page: 100,
            page_delay: Duration::from_millis(500),
            first_story_num: miner_core::DEFAULT_FIRST_STORY_NUM,
        }
    }
}

/// Failures that end a mining pass. Fetch failures are not among them.
#[derive(Debug, Error)]
pub enum MineError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Sequence(#[from] SequenceExhausted),
}

/// Pages through one date of upstream documents and turns every unseen one
/// into a story artifact.
pub struct StoryMiner {
    source: Arc<dyn DocumentSource>,
    renderer: Arc<dyn StoryRenderer>,
    writer: AtomicFileWriter,
    per_page: u32,
    page_delay: Duration,
}

impl StoryMiner {
    pub fn new(
        settings: &MinerSettings,
        source: Arc<dyn DocumentSource>,
        renderer: Arc<dyn StoryRenderer>,
    ) -> Self {
        Self {
            source,
            renderer,
            writer: AtomicFileWriter::new(settings.output_dir.clone()),
            per_page: settings.per_page,
            page_delay: settings.page_delay,
        }
    }

    /// Mines `date` (or the unfiltered feed) starting at page 1.
    ///
    /// Stops after `batch_limit` new stories, on an empty page, or past the
    /// last page. A failed fetch ends paging for this date and the stories
    /// gathered so far are returned. Only artifact write failures and an
    /// exhausted story sequence are errors.
    pub async fn mine(
        &self,
        date: Option<NaiveDate>,
        state: &mut PublicationState,
        batch_limit: Option<usize>,
    ) -> Result<Vec<StoryRecord>, MineError> {
        let label = date.map_or_else(|| "latest".to_string(), |d| d.to_string());
        miner_info!("Mining Federal Register for {}", label);

        let mut stories = Vec::new();
        let mut page = 1;
        while !limit_reached(&stories, batch_limit) {
            let query = PageQuery {
                date,
                page,
                per_page: self.per_page,
            };
            let result = match self.source.fetch_page(&query).await {
                Ok(result) => result,
                Err(err) => {
                    miner_warn!(
                        "Fetching {} page {} failed: {}; keeping {} new stories",
                        label,
                        page,
                        err,
                        stories.len()
                    );
                    break;
                }
            };

            if result.results.is_empty() {
                miner_debug!("{} page {} is empty", label, page);
                break;
            }

            for document in &result.results {
                if document.document_number.is_empty() {
                    miner_warn!("Skipping document without a number: {:?}", document.title);
                    continue;
                }
                if state.is_published(&document.document_number) {
                    miner_trace!("Already published {}", document.document_number);
                    continue;
                }

                stories.push(self.publish_story(document, state)?);
                if limit_reached(&stories, batch_limit) {
                    miner_info!("Batch limit reached for {}", label);
                    break;
                }
            }
            if limit_reached(&stories, batch_limit) {
                break;
            }

            page += 1;
            if page > result.total_pages {
                break;
            }
            tokio::time::sleep(self.page_delay).await;
        }

        miner_info!("  -> {} new documents for {}", stories.len(), label);
        Ok(stories)
    }

    fn publish_story(
        &self,
        document: &Document,
        state: &mut PublicationState,
    ) -> Result<StoryRecord, MineError> {
        let number = state.next_number()?;
        let rendered = self.renderer.render(document, number);
        self.writer.write(&rendered.record.filename, &rendered.html)?;
        state.mark_published(&document.document_number)?;
        miner_debug!("Created {}", rendered.record.filename);
        Ok(rendered.record)
    }
}

fn limit_reached(stories: &[StoryRecord], batch_limit: Option<usize>) -> bool {
    batch_limit.is_some_and(|limit| stories.len() >= limit)
}
